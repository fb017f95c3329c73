use crate::{
    data::{
        Genre, ResourceId,
        class::ClassInfo,
        filter::{StudentFilter, StudentFilterQuery},
        new_student::NewStudentForm,
        student::StudentRecord,
    },
    error::{ElevesError, ElevesResult, MissingStudentSnafu},
    maud_conveniences::{
        INPUT_CLASSES, Notice, form_element, notices_oob, render_table, simple_form_element,
        subtitle, title,
    },
    state::ElevesState,
    store::RecordStore,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use snafu::OptionExt;

const MISSING_FIELDS: &str = "Veuillez remplir tous les champs.";
const TRY_AGAIN_LATER: &str = "Une erreur s'est produite. Veuillez réessayer plus tard.";
const UPLOAD_FAILED: &str = "Erreur lors du téléchargement de l'image";
const DELETE_SUCCEEDED: &str = "Image supprimée avec succès";
const DELETE_FAILED: &str = "Erreur lors de la suppression de l'image.";
const DELETE_CONFIRMATION: &str = "Êtes-vous sûr de vouloir supprimer ce fichier ?";

const COLUMNS: [&str; 10] = [
    "N°inscription",
    "Nom",
    "Prénom",
    "Date de Naissance",
    "École d'origine",
    "Genre",
    "Téléphone",
    "Classe",
    "Image",
    "Actions",
];

pub async fn get_students_page(State(state): State<ElevesState>) -> Markup {
    state.refresh_all().await;

    let query = StudentFilterQuery::default();
    let table = internal_get_students(State(state.clone()), Query(query.clone())).await;

    state.render(html! {
        (title("Gestion des élèves"))

        button hx-get="/internal/students/new_form" hx-target="#in_focus" class="bg-blue-600 text-white py-2 px-6 rounded-lg shadow-lg hover:bg-blue-700 transition duration-300 mb-8" {
            "Ajouter un élève"
        }

        div id="notices" class="w-full max-w-5xl" {}
        div id="in_focus" {}

        div class="w-full max-w-5xl mx-auto bg-white p-6 rounded-lg shadow-lg mt-8" {
            (subtitle("Liste des élèves"))
            (filters_form(&query))
            div id="all_students" {
                (table)
            }
        }
    })
}

fn filters_form(query: &StudentFilterQuery) -> Markup {
    let search_classes = "p-3 border border-gray-300 rounded-lg text-sm shadow-sm mb-4 sm:mb-0 sm:mr-4";

    html! {
        form id="student_filters" hx-get="/internal/students" hx-target="#all_students" hx-trigger="input" class="mb-6 flex flex-col sm:flex-row sm:items-center" {
            input type="text" name="search_inscription" placeholder="Recherche par inscription" value=(query.search_inscription) class=(search_classes);
            input type="text" name="search_nom_prenom" placeholder="Recherche par nom/prénom" value=(query.search_nom_prenom) class=(search_classes);
            select name="search_genre" class="p-3 border border-gray-300 rounded-lg text-sm shadow-sm" {
                option value="" selected[query.search_genre.is_empty()] {"Tous les genres"}
                @for genre in Genre::SELECTABLE {
                    option value=(genre) selected[query.search_genre == genre.as_str()] {(genre)}
                }
            }
        }
    }
}

pub async fn internal_get_students(
    State(state): State<ElevesState>,
    Query(query): Query<StudentFilterQuery>,
) -> Markup {
    let store = state.store().await;
    students_table(&store, &query)
}

fn students_table(store: &RecordStore, query: &StudentFilterQuery) -> Markup {
    let filter = StudentFilter::from(query);
    let rows = store
        .filtered(&filter)
        .into_iter()
        .map(|student| student_row(store, student))
        .collect();

    render_table(COLUMNS, rows)
}

fn student_row(store: &RecordStore, student: &StudentRecord) -> [Markup; 10] {
    let id = student.id.to_path_segment();

    [
        html! {(student.inscription)},
        html! {(student.nom)},
        html! {(student.prenom)},
        html! {(student.birth_date)},
        html! {(student.ecole_origine)},
        html! {(student.genre)},
        html! {(student.telephone)},
        html! {(store.class_name_of(student))},
        html! {
            a href={"/students/" (id) "/photo"} target="_blank" {
                img src=(student.photo.data_uri()) alt="Image" class="w-20 h-20 object-cover rounded-full";
            }
        },
        html! {
            button hx-delete={"/students/" (id)} hx-confirm=(DELETE_CONFIRMATION) hx-target="#all_students" hx-include="#student_filters" class="bg-red-600 text-white py-1 px-3 rounded-lg shadow-lg hover:bg-red-700 transition duration-300" {
                "Supprimer"
            }
        },
    ]
}

pub async fn internal_get_new_student_form(State(state): State<ElevesState>) -> Markup {
    let store = state.store().await;
    new_student_form(store.classes(), &NewStudentForm::default())
}

pub async fn internal_get_close_form() -> Markup {
    html! {}
}

fn new_student_form(classes: &[ClassInfo], values: &NewStudentForm) -> Markup {
    html! {
        div class="fixed inset-0 flex items-center justify-center bg-gray-800/60 z-50" {
            div class="bg-white p-8 rounded-lg shadow-lg w-96" {
                (subtitle("Ajouter un élève"))
                form hx-post="/students" hx-encoding="multipart/form-data" hx-target="#in_focus" class="space-y-4" {
                    (simple_form_element("nom", "Nom", None, Some("Nom"), &values.nom))
                    (simple_form_element("prenom", "Prénom", None, Some("Prénom"), &values.prenom))
                    (simple_form_element("birthDate", "Date de Naissance", Some("date"), None, &values.birth_date))
                    (simple_form_element("ecoleOrigine", "École d'origine", None, Some("École d'origine"), &values.ecole_origine))
                    (form_element("genre", "Genre", html! {
                        select required id="genre" name="genre" class=(INPUT_CLASSES) {
                            option value="" disabled selected[values.genre.is_empty()] {"Sélectionnez le genre"}
                            @for genre in Genre::SELECTABLE {
                                option value=(genre) selected[values.genre == genre.as_str()] {(genre)}
                            }
                        }
                    }))
                    (simple_form_element("inscription", "Numéro d'inscription", None, Some("Numéro d'inscription"), &values.inscription))
                    (simple_form_element("telephone", "Téléphone", Some("tel"), Some("Téléphone"), &values.telephone))
                    (form_element("classId", "Classe", html! {
                        select required id="classId" name="classId" class=(INPUT_CLASSES) {
                            option value="" disabled selected[values.class_id.is_empty()] {"Sélectionnez une classe"}
                            @for class in classes {
                                @let id = class.id.to_string();
                                option value=(id) selected[values.class_id == id] {(class.niveau)}
                            }
                        }
                    }))
                    (form_element("image", "Image", html! {
                        input required type="file" id="image" name="image" class=(INPUT_CLASSES);
                    }))

                    div class="flex gap-4" {
                        button type="submit" class="bg-blue-600 text-white py-2 px-4 rounded-lg shadow-lg hover:bg-blue-700 transition duration-300" {
                            "Télécharger"
                        }
                        button type="button" hx-get="/internal/students/close_form" hx-target="#in_focus" class="bg-gray-300 text-gray-700 py-2 px-4 rounded-lg shadow-lg hover:bg-gray-400 transition duration-300" {
                            "Annuler"
                        }
                    }
                }
            }
        }
    }
}

/// Swaps in a table that immediately reloads itself with whatever filters are typed in.
fn students_reload_oob() -> Markup {
    html! {
        div id="all_students" hx-swap-oob="true" hx-get="/internal/students" hx-include="#student_filters" hx-trigger="load" {}
    }
}

pub async fn post_new_student(
    State(state): State<ElevesState>,
    multipart: Multipart,
) -> ElevesResult<Markup> {
    let form = NewStudentForm::from_multipart(multipart).await?;
    let values = form.without_image();

    let student = match form.validate() {
        Ok(student) => student,
        Err((_, missing)) => {
            debug!(?missing, "Refusing incomplete submission");
            let notice = Notice::failure(MISSING_FIELDS).with_details(missing.as_nice_list());
            let store = state.store().await;
            return Ok(html! {
                (new_student_form(store.classes(), &values))
                (notices_oob(Some(&notice)))
            });
        }
    };

    match state.backend().upload(student).await {
        Ok(url) => {
            info!(?url, "Uploaded new student");
            if let Err(e) = state.refresh_students().await {
                error!(?e, "Erreur lors de la récupération des images");
            }

            let notice = Notice::success(format!("Image uploadée avec succès ! URL: {url}"));
            Ok(html! {
                (notices_oob(Some(&notice)))
                (students_reload_oob())
            })
        }
        Err(e) => {
            let notice = upload_failure_notice(&e);
            let store = state.store().await;
            Ok(html! {
                (new_student_form(store.classes(), &values))
                (notices_oob(Some(&notice)))
            })
        }
    }
}

fn upload_failure_notice(e: &ElevesError) -> Notice {
    match e {
        ElevesError::BackendRejected {
            message: Some(message),
            ..
        } => {
            warn!(?message, "Backend refused the upload");
            Notice::failure(format!("{UPLOAD_FAILED}: {message}"))
        }
        e if e.is_transport() => {
            error!(?e, "Erreur lors du téléchargement de l'image");
            Notice::failure(TRY_AGAIN_LATER)
        }
        e => {
            error!(?e, "Upload failed without a message from the backend");
            Notice::failure(format!("{UPLOAD_FAILED}."))
        }
    }
}

/// Only ids that are in the loaded list get through to the backend.
fn resolve_loaded_id(store: &RecordStore, segment: &str) -> ElevesResult<ResourceId> {
    ResourceId::from_path_segment(segment)
        .filter(|id| store.find_student(id).is_some())
        .context(MissingStudentSnafu { id: segment })
}

pub async fn delete_student(
    State(state): State<ElevesState>,
    Path(segment): Path<String>,
    Query(query): Query<StudentFilterQuery>,
) -> ElevesResult<Markup> {
    let id = resolve_loaded_id(&*state.store().await, &segment)?;

    let notice = match state.backend().delete(&id).await {
        Ok(()) => {
            let removed = state.store_mut().await.remove_student(&id);
            info!(%id, removed, "Deleted student");
            Notice::success(DELETE_SUCCEEDED)
        }
        Err(e) if e.is_transport() => {
            error!(?e, "Erreur lors de la suppression de l'image");
            Notice::failure(TRY_AGAIN_LATER)
        }
        Err(e) => {
            error!(%id, ?e, "Backend refused the deletion");
            Notice::failure(DELETE_FAILED)
        }
    };

    let store = state.store().await;
    Ok(html! {
        (students_table(&store, &query))
        (notices_oob(Some(&notice)))
    })
}

pub async fn get_student_photo(
    State(state): State<ElevesState>,
    Path(segment): Path<String>,
) -> ElevesResult<Response> {
    let store = state.store().await;
    let student = ResourceId::from_path_segment(&segment)
        .and_then(|id| store.find_student(&id))
        .context(MissingStudentSnafu { id: segment.as_str() })?;

    let bytes = student.photo.decode()?;
    let content_type = student.photo.mime_type().to_string();

    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}
