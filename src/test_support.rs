use crate::{
    backend::StudentBackend,
    config::{BackendConfig, RuntimeConfiguration, date_locale::DateLocaleConfig},
    data::new_student::{SelectedImage, ValidatedNewStudent},
    routes::router,
    state::ElevesState,
};
use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};
use tokio::{net::TcpListener, sync::Mutex};

pub const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub fn validated_student() -> ValidatedNewStudent {
    ValidatedNewStudent {
        nom: "Dupont".into(),
        prenom: "Jean".into(),
        birth_date: "2012-09-01".into(),
        ecole_origine: "École Jules Ferry".into(),
        genre: "Masculin".into(),
        inscription: "2024-01".into(),
        telephone: "0600000000".into(),
        class_id: "3".into(),
        image: SelectedImage {
            file_name: "jean.png".into(),
            content_type: "image/png".into(),
            bytes: PNG_HEADER.to_vec(),
        },
    }
}

/// What the fake backend saw and how it should misbehave.
#[derive(Default)]
pub struct FakeBackendState {
    pub students: Mutex<Vec<Value>>,
    pub classes: Mutex<Vec<Value>>,
    pub fail_lists: AtomicBool,
    pub list_fetches: AtomicUsize,
    pub uploads: AtomicUsize,
    pub last_upload: Mutex<HashMap<String, String>>,
    pub reject_uploads_with: Mutex<Option<String>>,
    ///reject with a bare `{}` body
    pub reject_uploads_quietly: AtomicBool,
    pub reject_deletes: AtomicBool,
    pub deleted: Mutex<Vec<String>>,
}

/// An in-process stand-in for the student backend, listening on a random local port.
pub struct FakeBackend {
    pub state: Arc<FakeBackendState>,
    pub base_url: String,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let state = Arc::new(FakeBackendState {
            students: Mutex::new(vec![
                json!({
                    "id": 1, "nom": "Dupont", "prenom": "Jean", "birthDate": "2012-09-01",
                    "ecoleOrigine": "École Jules Ferry", "genre": "Masculin",
                    "inscription": "2024-01", "telephone": "0600000000", "classId": 3,
                    "mimeType": "image/png", "fileData": "aGVsbG8="
                }),
                json!({
                    "id": 2, "nom": "Martin", "prenom": "Léa", "birthDate": "2011-03-14T00:00:00.000Z",
                    "ecoleOrigine": "École du Centre", "genre": "Féminin",
                    "inscription": "2024-02", "telephone": "0611111111", "classId": 99,
                    "mimeType": "image/jpeg", "fileData": "d29ybGQ="
                }),
            ]),
            classes: Mutex::new(vec![json!({"id": 3, "niveau": "6ème A"})]),
            ..FakeBackendState::default()
        });

        let app = Router::new()
            .route("/api/getpicture", get(fake_get_students))
            .route("/api/classes/getclasses", get(fake_get_classes))
            .route("/api/upload", post(fake_upload))
            .route("/api/deletefile/{id}", delete(fake_delete))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, app).await });

        Self { state, base_url }
    }

    pub fn backend_config(&self) -> BackendConfig {
        BackendConfig::from_base_url(self.base_url.clone()).unwrap()
    }

    pub fn student_backend(&self) -> StudentBackend {
        StudentBackend::new(Arc::new(self.backend_config())).unwrap()
    }

    /// Starts the admin app in front of this backend, returning the app's base URL and state.
    pub async fn spawn_app(&self) -> (String, ElevesState) {
        spawn_app(&self.base_url).await
    }
}

pub async fn spawn_app(backend_base_url: &str) -> (String, ElevesState) {
    let config = RuntimeConfiguration::from_parts(
        BackendConfig::from_base_url(backend_base_url.to_string()).unwrap(),
        DateLocaleConfig::new("UTC".into(), "fr-FR".into()).unwrap(),
        1024 * 1024,
    );
    let state = ElevesState::new(config).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let app = router(state.clone());
    tokio::spawn(async move { axum::serve(listener, app).await });

    (base_url, state)
}

async fn fake_get_students(State(state): State<Arc<FakeBackendState>>) -> Response {
    state.list_fetches.fetch_add(1, Ordering::SeqCst);
    if state.fail_lists.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "base indisponible"})),
        )
            .into_response();
    }
    Json(state.students.lock().await.clone()).into_response()
}

async fn fake_get_classes(State(state): State<Arc<FakeBackendState>>) -> Response {
    if state.fail_lists.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(state.classes.lock().await.clone()).into_response()
}

async fn fake_upload(
    State(state): State<Arc<FakeBackendState>>,
    mut multipart: Multipart,
) -> Response {
    state.uploads.fetch_add(1, Ordering::SeqCst);

    let mut received = HashMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let value = if let Some(file_name) = field.file_name().map(ToString::to_string) {
            let content_type = field.content_type().unwrap_or_default().to_string();
            format!("{file_name} ({content_type})")
        } else {
            field.text().await.unwrap()
        };
        received.insert(name, value);
    }

    if let Some(message) = state.reject_uploads_with.lock().await.clone() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response();
    }
    if state.reject_uploads_quietly.load(Ordering::SeqCst) {
        return (StatusCode::BAD_REQUEST, Json(json!({}))).into_response();
    }

    let url = format!(
        "/uploads/{}",
        received
            .get("image")
            .and_then(|image| image.split(' ').next())
            .unwrap_or_default()
    );
    state.students.lock().await.push(json!({
        "id": 100, "nom": received["nom"], "prenom": received["prenom"],
        "birthDate": received["birthDate"], "ecoleOrigine": received["ecoleOrigine"],
        "genre": received["genre"], "inscription": received["inscription"],
        "telephone": received["telephone"], "classId": 3,
        "mimeType": "image/png", "fileData": ""
    }));
    *state.last_upload.lock().await = received;

    Json(json!({ "url": url })).into_response()
}

async fn fake_delete(
    State(state): State<Arc<FakeBackendState>>,
    Path(id): Path<String>,
) -> Response {
    if state.reject_deletes.load(Ordering::SeqCst) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Fichier introuvable"})),
        )
            .into_response();
    }

    state
        .students
        .lock()
        .await
        .retain(|student| match &student["id"] {
            Value::String(text) => *text != id,
            other => other.to_string() != id,
        });
    state.deleted.lock().await.push(id);
    StatusCode::OK.into_response()
}
