use crate::{
    routes::students::{
        delete_student, get_student_photo, get_students_page, internal_get_close_form,
        internal_get_new_student_form, internal_get_students, post_new_student,
    },
    state::ElevesState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

pub mod students;

pub fn router(state: ElevesState) -> Router {
    let max_upload_bytes = state.config().max_upload_bytes();

    Router::new()
        .route("/", get(get_students_page))
        .route("/internal/students", get(internal_get_students))
        .route(
            "/internal/students/new_form",
            get(internal_get_new_student_form),
        )
        .route("/internal/students/close_form", get(internal_get_close_form))
        .route("/students", post(post_new_student))
        .route("/students/{id}", delete(delete_student))
        .route("/students/{id}/photo", get(get_student_photo))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
