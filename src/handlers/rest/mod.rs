use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_macros::debug_handler;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{
    dto::{CreateNoteRequest, ErrorResponse, HealthResponse, NoteResponse, UpdateNoteRequest},
    service::{NoteService, ServiceError},
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Simple Notes API",
        description = "Backend API for a simple notes app"
    ),
    paths(
        health_check,
        get_all_notes,
        get_one_note,
        create_note,
        update_note,
        delete_note
    ),
    components(schemas(
        NoteResponse,
        CreateNoteRequest,
        UpdateNoteRequest,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "health", description = "Service health and diagnostics"),
        (name = "notes", description = "CRUD operations for notes")
    )
)]
pub struct ApiDoc;

/// Note routes, health check and Swagger UI, without transport layers.
pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/notes", get(get_all_notes).post(create_note))
        .route(
            "/notes/{id}",
            get(get_one_note).put(update_note).delete(delete_note),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Healthy".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/notes",
    summary = "List notes",
    description = "Return all notes, most recently updated first.",
    operation_id = "list_notes",
    responses(
        (status = 200, description = "List of all notes", body = Vec<NoteResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_all_notes(State(service): State<Arc<NoteService>>) -> Response {
    match service.get_all_notes().await {
        Ok(notes) => (StatusCode::OK, Json(notes)).into_response(),
        Err(e) => failure(e, "list notes"),
    }
}

#[utoipa::path(
    get,
    path = "/notes/{id}",
    summary = "Get note",
    operation_id = "get_note",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 422, description = "Invalid note ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn get_one_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
) -> Response {
    match service.get_one_note(id).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => not_found(),
        Err(e) => failure(e, "get note"),
    }
}

#[utoipa::path(
    post,
    path = "/notes",
    summary = "Create note",
    operation_id = "create_note",
    request_body = CreateNoteRequest,
    responses(
        (status = 201, description = "Note created successfully", body = NoteResponse),
        (status = 422, description = "Empty title or content", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn create_note(
    State(service): State<Arc<NoteService>>,
    Json(payload): Json<CreateNoteRequest>,
) -> Response {
    match service.create_note(payload).await {
        Ok(note) => (StatusCode::CREATED, Json(note)).into_response(),
        Err(e) => failure(e, "create note"),
    }
}

#[utoipa::path(
    put,
    path = "/notes/{id}",
    summary = "Update note",
    description = "Update a note by id. Missing fields are left unchanged.",
    operation_id = "update_note",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    request_body = UpdateNoteRequest,
    responses(
        (status = 200, description = "Note updated successfully", body = NoteResponse),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 422, description = "Invalid note ID or empty field", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn update_note(
    State(service): State<Arc<NoteService>>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNoteRequest>,
) -> Response {
    match service.update_note(id, payload).await {
        Ok(Some(note)) => (StatusCode::OK, Json(note)).into_response(),
        Ok(None) => not_found(),
        Err(e) => failure(e, "update note"),
    }
}

#[utoipa::path(
    delete,
    path = "/notes/{id}",
    summary = "Delete note",
    operation_id = "delete_note",
    params(
        ("id" = i64, Path, description = "Note ID")
    ),
    responses(
        (status = 204, description = "Note deleted successfully"),
        (status = 404, description = "Note not found", body = ErrorResponse),
        (status = 422, description = "Invalid note ID", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "notes"
)]
#[debug_handler]
pub async fn delete_note(State(service): State<Arc<NoteService>>, Path(id): Path<i64>) -> Response {
    match service.delete_note(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(),
        Err(e) => failure(e, "delete note"),
    }
}

fn detail(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
        .into_response()
}

fn not_found() -> Response {
    detail(StatusCode::NOT_FOUND, "Note not found")
}

fn failure(e: ServiceError, action: &str) -> Response {
    match e {
        ServiceError::Validation(e) => detail(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        ServiceError::Store(e) => {
            tracing::error!("failed to {action}: {e}");
            detail(StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to {action}"))
        }
    }
}
