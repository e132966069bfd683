use super::common::{form_result, map_service_error, success_response};
use crate::{
    docx::{self, DOCX_MIME},
    errors::ApiError,
    handlers::AppState,
    services::notes::IssueNoteCommand,
};
use axum::{
    extract::{Form, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateNoteForm {
    pub author_id: i32,
    pub recipient_id: i32,
    pub cartridge_id: i32,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub reason: String,
    pub comment: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", get(get_note))
        .route("/:id/return", post(return_note))
        .route("/:id/document", get(note_document))
}

async fn list_notes(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let notes = state
        .services
        .notes
        .list_notes()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(notes))
}

async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let note = state
        .services
        .notes
        .get_note(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Service note {} not found", id)))?;
    Ok(success_response(note))
}

/// Issues cartridges to an employee and records the service note.
async fn create_note(
    State(state): State<Arc<AppState>>,
    Form(payload): Form<CreateNoteForm>,
) -> Response {
    let command = IssueNoteCommand {
        author_id: payload.author_id,
        recipient_id: payload.recipient_id,
        cartridge_id: payload.cartridge_id,
        quantity: payload.quantity,
        reason: payload.reason,
        comment: payload.comment,
    };
    let result = state
        .services
        .notes
        .issue(command)
        .await
        .map(|note| info!("Service note issued: {}", note.note_number));
    form_result(result, "/service-notes")
}

async fn return_note(State(state): State<Arc<AppState>>, Path(id): Path<i32>) -> Response {
    let result = state.services.notes.return_note(id).await.map(|_| ());
    form_result(result, "/service-notes")
}

/// Renders the note into the fixed office-document template and returns it
/// as a downloadable file.
async fn note_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let note = state
        .services
        .notes
        .get_note(id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Service note {} not found", id)))?;
    let author = state
        .services
        .catalog
        .get_employee(note.author_id)
        .await
        .map_err(map_service_error)?;
    let cartridge = state
        .services
        .catalog
        .get_cartridge(note.cartridge_id)
        .await
        .map_err(map_service_error)?;

    let bytes = docx::render_note(&note, author.as_ref(), cartridge.as_ref())
        .map_err(map_service_error)?;
    let filename = docx::document_filename(&note.note_number);

    Ok((
        [
            (header::CONTENT_TYPE, DOCX_MIME.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
