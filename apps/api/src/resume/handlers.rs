use axum::{
    extract::{multipart::MultipartError, rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::resume::form::{load_for_edit, save_edit, ResumeEdit};
use crate::resume::models::ParsedResumeRecord;
use crate::resume::pipeline::{parse_and_store, SourceDocument};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "file";

/// POST /api/v1/resumes/parse
pub async fn handle_parse(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParsedResumeRecord>, AppError> {
    let document = read_upload(&mut multipart).await?;
    info!(
        "Received resume upload: {} bytes, type '{}'",
        document.bytes.len(),
        document.content_type
    );
    let record = parse_and_store(&state.parser, state.store.as_ref(), &document).await?;
    Ok(Json(record))
}

/// GET /api/v1/resumes/parsed
pub async fn handle_get_parsed(
    State(state): State<AppState>,
) -> Result<Json<ParsedResumeRecord>, AppError> {
    let record = load_for_edit(state.store.as_ref()).await?;
    Ok(Json(record))
}

/// PUT /api/v1/resumes/parsed
pub async fn handle_save_parsed(
    State(state): State<AppState>,
    payload: Result<Json<ResumeEdit>, JsonRejection>,
) -> Result<Json<ParsedResumeRecord>, AppError> {
    let Json(edit) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let record = save_edit(state.store.as_ref(), edit).await?;
    Ok(Json(record))
}

async fn read_upload(multipart: &mut Multipart) -> Result<SourceDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        return Ok(SourceDocument {
            file_name,
            content_type,
            bytes,
        });
    }
    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

/// Oversized bodies keep their 413; every other multipart failure is a bad request.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    let message = format!("{context}: {}", err.body_text());
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::Validation(message)
    }
}
