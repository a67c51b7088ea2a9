//! Intake form and document generation endpoints
//!
//! GET  /          intake form
//! POST /generate  validate, fill the matching template, download it
//! GET  /health    liveness probe

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Response},
    Form,
};

use super::error::AppError;
use super::state::AppState;
use crate::intake::Intake;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub async fn intake_form() -> Html<&'static str> {
    Html(include_str!("../../static/form.html"))
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn generate_document(
    State(state): State<AppState>,
    Form(intake): Form<Intake>,
) -> Result<Response, AppError> {
    let generator = state.generator.clone();
    let generated = tokio::task::spawn_blocking(move || generator.generate(&intake))
        .await
        .map_err(|e| AppError::Internal(format!("generation task failed: {}", e)))??;

    let disposition = format!("attachment; filename=\"{}\"", generated.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        generated.bytes,
    )
        .into_response())
}
