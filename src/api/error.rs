//! HTTP error mapping
//!
//! Bodies are plain text: a single validation message, or the template
//! diagnostic block.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::generation::GenerationError;
use crate::intake::ValidationError;
use crate::templates::{SelectionError, TemplateDiagnostic};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    UnsupportedCombination(TemplateDiagnostic),

    #[error("{0}")]
    TemplateNotFound(TemplateDiagnostic),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::UnsupportedCombination(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Validation(e) => AppError::Validation(e),
            GenerationError::Selection(SelectionError::Unsupported(d)) => {
                AppError::UnsupportedCombination(d)
            }
            GenerationError::Selection(SelectionError::NotFound(d)) => AppError::TemplateNotFound(d),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Internal(message) => tracing::error!("Document generation failed: {}", message),
            AppError::TemplateNotFound(d) => tracing::warn!(
                template_path = ?d.template_path,
                "Template not found"
            ),
            AppError::UnsupportedCombination(d) => {
                tracing::warn!("Rejected submission: {}", d.headline)
            }
            AppError::Validation(e) => tracing::debug!("Rejected submission: {}", e),
        }
        (status, self.to_string()).into_response()
    }
}
