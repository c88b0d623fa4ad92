//! Error types for the compliance registry.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Application-level errors returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    /// The question catalogue is malformed — a domain contributes zero total
    /// weight, so no ratio can be formed for it.
    #[error("catalogue misconfigured: domain '{0}' has zero total weight")]
    Configuration(String),

    /// A lifecycle action was invoked from a state that does not permit it.
    /// Rejected before any mutation or audit append.
    #[error("cannot {action} a document in state '{from}'")]
    InvalidTransition {
        from: crate::models::DocumentStatus,
        action: &'static str,
    },

    #[error("document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Scanned input could not be decoded into a verification payload.
    /// Distinct from a hash mismatch — the user should rescan, not suspect
    /// tampering.
    #[error("invalid verification code: {0}")]
    InvalidCodePayload(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    StorageFormat(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ComplianceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ComplianceError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ComplianceError::InvalidTransition { .. } => StatusCode::CONFLICT,
            ComplianceError::DocumentNotFound(_) => StatusCode::NOT_FOUND,
            ComplianceError::InvalidCodePayload(_) => StatusCode::BAD_REQUEST,
            ComplianceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ComplianceError::Storage(_)
            | ComplianceError::StorageFormat(_)
            | ComplianceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        if status.is_server_error() {
            tracing::error!("{message}");
        } else {
            tracing::debug!("request rejected: {message}");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
