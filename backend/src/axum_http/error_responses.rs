use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use crates::domain::errors::InvoiceError;
use serde::Serialize;
use tracing::{error, warn};

/// `{"error": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `{"success": false, "message": "..."}`
#[derive(Debug, Serialize)]
pub struct AckErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorShape {
    Plain,
    Ack,
}

#[derive(Debug)]
pub struct AppError {
    error: InvoiceError,
    shape: ErrorShape,
}

impl AppError {
    pub fn plain(error: impl Into<InvoiceError>) -> Self {
        Self {
            error: error.into(),
            shape: ErrorShape::Plain,
        }
    }

    pub fn ack(error: impl Into<InvoiceError>) -> Self {
        Self {
            error: error.into(),
            shape: ErrorShape::Ack,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        status_code(&self.error)
    }
}

pub fn status_code(error: &InvoiceError) -> StatusCode {
    match error {
        InvoiceError::Auth(_) => StatusCode::UNAUTHORIZED,
        InvoiceError::Validation(_) => StatusCode::BAD_REQUEST,
        InvoiceError::NotFoundOrForbidden | InvoiceError::ConflictOrGone => StatusCode::NOT_FOUND,
        InvoiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self.error {
            // Don't leak internal error detail to client
            InvoiceError::Internal(source) => {
                error!(error = ?source, "http: request failed with internal error");
            }
            InvoiceError::ConflictOrGone => {
                warn!("http: invoice vanished between authorization and write");
            }
            _ => {}
        }

        let message = self.error.to_string();

        match self.shape {
            ErrorShape::Plain => (status, Json(ErrorResponse { error: message })).into_response(),
            ErrorShape::Ack => (
                status,
                Json(AckErrorResponse {
                    success: false,
                    message,
                }),
            )
                .into_response(),
        }
    }
}
