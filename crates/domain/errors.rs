use thiserror::Error;

/// Caller identity could not be established.
///
/// The bearer path never says *why* a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid or expired token")]
    InvalidOrExpired,

    #[error("Unauthorized")]
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid {0} value")]
    InvalidField(&'static str),

    #[error("Request body must be a JSON object")]
    MalformedBody,
}

impl ValidationError {
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::MissingField(field) | ValidationError::InvalidField(field) => {
                Some(field)
            }
            ValidationError::MalformedBody => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invoice not found or no permission")]
    NotFoundOrForbidden,

    /// The row matched during authorization but was gone by the time of the write.
    #[error("Invoice not found or no permission")]
    ConflictOrGone,

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}
