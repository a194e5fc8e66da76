use thiserror::Error;

/// Failure kinds surfaced by the calendar and chat services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No credential has been stored yet.
    #[error("Not authenticated. Visit /auth to connect your calendar.")]
    Unauthenticated,

    /// A required field is missing or malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The calendar or language model call was rejected or failed.
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn bad_request(msg: &str) -> Self {
        Self::BadRequest(msg.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
