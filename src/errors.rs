// errors.rs
use astra::Response;
use thiserror::Error;

use crate::mailer::MailerError;

/// Errors originating from either the server logic
/// (routing, missing resources, permissions) or downstream layers (DB, mail, files).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Mail Error: {0}")]
    MailError(String),
    #[error("Storage Error: {0}")]
    StorageError(String),
    #[error("Document Error: {0}")]
    DocumentError(String),
    #[error("Password Hash Error: {0}")]
    PasswordHashError(String),
    #[error("Internal Server Error")]
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl ServerError {
    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Unauthorized(_) => 401,
            ServerError::Forbidden(_) => 403,
            ServerError::Conflict(_) => 409,
            ServerError::DbError(_)
            | ServerError::MailError(_)
            | ServerError::StorageError(_)
            | ServerError::DocumentError(_)
            | ServerError::PasswordHashError(_)
            | ServerError::InternalError => 500,
        }
    }

    /// Message safe to hand back to the client. Server-side failures are
    /// reported generically; the detail goes to the log instead.
    pub fn public_message(&self) -> String {
        match self {
            ServerError::NotFound => "not found".to_string(),
            ServerError::BadRequest(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::Forbidden(msg)
            | ServerError::Conflict(msg) => msg.clone(),
            ServerError::MailError(_) => "failed to send email".to_string(),
            ServerError::DbError(_)
            | ServerError::StorageError(_)
            | ServerError::DocumentError(_)
            | ServerError::PasswordHashError(_)
            | ServerError::InternalError => "internal server error".to_string(),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

impl From<MailerError> for ServerError {
    fn from(e: MailerError) -> Self {
        ServerError::MailError(e.to_string())
    }
}
