//! Unified error type for the service.
//!
//! Every layer returns [`Result`]. The web layer turns an [`Error`] into an HTTP
//! status code and a `{"detail": ...}` body, see `web::error`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("{message}")]
    Unauthorized { message: String },

    #[error("Missing required scope: at least one of {required}")]
    Forbidden { required: String },

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Database(value.to_string())
    }
}

impl Error {
    /// Builds a [`Error::NotFound`] for the given entity label and key.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a [`Error::Validation`] from a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Builds a [`Error::Unauthorized`] from a message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let e = Error::not_found("Card", 42);
        assert_eq!(e.to_string(), "Card 42 not found");
    }

    #[test]
    fn test_forbidden_display() {
        let e = Error::Forbidden {
            required: "system, admin".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "Missing required scope: at least one of system, admin"
        );
    }

    #[test]
    fn test_db_err_converts_to_database() {
        let e: Error = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(e, Error::Database(_)));
    }
}
