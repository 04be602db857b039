use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::error::{ErrorMessage, HttpError};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email or username already exists!")]
    Duplicate,

    #[error("Invalid credentials or inactive account!")]
    InvalidCredentials,

    #[error("User {0} is not allowed to {1}")]
    AccessDenied(Uuid, &'static str),

    #[error("Complaint {0} not found")]
    ComplaintNotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password error: {0}")]
    Password(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ErrorMessage> for ServiceError {
    fn from(err: ErrorMessage) -> Self {
        match err {
            ErrorMessage::EmptyPassword | ErrorMessage::ExceededMaxPasswordLength(_) => {
                ServiceError::Validation(err.to_string())
            }
            _ => ServiceError::Password(err.to_string()),
        }
    }
}

impl From<String> for ServiceError {
    fn from(err: String) -> Self {
        ServiceError::Other(err)
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::Validation(err.to_string())
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        let status = error.status_code();
        HttpError::new(error.user_message(), status)
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Duplicate => StatusCode::CONFLICT,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::AccessDenied(_, _) => StatusCode::FORBIDDEN,
            ServiceError::ComplaintNotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Database(_) | ServiceError::Password(_) | ServiceError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text safe to show in a flash message. Internal failures stay generic.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Validation(message) => message.clone(),
            ServiceError::Duplicate => ErrorMessage::EmailOrUsernameExist.to_string(),
            ServiceError::InvalidCredentials => ErrorMessage::WrongCredentials.to_string(),
            ServiceError::AccessDenied(_, _) => ErrorMessage::AccessDenied.to_string(),
            ServiceError::ComplaintNotFound(_) => format!("{}!", ErrorMessage::ComplaintNotFound.to_string()),
            ServiceError::Database(_) | ServiceError::Password(_) | ServiceError::Other(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
    }

    pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
    }
}

/// Builds a driver-level error of the given kind without a live database.
#[cfg(test)]
pub(crate) fn database_error(kind: sqlx::error::ErrorKind) -> sqlx::Error {
    use std::fmt;

    #[derive(Debug)]
    struct FakeDatabaseError(sqlx::error::ErrorKind);

    impl fmt::Display for FakeDatabaseError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "constraint violated: {:?}", self.0)
        }
    }

    impl std::error::Error for FakeDatabaseError {}

    impl sqlx::error::DatabaseError for FakeDatabaseError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            match self.0 {
                sqlx::error::ErrorKind::UniqueViolation => sqlx::error::ErrorKind::UniqueViolation,
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    sqlx::error::ErrorKind::ForeignKeyViolation
                }
                sqlx::error::ErrorKind::NotNullViolation => sqlx::error::ErrorKind::NotNullViolation,
                sqlx::error::ErrorKind::CheckViolation => sqlx::error::ErrorKind::CheckViolation,
                _ => sqlx::error::ErrorKind::Other,
            }
        }
    }

    sqlx::Error::Database(Box::new(FakeDatabaseError(kind)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let id = Uuid::new_v4();
        assert_eq!(ServiceError::Duplicate.status_code(), StatusCode::CONFLICT);
        assert_eq!(ServiceError::AccessDenied(id, "view complaint").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ServiceError::ComplaintNotFound(id).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ServiceError::Database(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let err = ServiceError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(err.user_message(), "An internal error occurred");

        let http: HttpError = ServiceError::ComplaintNotFound(Uuid::new_v4()).into();
        assert_eq!(http.status, StatusCode::NOT_FOUND);
        assert_eq!(http.message, "Complaint not found!");
    }

    #[test]
    fn test_constraint_violation_detection() {
        use sqlx::error::ErrorKind;

        let unique = database_error(ErrorKind::UniqueViolation);
        assert!(ServiceError::is_unique_violation(&unique));
        assert!(!ServiceError::is_foreign_key_violation(&unique));

        let foreign_key = database_error(ErrorKind::ForeignKeyViolation);
        assert!(ServiceError::is_foreign_key_violation(&foreign_key));
        assert!(!ServiceError::is_unique_violation(&foreign_key));

        assert!(!ServiceError::is_unique_violation(&sqlx::Error::PoolTimedOut));
        assert!(!ServiceError::is_foreign_key_violation(&sqlx::Error::RowNotFound));
    }

    #[test]
    fn test_password_length_errors_are_validation() {
        let err: ServiceError = ErrorMessage::EmptyPassword.into();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err: ServiceError = ErrorMessage::HashingError.into();
        assert!(matches!(err, ServiceError::Password(_)));
    }
}
