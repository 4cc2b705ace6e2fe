use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

/// Why a login attempt was refused. The display text is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum VerifyError {
    #[error("Username does not exist")]
    UnknownUser,

    #[error("Password does not match")]
    BadPassword,
}

#[derive(Debug, ThisError)]
pub enum StockroomError {
    #[error("{0}")]
    Verify(#[from] VerifyError),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Invalid image identifier: {0}")]
    InvalidImageId(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),
}

impl From<argon2::password_hash::Error> for StockroomError {
    fn from(e: argon2::password_hash::Error) -> Self {
        StockroomError::PasswordHash(e.to_string())
    }
}

impl IntoResponse for StockroomError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            StockroomError::Verify(reason) => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "LOGIN_FAILED".to_string(),
                    message: reason.to_string(),
                },
            ),
            StockroomError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "Employee login required.".to_string(),
                },
            ),
            StockroomError::UserExists(username) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "USER_EXISTS".to_string(),
                    message: format!("User {username} already exists."),
                },
            ),
            StockroomError::InvalidImageId(image_id) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "INVALID_IMAGE".to_string(),
                    message: format!("{image_id} is not a png, jpg or jpeg image."),
                },
            ),
            err @ (StockroomError::DatabaseError(_)
            | StockroomError::PasswordHash(_)
            | StockroomError::Io(_)
            | StockroomError::Config(_)) => {
                error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_reasons_read_as_login_messages() {
        assert_eq!(VerifyError::UnknownUser.to_string(), "Username does not exist");
        assert_eq!(VerifyError::BadPassword.to_string(), "Password does not match");
        let wrapped: StockroomError = VerifyError::BadPassword.into();
        assert_eq!(wrapped.to_string(), "Password does not match");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (StockroomError::from(VerifyError::UnknownUser), StatusCode::UNAUTHORIZED),
            (StockroomError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (StockroomError::UserExists("alice".into()), StatusCode::CONFLICT),
            (StockroomError::InvalidImageId("a.gif".into()), StatusCode::BAD_REQUEST),
            (StockroomError::DatabaseError(SqlxError::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
