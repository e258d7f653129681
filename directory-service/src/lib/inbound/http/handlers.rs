use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde::Serialize;

use crate::employee::errors::EmployeeError;

pub mod login;
pub mod register;

/// Message returned for every credential failure.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message returned when the store fails during registration.
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed";

/// A request field expected to hold a string.
///
/// Any other JSON value is accepted here and rejected by the boundary parser,
/// so a wrong type yields the same error body as a bad value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Text(String),
    Other(IgnoredAny),
}

impl TextField {
    pub fn into_text(self) -> Option<String> {
        match self {
            TextField::Text(text) => Some(text),
            TextField::Other(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<T>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(data))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    BadRequest(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiErrorBody { error: message })).into_response()
    }
}

impl From<EmployeeError> for ApiError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::Validation(_) | EmployeeError::EmailAlreadyExists(_) => {
                ApiError::BadRequest(err.to_string())
            }
            EmployeeError::InvalidCredentials => {
                ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
            }
            EmployeeError::InvalidToken(_) => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            EmployeeError::PasswordHashing(_)
            | EmployeeError::DatabaseError(_)
            | EmployeeError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl ApiError {
    /// Map a registration failure.
    ///
    /// Store failures stay in the 400 class with a fixed message; the detail is
    /// only logged. Hashing failures remain server errors.
    pub fn from_registration_error(err: EmployeeError) -> Self {
        match err {
            EmployeeError::DatabaseError(_) | EmployeeError::Unknown(_) => {
                tracing::error!(error = %err, "Registration store failure");
                ApiError::BadRequest(REGISTRATION_FAILED_MESSAGE.to_string())
            }
            other => ApiError::from(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
}
