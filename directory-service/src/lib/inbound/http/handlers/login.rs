use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::TextField;
use super::INVALID_CREDENTIALS_MESSAGE;
use crate::domain::employee::models::Department;
use crate::domain::employee::models::LoginOutcome;
use crate::domain::employee::models::Role;
use crate::employee::ports::EmployeeServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::warn!(reason = %rejection.body_text(), "Login rejected: unreadable body");
        ApiError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
    })?;

    // Absent or non-string credentials still go through the service so they
    // fail exactly like a wrong password.
    let email = text_or_empty(body.email);
    let password = text_or_empty(body.password);

    state
        .employee_service
        .login(&email, &password)
        .await
        .map_err(ApiError::from)
        .map(|outcome| ApiSuccess::new(StatusCode::OK, outcome.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequestBody {
    email: Option<TextField>,
    password: Option<TextField>,
}

fn text_or_empty(field: Option<TextField>) -> String {
    field.and_then(TextField::into_text).unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: EmployeeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmployeeData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub department: Option<DepartmentData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentData {
    pub id: String,
    pub name: String,
}

impl From<Department> for DepartmentData {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.to_string(),
            name: department.name,
        }
    }
}

impl From<LoginOutcome> for LoginResponseData {
    fn from(outcome: LoginOutcome) -> Self {
        let employee = outcome.employee;
        Self {
            token: outcome.token,
            user: EmployeeData {
                id: employee.id.to_string(),
                name: employee.name.as_str().to_string(),
                email: employee.email.as_str().to_string(),
                role: employee.role,
                department: outcome.department.map(DepartmentData::from),
            },
        }
    }
}
