use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::TextField;
use crate::domain::employee::models::DepartmentId;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeName;
use crate::domain::employee::models::RegisterEmployeeCommand;
use crate::domain::employee::models::Role;
use crate::employee::errors::EmployeeError;
use crate::employee::errors::ValidationError;
use crate::employee::ports::EmployeeServicePort;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let Json(body) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let command = body
        .try_into_command()
        .map_err(|e| ApiError::from(EmployeeError::from(e)))?;

    state
        .employee_service
        .register_employee(command)
        .await
        .map_err(ApiError::from_registration_error)
        .map(|ref employee| {
            ApiSuccess::new(
                StatusCode::CREATED,
                RegisterResponseData {
                    message: "User registered".to_string(),
                    user: employee.into(),
                },
            )
        })
}

/// HTTP request body for registering an employee (raw JSON)
///
/// Every field is optional at this layer; absence and wrong types are
/// reported by `try_into_command` as validation errors.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    name: Option<TextField>,
    email: Option<TextField>,
    password: Option<TextField>,
    role: Option<TextField>,
    #[serde(default)]
    department: Option<TextField>,
}

impl RegisterRequest {
    fn try_into_command(self) -> Result<RegisterEmployeeCommand, ValidationError> {
        let role = match self.role {
            None => return Err(ValidationError::InvalidRole("missing".to_string())),
            Some(TextField::Other(_)) => {
                return Err(ValidationError::InvalidRole("not a string".to_string()))
            }
            Some(TextField::Text(role)) => role.parse::<Role>()?,
        };
        let department = match self.department {
            None => None,
            Some(TextField::Text(department)) => DepartmentId::from_optional(Some(department))?,
            Some(TextField::Other(_)) => return Err(ValidationError::InvalidDepartment),
        };
        let name = EmployeeName::new(required_text(self.name, "name")?)?;
        let email = EmailAddress::new(required_text(self.email, "email")?)?;
        let password = required_text(self.password, "password")?;
        Ok(RegisterEmployeeCommand::new(
            name,
            email,
            password,
            role,
            department,
        ))
    }
}

fn required_text(field: Option<TextField>, name: &'static str) -> Result<String, ValidationError> {
    field
        .and_then(TextField::into_text)
        .ok_or(ValidationError::MissingField(name))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub message: String,
    pub user: RegisteredEmployeeData,
}

/// Public projection of a newly created employee. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredEmployeeData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl From<&Employee> for RegisteredEmployeeData {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            name: employee.name.as_str().to_string(),
            email: employee.email.as_str().to_string(),
            role: employee.role,
            department: employee.department.map(|id| id.to_string()),
        }
    }
}
