use thiserror::Error;

/// Error for EmployeeId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmployeeName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmployeeNameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Client-correctable problems with a registration payload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Department is required for manager/employee roles")]
    DepartmentRequired,

    #[error("Invalid department id")]
    InvalidDepartment,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Missing or non-string field: {0}")]
    MissingField(&'static str),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] EmployeeNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Top-level error for all employee-related operations
#[derive(Debug, Clone, Error)]
pub enum EmployeeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    // Unknown email and wrong password share this variant.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] auth::TokenError),

    #[error("Password hashing failed: {0}")]
    PasswordHashing(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::PasswordError> for EmployeeError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::InvalidInput(reason) => {
                EmployeeError::Validation(ValidationError::InvalidPassword(reason))
            }
            other => EmployeeError::PasswordHashing(other.to_string()),
        }
    }
}
