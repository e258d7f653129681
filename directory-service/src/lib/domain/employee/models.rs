use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::employee::errors::EmailError;
use crate::employee::errors::EmployeeIdError;
use crate::employee::errors::EmployeeNameError;
use crate::employee::errors::ValidationError;

/// Employee aggregate entity.
///
/// A principal that can authenticate against the directory.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub role: Role,
    pub department: Option<DepartmentId>,
    pub created_at: DateTime<Utc>,
}

/// Employee unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    /// Generate a new random employee ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an employee ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, EmployeeIdError> {
        Uuid::parse_str(s)
            .map(EmployeeId)
            .map_err(|e| EmployeeIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Department identifier. Departments are owned outside this service and
/// referenced by id only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepartmentId(pub Uuid);

impl DepartmentId {
    /// Parse an optional department reference from request input.
    ///
    /// `None` and the empty string both mean "no department provided".
    /// Anything else must be a well-formed id.
    ///
    /// # Errors
    /// * `InvalidDepartment` - Value is present but not a valid id
    pub fn from_optional(raw: Option<String>) -> Result<Option<Self>, ValidationError> {
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Uuid::parse_str(value)
                .map(|uuid| Some(DepartmentId(uuid)))
                .map_err(|_| ValidationError::InvalidDepartment),
        }
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Department record as read from the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// Closed set of roles a principal can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// Managers and employees must belong to a department.
    pub fn requires_department(&self) -> bool {
        matches!(self, Role::Manager | Role::Employee)
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(ValidationError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display name value type
///
/// Trimmed, non-empty and at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeName(String);

impl EmployeeName {
    const MAX_LENGTH: usize = 100;

    /// Create a new valid name.
    ///
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    /// * `TooLong` - Name longer than 100 characters
    pub fn new(name: String) -> Result<Self, EmployeeNameError> {
        let name = name.trim().to_string();
        let length = name.chars().count();
        if length == 0 {
            Err(EmployeeNameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(EmployeeNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Compared as an
/// exact-match key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new employee with parsed domain types
#[derive(Debug)]
pub struct RegisterEmployeeCommand {
    pub name: EmployeeName,
    pub email: EmailAddress,
    pub password: String,
    pub role: Role,
    pub department: Option<DepartmentId>,
}

impl RegisterEmployeeCommand {
    /// Construct a new registration command.
    ///
    /// # Arguments
    /// * `password` - Plain text password (will be hashed by service)
    /// * `department` - Already normalized: `None` means not provided
    pub fn new(
        name: EmployeeName,
        email: EmailAddress,
        password: String,
        role: Role,
        department: Option<DepartmentId>,
    ) -> Self {
        Self {
            name,
            email,
            password,
            role,
            department,
        }
    }
}

/// Employee joined with its resolved department, as needed by login.
#[derive(Debug, Clone)]
pub struct EmployeeWithDepartment {
    pub employee: Employee,
    pub department: Option<Department>,
}

/// Successful login: the issued token and the authenticated principal.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub employee: Employee,
    pub department: Option<Department>,
}

/// Identity asserted by a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenIdentity {
    pub employee_id: EmployeeId,
    pub role: Role,
}
