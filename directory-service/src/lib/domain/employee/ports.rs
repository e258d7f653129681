use async_trait::async_trait;

use crate::domain::employee::models::Department;
use crate::domain::employee::models::DepartmentId;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeWithDepartment;
use crate::domain::employee::models::LoginOutcome;
use crate::domain::employee::models::RegisterEmployeeCommand;
use crate::domain::employee::models::TokenIdentity;
use crate::employee::errors::EmployeeError;

/// Port for employee domain service operations.
#[async_trait]
pub trait EmployeeServicePort: Send + Sync + 'static {
    /// Admit a new employee into the directory.
    ///
    /// # Arguments
    /// * `command` - Parsed command with name, email, password, role and department
    ///
    /// # Returns
    /// Created employee entity
    ///
    /// # Errors
    /// * `Validation` - Department missing, unknown, or password rejected
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register_employee(
        &self,
        command: RegisterEmployeeCommand,
    ) -> Result<Employee, EmployeeError>;

    /// Verify credentials and issue an identity token.
    ///
    /// # Arguments
    /// * `email` - Email as submitted by the caller
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Token plus the employee with its department resolved
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, EmployeeError>;

    /// Verify an identity token for an authorization layer.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature, expiry or claims check failed
    fn verify_token(&self, token: &str) -> Result<TokenIdentity, EmployeeError>;
}

/// Persistence operations for the employee aggregate.
#[async_trait]
pub trait EmployeeRepository: Send + Sync + 'static {
    /// Persist new employee to storage.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Validation(InvalidDepartment)` - Department vanished before insert
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError>;

    /// Retrieve employee by email with its department resolved.
    ///
    /// # Returns
    /// Optional employee (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<EmployeeWithDepartment>, EmployeeError>;
}

/// Read-only department lookups.
#[async_trait]
pub trait DepartmentRepository: Send + Sync + 'static {
    /// Retrieve department by identifier.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, EmployeeError>;
}
