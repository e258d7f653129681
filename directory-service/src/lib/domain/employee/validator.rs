use std::sync::Arc;

use crate::domain::employee::models::DepartmentId;
use crate::domain::employee::models::Role;
use crate::employee::errors::EmployeeError;
use crate::employee::errors::ValidationError;
use crate::employee::ports::DepartmentRepository;

/// Enforces role/department coupling on new principals.
///
/// Role and department arrive already parsed: an unknown role cannot be
/// represented and an empty department string has been folded into `None`.
pub struct DirectoryValidator<DR>
where
    DR: DepartmentRepository,
{
    departments: Arc<DR>,
}

impl<DR> DirectoryValidator<DR>
where
    DR: DepartmentRepository,
{
    pub fn new(departments: Arc<DR>) -> Self {
        Self { departments }
    }

    /// Check that `role` may be created with `department`.
    ///
    /// # Errors
    /// * `Validation(DepartmentRequired)` - Manager or employee without a department
    /// * `Validation(InvalidDepartment)` - Department does not exist
    /// * `DatabaseError` - Department lookup failed
    pub async fn validate(
        &self,
        role: Role,
        department: Option<&DepartmentId>,
    ) -> Result<(), EmployeeError> {
        let Some(department) = department else {
            if role.requires_department() {
                return Err(ValidationError::DepartmentRequired.into());
            }
            return Ok(());
        };

        match self.departments.find_by_id(department).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::InvalidDepartment.into()),
        }
    }
}
