use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::employee::models::Department;
use crate::domain::employee::models::DepartmentId;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeWithDepartment;
use crate::domain::employee::ports::DepartmentRepository;
use crate::domain::employee::ports::EmployeeRepository;
use crate::employee::errors::EmployeeError;
use crate::employee::errors::ValidationError;

/// In-process directory implementing both repository ports.
///
/// Mirrors the Postgres constraints: email is unique and an employee's
/// department must exist at insert time.
#[derive(Default)]
pub struct InMemoryDirectory {
    employees: RwLock<HashMap<EmailAddress, Employee>>,
    departments: RwLock<HashMap<DepartmentId, Department>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a department, as the owning system would.
    pub async fn add_department(&self, name: impl Into<String>) -> Department {
        let department = Department {
            id: DepartmentId(Uuid::new_v4()),
            name: name.into(),
        };
        self.departments
            .write()
            .await
            .insert(department.id, department.clone());
        department
    }

    pub async fn employee_count(&self) -> usize {
        self.employees.read().await.len()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryDirectory {
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        let mut employees = self.employees.write().await;

        if employees.contains_key(&employee.email) {
            return Err(EmployeeError::EmailAlreadyExists(
                employee.email.as_str().to_string(),
            ));
        }

        if let Some(department) = &employee.department {
            if !self.departments.read().await.contains_key(department) {
                return Err(ValidationError::InvalidDepartment.into());
            }
        }

        employees.insert(employee.email.clone(), employee.clone());
        Ok(employee)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<EmployeeWithDepartment>, EmployeeError> {
        let Some(employee) = self.employees.read().await.get(email).cloned() else {
            return Ok(None);
        };

        let department = match &employee.department {
            Some(id) => self.departments.read().await.get(id).cloned(),
            None => None,
        };

        Ok(Some(EmployeeWithDepartment {
            employee,
            department,
        }))
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, EmployeeError> {
        Ok(self.departments.read().await.get(id).cloned())
    }
}
