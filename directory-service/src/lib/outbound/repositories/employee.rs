use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::employee::models::Department;
use crate::domain::employee::models::DepartmentId;
use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::EmployeeName;
use crate::domain::employee::models::EmployeeWithDepartment;
use crate::domain::employee::models::Role;
use crate::domain::employee::ports::EmployeeRepository;
use crate::employee::errors::EmployeeError;
use crate::employee::errors::ValidationError;

pub struct PostgresEmployeeRepository {
    pool: PgPool,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError> {
        sqlx::query(
            r#"
            INSERT INTO employees (id, name, email, password_hash, role, department_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(employee.id.0)
        .bind(employee.name.as_str())
        .bind(employee.email.as_str())
        .bind(&employee.password_hash)
        .bind(employee.role.as_str())
        .bind(employee.department.map(|department| department.0))
        .bind(employee.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some("employees_email_key")
                {
                    return EmployeeError::EmailAlreadyExists(employee.email.as_str().to_string());
                }
                // Department removed between validation and insert.
                if db_err.is_foreign_key_violation() {
                    return ValidationError::InvalidDepartment.into();
                }
            }
            EmployeeError::DatabaseError(e.to_string())
        })?;

        Ok(employee)
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<EmployeeWithDepartment>, EmployeeError> {
        let row = sqlx::query(
            r#"
            SELECT e.id, e.name, e.email, e.password_hash, e.role, e.department_id, e.created_at,
                   d.name AS department_name
            FROM employees e
            LEFT JOIN departments d ON d.id = e.department_id
            WHERE e.email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EmployeeError::DatabaseError(e.to_string()))?;

        row.as_ref().map(employee_from_row).transpose()
    }
}

fn employee_from_row(row: &PgRow) -> Result<EmployeeWithDepartment, EmployeeError> {
    let database_error = |e: sqlx::Error| EmployeeError::DatabaseError(e.to_string());
    let corrupt = |field: &str, reason: String| {
        EmployeeError::DatabaseError(format!("Stored {} is invalid: {}", field, reason))
    };

    let id: Uuid = row.try_get("id").map_err(database_error)?;
    let name: String = row.try_get("name").map_err(database_error)?;
    let email: String = row.try_get("email").map_err(database_error)?;
    let password_hash: String = row.try_get("password_hash").map_err(database_error)?;
    let role: String = row.try_get("role").map_err(database_error)?;
    let department_id: Option<Uuid> = row.try_get("department_id").map_err(database_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(database_error)?;
    let department_name: Option<String> =
        row.try_get("department_name").map_err(database_error)?;

    let employee = Employee {
        id: EmployeeId(id),
        name: EmployeeName::new(name).map_err(|e| corrupt("name", e.to_string()))?,
        email: EmailAddress::new(email).map_err(|e| corrupt("email", e.to_string()))?,
        password_hash,
        role: role
            .parse::<Role>()
            .map_err(|e| corrupt("role", e.to_string()))?,
        department: department_id.map(DepartmentId),
        created_at,
    };

    let department = department_id
        .zip(department_name)
        .map(|(id, name)| Department {
            id: DepartmentId(id),
            name,
        });

    Ok(EmployeeWithDepartment {
        employee,
        department,
    })
}
