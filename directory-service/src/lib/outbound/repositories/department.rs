use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::Row;
use uuid::Uuid;

use crate::domain::employee::models::Department;
use crate::domain::employee::models::DepartmentId;
use crate::domain::employee::ports::DepartmentRepository;
use crate::employee::errors::EmployeeError;

/// PostgreSQL implementation of DepartmentRepository.
///
/// Departments are maintained by another system; this adapter only reads them.
pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, EmployeeError> {
        let row = sqlx::query(
            r#"
            SELECT id, name
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| EmployeeError::DatabaseError(e.to_string()))?;

        match row {
            Some(r) => {
                let id: Uuid = r
                    .try_get("id")
                    .map_err(|e| EmployeeError::DatabaseError(e.to_string()))?;
                let name: String = r
                    .try_get("name")
                    .map_err(|e| EmployeeError::DatabaseError(e.to_string()))?;
                Ok(Some(Department {
                    id: DepartmentId(id),
                    name,
                }))
            }
            None => Ok(None),
        }
    }
}
