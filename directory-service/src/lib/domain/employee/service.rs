use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenError;
use chrono::Utc;

use crate::domain::employee::models::EmailAddress;
use crate::domain::employee::models::Employee;
use crate::domain::employee::models::EmployeeId;
use crate::domain::employee::models::LoginOutcome;
use crate::domain::employee::models::RegisterEmployeeCommand;
use crate::domain::employee::models::Role;
use crate::domain::employee::models::TokenIdentity;
use crate::domain::employee::validator::DirectoryValidator;
use crate::employee::errors::EmployeeError;
use crate::employee::ports::DepartmentRepository;
use crate::employee::ports::EmployeeRepository;
use crate::employee::ports::EmployeeServicePort;

/// Domain service implementation for registration and login.
///
/// Concrete implementation of EmployeeServicePort with dependency injection.
pub struct EmployeeService<ER, DR>
where
    ER: EmployeeRepository,
    DR: DepartmentRepository,
{
    repository: Arc<ER>,
    validator: DirectoryValidator<DR>,
    authenticator: Arc<Authenticator>,
}

impl<ER, DR> EmployeeService<ER, DR>
where
    ER: EmployeeRepository,
    DR: DepartmentRepository,
{
    /// Create a new employee service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Employee persistence implementation
    /// * `departments` - Department lookup used by the validator
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(
        repository: Arc<ER>,
        departments: Arc<DR>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            validator: DirectoryValidator::new(departments),
            authenticator,
        }
    }

    async fn hash_password(&self, password: String) -> Result<String, EmployeeError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
            .await
            .map_err(|e| EmployeeError::PasswordHashing(format!("Hashing task failed: {}", e)))?
            .map_err(EmployeeError::from)
    }
}

#[async_trait]
impl<ER, DR> EmployeeServicePort for EmployeeService<ER, DR>
where
    ER: EmployeeRepository,
    DR: DepartmentRepository,
{
    async fn register_employee(
        &self,
        command: RegisterEmployeeCommand,
    ) -> Result<Employee, EmployeeError> {
        self.validator
            .validate(command.role, command.department.as_ref())
            .await?;

        let password_hash = self.hash_password(command.password).await?;

        let employee = Employee {
            id: EmployeeId::new(),
            name: command.name,
            email: command.email,
            password_hash,
            role: command.role,
            department: command.department,
            created_at: Utc::now(),
        };

        let created = self.repository.create(employee).await?;

        tracing::info!(
            employee_id = %created.id,
            role = %created.role,
            "Employee registered"
        );

        Ok(created)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, EmployeeError> {
        let Ok(email) = EmailAddress::new(email.to_string()) else {
            tracing::warn!("Login rejected: malformed email");
            return Err(EmployeeError::InvalidCredentials);
        };

        let Some(record) = self.repository.find_by_email(&email).await? else {
            let authenticator = Arc::clone(&self.authenticator);
            let password = password.to_string();
            tokio::task::spawn_blocking(move || authenticator.reject_unknown(&password))
                .await
                .map_err(|e| EmployeeError::Unknown(format!("Authentication task failed: {}", e)))?;

            tracing::warn!("Login rejected: unknown email");
            return Err(EmployeeError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = record.employee.password_hash.clone();
        let employee_id = record.employee.id;
        let role = record.employee.role;

        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, employee_id, role)
        })
        .await
        .map_err(|e| EmployeeError::Unknown(format!("Authentication task failed: {}", e)))?;

        match result {
            Ok(authenticated) => {
                tracing::info!(employee_id = %employee_id, role = %role, "Employee logged in");
                Ok(LoginOutcome {
                    token: authenticated.access_token,
                    employee: record.employee,
                    department: record.department,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!(employee_id = %employee_id, "Login rejected: wrong password");
                Err(EmployeeError::InvalidCredentials)
            }
            Err(AuthenticationError::TokenError(e)) => Err(EmployeeError::Unknown(format!(
                "Token generation failed: {}",
                e
            ))),
        }
    }

    fn verify_token(&self, token: &str) -> Result<TokenIdentity, EmployeeError> {
        let claims = self.authenticator.validate_token(token)?;

        let employee_id = EmployeeId::from_string(&claims.id)
            .map_err(|e| TokenError::MalformedClaims(e.to_string()))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|e| TokenError::MalformedClaims(e.to_string()))?;

        Ok(TokenIdentity { employee_id, role })
    }
}

#[cfg(test)]
mod tests {
    use auth::PasswordHasher;
    use auth::TokenIssuer;
    use auth::WorkFactor;
    use mockall::mock;
    use uuid::Uuid;

    use super::*;
    use crate::domain::employee::models::Department;
    use crate::domain::employee::models::DepartmentId;
    use crate::domain::employee::models::EmployeeName;
    use crate::domain::employee::models::EmployeeWithDepartment;
    use crate::employee::errors::ValidationError;

    const SECRET: &[u8] = b"test-secret-key-for-token-signing-32-bytes";

    mock! {
        pub TestEmployeeRepository {}

        #[async_trait]
        impl EmployeeRepository for TestEmployeeRepository {
            async fn create(&self, employee: Employee) -> Result<Employee, EmployeeError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<EmployeeWithDepartment>, EmployeeError>;
        }
    }

    mock! {
        pub TestDepartmentRepository {}

        #[async_trait]
        impl DepartmentRepository for TestDepartmentRepository {
            async fn find_by_id(&self, id: &DepartmentId) -> Result<Option<Department>, EmployeeError>;
        }
    }

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_work_factor(WorkFactor {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    fn service(
        repository: MockTestEmployeeRepository,
        departments: MockTestDepartmentRepository,
    ) -> EmployeeService<MockTestEmployeeRepository, MockTestDepartmentRepository> {
        EmployeeService::new(
            Arc::new(repository),
            Arc::new(departments),
            Arc::new(Authenticator::new(SECRET, fast_hasher()).unwrap()),
        )
    }

    fn command(role: Role, department: Option<DepartmentId>, password: &str) -> RegisterEmployeeCommand {
        RegisterEmployeeCommand::new(
            EmployeeName::new("A".to_string()).unwrap(),
            EmailAddress::new("a@x.com".to_string()).unwrap(),
            password.to_string(),
            role,
            department,
        )
    }

    fn stored_employee(role: Role, department: Option<DepartmentId>, password: &str) -> Employee {
        Employee {
            id: EmployeeId::new(),
            name: EmployeeName::new("A".to_string()).unwrap(),
            email: EmailAddress::new("a@x.com".to_string()).unwrap(),
            password_hash: fast_hasher().hash(password).unwrap(),
            role,
            department,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_admin_without_department() {
        let mut repository = MockTestEmployeeRepository::new();
        let mut departments = MockTestDepartmentRepository::new();

        departments.expect_find_by_id().times(0);
        repository
            .expect_create()
            .withf(|employee| {
                employee.role == Role::Admin
                    && employee.department.is_none()
                    && employee.password_hash.starts_with("$argon2id")
            })
            .times(1)
            .returning(|employee| Ok(employee));

        let service = service(repository, departments);
        let employee = service
            .register_employee(command(Role::Admin, None, "secret123"))
            .await
            .unwrap();

        assert_eq!(employee.role, Role::Admin);
        assert_ne!(employee.password_hash, "secret123");
    }

    #[tokio::test]
    async fn test_register_employee_with_department() {
        let department_id = DepartmentId(Uuid::new_v4());
        let mut repository = MockTestEmployeeRepository::new();
        let mut departments = MockTestDepartmentRepository::new();

        departments.expect_find_by_id().times(1).returning(|id| {
            Ok(Some(Department {
                id: *id,
                name: "Engineering".to_string(),
            }))
        });
        repository
            .expect_create()
            .withf(move |employee| employee.department == Some(department_id))
            .times(1)
            .returning(|employee| Ok(employee));

        let service = service(repository, departments);
        let employee = service
            .register_employee(command(Role::Employee, Some(department_id), "secret123"))
            .await
            .unwrap();

        assert_eq!(employee.department, Some(department_id));
    }

    #[tokio::test]
    async fn test_register_without_required_department_creates_nothing() {
        for role in [Role::Manager, Role::Employee] {
            let mut repository = MockTestEmployeeRepository::new();
            let departments = MockTestDepartmentRepository::new();
            repository.expect_create().times(0);

            let service = service(repository, departments);
            let result = service.register_employee(command(role, None, "secret123")).await;

            assert!(matches!(
                result,
                Err(EmployeeError::Validation(ValidationError::DepartmentRequired))
            ));
        }
    }

    #[tokio::test]
    async fn test_register_with_unknown_department_creates_nothing() {
        let mut repository = MockTestEmployeeRepository::new();
        let mut departments = MockTestDepartmentRepository::new();

        departments.expect_find_by_id().times(1).returning(|_| Ok(None));
        repository.expect_create().times(0);

        let service = service(repository, departments);
        let result = service
            .register_employee(command(
                Role::Employee,
                Some(DepartmentId(Uuid::new_v4())),
                "secret123",
            ))
            .await;

        assert!(matches!(
            result,
            Err(EmployeeError::Validation(ValidationError::InvalidDepartment))
        ));
    }

    #[tokio::test]
    async fn test_register_empty_password_rejected() {
        let mut repository = MockTestEmployeeRepository::new();
        let departments = MockTestDepartmentRepository::new();
        repository.expect_create().times(0);

        let service = service(repository, departments);
        let result = service.register_employee(command(Role::Admin, None, "")).await;

        assert!(matches!(
            result,
            Err(EmployeeError::Validation(ValidationError::InvalidPassword(_)))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestEmployeeRepository::new();
        let departments = MockTestDepartmentRepository::new();

        repository.expect_create().times(1).returning(|employee| {
            Err(EmployeeError::EmailAlreadyExists(
                employee.email.as_str().to_string(),
            ))
        });

        let service = service(repository, departments);
        let result = service
            .register_employee(command(Role::Admin, None, "secret123"))
            .await;

        assert!(matches!(result, Err(EmployeeError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_login_success_issues_verifiable_token() {
        let department_id = DepartmentId(Uuid::new_v4());
        let employee = stored_employee(Role::Employee, Some(department_id), "secret123");
        let employee_id = employee.id;

        let mut repository = MockTestEmployeeRepository::new();
        let departments = MockTestDepartmentRepository::new();
        repository
            .expect_find_by_email()
            .withf(|email| email.as_str() == "a@x.com")
            .times(1)
            .returning(move |_| {
                Ok(Some(EmployeeWithDepartment {
                    employee: employee.clone(),
                    department: Some(Department {
                        id: department_id,
                        name: "Engineering".to_string(),
                    }),
                }))
            });

        let service = service(repository, departments);
        let outcome = service.login("a@x.com", "secret123").await.unwrap();

        assert_eq!(outcome.employee.id, employee_id);
        assert_eq!(outcome.department.map(|d| d.name), Some("Engineering".to_string()));

        let identity = service.verify_token(&outcome.token).unwrap();
        assert_eq!(identity.employee_id, employee_id);
        assert_eq!(identity.role, Role::Employee);

        let claims = TokenIssuer::new(SECRET).verify(&outcome.token).unwrap();
        assert_eq!(claims.id, employee_id.to_string());
        assert_eq!(claims.role, "employee");
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_identical() {
        let employee = stored_employee(Role::Admin, None, "secret123");

        let mut repository = MockTestEmployeeRepository::new();
        let departments = MockTestDepartmentRepository::new();
        repository
            .expect_find_by_email()
            .returning(move |email| {
                if email.as_str() == "a@x.com" {
                    Ok(Some(EmployeeWithDepartment {
                        employee: employee.clone(),
                        department: None,
                    }))
                } else {
                    Ok(None)
                }
            });

        let service = service(repository, departments);

        let unknown = service.login("nobody@x.com", "secret123").await.unwrap_err();
        let wrong = service.login("a@x.com", "wrongpw").await.unwrap_err();

        assert!(matches!(unknown, EmployeeError::InvalidCredentials));
        assert!(matches!(wrong, EmployeeError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_login_unknown_email_pays_hashing_cost() {
        let work_factor = WorkFactor {
            memory_kib: 16 * 1024,
            iterations: 3,
            parallelism: 1,
        };
        let hasher = PasswordHasher::with_work_factor(work_factor).unwrap();
        let mut employee = stored_employee(Role::Admin, None, "secret123");
        employee.password_hash = hasher.hash("secret123").unwrap();

        let mut repository = MockTestEmployeeRepository::new();
        repository.expect_find_by_email().returning(move |email| {
            if email.as_str() == "a@x.com" {
                Ok(Some(EmployeeWithDepartment {
                    employee: employee.clone(),
                    department: None,
                }))
            } else {
                Ok(None)
            }
        });

        let service = EmployeeService::new(
            Arc::new(repository),
            Arc::new(MockTestDepartmentRepository::new()),
            Arc::new(Authenticator::new(SECRET, hasher).unwrap()),
        );

        let started = std::time::Instant::now();
        let wrong = service.login("a@x.com", "wrongpw").await;
        let wrong_elapsed = started.elapsed();

        let started = std::time::Instant::now();
        let unknown = service.login("nobody@x.com", "wrongpw").await;
        let unknown_elapsed = started.elapsed();

        assert!(matches!(wrong, Err(EmployeeError::InvalidCredentials)));
        assert!(matches!(unknown, Err(EmployeeError::InvalidCredentials)));
        // Same single Argon2 verification on both paths; allow generous jitter.
        assert!(
            unknown_elapsed * 4 >= wrong_elapsed,
            "unknown email took {:?}, wrong password took {:?}",
            unknown_elapsed,
            wrong_elapsed
        );
    }

    #[tokio::test]
    async fn test_login_malformed_email_skips_lookup() {
        let mut repository = MockTestEmployeeRepository::new();
        let departments = MockTestDepartmentRepository::new();
        repository.expect_find_by_email().times(0);

        let service = service(repository, departments);
        let result = service.login("not-an-email", "secret123").await;

        assert!(matches!(result, Err(EmployeeError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_store_failure_is_not_credentials_error() {
        let mut repository = MockTestEmployeeRepository::new();
        let departments = MockTestDepartmentRepository::new();
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(EmployeeError::DatabaseError("connection refused".to_string())));

        let service = service(repository, departments);
        let result = service.login("a@x.com", "secret123").await;

        assert!(matches!(result, Err(EmployeeError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_verify_token_rejects_garbage() {
        let service = service(
            MockTestEmployeeRepository::new(),
            MockTestDepartmentRepository::new(),
        );

        let result = service.verify_token("invalid.token.here");
        assert!(matches!(result, Err(EmployeeError::InvalidToken(_))));
    }

    #[tokio::test]
    async fn test_verify_token_rejects_unknown_role() {
        let service = service(
            MockTestEmployeeRepository::new(),
            MockTestDepartmentRepository::new(),
        );
        let token = TokenIssuer::new(SECRET)
            .issue(EmployeeId::new(), "superuser")
            .unwrap();

        let result = service.verify_token(&token);
        assert!(matches!(
            result,
            Err(EmployeeError::InvalidToken(TokenError::MalformedClaims(_)))
        ));
    }
}
