#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::WorkFactor;
use directory_service::domain::employee::models::Department;
use directory_service::domain::employee::models::DepartmentId;
use directory_service::domain::employee::service::EmployeeService;
use directory_service::inbound::http::router::create_router;
use directory_service::outbound::repositories::InMemoryDirectory;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Server URL used to create and drop throwaway databases.
/// Postgres-backed tests are skipped when it is unset.
const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Test application that spawns a real server over an in-memory directory
pub struct TestApp {
    pub address: String,
    pub directory: Arc<InMemoryDirectory>,
    pub department: Department,
    pub api_client: reqwest::Client,
    pub token_issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let department = directory.add_department("Engineering").await;

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap work factor keeps the suite fast
        let password_hasher = PasswordHasher::with_work_factor(WorkFactor {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");
        let authenticator = Arc::new(Authenticator::new(
            TEST_SECRET.as_bytes(),
            password_hasher,
        )
        .expect("Failed to build authenticator"));

        let employee_service = Arc::new(EmployeeService::new(
            Arc::clone(&directory),
            Arc::clone(&directory),
            authenticator,
        ));

        let application = create_router(employee_service);
        tokio::spawn(async move {
            axum::serve(listener, application)
                .await
                .expect("Server failed");
        });

        Self {
            address,
            directory,
            department,
            api_client: reqwest::Client::new(),
            token_issuer: TokenIssuer::new(TEST_SECRET.as_bytes()),
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }
}

/// Throwaway Postgres database with migrations applied, dropped on `Drop`
pub struct TestDb {
    pub pool: PgPool,
    server_url: String,
    db_name: String,
}

impl TestDb {
    /// Create a uniquely named database, or `None` when no server is configured
    pub async fn new() -> Option<Self> {
        let Ok(server_url) = std::env::var(DATABASE_URL_VAR) else {
            eprintln!("{} is not set; skipping Postgres-backed test", DATABASE_URL_VAR);
            return None;
        };

        let db_name = format!(
            "test_directory_service_{}",
            Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&server_url)
            .await
            .expect("Failed to connect to Postgres");
        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = server_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self {
            pool,
            server_url,
            db_name,
        })
    }

    /// Insert a department row directly; departments are owned by another system
    pub async fn add_department(&self, name: &str) -> Department {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO departments (id, name) VALUES ($1, $2)")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await
            .expect("Failed to insert department");

        Department {
            id: DepartmentId(id),
            name: name.to_string(),
        }
    }

    pub async fn delete_department(&self, id: &DepartmentId) {
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .expect("Failed to delete department");
    }

    pub async fn employee_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count employees")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let server_url = self.server_url.clone();
        let db_name = self.db_name.clone();
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&server_url).await {
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
