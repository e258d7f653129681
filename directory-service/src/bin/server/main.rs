use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use directory_service::config::Config;
use directory_service::domain::employee::service::EmployeeService;
use directory_service::inbound::http::router::create_router;
use directory_service::outbound::repositories::PostgresDepartmentRepository;
use directory_service::outbound::repositories::PostgresEmployeeRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "directory_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "directory-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_connections = config.database.max_connections,
        password_memory_kib = config.password.memory_kib,
        password_iterations = config.password.iterations,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let password_hasher = PasswordHasher::with_work_factor(config.password.work_factor())?;
    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        password_hasher,
    )?);
    let employee_repository = Arc::new(PostgresEmployeeRepository::new(pg_pool.clone()));
    let department_repository = Arc::new(PostgresDepartmentRepository::new(pg_pool));

    let employee_service = Arc::new(EmployeeService::new(
        employee_repository,
        department_repository,
        authenticator,
    ));

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(employee_service)).await?;

    tracing::info!("Server exited");
    Ok(())
}
