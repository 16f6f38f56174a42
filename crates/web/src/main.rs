use anyhow::Context;
use storage::Database;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod app;
mod config;
mod error;
mod features;
mod middleware;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::calculations::handlers::calculate,
        features::calculations::handlers::validate_calculation,
        features::history::handlers::list_history,
        features::history::handlers::get_calculation,
        features::history::handlers::delete_calculation,
        features::history::handlers::delete_all_calculations,
        features::health::handlers::health,
    ),
    components(
        schemas(
            storage::dto::calculation::CalculationRequest,
            storage::dto::calculation::CalculationResponse,
            storage::dto::history::HistoryResponse,
            storage::dto::common::PaginationMeta,
            storage::dto::common::MessageResponse,
            storage::models::Calculation,
            features::health::handlers::HealthResponse,
        )
    ),
    tags(
        (name = "calculations", description = "Bill split calculation endpoints"),
        (name = "history", description = "Saved calculation history"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting Tip Calculator API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    if config.is_development() {
        tracing::warn!("Development mode: internal error details are returned to clients");
    }

    tracing::info!("Opening database at: {}", config.database_url);
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let router = app::build_app(db.clone(), &config)?
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let bind_address = config.bind_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Health check: http://{}/health", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);
    tracing::info!("CORS enabled for: {}", config.cors_origin);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
