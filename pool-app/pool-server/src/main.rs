use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use pool_api::{build_router, AppState};
use pool_infrastructure::{create_pool, run_migrations, PgReadingRepository, PgUserRepository};
use pool_shared::config::AppConfig;
use pool_shared::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    // Initialize telemetry; the guards keep the file writers alive
    let _log_guards = init_telemetry(&config.telemetry)?;

    info!("{} starting ({})...", config.app.name, config.app.env);

    // Connect to Database
    info!("Connecting to database...");
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;
    run_migrations(&pool).await?;
    info!("Database connection established.");

    // Create App State
    let state = AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgReadingRepository::new(pool)),
        config.session.clone(),
        &config.dashboard,
    )
    .with_service_name(config.app.name.clone());

    // Build router
    let app = build_router(state).layer(
        CorsLayer::new()
            .allow_origin(HeaderValue::from_static("http://localhost:5173"))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
