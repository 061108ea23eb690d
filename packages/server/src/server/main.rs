// Main entry point for the functions server

use std::sync::Arc;

use anyhow::{Context, Result};
use functions_core::common::utils::ExpoClient;
use functions_core::domains::auth::JwtService;
use functions_core::domains::notifications::PushNotificationDispatcher;
use functions_core::kernel::{
    start_scheduler, PaymentServiceClient, PostgresDocumentStore, PostgresIdentityStore,
    ServerDeps,
};
use functions_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,functions_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting marketplace functions");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations complete");

    // Collaborators
    let documents = Arc::new(PostgresDocumentStore::new(pool.clone()));
    let identities = Arc::new(PostgresIdentityStore::new(pool.clone()));
    let push_service = Arc::new(
        ExpoClient::new(config.expo_access_token.clone()).context("Failed to create Expo client")?,
    );
    let notifications = Arc::new(PushNotificationDispatcher::new(
        documents.clone(),
        push_service,
    ));
    let payments = Arc::new(
        PaymentServiceClient::new(
            config.payment_service_url.clone(),
            config.payment_service_api_key.clone(),
        )
        .context("Failed to create payment client")?,
    );

    let deps = ServerDeps::new(documents, identities, notifications, payments);

    // Scheduled jobs (kept alive for the lifetime of the server)
    let _scheduler = start_scheduler(deps.clone(), &config.daily_stats_cron).await?;

    // Build application
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let app = build_app(
        deps,
        jwt_service,
        config.trigger_secret.clone(),
        &config.allowed_origins,
    );

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
