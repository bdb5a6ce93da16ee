//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, SupabaseAuthAdapter, TwilioReceiptAdapter},
    config::Config,
    error::ApiError,
    web::{app_router, state::AppState, ApiDoc},
};
use inventory_core::ports::ReceiptNotifier;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to the Hosted Database ---
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    let db_adapter = Arc::new(DbAdapter::new(db_pool));
    db_adapter.ping().await?;
    info!("Database connection established.");

    // --- 3. Initialize Service Adapters ---
    let auth_adapter = Arc::new(SupabaseAuthAdapter::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
    )?);

    let notifier: Option<Arc<dyn ReceiptNotifier>> = match config.twilio.clone() {
        Some(twilio) => Some(Arc::new(TwilioReceiptAdapter::new(twilio)?)),
        None => {
            warn!("TWILIO_* variables not set; receipts will not be sent to customers");
            None
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store: db_adapter,
        auth: auth_adapter,
        notifier,
        config: config.clone(),
    });

    // --- 5. Create the Web Router ---
    let app = app_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
