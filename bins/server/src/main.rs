//! Gatehouse API Server
//!
//! Main entry point for the Gatehouse identity service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatehouse_api::{AppState, create_router};
use gatehouse_db::connect;
use gatehouse_shared::{AppConfig, EventPublisher, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        token_expiry_hours: config.jwt.token_expiry_hours,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create the event channel and hand its receiving half to the sink
    // forwarder. Delivery past this point is the collaborator's concern;
    // the request path only does a bounded, best-effort send.
    let (events, mut event_rx) = EventPublisher::channel(
        config.events.buffer,
        Duration::from_millis(config.events.publish_timeout_ms),
    );
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            info!(
                user_id = %event.user_id,
                tenant_id = %event.tenant_id,
                username = %event.username,
                "Forwarding user-created event to sink"
            );
        }
    });

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        events,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
