// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use codequiz::catalog::{CatalogError, InMemoryCatalog};
use codequiz::config::{Config, DEV_JWT_SECRET};
use codequiz::routes;
use codequiz::services::{identity::MockIdentityProvider, recorder::LogAttemptSink};
use codequiz::session::store::SWEEP_INTERVAL;
use codequiz::state::AppState;
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    if config.jwt_secret == DEV_JWT_SECRET {
        tracing::warn!("JWT_SECRET not set, using the development secret");
    }

    // Load the quiz catalog once; it is read-only from here on
    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!("Failed to load quiz catalog: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Catalog loaded with {} quizzes", catalog.len());

    // Create AppState
    let state = AppState::new(
        config.clone(),
        Arc::new(catalog),
        Arc::new(MockIdentityProvider::new(config.auth_delay)),
        Arc::new(LogAttemptSink),
    );

    // Evict finished and abandoned sessions in the background
    let _sweeper = state.sessions.spawn_sweeper(SWEEP_INTERVAL);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}

fn load_catalog(config: &Config) -> Result<InMemoryCatalog, CatalogError> {
    match &config.catalog_path {
        Some(path) => {
            tracing::info!("Loading catalog from {}", path.display());
            InMemoryCatalog::from_path(path)
        }
        None => InMemoryCatalog::builtin(),
    }
}
