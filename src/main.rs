//! Cobri HTTP server.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cobri::adapters::auth::JwksSessionValidator;
use cobri::adapters::events::BroadcastEventBus;
use cobri::adapters::http::{build_router, AppState};
use cobri::adapters::memory::InMemoryStore;
use cobri::adapters::postgres::{
    self, PostgresAccountRepository, PostgresCustomerRepository, PostgresSubscriptionRepository,
};
use cobri::adapters::preapproval::StubPreapprovalProvider;
use cobri::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use cobri::domain::foundation::{AuthError, DomainError};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("configuration: {0}")]
    Invalid(#[from] ValidationError),

    #[error("database: {0}")]
    Database(#[from] DomainError),

    #[error("auth: {0}")]
    Auth(#[from] AuthError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let bus = Arc::new(BroadcastEventBus::default());
    let preapprovals = Arc::new(StubPreapprovalProvider::new(
        config.billing.preapproval_base_url.clone(),
    ));

    let state = match &config.database {
        Some(database) => {
            let pool = postgres::connect(database).await?;
            tracing::info!("using PostgreSQL storage");
            AppState {
                customers: Arc::new(PostgresCustomerRepository::new(pool.clone())),
                subscriptions: Arc::new(PostgresSubscriptionRepository::new(pool.clone())),
                accounts: Arc::new(PostgresAccountRepository::new(pool)),
                event_publisher: bus.clone(),
                change_feed: bus.clone(),
                preapprovals,
                trial_days: config.billing.trial_days,
            }
        }
        None => {
            tracing::warn!("no database configured, data lives in memory only");
            let store = Arc::new(InMemoryStore::new());
            AppState {
                customers: store.clone(),
                subscriptions: store.clone(),
                accounts: store,
                event_publisher: bus.clone(),
                change_feed: bus.clone(),
                preapprovals,
                trial_days: config.billing.trial_days,
            }
        }
    };

    let validator = Arc::new(JwksSessionValidator::new(&config.auth)?);
    let app = build_router(state, validator, &config.server);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "cobri listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
