pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

pub use api::handlers;
pub use api::routes;

pub use logic::{build_predicate, HealthReporter, Predicate, SurveyError, SurveyRepository};
pub use model::*;
pub use store::{Gateway, GatewayTransaction, PostgresGateway, StoreError};

use std::sync::Arc;

use crate::api::handlers::{AppState, SharedState};
use crate::config::AppConfig;

/// Connect to PostgreSQL and build the handler state.
///
/// With `database.required = false` a failed connection is logged and the
/// service starts without a gateway; survey endpoints then answer 500.
pub async fn build_state(config: &AppConfig) -> anyhow::Result<SharedState<PostgresGateway>> {
    let gateway = match PostgresGateway::connect(
        &config.database_url(),
        config.database.max_connections,
        config.statement_timeout(),
    )
    .await
    {
        Ok(gateway) => {
            log::info!("Connected to PostgreSQL");
            Some(Arc::new(gateway))
        }
        Err(e) if !config.database.required => {
            log::error!("Couldn't connect to postgres, starting without a database: {:#}", e);
            None
        }
        Err(e) => return Err(e),
    };

    Ok(Arc::new(AppState::new(gateway, config)))
}

pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    let state = build_state(config).await?;
    let app = crate::api::routes::create_router::<PostgresGateway>().with_state(state.clone());

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("{} started on http://{}", config.service.name, bind_address);

    serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(repository) = &state.repository {
        repository.gateway().close().await;
    }
    log::info!("{} stopped", config.service.name);

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
