#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
// easier to use when using the functions as callback of foreign functions
#![allow(clippy::needless_pass_by_value)]

use std::net::SocketAddr;

use anyhow::Result;
use axum::Extension;
use axum::Router;
use axum::middleware;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::prelude::*;

use crate::api::invalid_path;
use crate::api::reject_unknown_paths;
use crate::api::router;
use crate::root::ListenPort;
use crate::storage::Database;
use crate::storage::DatabaseConfig;
use crate::storage::Storage;
use crate::utils::env_var_or_else;

mod api;
mod countries;
mod destinations;
mod graceful_shutdown;
mod root;
mod storage;
#[cfg(test)]
mod tests;
mod utils;

const DEFAULT_RUST_LOG: &str = "destination_catalog=debug,tower_http=debug";
const DEFAULT_ADDRESS: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> Result<()> {
    setup_environment();
    setup_tracing();

    let address = setup_address()?;
    let database = Database::from_config(DatabaseConfig::DetectConfig).await?;

    let app = create_router(database.clone(), address.port());

    let listener = TcpListener::bind(address).await?;
    tracing::info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(graceful_shutdown::handler())
        .await?;

    database.close().await;
    tracing::info!("Database connections closed");

    Ok(())
}

/// Create the router for the destination catalog
///
/// The path allow-list sits outside CORS, so preflight requests to unknown paths are rejected too
pub fn create_router<S: Storage>(storage: S, port: u16) -> Router {
    Router::new()
        .route("/", get(root::root))
        .merge(router::<S>())
        .fallback(invalid_path)
        .layer(Extension(storage))
        .layer(Extension(ListenPort(port)))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(reject_unknown_paths))
        .layer(TraceLayer::new_for_http())
}

fn setup_environment() {
    dotenvy::dotenv().ok();
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::registry;

    registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_RUST_LOG.into()),
        ))
        .with(fmt::layer())
        .init();
}

fn setup_address() -> Result<SocketAddr> {
    let mut address =
        env_var_or_else("ADDRESS", || String::from(DEFAULT_ADDRESS)).parse::<SocketAddr>()?;

    // optional override of just the port
    if let Ok(port) = std::env::var("PORT") {
        // only check non-empty strings
        if !port.is_empty() {
            let port = port.parse::<u16>()?;

            address.set_port(port);
        }
    }

    Ok(address)
}
