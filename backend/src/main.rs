//! Server entry-point: migrates the record store, then serves the REST API
//! and its OpenAPI documentation.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use wiki_history::inbound::http::health::HealthState;
use wiki_history::outbound::persistence::{DbPool, PoolConfig, run_migrations_async};
use wiki_history::settings::ServerSettings;

fn load_settings<I>(args: I) -> std::io::Result<ServerSettings>
where
    I: IntoIterator<Item = std::ffi::OsString>,
{
    ServerSettings::load_from_iter(args)
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = load_settings(std::env::args_os())?;

    let pool_config = PoolConfig::default();
    run_migrations_async(pool_config.database_path().to_owned())
        .await
        .map_err(std::io::Error::other)?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(&settings, pool))?;
    server.await
}
