//! Backend entry-point: loads settings, wires adapters, and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use portfolio_backend::inbound::http::health::HealthState;
use portfolio_backend::outbound::persistence::{DbPool, PoolConfig};
use server::{BuildMode, ServerConfig, ServerSettings, create_server, load_session_key};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("loading server settings")?;
    let mode = BuildMode::from_debug_assertions();
    let key = load_session_key(settings.session_key_file(), mode, settings.allow_ephemeral_key)?;
    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        settings.same_site(mode)?,
        settings.bind_addr()?,
        settings.session_policy()?,
    );

    if let Some(url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(|error| color_eyre::eyre::eyre!(error.into_message()))
            .wrap_err("connecting to PostgreSQL")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
