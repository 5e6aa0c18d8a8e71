//! TasteTrail entry-point: loads settings, wires adapters, and serves the API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server, store_kind};
use tastetrail::inbound::http::health::HealthState;
use tastetrail::inbound::http::session_config::{BuildMode, session_settings};
use tastetrail::outbound::catalogue::load_catalogue;
use tastetrail::outbound::persistence::{DbPool, PoolConfig};
use tastetrail::settings::AppSettings;

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

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).wrap_err("failed to load settings")?;
    let session = session_settings(
        &settings.session_toggles()?,
        BuildMode::from_debug_assertions(),
    )?;

    let mut config = ServerConfig::from_settings(&settings, session)?;
    if let Some(url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .wrap_err("failed to connect to the claim store")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database configured; claims and subscriptions are kept in memory");
    }

    let catalogue = load_catalogue(settings.catalogue_path.as_deref())
        .wrap_err("failed to load the restaurant catalogue")?;
    info!(
        restaurants = catalogue.all().len(),
        featured = catalogue.featured().len(),
        "restaurant catalogue loaded"
    );

    let health_state = web::Data::new(HealthState::new(store_kind(&config)));
    let bind_addr = config.bind_addr();
    let server = create_server(health_state, config, Arc::new(catalogue))?;
    info!(%bind_addr, "listening");
    server.await?;
    Ok(())
}
