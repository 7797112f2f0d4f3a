//! Storefront entry-point: loads settings, wires adapters and serves the
//! REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use server::{ServerConfig, create_server};
use storefront::domain::ports::PaymentGateway;
use storefront::inbound::http::health::HealthState;
use storefront::inbound::http::session_config::{BuildMode, session_settings};
use storefront::outbound::paystack::{PaystackHttpGateway, UnconfiguredPaymentGateway};
use storefront::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use storefront::settings::StorefrontSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = StorefrontSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let mut config = ServerConfig::new(session, settings.bind_addr())
        .with_gateway(build_gateway(&settings)?);
    if let Some(pool) = connect_database(&settings).await? {
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %settings.bind_addr(), "starting storefront server");
    let server = create_server(health_state.clone(), config)?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("server terminated with an error")
}

async fn connect_database(settings: &StorefrontSettings) -> color_eyre::Result<Option<DbPool>> {
    let Some(database_url) = settings.database_url() else {
        warn!("STOREFRONT_DATABASE_URL not set; using in-memory storage");
        return Ok(None);
    };
    if settings.run_migrations {
        run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build database pool")?;
    Ok(Some(pool))
}

fn build_gateway(settings: &StorefrontSettings) -> color_eyre::Result<Arc<dyn PaymentGateway>> {
    let Some(secret_key) = settings.paystack_secret_key() else {
        warn!("STOREFRONT_PAYSTACK_SECRET_KEY not set; payment verification is disabled");
        return Ok(Arc::new(UnconfiguredPaymentGateway));
    };
    let base_url = Url::parse(settings.paystack_base_url())
        .wrap_err("STOREFRONT_PAYSTACK_BASE_URL is not a valid URL")?;
    let gateway = PaystackHttpGateway::new(base_url, secret_key, settings.paystack_timeout())
        .wrap_err("failed to build Paystack client")?;
    Ok(Arc::new(gateway))
}
