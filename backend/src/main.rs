//! Backend entry-point: loads settings and secrets, migrates the database,
//! wires the adapters and serves the REST API.

mod server;

#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use courtside::domain::BookingPolicy;
use courtside::inbound::http::health::HealthState;
use courtside::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use courtside::settings::AppSettings;
use courtside::settings::secrets::{BuildMode, secrets_from_env};
use server::{ServerConfig, build_driven_ports, create_server, drain_on_shutdown};

/// Build Prometheus middleware, logging and disabling metrics on failure.
#[cfg(feature = "metrics")]
fn initialize_metrics<F, E>(make: F) -> Option<PrometheusMetrics>
where
    F: FnOnce() -> std::result::Result<PrometheusMetrics, E>,
    E: std::fmt::Display,
{
    match make() {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "Prometheus metrics disabled");
            None
        }
    }
}

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let mode = BuildMode::from_debug_assertions();
    let needs_mail_key = settings.mail_relay_url()?.is_some();
    let secrets = secrets_from_env(&DefaultEnv::new(), mode, needs_mail_key)?;

    let database_url = settings.database_url()?;
    run_migrations(database_url)
        .await
        .wrap_err("database migrations failed")?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_pool_size()))
        .await
        .wrap_err("failed to build database pool")?;

    let ports = build_driven_ports(&pool, &settings, secrets, mode)?;
    let bind_addr = settings.bind_addr()?;
    let config = ServerConfig::new(bind_addr, ports)
        .with_booking_policy(BookingPolicy::with_offset(settings.utc_offset()?));
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(initialize_metrics(|| {
        PrometheusMetricsBuilder::new("courtside")
            .endpoint("/metrics")
            .build()
    }));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    drain_on_shutdown(&server, health_state);
    info!(%bind_addr, "courtside listening");
    server.await?;
    Ok(())
}
