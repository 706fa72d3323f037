//! Intake server entry-point: records diagnosis requests and serves the sample report.

mod server;

use std::ffi::OsString;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use intake::config::IntakeSettings;
use intake::inbound::http::health::HealthState;
use server::{ServerConfig, create_server};

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

    let settings = IntakeSettings::load_from_iter([OsString::from("intake")])
        .map_err(|e| std::io::Error::other(format!("load intake settings: {e}")))?;
    let config = ServerConfig::from_settings(&settings)?;
    info!(
        bind_addr = %config.bind_addr(),
        sheet = %settings.sheet_name(),
        "starting intake server"
    );

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}
