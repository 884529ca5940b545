//! Rollcall check-in service.
//!
//! Main entry point. Initializes logging, loads configuration, builds the
//! Sheets and LINE clients, and serves HTTP until a shutdown signal.

use std::sync::Arc;

use anyhow::Result;
use rollcall_api::{AppState, Config};
use rollcall_core::RealClock;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting rollcall check-in service");

    let config = Config::load()?;
    info!(
        host = %config.host,
        port = config.port,
        rosters = config.roster_sheet_ids().len(),
        line_push_configured = config.line_channel_access_token.is_some(),
        webhook_secret_configured = config.line_channel_secret.is_some(),
        "Configuration loaded"
    );

    let addr = config.parse_server_addr()?;
    let state = AppState::new(config, Arc::new(RealClock::new()))?;

    rollcall_api::start_server(state, addr).await?;

    info!("Rollcall shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,rollcall=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
