//! Rollcall HTTP API.
//!
//! Hosts the three request handlers (health, attend, webhook), the
//! configuration layer, and the shared application state handed to every
//! handler.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use rollcall_core::Clock;
use rollcall_line::{LineClient, LineConfig};
use rollcall_sheets::{ServiceAccountKey, SheetsClient, SheetsConfig};

pub mod config;
pub mod handlers;
pub mod pages;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server};

/// Shared application state, constructed once at startup.
///
/// Handlers receive this by reference (axum clones are shallow); there is
/// no mutable state here, so requests stay independent of each other.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<Config>,
    /// Clock used for timestamps; tests inject a fixed one.
    pub clock: Arc<dyn Clock>,
    /// Google Sheets client for roster reads and attendance writes.
    pub sheets: SheetsClient,
    /// LINE client for parent notifications and webhook replies.
    pub line: LineClient,
}

impl AppState {
    /// Builds the application state from configuration.
    ///
    /// Loads the service account key (inline JSON first, key file
    /// fallback) and constructs the outbound clients. A missing LINE
    /// channel token is tolerated: notifications degrade to logged skips.
    ///
    /// # Errors
    ///
    /// Fails when the service account key cannot be loaded or an HTTP
    /// client cannot be constructed.
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let key = ServiceAccountKey::load(
            config.google_service_account.as_deref(),
            Path::new(&config.google_credentials_path),
        )
        .context("failed to load Google service account credentials")?;

        let outbound_timeout = Duration::from_secs(config.outbound_timeout);

        let sheets = SheetsClient::new(
            SheetsConfig {
                base_url: config.sheets_api_base.clone(),
                token_url: config.google_token_url.clone(),
                timeout: outbound_timeout,
            },
            key,
        )
        .context("failed to build Sheets client")?;

        let line = LineClient::new(
            LineConfig { base_url: config.line_api_base.clone(), timeout: outbound_timeout },
            config.line_channel_access_token.clone(),
        )
        .context("failed to build LINE client")?;

        Ok(Self { config: Arc::new(config), clock, sheets, line })
    }
}
