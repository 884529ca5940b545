//! Configuration management for the rollcall check-in service.

use std::{net::SocketAddr, str::FromStr};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use rollcall_core::models::SheetId;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`config.toml`)
/// 3. Built-in defaults (lowest priority)
///
/// The roster spreadsheet IDs are static configuration: the service never
/// discovers sheets at runtime, and the iteration order in the check-in
/// flow is the order they are listed here.
///
/// The Debug form masks every secret-bearing field.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Rosters
    /// Comma-separated roster spreadsheet IDs, checked in listed order.
    ///
    /// Environment variable: `SHEET_IDS`
    #[serde(default = "default_sheet_ids", alias = "SHEET_IDS")]
    pub sheet_ids: String,

    // Google credentials
    /// Inline service account key JSON.
    ///
    /// Environment variable: `GOOGLE_SERVICE_ACCOUNT`
    #[serde(default, alias = "GOOGLE_SERVICE_ACCOUNT")]
    pub google_service_account: Option<String>,
    /// Key file fallback used when no inline key is set.
    ///
    /// Environment variable: `GOOGLE_CREDENTIALS_PATH`
    #[serde(default = "default_credentials_path", alias = "GOOGLE_CREDENTIALS_PATH")]
    pub google_credentials_path: String,

    // LINE
    /// Channel access token for push and reply delivery. Missing token
    /// degrades notifications to logged skips.
    ///
    /// Environment variable: `LINE_CHANNEL_ACCESS_TOKEN`
    #[serde(default, alias = "LINE_CHANNEL_ACCESS_TOKEN")]
    pub line_channel_access_token: Option<String>,
    /// Channel secret used to verify webhook signatures. Missing secret
    /// makes every webhook delivery fail verification.
    ///
    /// Environment variable: `LINE_CHANNEL_SECRET`
    #[serde(default, alias = "LINE_CHANNEL_SECRET")]
    pub line_channel_secret: Option<String>,

    // Outbound API endpoints (overridden in tests)
    /// Sheets API base URL.
    ///
    /// Environment variable: `SHEETS_API_BASE`
    #[serde(default = "default_sheets_api_base", alias = "SHEETS_API_BASE")]
    pub sheets_api_base: String,
    /// OAuth2 token endpoint override; unset uses the key's `token_uri`.
    ///
    /// Environment variable: `GOOGLE_TOKEN_URL`
    #[serde(default, alias = "GOOGLE_TOKEN_URL")]
    pub google_token_url: Option<String>,
    /// LINE API base URL.
    ///
    /// Environment variable: `LINE_API_BASE`
    #[serde(default = "default_line_api_base", alias = "LINE_API_BASE")]
    pub line_api_base: String,
    /// Timeout for outbound API calls in seconds.
    ///
    /// Environment variable: `OUTBOUND_TIMEOUT`
    #[serde(default = "default_outbound_timeout", alias = "OUTBOUND_TIMEOUT")]
    pub outbound_timeout: u64,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (e.g., `PORT`, `SHEET_IDS`)
    /// 2. Configuration file (`config.toml`)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Roster spreadsheet IDs in check-in iteration order.
    pub fn roster_sheet_ids(&self) -> Vec<SheetId> {
        self.sheet_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(SheetId::from)
            .collect()
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.roster_sheet_ids().is_empty() {
            anyhow::bail!("sheet_ids must list at least one roster spreadsheet");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.outbound_timeout == 0 {
            anyhow::bail!("outbound_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn masked(secret: &Option<String>) -> &'static str {
            if secret.is_some() {
                "***"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("request_timeout", &self.request_timeout)
            .field("sheet_ids", &self.sheet_ids)
            .field("google_service_account", &masked(&self.google_service_account))
            .field("google_credentials_path", &self.google_credentials_path)
            .field("line_channel_access_token", &masked(&self.line_channel_access_token))
            .field("line_channel_secret", &masked(&self.line_channel_secret))
            .field("sheets_api_base", &self.sheets_api_base)
            .field("google_token_url", &self.google_token_url)
            .field("line_api_base", &self.line_api_base)
            .field("outbound_timeout", &self.outbound_timeout)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            sheet_ids: default_sheet_ids(),
            google_service_account: None,
            google_credentials_path: default_credentials_path(),
            line_channel_access_token: None,
            line_channel_secret: None,
            sheets_api_base: default_sheets_api_base(),
            google_token_url: None,
            line_api_base: default_line_api_base(),
            outbound_timeout: default_outbound_timeout(),
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

// The three production rosters: junior high, prep, and kids English.
fn default_sheet_ids() -> String {
    [
        "1SOTkqaIN3g4Spk0Cri4F1mEzdiD1xvLzR5x5KLmhrmY",
        "14k7fkfiPdhrSnYPXLJ7--8s_Qk3wehI0AZDpgFw83AM",
        "1c7zuwUaz-gzY0hbDDO2coixOcQLGhbZbdUXZ9X63Wfo",
    ]
    .join(",")
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_line_api_base() -> String {
    "https://api.line.me".to_string()
}

fn default_outbound_timeout() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}
