use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_URL_TEMPLATE};

pub mod loader;
pub mod validator;

pub use loader::{load_config, ConfigOverrides};
pub use validator::validate_config;

pub const DEFAULT_LISTEN_ADDRESS: &str = ":9010";
pub const DEFAULT_TELEMETRY_PATH: &str = "/metrics";
pub const DEFAULT_TICKER_SYMBOL: &str = "0";
pub const DEFAULT_STOCK_EXCHANGE_CODE: &str = "TYO";

/// Full runtime configuration: built-in defaults, then the optional JSON
/// file, then command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExporterConfig {
    pub web: WebConfig,
    pub quote: QuoteConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub listen_address: String,
    pub telemetry_path: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
            telemetry_path: DEFAULT_TELEMETRY_PATH.to_string(),
        }
    }
}

impl WebConfig {
    /// Resolve the listen address. A bare `:port` binds every interface.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let address = self.listen_address.trim();
        let candidate = if address.starts_with(':') {
            format!("0.0.0.0{address}")
        } else {
            address.to_string()
        };

        candidate.parse::<SocketAddr>().map_err(|err| {
            AppError::message(format!(
                "Invalid listen address `{}`: {}",
                self.listen_address, err
            ))
        })
    }
}

/// The one instrument this process exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub ticker_symbol: String,
    pub stock_exchange_code: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            ticker_symbol: DEFAULT_TICKER_SYMBOL.to_string(),
            stock_exchange_code: DEFAULT_STOCK_EXCHANGE_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub url_template: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: concat!("stockprice-exporter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
