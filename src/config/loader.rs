use std::{fs, path::Path};

use crate::error::{Context, Result};

use super::{validator, ExporterConfig};

/// Values supplied on the command line. `None` keeps whatever the file or
/// the defaults provided.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub listen_address: Option<String>,
    pub telemetry_path: Option<String>,
    pub ticker_symbol: Option<String>,
    pub stock_exchange_code: Option<String>,
    pub url_template: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Build the validated configuration from an optional JSON file plus overrides.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<ExporterConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ExporterConfig::default(),
    };

    config.apply(overrides);
    validator::validate_config(&config)?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<ExporterConfig> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read config JSON at {}", path.display()))?;

    let config: ExporterConfig = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse config JSON at {}", path.display()))?;

    Ok(config)
}

impl ExporterConfig {
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(value) = &overrides.listen_address {
            self.web.listen_address = value.clone();
        }
        if let Some(value) = &overrides.telemetry_path {
            self.web.telemetry_path = value.clone();
        }
        if let Some(value) = &overrides.ticker_symbol {
            self.quote.ticker_symbol = value.clone();
        }
        if let Some(value) = &overrides.stock_exchange_code {
            self.quote.stock_exchange_code = value.clone();
        }
        if let Some(value) = &overrides.url_template {
            self.upstream.url_template = value.clone();
        }
        if let Some(value) = overrides.timeout_secs {
            self.upstream.timeout_secs = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "stockprice-exporter-{}-{}.json",
            name,
            std::process::id()
        ));
        fs::write(&path, contents).expect("write temp config");
        path
    }

    #[test]
    fn defaults_without_file() {
        let config = load_config(None, &ConfigOverrides::default()).expect("defaults load");
        assert_eq!(config, ExporterConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let path = temp_config(
            "partial",
            r#"{ "quote": { "ticker_symbol": "7203" }, "upstream": { "timeout_secs": 3 } }"#,
        );

        let config = load_config(Some(&path), &ConfigOverrides::default()).expect("config loads");
        let _ = fs::remove_file(&path);

        assert_eq!(config.quote.ticker_symbol, "7203");
        assert_eq!(config.quote.stock_exchange_code, "TYO");
        assert_eq!(config.upstream.timeout_secs, 3);
        assert_eq!(config.web.telemetry_path, "/metrics");
    }

    #[test]
    fn flags_override_file() {
        let path = temp_config(
            "override",
            r#"{ "web": { "listen_address": ":9999" }, "quote": { "ticker_symbol": "7203" } }"#,
        );
        let overrides = ConfigOverrides {
            ticker_symbol: Some("6758".to_string()),
            stock_exchange_code: Some("NASDAQ".to_string()),
            ..ConfigOverrides::default()
        };

        let config = load_config(Some(&path), &overrides).expect("config loads");
        let _ = fs::remove_file(&path);

        assert_eq!(config.web.listen_address, ":9999");
        assert_eq!(config.quote.ticker_symbol, "6758");
        assert_eq!(config.quote.stock_exchange_code, "NASDAQ");
    }

    #[test]
    fn malformed_file_reports_path() {
        let path = temp_config("malformed", "{ not json");

        let err = load_config(Some(&path), &ConfigOverrides::default()).unwrap_err();
        let _ = fs::remove_file(&path);

        assert!(
            err.to_string().contains("failed to parse config JSON"),
            "unexpected error message: {err}"
        );
    }

    #[test]
    fn invalid_overrides_fail_validation() {
        let overrides = ConfigOverrides {
            telemetry_path: Some("metrics".to_string()),
            ..ConfigOverrides::default()
        };

        let err = load_config(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("telemetry_path"));
    }
}
