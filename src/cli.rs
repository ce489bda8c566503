use std::path::PathBuf;

use clap::Parser;

use crate::config::ConfigOverrides;

#[derive(Debug, Parser)]
#[command(name = "stockprice-exporter")]
#[command(about = "Prometheus exporter publishing the latest quote of one instrument")]
#[command(version)]
pub struct Cli {
    /// Optional JSON config file; flags take precedence over its values.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Address on which to expose metrics and web interface. [default: :9010]
    #[arg(long = "web.listen-address")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics. [default: /metrics]
    #[arg(long = "web.telemetry-path")]
    pub telemetry_path: Option<String>,

    /// Code identifying a publicly traded corporation on a stock market. [default: 0]
    #[arg(long = "ticker-symbol")]
    pub ticker_symbol: Option<String>,

    /// Code of the stock exchange the ticker trades on. [default: TYO]
    #[arg(long = "stock-exchange-code")]
    pub stock_exchange_code: Option<String>,

    /// Upstream URL with `{symbol}` and `{exchange}` placeholders.
    #[arg(long = "upstream.url-template")]
    pub url_template: Option<String>,

    /// Upstream request timeout in seconds. [default: 10]
    #[arg(long = "upstream.timeout-secs")]
    pub timeout_secs: Option<u64>,
}

impl From<&Cli> for ConfigOverrides {
    fn from(cli: &Cli) -> Self {
        ConfigOverrides {
            listen_address: cli.listen_address.clone(),
            telemetry_path: cli.telemetry_path.clone(),
            ticker_symbol: cli.ticker_symbol.clone(),
            stock_exchange_code: cli.stock_exchange_code.clone(),
            url_template: cli.url_template.clone(),
            timeout_secs: cli.timeout_secs,
        }
    }
}
