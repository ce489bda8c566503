use std::sync::Arc;

use log::info;
use prometheus::Registry;

use crate::collector::QuoteCollector;
use crate::config::ExporterConfig;
use crate::error::{Context, Result};
use crate::fetch::QuoteFetcher;
use crate::metrics::MetricSet;
use crate::server::{self, AppState};

/// Wire fetcher, gauges and collector into a fresh registry.
pub fn build_state(config: &ExporterConfig) -> Result<Arc<AppState>> {
    let fetcher = Arc::new(QuoteFetcher::new(&config.upstream)?);
    let metrics = Arc::new(MetricSet::new()?);
    let collector = QuoteCollector::new(fetcher, metrics, &config.quote);

    let registry = Registry::new();
    registry.register(Box::new(collector))?;

    Ok(Arc::new(AppState {
        registry,
        telemetry_path: config.web.telemetry_path.clone(),
    }))
}

/// Entry point used by `main`. The blocking HTTP client is built before the
/// async runtime starts.
pub fn run(config: ExporterConfig) -> Result<()> {
    let addr = config.web.socket_addr()?;
    let state = build_state(&config)?;

    info!(
        "Exporting {}:{} from {}",
        config.quote.stock_exchange_code, config.quote.ticker_symbol, config.upstream.url_template
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(server::serve(addr, state))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_state_from_defaults() {
        let state = build_state(&ExporterConfig::default()).expect("state builds");

        assert_eq!(state.telemetry_path, "/metrics");
    }
}
