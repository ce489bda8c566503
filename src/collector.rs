use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;

use crate::config::QuoteConfig;
use crate::error::AppError;
use crate::fetch::{parse_quote_line, QuoteRecord, QuoteSource};
use crate::metrics::MetricSet;

/// Terminal state of one scrape.
#[derive(Debug)]
pub enum ScrapeOutcome {
    Emitted(QuoteRecord),
    Failed(AppError),
}

impl ScrapeOutcome {
    pub fn is_emitted(&self) -> bool {
        matches!(self, ScrapeOutcome::Emitted(_))
    }
}

/// Fetches, parses and publishes one instrument on every collect.
///
/// Upstream failures are logged and swallowed: the gauges keep their last
/// successful values and the scrape still completes.
pub struct QuoteCollector {
    source: Arc<dyn QuoteSource>,
    metrics: Arc<MetricSet>,
    symbol: String,
    exchange: String,
    failures: AtomicU64,
}

impl QuoteCollector {
    pub fn new(source: Arc<dyn QuoteSource>, metrics: Arc<MetricSet>, quote: &QuoteConfig) -> Self {
        Self {
            source,
            metrics,
            symbol: quote.ticker_symbol.clone(),
            exchange: quote.stock_exchange_code.clone(),
            failures: AtomicU64::new(0),
        }
    }

    /// Run the fetch/parse/update pipeline once.
    pub fn scrape(&self) -> ScrapeOutcome {
        let line = match self.source.fetch(&self.symbol, &self.exchange) {
            Ok(line) => line,
            Err(err) => return self.fail(AppError::from(err)),
        };

        let record = match parse_quote_line(&line) {
            Ok(record) => record,
            Err(err) => return self.fail(AppError::from(err)),
        };

        self.metrics.update(&record);
        debug!(
            "Scraped {}:{} date={} close={} open={} high={} low={} volume={}",
            self.exchange,
            self.symbol,
            record.date,
            record.close,
            record.open,
            record.high,
            record.low,
            record.volume
        );

        ScrapeOutcome::Emitted(record)
    }

    /// Number of scrapes that fell back to last-known values.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    fn fail(&self, err: AppError) -> ScrapeOutcome {
        let total = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(
            "Scrape of {}:{} failed, serving last known values ({} failures so far): {}",
            self.exchange, self.symbol, total, err
        );
        ScrapeOutcome::Failed(err)
    }
}

impl Collector for QuoteCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.metrics.describe()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        self.scrape();
        self.metrics.collect()
    }
}
