use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, Opts};

use crate::error::Result;
use crate::fetch::QuoteRecord;

pub const NAMESPACE: &str = "stockprice_exporter";

/// Gauge names in collection order.
pub const GAUGE_NAMES: [&str; 5] = ["close", "open", "high", "low", "volume"];

/// Current value of every gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeValues {
    pub close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

/// The five quote gauges. Each gauge is an independent atomic cell; an update
/// racing a collect may be observed half-applied.
#[derive(Clone)]
pub struct MetricSet {
    close: Gauge,
    open: Gauge,
    high: Gauge,
    low: Gauge,
    volume: Gauge,
}

impl MetricSet {
    pub fn new() -> Result<Self> {
        Ok(Self {
            close: new_gauge("close")?,
            open: new_gauge("open")?,
            high: new_gauge("high")?,
            low: new_gauge("low")?,
            volume: new_gauge("volume")?,
        })
    }

    fn gauges(&self) -> [&Gauge; 5] {
        [&self.close, &self.open, &self.high, &self.low, &self.volume]
    }

    pub fn describe(&self) -> Vec<&Desc> {
        self.gauges()
            .into_iter()
            .flat_map(|gauge| gauge.desc())
            .collect()
    }

    pub fn update(&self, record: &QuoteRecord) {
        self.close.set(record.close);
        self.open.set(record.open);
        self.high.set(record.high);
        self.low.set(record.low);
        self.volume.set(record.volume);
    }

    pub fn collect(&self) -> Vec<MetricFamily> {
        self.gauges()
            .into_iter()
            .flat_map(|gauge| gauge.collect())
            .collect()
    }

    pub fn values(&self) -> GaugeValues {
        GaugeValues {
            close: self.close.get(),
            open: self.open.get(),
            high: self.high.get(),
            low: self.low.get(),
            volume: self.volume.get(),
        }
    }
}

fn new_gauge(name: &str) -> Result<Gauge> {
    Ok(Gauge::with_opts(Opts::new(name, name).namespace(NAMESPACE))?)
}
