use serde::{Deserialize, Serialize};
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

/// Counters collected while the sampling loop runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub ticks: usize,
    pub evictions: usize,
    pub ignored_commands: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_tick(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ticks += 1;
        }
    }

    pub fn record_eviction(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.evictions += 1;
        }
    }

    pub fn record_ignored(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.ignored_commands += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
