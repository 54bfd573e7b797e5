use serde::{Deserialize, Serialize};

use crate::prelude::DEFAULT_INTERVAL_MS;
use crate::signal::sampler::SamplingLoop;
use crate::signal::series::{Extent, Sample};
use crate::signal::waveform::WaveformParameters;
use crate::telemetry::metrics::Metrics;

/// Point-in-time copy of the sampling loop for plot and log consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSnapshot {
    pub running: bool,
    pub parameters: Option<WaveformParameters>,
    pub interval_ms: u64,
    pub clock: f64,
    pub ticks: u64,
    pub samples: Vec<Sample>,
    pub range: Option<Extent>,
    pub value_extent: Option<Extent>,
    pub metrics: Metrics,
}

impl Default for SeriesSnapshot {
    fn default() -> Self {
        Self {
            running: false,
            parameters: None,
            interval_ms: DEFAULT_INTERVAL_MS,
            clock: 0.0,
            ticks: 0,
            samples: Vec::new(),
            range: None,
            value_extent: None,
            metrics: Metrics::default(),
        }
    }
}

impl SeriesSnapshot {
    pub fn capture(sampler: &SamplingLoop, metrics: Metrics) -> Self {
        let series = sampler.series();
        Self {
            running: sampler.is_running(),
            parameters: sampler.parameters(),
            interval_ms: sampler.interval_ms(),
            clock: sampler.clock(),
            ticks: sampler.ticks(),
            samples: series.to_vec(),
            range: series.range(),
            value_extent: series.value_extent(),
            metrics,
        }
    }
}
