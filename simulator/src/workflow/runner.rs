use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use sinecore::signal::{CollectingSink, Extent, LogSink, Sample, SamplingLoop, WaveformParameters};

pub struct WorkflowResult {
    pub samples: Vec<Sample>,
    pub emitted: usize,
    pub range: Option<Extent>,
    pub value_extent: Option<Extent>,
    pub rms: f64,
    pub evictions: usize,
}

/// Runs the sampling loop for a fixed number of ticks without a timer.
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let request = self.config.to_start_request();
        let mut sampler = SamplingLoop::new(self.config.to_sampler_config());
        let mut sink = (LogSink::new(), CollectingSink::default());

        sampler.start(
            WaveformParameters::from(&request),
            request.interval_ms,
            &mut sink,
        );

        let mut evictions = 0;
        for index in 0..self.config.ticks {
            let tick = sampler
                .tick(&mut sink)
                .with_context(|| format!("executing tick {}", index))?;
            if tick.and_then(|t| t.evicted).is_some() {
                evictions += 1;
            }
        }
        sampler.stop();

        let series = sampler.series();
        Ok(WorkflowResult {
            samples: series.to_vec(),
            emitted: sink.1.samples.len(),
            range: series.range(),
            value_extent: series.value_extent(),
            rms: series.rms(),
            evictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn runner_executes_workflow() {
        let mut cfg = WorkflowConfig::from_args(50.0, 10.0, 0.0, 100);
        cfg.ticks = 1_200;
        let result = Runner::new(cfg).execute().unwrap();

        assert_eq!(result.emitted, 1_200);
        assert_eq!(result.samples.len(), 1_000);
        assert_eq!(result.evictions, 200);
        let range = result.range.unwrap();
        assert_eq!(range.start, result.samples[0].time);
        assert_eq!(range.end, result.samples[999].time);
    }

    #[test]
    fn full_period_rms_matches_sine_rms() {
        // 10 Hz with a 0.0001 step gives exactly one period in 1000 ticks.
        let mut cfg = WorkflowConfig::from_args(50.0, 10.0, 0.0, 100);
        cfg.ticks = 1_000;
        let result = Runner::new(cfg).execute().unwrap();
        assert_abs_diff_eq!(result.rms, 50.0 / 2f64.sqrt(), epsilon = 1e-3);
    }

    #[test]
    fn zero_ticks_yield_empty_series() {
        let mut cfg = WorkflowConfig::default();
        cfg.ticks = 0;
        let result = Runner::new(cfg).execute().unwrap();
        assert!(result.samples.is_empty());
        assert!(result.range.is_none());
        assert_eq!(result.rms, 0.0);
    }
}
