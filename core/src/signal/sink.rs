use crate::signal::series::Sample;
use crate::telemetry::log::LogManager;

/// Receives every sample produced by the sampling loop.
pub trait SampleSink {
    fn on_sample(&mut self, sample: Sample);

    /// Called when generation (re)starts from t = 0.
    fn on_restart(&mut self) {}
}

/// Writes each sample as a log line.
#[derive(Default)]
pub struct LogSink {
    logger: LogManager,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }
}

impl SampleSink for LogSink {
    fn on_sample(&mut self, sample: Sample) {
        self.logger.record_sample(&sample);
    }

    fn on_restart(&mut self) {
        self.logger.record("generation restarted");
    }
}

/// Keeps every sample it receives.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub samples: Vec<Sample>,
    pub restarts: usize,
}

impl SampleSink for CollectingSink {
    fn on_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    fn on_restart(&mut self) {
        self.restarts += 1;
    }
}

impl<A: SampleSink, B: SampleSink> SampleSink for (A, B) {
    fn on_sample(&mut self, sample: Sample) {
        self.0.on_sample(sample);
        self.1.on_sample(sample);
    }

    fn on_restart(&mut self) {
        self.0.on_restart();
        self.1.on_restart();
    }
}

impl<S: SampleSink + ?Sized> SampleSink for &mut S {
    fn on_sample(&mut self, sample: Sample) {
        (**self).on_sample(sample);
    }

    fn on_restart(&mut self) {
        (**self).on_restart();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_fans_out_to_both_sinks() {
        let mut pair = (CollectingSink::default(), CollectingSink::default());
        pair.on_restart();
        pair.on_sample(Sample::new(0.0, 1.0));
        assert_eq!(pair.0.samples, pair.1.samples);
        assert_eq!(pair.1.restarts, 1);
    }
}
