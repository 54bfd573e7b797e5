use log::info;

use crate::signal::series::Sample;

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn record_sample(&self, sample: &Sample) {
        self.record(&format_sample(sample));
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Text line written to the sample log for every tick.
pub fn format_sample(sample: &Sample) -> String {
    format!("time: {} | value: {}", sample.time, sample.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_line_shows_time_and_value() {
        assert_eq!(
            format_sample(&Sample::new(0.0001, -2.5)),
            "time: 0.0001 | value: -2.5"
        );
    }
}
