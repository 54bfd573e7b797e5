use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Number of samples kept in the rolling series.
pub const SERIES_CAPACITY: usize = 1000;

/// Virtual time added to the clock on every tick, independent of the tick period.
pub const TIME_STEP: f64 = 0.0001;

/// Default wall-clock tick period in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Common error type for the signal-generation core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SignalError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("sample at t={next} does not follow t={previous}")]
    OutOfOrder { previous: f64, next: f64 },
    #[error("sampling engine is no longer running")]
    EngineClosed,
}

pub type SignalResult<T> = Result<T, SignalError>;

/// Accepted ranges for every user-facing parameter.
///
/// The core itself never clamps or rejects values; collaborators feeding it
/// (CLI, YAML config, HTTP bridge) check inputs against these bounds first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBounds {
    pub amplitude: RangeInclusive<f64>,
    pub frequency: RangeInclusive<f64>,
    pub phase_degrees: RangeInclusive<f64>,
    pub interval_ms: RangeInclusive<u64>,
}

impl Default for ParameterBounds {
    fn default() -> Self {
        Self {
            amplitude: 0.0..=100.0,
            frequency: 1.0..=1000.0,
            phase_degrees: 0.0..=360.0,
            interval_ms: 100..=10_000,
        }
    }
}

impl ParameterBounds {
    pub fn check_amplitude(&self, value: f64) -> SignalResult<f64> {
        check_range("amplitude", value, &self.amplitude)
    }

    pub fn check_frequency(&self, value: f64) -> SignalResult<f64> {
        check_range("frequency", value, &self.frequency)
    }

    pub fn check_phase_degrees(&self, value: f64) -> SignalResult<f64> {
        check_range("phase", value, &self.phase_degrees)
    }

    pub fn check_interval(&self, value: u64) -> SignalResult<u64> {
        if self.interval_ms.contains(&value) {
            Ok(value)
        } else {
            Err(SignalError::InvalidParameter(format!(
                "interval {} ms outside {}..={}",
                value,
                self.interval_ms.start(),
                self.interval_ms.end()
            )))
        }
    }
}

fn check_range(name: &str, value: f64, range: &RangeInclusive<f64>) -> SignalResult<f64> {
    if value.is_finite() && range.contains(&value) {
        Ok(value)
    } else {
        Err(SignalError::InvalidParameter(format!(
            "{} {} outside {}..={}",
            name,
            value,
            range.start(),
            range.end()
        )))
    }
}

/// Values supplied by the UI when generation starts. Phase is in degrees here;
/// conversion to radians happens when the evaluator is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartRequest {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase_degrees: f64,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl StartRequest {
    pub fn validate(&self, bounds: &ParameterBounds) -> SignalResult<()> {
        bounds.check_amplitude(self.amplitude)?;
        bounds.check_frequency(self.frequency)?;
        bounds.check_phase_degrees(self.phase_degrees)?;
        bounds.check_interval(self.interval_ms)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> StartRequest {
        StartRequest {
            amplitude: 50.0,
            frequency: 10.0,
            phase_degrees: 0.0,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }

    #[test]
    fn default_bounds_accept_edges() {
        let bounds = ParameterBounds::default();
        assert!(bounds.check_amplitude(0.0).is_ok());
        assert!(bounds.check_amplitude(100.0).is_ok());
        assert!(bounds.check_frequency(1.0).is_ok());
        assert!(bounds.check_phase_degrees(360.0).is_ok());
        assert!(bounds.check_interval(10_000).is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bounds = ParameterBounds::default();
        assert!(matches!(
            bounds.check_frequency(0.0),
            Err(SignalError::InvalidParameter(_))
        ));
        assert!(bounds.check_amplitude(-1.0).is_err());
        assert!(bounds.check_amplitude(f64::NAN).is_err());
        assert!(bounds.check_interval(99).is_err());
    }

    #[test]
    fn start_request_validation_reports_first_failure() {
        let bounds = ParameterBounds::default();
        assert!(request().validate(&bounds).is_ok());

        let bad = StartRequest {
            phase_degrees: 400.0,
            ..request()
        };
        let err = bad.validate(&bounds).unwrap_err();
        assert!(err.to_string().contains("phase"));
    }

    #[test]
    fn start_request_defaults_interval_when_missing() {
        let parsed: StartRequest =
            serde_json::from_str(r#"{"amplitude":1.0,"frequency":2.0,"phase_degrees":0.0}"#)
                .unwrap();
        assert_eq!(parsed.interval_ms, DEFAULT_INTERVAL_MS);
    }
}
