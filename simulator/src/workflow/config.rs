use anyhow::Context;
use serde::{Deserialize, Serialize};
use sinecore::prelude::{
    ParameterBounds, StartRequest, DEFAULT_INTERVAL_MS, SERIES_CAPACITY, TIME_STEP,
};
use sinecore::signal::SamplerConfig;
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase_degrees: f64,
    pub interval_ms: u64,
    /// Ticks produced by an offline run.
    pub ticks: usize,
    /// Start generating as soon as the engine is up instead of waiting for the GUI.
    pub autostart: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            amplitude: 50.0,
            frequency: 10.0,
            phase_degrees: 0.0,
            interval_ms: DEFAULT_INTERVAL_MS,
            ticks: SERIES_CAPACITY,
            autostart: false,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(amplitude: f64, frequency: f64, phase_degrees: f64, interval_ms: u64) -> Self {
        Self {
            amplitude,
            frequency,
            phase_degrees,
            interval_ms,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.to_start_request()
            .validate(&ParameterBounds::default())
            .context("validating workflow config")?;
        Ok(())
    }

    pub fn to_start_request(&self) -> StartRequest {
        StartRequest {
            amplitude: self.amplitude,
            frequency: self.frequency,
            phase_degrees: self.phase_degrees,
            interval_ms: self.interval_ms,
        }
    }

    pub fn to_sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            time_step: TIME_STEP,
            capacity: SERIES_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_start_request() {
        let cfg = WorkflowConfig::from_args(20.0, 50.0, 90.0, 250);
        let request = cfg.to_start_request();
        assert_eq!(request.interval_ms, 250);
        assert_eq!(request.phase_degrees, 90.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn config_load_reads_yaml_with_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"amplitude: 12.5\nfrequency: 440\nticks: 32\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.amplitude, 12.5);
        assert_eq!(cfg.frequency, 440.0);
        assert_eq!(cfg.ticks, 32);
        assert_eq!(cfg.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn out_of_range_config_fails_validation() {
        let cfg = WorkflowConfig::from_args(150.0, 10.0, 0.0, 100);
        let err = cfg.validate().unwrap_err();
        assert!(format!("{:#}", err).contains("amplitude"));
    }
}
