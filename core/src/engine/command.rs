use serde::{Deserialize, Serialize};

use crate::prelude::{ParameterBounds, SignalResult, StartRequest};

/// Inbound events accepted by the sampling engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Start(StartRequest),
    Stop,
    SetAmplitude { value: f64 },
    SetFrequency { value: f64 },
    SetPhase { degrees: f64 },
    SetInterval { interval_ms: u64 },
    Shutdown,
}

impl Command {
    /// Checks user-supplied values against `bounds` before they reach the loop.
    pub fn validate(&self, bounds: &ParameterBounds) -> SignalResult<()> {
        match *self {
            Command::Start(ref request) => request.validate(bounds),
            Command::SetAmplitude { value } => bounds.check_amplitude(value).map(|_| ()),
            Command::SetFrequency { value } => bounds.check_frequency(value).map(|_| ()),
            Command::SetPhase { degrees } => bounds.check_phase_degrees(degrees).map(|_| ()),
            Command::SetInterval { interval_ms } => bounds.check_interval(interval_ms).map(|_| ()),
            Command::Stop | Command::Shutdown => Ok(()),
        }
    }
}
