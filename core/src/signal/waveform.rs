use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::prelude::StartRequest;

/// Amplitude, frequency (Hz) and phase (radians) of a sine wave.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformParameters {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl WaveformParameters {
    pub fn new(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
        }
    }

    pub fn from_degrees(amplitude: f64, frequency: f64, phase_degrees: f64) -> Self {
        Self::new(amplitude, frequency, phase_degrees.to_radians())
    }
}

impl From<&StartRequest> for WaveformParameters {
    fn from(request: &StartRequest) -> Self {
        Self::from_degrees(request.amplitude, request.frequency, request.phase_degrees)
    }
}

/// Sine-wave model evaluated at caller-supplied times.
///
/// Setters replace a parameter in place and take effect on the next
/// [`Evaluator::evaluate`] call. No validation happens here: amplitude must be
/// non-negative and frequency positive, phase is taken modulo 2π.
#[derive(Debug, Clone)]
pub struct Evaluator {
    params: WaveformParameters,
}

impl Evaluator {
    pub fn new(params: WaveformParameters) -> Self {
        Self { params }
    }

    /// `amplitude * sin(2π * frequency * t + phase)`
    pub fn evaluate(&self, time: f64) -> f64 {
        let WaveformParameters {
            amplitude,
            frequency,
            phase,
        } = self.params;
        amplitude * (2.0 * PI * frequency * time + phase).sin()
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.params.amplitude = amplitude;
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.params.frequency = frequency;
    }

    pub fn set_phase(&mut self, phase: f64) {
        self.params.phase = phase;
    }

    pub fn parameters(&self) -> WaveformParameters {
        self.params
    }
}
