use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::prelude::{SignalResult, DEFAULT_INTERVAL_MS, SERIES_CAPACITY, TIME_STEP};
use crate::signal::series::{Sample, SeriesBuffer};
use crate::signal::sink::SampleSink;
use crate::signal::waveform::{Evaluator, WaveformParameters};

/// Virtual step and series size. The wall-clock tick period lives on the loop
/// itself and never influences the virtual step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub time_step: f64,
    pub capacity: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            time_step: TIME_STEP,
            capacity: SERIES_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    Stopped,
    Running,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub sample: Sample,
    pub evicted: Option<Sample>,
}

/// Drives the evaluator from a virtual clock and keeps the rolling series.
///
/// The loop does not own a timer; callers invoke [`SamplingLoop::tick`] once
/// per period of [`SamplingLoop::interval`].
pub struct SamplingLoop {
    config: SamplerConfig,
    state: LoopState,
    interval_ms: u64,
    evaluator: Option<Evaluator>,
    clock: f64,
    series: SeriesBuffer,
    ticks: u64,
}

impl SamplingLoop {
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            state: LoopState::Stopped,
            interval_ms: DEFAULT_INTERVAL_MS,
            evaluator: None,
            clock: 0.0,
            series: SeriesBuffer::with_capacity(config.capacity),
            ticks: 0,
        }
    }

    /// Replaces the evaluator, rewinds the clock to zero, clears the series and
    /// enters `Running`. Calling this while running is a restart.
    pub fn start<S>(&mut self, params: WaveformParameters, interval_ms: u64, sink: &mut S)
    where
        S: SampleSink + ?Sized,
    {
        self.evaluator = Some(Evaluator::new(params));
        self.clock = 0.0;
        self.ticks = 0;
        self.interval_ms = interval_ms;
        self.series.clear();
        self.state = LoopState::Running;
        sink.on_restart();
    }

    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Produces one sample at the current clock value and advances the clock.
    /// Returns `Ok(None)` while stopped.
    pub fn tick<S>(&mut self, sink: &mut S) -> SignalResult<Option<Tick>>
    where
        S: SampleSink + ?Sized,
    {
        if self.state != LoopState::Running {
            return Ok(None);
        }
        let evaluator = match self.evaluator.as_ref() {
            Some(evaluator) => evaluator,
            None => return Ok(None),
        };

        let sample = Sample::new(self.clock, evaluator.evaluate(self.clock));
        let evicted = self.series.push(sample)?;
        sink.on_sample(sample);

        self.clock += self.config.time_step;
        self.ticks += 1;
        Ok(Some(Tick { sample, evicted }))
    }

    /// Returns `false` when there is no evaluator yet to apply the change to.
    pub fn set_amplitude(&mut self, amplitude: f64) -> bool {
        self.with_evaluator(|evaluator| evaluator.set_amplitude(amplitude))
    }

    pub fn set_frequency(&mut self, frequency: f64) -> bool {
        self.with_evaluator(|evaluator| evaluator.set_frequency(frequency))
    }

    /// Phase in radians.
    pub fn set_phase(&mut self, phase: f64) -> bool {
        self.with_evaluator(|evaluator| evaluator.set_phase(phase))
    }

    /// Changes the period of future ticks; clock and evaluator are untouched.
    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = interval_ms;
    }

    fn with_evaluator<F: FnOnce(&mut Evaluator)>(&mut self, apply: F) -> bool {
        match self.evaluator.as_mut() {
            Some(evaluator) => {
                apply(evaluator);
                true
            }
            None => false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn parameters(&self) -> Option<WaveformParameters> {
        self.evaluator.as_ref().map(Evaluator::parameters)
    }

    pub fn series(&self) -> &SeriesBuffer {
        &self.series
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }
}

impl Default for SamplingLoop {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::sink::CollectingSink;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn running(amplitude: f64, frequency: f64, phase_degrees: f64) -> (SamplingLoop, CollectingSink) {
        let mut sampler = SamplingLoop::default();
        let mut sink = CollectingSink::default();
        sampler.start(
            WaveformParameters::from_degrees(amplitude, frequency, phase_degrees),
            DEFAULT_INTERVAL_MS,
            &mut sink,
        );
        (sampler, sink)
    }

    #[test]
    fn first_ticks_match_reference_values() {
        let (mut sampler, mut sink) = running(50.0, 10.0, 0.0);
        let first = sampler.tick(&mut sink).unwrap().unwrap().sample;
        let second = sampler.tick(&mut sink).unwrap().unwrap().sample;

        assert_eq!(first, Sample::new(0.0, 0.0));
        assert_eq!(second.time, 0.0001);
        assert_abs_diff_eq!(
            second.value,
            50.0 * (2.0 * PI * 10.0 * 0.0001).sin(),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(second.value, 0.3141572, epsilon = 1e-6);
        assert_eq!(sink.samples, vec![first, second]);
    }

    #[test]
    fn clock_advances_by_fixed_step_regardless_of_interval() {
        let (mut sampler, mut sink) = running(1.0, 1.0, 0.0);
        let mut previous = sampler.tick(&mut sink).unwrap().unwrap().sample.time;
        assert_eq!(previous, 0.0);
        for step in 0..20 {
            sampler.set_interval(if step % 2 == 0 { 10_000 } else { 100 });
            let time = sampler.tick(&mut sink).unwrap().unwrap().sample.time;
            assert_eq!(time, previous + TIME_STEP);
            previous = time;
        }
    }

    #[test]
    fn amplitude_change_takes_effect_on_next_tick() {
        let (mut sampler, mut sink) = running(50.0, 10.0, 90.0);
        for _ in 0..5 {
            sampler.tick(&mut sink).unwrap();
        }
        assert!(sampler.set_amplitude(0.0));
        let next = sampler.tick(&mut sink).unwrap().unwrap().sample;
        assert_eq!(next.value, 0.0);
    }

    #[test]
    fn stopped_loop_produces_nothing() {
        let (mut sampler, mut sink) = running(1.0, 5.0, 0.0);
        sampler.tick(&mut sink).unwrap();
        sampler.stop();
        assert_eq!(sampler.state(), LoopState::Stopped);
        assert!(sampler.tick(&mut sink).unwrap().is_none());
        assert!(sampler.tick(&mut sink).unwrap().is_none());
        assert_eq!(sink.samples.len(), 1);
    }

    #[test]
    fn restart_resets_clock_and_clears_series() {
        let (mut sampler, mut sink) = running(1.0, 5.0, 0.0);
        for _ in 0..10 {
            sampler.tick(&mut sink).unwrap();
        }
        sampler.start(WaveformParameters::new(2.0, 3.0, 0.0), 500, &mut sink);

        assert_eq!(sampler.clock(), 0.0);
        assert!(sampler.series().is_empty());
        assert_eq!(sampler.interval_ms(), 500);
        assert_eq!(sink.restarts, 2);
        let first = sampler.tick(&mut sink).unwrap().unwrap().sample;
        assert_eq!(first.time, 0.0);
        assert_eq!(sampler.parameters().unwrap().amplitude, 2.0);
    }

    #[test]
    fn setters_before_first_start_are_ignored() {
        let mut sampler = SamplingLoop::default();
        assert!(!sampler.set_amplitude(3.0));
        assert!(!sampler.set_frequency(3.0));
        assert!(!sampler.set_phase(0.5));
        assert!(sampler.parameters().is_none());
    }

    #[test]
    fn series_saturates_at_capacity() {
        let mut sampler = SamplingLoop::new(SamplerConfig {
            time_step: TIME_STEP,
            capacity: 16,
        });
        let mut sink = CollectingSink::default();
        sampler.start(WaveformParameters::new(1.0, 1.0, 0.0), 100, &mut sink);
        let mut evictions = 0;
        for _ in 0..40 {
            if sampler.tick(&mut sink).unwrap().unwrap().evicted.is_some() {
                evictions += 1;
            }
        }
        assert_eq!(sampler.series().len(), 16);
        assert_eq!(evictions, 24);
        assert_eq!(sampler.series().to_vec(), sink.samples[24..].to_vec());
    }

    #[test]
    fn interval_change_keeps_clock_and_evaluator() {
        let (mut sampler, mut sink) = running(4.0, 2.0, 0.0);
        sampler.tick(&mut sink).unwrap();
        let clock = sampler.clock();
        sampler.set_interval(2_500);
        assert_eq!(sampler.clock(), clock);
        assert_eq!(sampler.interval(), Duration::from_millis(2_500));
        assert_eq!(sampler.parameters().unwrap().amplitude, 4.0);
    }
}
