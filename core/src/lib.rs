//! Signal-generation core for the interactive sine generator.
//!
//! A [`signal::Evaluator`] turns time into waveform values, a
//! [`signal::SamplingLoop`] advances a virtual clock and keeps a bounded
//! series, and the [`engine::Engine`] serializes user commands and timer ticks
//! onto a single task.

pub mod engine;
pub mod math;
pub mod prelude;
pub mod signal;
pub mod telemetry;

pub use engine::{Command, Engine, EngineHandle, SeriesSnapshot};
pub use prelude::{ParameterBounds, SignalError, SignalResult, StartRequest};
pub use signal::{Sample, SampleSink, SamplingLoop, SeriesBuffer, WaveformParameters};
