pub mod sampler;
pub mod series;
pub mod sink;
pub mod waveform;

pub use sampler::{LoopState, SamplerConfig, SamplingLoop, Tick};
pub use series::{Extent, Sample, SeriesBuffer};
pub use sink::{CollectingSink, LogSink, SampleSink};
pub use waveform::{Evaluator, WaveformParameters};
