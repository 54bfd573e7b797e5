use log::{debug, error, info};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::engine::command::Command;
use crate::engine::snapshot::SeriesSnapshot;
use crate::prelude::{SignalError, SignalResult};
use crate::signal::sampler::{SamplerConfig, SamplingLoop};
use crate::signal::sink::SampleSink;
use crate::signal::waveform::WaveformParameters;
use crate::telemetry::metrics::{Metrics, MetricsRecorder};

/// Owns the sampling loop and serializes every command and timer tick onto a
/// single task, so a tick never observes a half-applied parameter change.
pub struct Engine<S> {
    sampler: SamplingLoop,
    sink: S,
    commands: mpsc::UnboundedReceiver<Command>,
    snapshots: watch::Sender<SeriesSnapshot>,
    metrics: Arc<MetricsRecorder>,
    next_tick: Option<Instant>,
}

/// Cloneable sender side of an [`Engine`].
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<SeriesSnapshot>,
    metrics: Arc<MetricsRecorder>,
}

impl EngineHandle {
    pub fn send(&self, command: Command) -> SignalResult<()> {
        self.commands
            .send(command)
            .map_err(|_| SignalError::EngineClosed)
    }

    pub fn snapshot(&self) -> SeriesSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SeriesSnapshot> {
        self.snapshots.clone()
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics.snapshot()
    }
}

impl<S> Engine<S>
where
    S: SampleSink + Send + 'static,
{
    pub fn new(config: SamplerConfig, sink: S) -> (Self, EngineHandle) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(SeriesSnapshot::default());
        let metrics = Arc::new(MetricsRecorder::new());

        let engine = Self {
            sampler: SamplingLoop::new(config),
            sink,
            commands: command_rx,
            snapshots: snapshot_tx,
            metrics: metrics.clone(),
            next_tick: None,
        };
        let handle = EngineHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            metrics,
        };
        (engine, handle)
    }

    pub fn spawn(self) -> JoinHandle<S> {
        tokio::spawn(self.run())
    }

    /// Runs until `Shutdown` arrives or every handle is dropped, then hands the
    /// sink back.
    pub async fn run(mut self) -> S {
        info!("sampling engine started");
        loop {
            let deadline = self.next_tick;
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.on_timer(deadline.unwrap_or_else(Instant::now));
                }
            }
            self.publish();
        }
        info!("sampling engine stopped after {} ticks", self.sampler.ticks());
        self.sink
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Start(request) => {
                info!(
                    "start: amplitude {} frequency {} Hz phase {} deg interval {} ms",
                    request.amplitude, request.frequency, request.phase_degrees, request.interval_ms
                );
                self.sampler.start(
                    WaveformParameters::from(&request),
                    request.interval_ms,
                    &mut self.sink,
                );
                self.next_tick = Some(Instant::now() + self.sampler.interval());
            }
            Command::Stop => {
                info!("stop at t={}", self.sampler.clock());
                self.sampler.stop();
                self.next_tick = None;
            }
            Command::SetAmplitude { value } => {
                let applied = self.sampler.set_amplitude(value);
                self.note_setter("amplitude", applied);
            }
            Command::SetFrequency { value } => {
                let applied = self.sampler.set_frequency(value);
                self.note_setter("frequency", applied);
            }
            Command::SetPhase { degrees } => {
                let applied = self.sampler.set_phase(degrees.to_radians());
                self.note_setter("phase", applied);
            }
            Command::SetInterval { interval_ms } => {
                self.sampler.set_interval(interval_ms);
                if self.sampler.is_running() {
                    self.next_tick = Some(Instant::now() + self.sampler.interval());
                }
                debug!("interval set to {} ms", interval_ms);
            }
            Command::Shutdown => {}
        }
    }

    fn note_setter(&self, name: &str, applied: bool) {
        if applied {
            debug!("{} updated", name);
        } else {
            self.metrics.record_ignored();
            debug!("{} change ignored: generation never started", name);
        }
    }

    fn on_timer(&mut self, deadline: Instant) {
        match self.sampler.tick(&mut self.sink) {
            Ok(Some(tick)) => {
                self.metrics.record_tick();
                if tick.evicted.is_some() {
                    self.metrics.record_eviction();
                }
                let now = Instant::now();
                let next = deadline + self.sampler.interval();
                self.next_tick = Some(if next > now {
                    next
                } else {
                    now + self.sampler.interval()
                });
            }
            Ok(None) => self.next_tick = None,
            Err(err) => {
                error!("tick failed, stopping generation: {}", err);
                self.sampler.stop();
                self.next_tick = None;
            }
        }
    }

    fn publish(&self) {
        self.snapshots
            .send_replace(SeriesSnapshot::capture(&self.sampler, self.metrics.snapshot()));
    }
}
