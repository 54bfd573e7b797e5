use iced::{
    mouse, time,
    widget::{
        button,
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, scrollable, text, text_input, Column, Container,
    },
    Alignment, Color, Element, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use serde::Deserialize;
use sinecore::engine::Command;
use sinecore::prelude::{ParameterBounds, StartRequest, DEFAULT_INTERVAL_MS};
use sinecore::signal::{Extent, Sample};
use std::time::Duration;

const BRIDGE_URL: &str = "http://127.0.0.1:9000";

fn main() -> iced::Result {
    iced::application(Visualizer::boot, Visualizer::update, Visualizer::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Visualizer) -> String {
    "Sine Generator".into()
}

fn application_subscription(_: &Visualizer) -> Subscription<Message> {
    time::every(Duration::from_millis(200)).map(|_| Message::Tick)
}

fn application_theme(_: &Visualizer) -> Theme {
    Theme::Dark
}

#[derive(Debug)]
struct Visualizer {
    form: ParameterForm,
    payload: Option<SeriesPayload>,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    SeriesFetched(Result<SeriesPayload, String>),
    FieldChanged(Field, String),
    Start,
    Stop,
    ControlSent(Result<String, String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Amplitude,
    Frequency,
    Phase,
    Interval,
}

impl Visualizer {
    fn boot() -> (Self, Task<Message>) {
        (
            Visualizer {
                form: ParameterForm::default(),
                payload: None,
                status: "Waiting for generator...".into(),
                history: Vec::new(),
            },
            Task::perform(fetch_series(), Message::SeriesFetched),
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => Task::perform(fetch_series(), Message::SeriesFetched),
            Message::SeriesFetched(Ok(payload)) => {
                state.status = if payload.running {
                    format!(
                        "Running: {} samples, t = {:.4}",
                        payload.samples.len(),
                        payload.clock
                    )
                } else {
                    "Stopped".into()
                };
                state.payload = Some(payload);
                Task::none()
            }
            Message::SeriesFetched(Err(err)) => {
                state.status = format!("Bridge error: {err}");
                Task::none()
            }
            Message::FieldChanged(field, value) => {
                state.form.update_field(field, value);
                match state.form.change_command(field) {
                    Ok(command) => Task::perform(post_command(command), Message::ControlSent),
                    Err(err) => {
                        state.status = err;
                        Task::none()
                    }
                }
            }
            Message::Start => match state.form.start_request() {
                Ok(request) => {
                    state.push_history(format!(
                        "Start: A={} F={} Hz P={} deg every {} ms",
                        request.amplitude,
                        request.frequency,
                        request.phase_degrees,
                        request.interval_ms
                    ));
                    Task::perform(post_command(Command::Start(request)), Message::ControlSent)
                }
                Err(err) => {
                    state.status = err;
                    Task::none()
                }
            },
            Message::Stop => {
                state.push_history("Stop".into());
                Task::perform(post_command(Command::Stop), Message::ControlSent)
            }
            Message::ControlSent(Ok(message)) => {
                state.status = message;
                Task::none()
            }
            Message::ControlSent(Err(err)) => {
                state.status = format!("Control error: {err}");
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let control_column = column![
            text("Parameters").size(26),
            text("Amplitude (0-100)").size(14),
            text_input("Amplitude", &state.form.amplitude)
                .on_input(|value| Message::FieldChanged(Field::Amplitude, value))
                .padding(6),
            text("Frequency (1-1000 Hz)").size(14),
            text_input("Frequency", &state.form.frequency)
                .on_input(|value| Message::FieldChanged(Field::Frequency, value))
                .padding(6),
            text("Phase (0-360 deg)").size(14),
            text_input("Phase", &state.form.phase)
                .on_input(|value| Message::FieldChanged(Field::Phase, value))
                .padding(6),
            text("Interval (100-10000 ms)").size(14),
            text_input("Interval", &state.form.interval)
                .on_input(|value| Message::FieldChanged(Field::Interval, value))
                .padding(6),
            row![
                button("Start").on_press(Message::Start).padding(10),
                button("Stop").on_press(Message::Stop).padding(10),
            ]
            .spacing(10),
            text(&state.status).size(14),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(300.0));

        let (samples, range, value_extent, log) = match &state.payload {
            Some(payload) => (
                payload.samples.clone(),
                payload.range,
                payload.value_extent,
                payload.log.clone(),
            ),
            None => (Vec::new(), None, None, Vec::new()),
        };

        let axis_label = match range {
            Some(range) => format!("Time (s): {:.4} .. {:.4}", range.start, range.end),
            None => "Time (s): no samples".into(),
        };

        let plot = Canvas::new(Waveform::new(samples, range, value_extent))
            .width(Length::Fill)
            .height(Length::Fixed(300.0));

        let log_list = if log.is_empty() {
            Column::new().push(text("No samples yet").size(12))
        } else {
            log.iter()
                .rev()
                .fold(Column::new().spacing(2), |col, line| {
                    col.push(text(line.clone()).size(12))
                })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let signal_column = column![
            text("Signal").size(26),
            plot,
            text(axis_label).size(14),
            text("Sample log").size(16),
            Container::new(scrollable(log_list).height(Length::Fixed(180.0))).padding(6),
            text("Activity").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![control_column, signal_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_series() -> Result<SeriesPayload, String> {
    let response = reqwest::get(format!("{BRIDGE_URL}/series"))
        .await
        .map_err(|e| e.to_string())?;
    response
        .json::<SeriesPayload>()
        .await
        .map_err(|e| e.to_string())
}

async fn post_command(command: Command) -> Result<String, String> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{BRIDGE_URL}/control"))
        .json(&command)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.status().is_success() {
        Ok("Command accepted".into())
    } else {
        let status = response.status();
        let text = response.text().await.unwrap_or_else(|_| "".into());
        Err(format!("{}: {}", status, text))
    }
}

/// Raw text of the parameter inputs; parsed and range-checked before anything
/// is sent to the generator.
#[derive(Debug, Clone)]
struct ParameterForm {
    amplitude: String,
    frequency: String,
    phase: String,
    interval: String,
    bounds: ParameterBounds,
}

impl Default for ParameterForm {
    fn default() -> Self {
        Self {
            amplitude: "50".into(),
            frequency: "10".into(),
            phase: "0".into(),
            interval: DEFAULT_INTERVAL_MS.to_string(),
            bounds: ParameterBounds::default(),
        }
    }
}

impl ParameterForm {
    fn update_field(&mut self, field: Field, value: String) {
        match field {
            Field::Amplitude => self.amplitude = value,
            Field::Frequency => self.frequency = value,
            Field::Phase => self.phase = value,
            Field::Interval => self.interval = value,
        }
    }

    fn amplitude(&self) -> Result<f64, String> {
        let value = parse_field("amplitude", &self.amplitude)?;
        self.bounds.check_amplitude(value).map_err(|e| e.to_string())
    }

    fn frequency(&self) -> Result<f64, String> {
        let value = parse_field("frequency", &self.frequency)?;
        self.bounds.check_frequency(value).map_err(|e| e.to_string())
    }

    fn phase(&self) -> Result<f64, String> {
        let value = parse_field("phase", &self.phase)?;
        self.bounds
            .check_phase_degrees(value)
            .map_err(|e| e.to_string())
    }

    fn interval(&self) -> Result<u64, String> {
        let value = self
            .interval
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("interval: '{}' is not a whole number", self.interval))?;
        self.bounds.check_interval(value).map_err(|e| e.to_string())
    }

    fn change_command(&self, field: Field) -> Result<Command, String> {
        Ok(match field {
            Field::Amplitude => Command::SetAmplitude {
                value: self.amplitude()?,
            },
            Field::Frequency => Command::SetFrequency {
                value: self.frequency()?,
            },
            Field::Phase => Command::SetPhase {
                degrees: self.phase()?,
            },
            Field::Interval => Command::SetInterval {
                interval_ms: self.interval()?,
            },
        })
    }

    fn start_request(&self) -> Result<StartRequest, String> {
        Ok(StartRequest {
            amplitude: self.amplitude()?,
            frequency: self.frequency()?,
            phase_degrees: self.phase()?,
            interval_ms: self.interval()?,
        })
    }
}

fn parse_field(name: &str, raw: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("{name}: '{raw}' is not a number"))
}

#[derive(Debug, Clone, Deserialize)]
struct SeriesPayload {
    #[serde(default)]
    running: bool,
    #[serde(default)]
    clock: f64,
    #[serde(default)]
    samples: Vec<Sample>,
    #[serde(default)]
    range: Option<Extent>,
    #[serde(default)]
    value_extent: Option<Extent>,
    #[serde(default)]
    log: Vec<String>,
}

/// Plots the series with the x axis fitted to the buffer's time range.
#[derive(Clone)]
struct Waveform {
    samples: Vec<Sample>,
    range: Option<Extent>,
    value_extent: Option<Extent>,
}

impl Waveform {
    fn new(samples: Vec<Sample>, range: Option<Extent>, value_extent: Option<Extent>) -> Self {
        Self {
            samples,
            range,
            value_extent,
        }
    }

    /// Y bounds: the value extent widened to at least [-1, 1].
    fn y_bounds(&self) -> (f64, f64) {
        match self.value_extent {
            Some(extent) => (extent.start.min(-1.0), extent.end.max(1.0)),
            None => (-1.0, 1.0),
        }
    }
}

impl canvas::Program<Message> for Waveform {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            Color::from_rgb(0.05, 0.05, 0.05),
        );

        let (y_min, y_max) = self.y_bounds();
        let to_y = |value: f64| {
            let normalized = (value - y_min) / (y_max - y_min);
            bounds.height - normalized as f32 * bounds.height
        };

        let zero_line = Path::new(|builder| {
            builder.move_to(Point::new(0.0, to_y(0.0)));
            builder.line_to(Point::new(bounds.width, to_y(0.0)));
        });
        frame.stroke(
            &zero_line,
            Stroke::default()
                .with_color(Color::from_rgb(0.35, 0.35, 0.45))
                .with_width(1.0),
        );

        if let (Some(range), true) = (self.range, self.samples.len() > 1) {
            let span = (range.end - range.start).max(f64::EPSILON);
            let path = Path::new(|builder| {
                for (i, sample) in self.samples.iter().enumerate() {
                    let x = ((sample.time - range.start) / span) as f32 * bounds.width;
                    let point = Point::new(x, to_y(sample.value));
                    if i == 0 {
                        builder.move_to(point);
                    } else {
                        builder.line_to(point);
                    }
                }
            });

            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(2.0)
                    .with_color(Color::from_rgb(0.18, 0.72, 0.89)),
            );
        }

        vec![frame.into_geometry()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_builds_start_request_from_text() {
        let form = ParameterForm::default();
        let request = form.start_request().unwrap();
        assert_eq!(request.amplitude, 50.0);
        assert_eq!(request.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn form_rejects_unparsable_or_out_of_range_input() {
        let mut form = ParameterForm::default();
        form.update_field(Field::Frequency, "abc".into());
        assert!(form.change_command(Field::Frequency).is_err());

        form.update_field(Field::Phase, "720".into());
        assert!(form.change_command(Field::Phase).is_err());

        form.update_field(Field::Amplitude, " 25 ".into());
        assert_eq!(
            form.change_command(Field::Amplitude),
            Ok(Command::SetAmplitude { value: 25.0 })
        );
    }

    #[test]
    fn payload_parses_bridge_response() {
        let payload: SeriesPayload = serde_json::from_str(
            r#"{"running":true,"clock":0.0002,"samples":[{"time":0.0,"value":0.0},{"time":0.0001,"value":0.3}],
                "range":{"start":0.0,"end":0.0001},"log":["time: 0 | value: 0"]}"#,
        )
        .unwrap();
        assert!(payload.running);
        assert_eq!(payload.samples.len(), 2);
        assert!(payload.value_extent.is_none());
    }

    #[test]
    fn y_bounds_are_at_least_unit_wide() {
        let flat = Waveform::new(Vec::new(), None, Some(Extent { start: 0.0, end: 0.0 }));
        assert_eq!(flat.y_bounds(), (-1.0, 1.0));
        let wide = Waveform::new(Vec::new(), None, Some(Extent { start: -50.0, end: 40.0 }));
        assert_eq!(wide.y_bounds(), (-50.0, 40.0));
    }
}
