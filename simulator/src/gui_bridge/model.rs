use serde::{Deserialize, Serialize};
use sinecore::engine::SeriesSnapshot;
use sinecore::telemetry::log::format_sample;

/// Number of trailing samples rendered as log lines for the GUI.
pub const LOG_TAIL: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VisualizationModel {
    #[serde(flatten)]
    pub snapshot: SeriesSnapshot,
    pub log: Vec<String>,
}

impl VisualizationModel {
    pub fn from_snapshot(snapshot: SeriesSnapshot) -> Self {
        let skip = snapshot.samples.len().saturating_sub(LOG_TAIL);
        let log = snapshot.samples[skip..].iter().map(format_sample).collect();
        Self { snapshot, log }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sinecore::signal::Sample;

    #[test]
    fn log_tail_keeps_latest_lines() {
        let snapshot = SeriesSnapshot {
            samples: (0..80).map(|i| Sample::new(i as f64, 1.0)).collect(),
            ..Default::default()
        };
        let model = VisualizationModel::from_snapshot(snapshot);
        assert_eq!(model.log.len(), LOG_TAIL);
        assert_eq!(model.log.last().unwrap(), "time: 79 | value: 1");
    }
}
