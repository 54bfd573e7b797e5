use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::math::stats::StatsHelper;
use crate::prelude::{SignalError, SignalResult};

/// One evaluated point of the waveform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Inclusive `(first, last)` bounds along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub start: f64,
    pub end: f64,
}

/// Time-ordered rolling series that never grows past its capacity.
///
/// Pushing onto a full buffer evicts exactly one sample from the head.
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SeriesBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `sample` and returns the evicted head, if any.
    pub fn push(&mut self, sample: Sample) -> SignalResult<Option<Sample>> {
        if let Some(last) = self.samples.back() {
            if sample.time <= last.time {
                return Err(SignalError::OutOfOrder {
                    previous: last.time,
                    next: sample.time,
                });
            }
        }

        let evicted = if self.samples.len() == self.capacity {
            self.samples.pop_front()
        } else {
            None
        };
        self.samples.push_back(sample);
        Ok(evicted)
    }

    /// Time span covered by the buffer, `None` while empty.
    pub fn range(&self) -> Option<Extent> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;
        Some(Extent {
            start: first.time,
            end: last.time,
        })
    }

    /// Smallest and largest value in the buffer, `None` while empty.
    pub fn value_extent(&self) -> Option<Extent> {
        if self.samples.is_empty() {
            return None;
        }
        let (start, end) = StatsHelper::extent(self.samples.iter().map(|s| s.value));
        Some(Extent { start, end })
    }

    pub fn rms(&self) -> f64 {
        let values: Vec<f64> = self.samples.iter().map(|s| s.value).collect();
        StatsHelper::rms(&values)
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
