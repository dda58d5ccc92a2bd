use serde::{Deserialize, Serialize};

/// Instantaneous WPM at `t` seconds after the test started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub t: f64,
    pub wpm: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: f64, wpm: f64) -> Self {
        Self { t, wpm }
    }
}

impl From<TimeSeriesPoint> for (f64, f64) {
    fn from(p: TimeSeriesPoint) -> Self {
        (p.t, p.wpm)
    }
}

/// Append-only WPM samples, one per typed-buffer mutation.
///
/// Only the owning session appends; everything else reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WpmHistory {
    points: Vec<TimeSeriesPoint>,
}

impl WpmHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, t: f64, wpm: f64) {
        self.points.push(TimeSeriesPoint::new(t, wpm));
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn wpm_values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.wpm).collect()
    }

    /// Points as `(t, wpm)` pairs, the shape ratatui charts take.
    pub fn as_tuples(&self) -> Vec<(f64, f64)> {
        self.points.iter().copied().map(Into::into).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<f64> for WpmHistory {
    /// Builds a history from bare WPM values spaced one second apart.
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let points = iter
            .into_iter()
            .enumerate()
            .map(|(i, wpm)| TimeSeriesPoint::new(i as f64, wpm))
            .collect();
        Self { points }
    }
}
