// Power series domain models
use serde::Serialize;
use std::sync::Arc;

/// Epoch milliseconds.
pub type Timestamp = i64;

/// One tracked metric as parallel arrays. Equal lengths and non-decreasing
/// timestamps are guaranteed by the data source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub timestamps: Vec<Timestamp>,
    pub values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, timestamps: Vec<Timestamp>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            timestamps,
            values,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.timestamps.last().copied()
    }
}

/// Displayed series, in display order.
#[derive(Debug, Clone, Default)]
pub struct SeriesBuffer {
    series: Vec<Series>,
    // Dropped on every change.
    shared: Option<Arc<[Series]>>,
}

impl SeriesBuffer {
    /// Seed the buffer with empty traces for every tracked metric.
    pub fn with_tracked<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            series: names.into_iter().map(Series::empty).collect(),
            shared: None,
        }
    }

    pub fn replace(&mut self, name: &str, timestamps: Vec<Timestamp>, values: Vec<f64>) {
        self.shared = None;
        match self.series.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                existing.timestamps = timestamps;
                existing.values = values;
            }
            None => self.series.push(Series::new(name, timestamps, values)),
        }
    }

    /// Swap in every metric of one refresh. Tracked metrics missing from the
    /// refresh are cleared, since the fetched range replaces the old one.
    pub fn replace_all(&mut self, fetched: Vec<Series>) {
        self.shared = None;
        for existing in &mut self.series {
            existing.timestamps.clear();
            existing.values.clear();
        }
        for s in fetched {
            self.replace(&s.name, s.timestamps, s.values);
        }
    }

    /// Smallest first timestamp across all metrics.
    pub fn earliest(&self) -> Option<Timestamp> {
        self.series.iter().filter_map(|s| s.timestamps.first().copied()).min()
    }

    /// Largest last timestamp across all metrics, `None` while there is no
    /// data at all.
    pub fn latest(&self) -> Option<Timestamp> {
        self.series.iter().filter_map(Series::last_timestamp).max()
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Read-only copy of the current series for the surface. Copied once per
    /// data change and shared until the next one.
    pub fn snapshot(&mut self) -> Arc<[Series]> {
        let series = &self.series;
        self.shared.get_or_insert_with(|| series.as_slice().into()).clone()
    }
}
