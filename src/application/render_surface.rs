// Rendering surface capability
use crate::domain::interaction::AxisMode;
use crate::domain::series::Series;
use crate::domain::time_window::TimeWindow;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Vertical axis range in watts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }
}

impl From<[f64; 2]> for ValueRange {
    fn from([min, max]: [f64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<ValueRange> for [f64; 2] {
    fn from(range: ValueRange) -> Self {
        [range.min, range.max]
    }
}

/// Axis configuration sent with every draw. A `None` range leaves whatever
/// the user panned or zoomed to in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub x_range: Option<TimeWindow>,
    pub y_range: Option<ValueRange>,
    pub x_fixed: bool,
    pub y_fixed: bool,
}

/// Data and layout applied together in one redraw. Frames drawn between two
/// data changes share the same series snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub revision: u64,
    pub series: Arc<[Series]>,
    pub layout: Layout,
}

/// Indicators drawn next to the chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ViewStatus {
    pub loading: bool,
    pub error: Option<String>,
    pub auto_update: bool,
    pub mode: AxisMode,
}

/// Any charting backend that can draw frames and report its current axes.
pub trait RenderSurface: Send {
    /// Initial draw.
    fn render(&mut self, frame: Frame);

    /// Incremental redraw. Must keep user pan/zoom for axes whose layout range
    /// is `None`.
    fn update(&mut self, frame: Frame);

    /// Currently rendered horizontal range, which may differ from the last
    /// one set if the user navigated. `None` until the chart has reported one,
    /// in which case the view pins the extent of the loaded data instead.
    fn visible_window(&self) -> Option<TimeWindow>;

    /// Currently rendered vertical range.
    fn value_range(&self) -> Option<ValueRange>;

    fn show_status(&mut self, status: &ViewStatus);
}
