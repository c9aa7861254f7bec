// Auto-pan controller - keeps the viewport glued to the live edge
use crate::domain::series::Timestamp;
use crate::domain::time_window::TimeWindow;

/// The previous latest point counts as "on screen" up to this fraction.
const INTEREST_TOLERANCE: f64 = 1.001;
/// New data past this fraction of the window triggers a pan, and the latest
/// point lands here afterwards.
const LIVE_EDGE_FRACTION: f64 = 0.95;

#[derive(Debug, Clone, Copy)]
pub struct AutoPanController {
    interest_tolerance: f64,
    live_edge_fraction: f64,
}

impl Default for AutoPanController {
    fn default() -> Self {
        Self {
            interest_tolerance: INTEREST_TOLERANCE,
            live_edge_fraction: LIVE_EDGE_FRACTION,
        }
    }
}

impl AutoPanController {
    /// Decide whether the visible window should follow newly merged data.
    ///
    /// The window only moves when auto-update is on, the viewer was already
    /// watching the live edge (`old_latest` at or before the right edge) and
    /// the new data reached the last 5% of the window. The result keeps the
    /// window width and places `new_latest` at the 95% mark. Returns `None`
    /// for "leave the window alone".
    pub fn evaluate(
        &self,
        auto_updating: bool,
        old_latest: Option<Timestamp>,
        new_latest: Option<Timestamp>,
        visible: &TimeWindow,
    ) -> Option<TimeWindow> {
        if !auto_updating {
            return None;
        }
        let (old_latest, new_latest) = (old_latest?, new_latest?);
        let width = visible.width();
        if width <= 0 {
            return None;
        }

        let interested = visible.contains_fraction(old_latest) <= self.interest_tolerance;
        let needed = visible.contains_fraction(new_latest) >= self.live_edge_fraction;
        if !(interested && needed) {
            return None;
        }

        let start = (new_latest as f64 - self.live_edge_fraction * width as f64).round() as Timestamp;
        let delta = start.checked_sub(visible.start())?;
        if delta <= 0 {
            return None;
        }
        visible.shifted_by(delta).ok()
    }
}
