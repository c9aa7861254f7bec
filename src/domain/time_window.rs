// Time window domain model
use serde::{Deserialize, Serialize};

use super::error::{Result, ViewError};
use super::series::Timestamp;

/// A visible or requested time range in epoch milliseconds, `start < end`.
/// The width `end - start` always fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Timestamp; 2]", into = "[Timestamp; 2]")]
pub struct TimeWindow {
    start: Timestamp,
    end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self> {
        match end.checked_sub(start) {
            Some(width) if width > 0 => Ok(Self { start, end }),
            _ => Err(ViewError::InvalidRange { start, end }),
        }
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn width(&self) -> i64 {
        self.end - self.start
    }

    /// Fails when either bound would leave the `i64` range.
    pub fn shifted_by(&self, delta_ms: i64) -> Result<Self> {
        match (self.start.checked_add(delta_ms), self.end.checked_add(delta_ms)) {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(ViewError::InvalidRange {
                start: self.start.saturating_add(delta_ms),
                end: self.end.saturating_add(delta_ms),
            }),
        }
    }

    /// Position of `t` relative to the window: 0.0 at `start`, 1.0 at `end`.
    /// Points outside the window fall outside `[0, 1]`.
    pub fn contains_fraction(&self, t: Timestamp) -> f64 {
        (i128::from(t) - i128::from(self.start)) as f64 / self.width() as f64
    }
}

/// Backward-looking range selector steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RangePreset {
    #[serde(rename = "1h")]
    LastHour,
    #[serde(rename = "1d")]
    LastDay,
}

impl RangePreset {
    pub fn duration_ms(self) -> i64 {
        match self {
            RangePreset::LastHour => 60 * 60 * 1000,
            RangePreset::LastDay => 24 * 60 * 60 * 1000,
        }
    }

    /// The window of this length that ends at `end`, clipped at the
    /// earliest representable instant.
    pub fn window_ending_at(self, end: Timestamp) -> Result<TimeWindow> {
        TimeWindow::new(end.saturating_sub(self.duration_ms()), end)
    }
}

impl TryFrom<[Timestamp; 2]> for TimeWindow {
    type Error = ViewError;

    fn try_from([start, end]: [Timestamp; 2]) -> Result<Self> {
        Self::new(start, end)
    }
}

impl From<TimeWindow> for [Timestamp; 2] {
    fn from(window: TimeWindow) -> Self {
        [window.start, window.end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_degenerate_windows() {
        assert!(matches!(
            TimeWindow::new(10, 10),
            Err(ViewError::InvalidRange { start: 10, end: 10 })
        ));
        assert!(TimeWindow::new(20, 10).is_err());
    }

    #[test]
    fn test_rejects_windows_wider_than_i64() {
        assert!(TimeWindow::new(i64::MIN, i64::MAX).is_err());
        assert!(serde_json::from_str::<TimeWindow>("[-9223372036854775808, 9223372036854775807]").is_err());

        let widest = TimeWindow::new(i64::MIN, -1).unwrap();
        assert_eq!(widest.width(), i64::MAX);
        assert_eq!(widest.contains_fraction(i64::MAX), 2.0);
    }

    #[test]
    fn test_shift_past_i64_bounds_fails() {
        let window = TimeWindow::new(i64::MAX - 10, i64::MAX).unwrap();
        assert!(window.shifted_by(11).is_err());
        assert!(window.shifted_by(-10).is_ok());

        let early = RangePreset::LastDay.window_ending_at(i64::MIN + 5).unwrap();
        assert_eq!(early.start(), i64::MIN);
        assert!(RangePreset::LastHour.window_ending_at(i64::MIN).is_err());
    }

    #[test]
    fn test_width_and_shift() {
        for (start, end, delta) in [(0, 1, 5), (-500, 500, -250), (1_700_000_000_000, 1_700_000_060_000, 1000)] {
            let window = TimeWindow::new(start, end).unwrap();
            assert!(window.width() > 0);

            let shifted = window.shifted_by(delta).unwrap();
            assert_eq!(shifted.start(), start + delta);
            assert_eq!(shifted.width(), window.width());
        }
    }

    #[test]
    fn test_contains_fraction_may_leave_unit_interval() {
        let window = TimeWindow::new(0, 1000).unwrap();
        assert_eq!(window.contains_fraction(960), 0.96);
        assert_eq!(window.contains_fraction(1500), 1.5);
        assert_eq!(window.contains_fraction(-1000), -1.0);
    }

    #[test]
    fn test_range_preset_steps_backward_from_end() {
        let window = RangePreset::LastHour.window_ending_at(10_000_000).unwrap();
        assert_eq!(window.end(), 10_000_000);
        assert_eq!(window.width(), 3_600_000);

        let preset: RangePreset = serde_json::from_str("\"1d\"").unwrap();
        assert_eq!(preset, RangePreset::LastDay);
    }

    #[test]
    fn test_deserialize_rejects_inverted_pair() {
        let window: TimeWindow = serde_json::from_str("[5, 9]").unwrap();
        assert_eq!(window.width(), 4);
        assert!(serde_json::from_str::<TimeWindow>("[9, 5]").is_err());
    }
}
