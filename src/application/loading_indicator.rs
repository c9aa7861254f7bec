// Loading indicator - Minimum visible busy time for the refresh spinner
use std::time::Duration;
use tokio::time::Instant;

/// One full turn of the refresh button animation.
pub const MIN_SPIN: Duration = Duration::from_millis(500);

#[derive(Debug, Default)]
pub struct LoadingIndicator {
    active: Option<(u64, Instant)>,
}

impl LoadingIndicator {
    pub fn is_loading(&self) -> bool {
        self.active.is_some()
    }

    /// A fetch went out. The newest fetch owns the indicator.
    pub fn begin(&mut self, seq: u64, now: Instant) {
        self.active = Some((seq, now));
    }

    /// A fetch completed. For the newest fetch, returns how much longer the
    /// indicator has to stay up; older completions return `None`.
    pub fn finish(&self, seq: u64, now: Instant) -> Option<Duration> {
        match self.active {
            Some((active, started)) if active == seq => {
                Some(MIN_SPIN.saturating_sub(now.saturating_duration_since(started)))
            }
            _ => None,
        }
    }

    /// Clear the indicator if `seq` still owns it.
    pub fn settle(&mut self, seq: u64) -> bool {
        if self.active.is_some_and(|(active, _)| active == seq) {
            self.active = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_fetch_keeps_spinning() {
        let start = Instant::now();
        let mut indicator = LoadingIndicator::default();
        indicator.begin(0, start);

        let remaining = indicator.finish(0, start + Duration::from_millis(50)).unwrap();
        assert_eq!(remaining, Duration::from_millis(450));
        assert!(indicator.is_loading());

        assert!(indicator.settle(0));
        assert!(!indicator.is_loading());
    }

    #[test]
    fn test_slow_fetch_clears_immediately() {
        let start = Instant::now();
        let mut indicator = LoadingIndicator::default();
        indicator.begin(3, start);
        assert_eq!(
            indicator.finish(3, start + Duration::from_millis(600)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_newer_fetch_owns_indicator() {
        let start = Instant::now();
        let mut indicator = LoadingIndicator::default();
        indicator.begin(0, start);
        indicator.begin(1, start + Duration::from_millis(100));

        assert_eq!(indicator.finish(0, start + Duration::from_millis(200)), None);
        assert!(!indicator.settle(0));
        assert!(indicator.is_loading());
        assert_eq!(
            indicator.finish(1, start + Duration::from_millis(200)),
            Some(Duration::from_millis(400))
        );
    }
}
