// Data source trait for power series access
use crate::domain::series::{Series, Timestamp};
use crate::domain::time_window::TimeWindow;
use async_trait::async_trait;

/// Range asked of the data source on one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchRequest {
    /// Both bounds omitted, the backend picks its default range.
    Default,
    /// Only the lower bound, the backend returns everything up to now.
    Since(Timestamp),
    /// Exactly this window.
    Between(TimeWindow),
}

impl FetchRequest {
    /// Query bounds as `(start, end)`, `None` meaning omitted.
    pub fn bounds(&self) -> (Option<Timestamp>, Option<Timestamp>) {
        match self {
            FetchRequest::Default => (None, None),
            FetchRequest::Since(start) => (Some(*start), None),
            FetchRequest::Between(window) => (Some(window.start()), Some(window.end())),
        }
    }
}

#[async_trait]
pub trait PowerDataSource: Send + Sync {
    /// Fetch every tracked metric over the requested range. Fails on
    /// transport errors and non-success responses.
    async fn fetch(&self, request: FetchRequest) -> anyhow::Result<Vec<Series>>;
}
