// Error taxonomy for the live view
use thiserror::Error;

use super::series::Timestamp;

#[derive(Debug, Error)]
pub enum ViewError {
    /// The data source could not deliver a refresh. The view keeps its last
    /// good series and window.
    #[error("Failed to load data.")]
    FetchFailed(#[source] anyhow::Error),

    #[error("invalid time range: start {start} must be before end {end}")]
    InvalidRange { start: Timestamp, end: Timestamp },
}

impl ViewError {
    /// Message shown inline next to the chart.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;
