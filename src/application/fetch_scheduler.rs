// Fetch scheduler - Chooses refresh ranges and orders their responses
use crate::application::data_source::{FetchRequest, PowerDataSource};
use crate::domain::error::ViewError;
use crate::domain::series::Series;
use crate::domain::time_window::TimeWindow;
use std::sync::Arc;

/// One request handed to the data source, tagged with its issue order.
pub struct IssuedFetch {
    pub seq: u64,
    pub request: FetchRequest,
    source: Arc<dyn PowerDataSource>,
}

impl IssuedFetch {
    pub async fn run(self) -> FetchReport {
        tracing::debug!("Fetch #{} started: {:?}", self.seq, self.request);
        let outcome = self
            .source
            .fetch(self.request)
            .await
            .map_err(ViewError::FetchFailed);

        FetchReport {
            seq: self.seq,
            request: self.request,
            outcome,
        }
    }
}

/// A completed fetch, successful or not.
#[derive(Debug)]
pub struct FetchReport {
    pub seq: u64,
    pub request: FetchRequest,
    pub outcome: Result<Vec<Series>, ViewError>,
}

pub struct FetchScheduler {
    source: Arc<dyn PowerDataSource>,
    next_seq: u64,
    last_accepted: Option<u64>,
}

impl FetchScheduler {
    pub fn new(source: Arc<dyn PowerDataSource>) -> Self {
        Self {
            source,
            next_seq: 0,
            last_accepted: None,
        }
    }

    /// Range for the next refresh. Without a window yet the backend default is
    /// used; while auto-updating the upper bound is left open so the freshest
    /// point always comes back; otherwise the window is requested as-is.
    pub fn plan(current: Option<TimeWindow>, auto_updating: bool) -> FetchRequest {
        match current {
            None => FetchRequest::Default,
            Some(window) if auto_updating => FetchRequest::Since(window.start()),
            Some(window) => FetchRequest::Between(window),
        }
    }

    pub fn issue(&mut self, current: Option<TimeWindow>, auto_updating: bool) -> IssuedFetch {
        let seq = self.next_seq;
        self.next_seq += 1;

        IssuedFetch {
            seq,
            request: Self::plan(current, auto_updating),
            source: self.source.clone(),
        }
    }

    /// Sequence of the most recently issued fetch.
    pub fn newest_issued(&self) -> Option<u64> {
        self.next_seq.checked_sub(1)
    }

    /// Admit a completed fetch only if nothing issued after it has completed
    /// already. Failed reports count too, so an older success cannot land
    /// after a newer failure.
    pub fn accept(&mut self, seq: u64) -> bool {
        if self.last_accepted.is_some_and(|last| seq <= last) {
            return false;
        }
        self.last_accepted = Some(seq);
        true
    }
}
