// Frame publisher - Render surface backed by a remote chart client
use crate::application::render_surface::{Frame, RenderSurface, ValueRange, ViewStatus};
use crate::domain::time_window::TimeWindow;
use futures::stream::{Stream, StreamExt};
use serde::Serialize;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Axis ranges as currently drawn by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RenderedRanges {
    x: Option<TimeWindow>,
    y: Option<ValueRange>,
}

/// Message pushed to chart clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ViewMessage {
    Frame(Frame),
    Status(ViewStatus),
}

/// Latest state a newly connected client needs to draw the chart.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub frame: Option<Frame>,
    pub status: ViewStatus,
}

/// [`RenderSurface`] that publishes every draw to subscribed clients and
/// learns the user's pan/zoom from their relayout reports.
pub struct FramePublisher {
    frames: watch::Sender<Option<Frame>>,
    status: watch::Sender<ViewStatus>,
    ranges: Arc<RwLock<RenderedRanges>>,
}

impl FramePublisher {
    pub fn new() -> Self {
        let (frames, _) = watch::channel(None);
        let (status, _) = watch::channel(ViewStatus::default());
        Self {
            frames,
            status,
            ranges: Arc::new(RwLock::new(RenderedRanges::default())),
        }
    }

    pub fn feed(&self) -> ViewFeed {
        ViewFeed {
            frames: self.frames.subscribe(),
            status: self.status.subscribe(),
            ranges: self.ranges.clone(),
        }
    }

    fn publish(&mut self, frame: Frame) {
        if let Ok(mut ranges) = self.ranges.write() {
            if let Some(x) = frame.layout.x_range {
                ranges.x = Some(x);
            }
            if let Some(y) = frame.layout.y_range {
                ranges.y = Some(y);
            }
        }
        self.frames.send_replace(Some(frame));
    }

    fn ranges(&self) -> RenderedRanges {
        self.ranges.read().map(|r| *r).unwrap_or_default()
    }
}

impl Default for FramePublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for FramePublisher {
    fn render(&mut self, frame: Frame) {
        tracing::debug!("Initial frame with {} series", frame.series.len());
        self.publish(frame);
    }

    fn update(&mut self, frame: Frame) {
        self.publish(frame);
    }

    fn visible_window(&self) -> Option<TimeWindow> {
        self.ranges().x
    }

    fn value_range(&self) -> Option<ValueRange> {
        self.ranges().y
    }

    fn show_status(&mut self, status: &ViewStatus) {
        self.status.send_if_modified(|current| {
            if current == status {
                return false;
            }
            *current = status.clone();
            true
        });
    }
}

/// Client-side view of a [`FramePublisher`].
#[derive(Clone)]
pub struct ViewFeed {
    frames: watch::Receiver<Option<Frame>>,
    status: watch::Receiver<ViewStatus>,
    ranges: Arc<RwLock<RenderedRanges>>,
}

impl ViewFeed {
    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            frame: self.frames.borrow().clone(),
            status: self.status.borrow().clone(),
        }
    }

    /// Current frame and status first, then every change.
    pub fn messages(&self) -> impl Stream<Item = ViewMessage> + Send + 'static {
        let frames = WatchStream::new(self.frames.clone())
            .filter_map(|frame| async move { frame.map(ViewMessage::Frame) });
        let status = WatchStream::new(self.status.clone()).map(ViewMessage::Status);
        futures::stream::select(frames, status)
    }

    /// The client drew new axis ranges after the user panned or zoomed. Axes
    /// left out keep their previous range.
    pub fn report_relayout(&self, x: Option<TimeWindow>, y: Option<ValueRange>) {
        match self.ranges.write() {
            Ok(mut ranges) => {
                if x.is_some() {
                    ranges.x = x;
                }
                if y.is_some() {
                    ranges.y = y;
                }
            }
            Err(e) => tracing::error!("Rendered ranges lock poisoned: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::render_surface::Layout;
    use crate::domain::series::Series;

    fn frame(revision: u64, x_range: Option<TimeWindow>) -> Frame {
        Frame {
            revision,
            series: vec![Series::new("power", vec![1, 2], vec![3.0, 4.0])].into(),
            layout: Layout {
                x_range,
                y_range: None,
                x_fixed: false,
                y_fixed: true,
            },
        }
    }

    #[test]
    fn test_explicit_range_becomes_visible_window() {
        let mut publisher = FramePublisher::new();
        let window = TimeWindow::new(0, 10).unwrap();
        publisher.render(frame(1, Some(window)));
        assert_eq!(publisher.visible_window(), Some(window));

        publisher.update(frame(2, None));
        assert_eq!(publisher.visible_window(), Some(window));
        assert_eq!(publisher.feed().snapshot().frame.unwrap().revision, 2);
    }

    #[test]
    fn test_relayout_report_overrides_last_set_range() {
        let mut publisher = FramePublisher::new();
        let feed = publisher.feed();
        publisher.render(frame(1, Some(TimeWindow::new(0, 10).unwrap())));

        let panned = TimeWindow::new(-50, -40).unwrap();
        feed.report_relayout(Some(panned), Some(ValueRange::new(0.0, 5.0)));
        assert_eq!(publisher.visible_window(), Some(panned));
        assert_eq!(publisher.value_range(), Some(ValueRange::new(0.0, 5.0)));

        feed.report_relayout(None, None);
        assert_eq!(publisher.visible_window(), Some(panned));
    }

    #[tokio::test]
    async fn test_messages_start_with_current_state() {
        let mut publisher = FramePublisher::new();
        publisher.render(frame(1, None));
        let status = ViewStatus {
            loading: true,
            ..ViewStatus::default()
        };
        publisher.show_status(&status);

        let mut messages: Vec<_> = publisher.feed().messages().take(2).collect().await;
        messages.sort_by_key(|m| matches!(m, ViewMessage::Status(_)));
        assert_eq!(messages[0], ViewMessage::Frame(frame(1, None)));
        assert_eq!(messages[1], ViewMessage::Status(status));
    }

    #[test]
    fn test_message_wire_format() {
        let json = serde_json::to_value(ViewMessage::Frame(frame(7, Some(TimeWindow::new(1, 2).unwrap())))).unwrap();
        assert_eq!(json["type"], "frame");
        assert_eq!(json["data"]["revision"], 7);
        assert_eq!(json["data"]["layout"]["x_range"], serde_json::json!([1, 2]));
        assert_eq!(json["data"]["series"][0]["timestamps"], serde_json::json!([1, 2]));
    }
}
