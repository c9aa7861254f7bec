// Live view controller - Merges refreshes into the chart without fighting the user
use crate::application::auto_pan::AutoPanController;
use crate::application::data_source::PowerDataSource;
use crate::application::fetch_scheduler::{FetchReport, FetchScheduler, IssuedFetch};
use crate::application::loading_indicator::LoadingIndicator;
use crate::application::render_surface::{Frame, Layout, RenderSurface, ValueRange, ViewStatus};
use crate::domain::error::Result;
use crate::domain::interaction::AxisInteractionMode;
use crate::domain::series::{SeriesBuffer, Timestamp};
use crate::domain::time_window::{RangePreset, TimeWindow};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct LiveViewSettings {
    pub tracked_series: Vec<String>,
    pub y_range: ValueRange,
    pub gutter_width_px: f64,
    pub auto_update: bool,
}

/// Single-owner state of one chart view. Every method handles one event and
/// finishes with at most one draw on the surface.
pub struct LiveView<S: RenderSurface> {
    surface: S,
    buffer: SeriesBuffer,
    scheduler: FetchScheduler,
    auto_pan: AutoPanController,
    interaction: AxisInteractionMode,
    loading: LoadingIndicator,
    auto_updating: bool,
    default_y_range: ValueRange,
    window: Option<TimeWindow>,
    error: Option<String>,
    revision: u64,
    mounted: bool,
}

impl<S: RenderSurface> LiveView<S> {
    pub fn new(surface: S, source: Arc<dyn PowerDataSource>, settings: LiveViewSettings) -> Self {
        Self {
            surface,
            buffer: SeriesBuffer::with_tracked(settings.tracked_series),
            scheduler: FetchScheduler::new(source),
            auto_pan: AutoPanController::default(),
            interaction: AxisInteractionMode::new(settings.gutter_width_px),
            loading: LoadingIndicator::default(),
            auto_updating: settings.auto_update,
            default_y_range: settings.y_range,
            window: None,
            error: None,
            revision: 0,
            mounted: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn buffer(&self) -> &SeriesBuffer {
        &self.buffer
    }

    pub fn auto_updating(&self) -> bool {
        self.auto_updating
    }

    pub fn status(&self) -> ViewStatus {
        ViewStatus {
            loading: self.loading.is_loading(),
            error: self.error.clone(),
            auto_update: self.auto_updating,
            mode: self.interaction.mode(),
        }
    }

    /// Initial draw with empty traces and the default vertical range.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        let frame = self.frame(None, Some(self.default_y_range));
        self.surface.render(frame);
        self.mounted = true;
        self.publish_status();
    }

    /// The window the user is looking at right now, falling back to the last
    /// one this view set.
    pub fn current_window(&self) -> Option<TimeWindow> {
        self.surface.visible_window().or(self.window)
    }

    pub fn begin_refresh(&mut self, now: Instant) -> IssuedFetch {
        let issued = self
            .scheduler
            .issue(self.current_window(), self.auto_updating);
        self.loading.begin(issued.seq, now);
        self.publish_status();
        issued
    }

    /// Merge a completed fetch. Returns the delay after which
    /// [`settle_loading`](Self::settle_loading) has to be called for this
    /// fetch, if the indicator is still up.
    pub fn complete_refresh(&mut self, report: FetchReport, now: Instant) -> Option<Duration> {
        let seq = report.seq;
        let settle_after = self.loading.finish(seq, now);

        if !self.scheduler.accept(seq) {
            tracing::debug!("Dropping superseded fetch #{}", seq);
            return self.schedule_settle(seq, settle_after);
        }

        match report.outcome {
            Ok(series) => {
                let old_latest = self.buffer.latest();
                self.buffer.replace_all(series);
                let new_latest = self.buffer.latest();
                self.error = None;

                let panned = self.current_window().and_then(|visible| {
                    self.auto_pan
                        .evaluate(self.auto_updating, old_latest, new_latest, &visible)
                });
                if let Some(window) = panned {
                    tracing::debug!(
                        "Auto-pan to [{}, {}] for latest point {:?}",
                        window.start(),
                        window.end(),
                        new_latest
                    );
                    self.window = Some(window);
                }
                self.draw(panned, None);
            }
            Err(e) => {
                tracing::warn!("Fetch #{} for {:?} failed: {:?}", seq, report.request, e);
                self.error = Some(e.user_message());
            }
        }

        self.schedule_settle(seq, settle_after)
    }

    pub fn settle_loading(&mut self, seq: u64) {
        if self.loading.settle(seq) {
            self.publish_status();
        }
    }

    pub fn set_auto_update(&mut self, enabled: bool) -> bool {
        if self.auto_updating == enabled {
            return false;
        }
        tracing::info!("Auto-update {}", if enabled { "enabled" } else { "disabled" });
        self.auto_updating = enabled;
        self.publish_status();
        true
    }

    /// Pointer moved over the chart. Crossing the axis gutter swaps which axis
    /// is free, and both ranges are re-asserted in the same draw so the chart
    /// cannot fall back to autofit when the lock flags change. Before the chart
    /// reported a window it is still autofitted to the data, so that extent is
    /// pinned.
    pub fn pointer_moved(&mut self, x_px: f64) {
        let Some(mode) = self.interaction.pointer_moved(x_px) else {
            return;
        };
        tracing::debug!("Axis interaction mode switched to {:?}", mode);

        let x_range = self.current_window().or_else(|| self.data_extent());
        let y_range = self
            .surface
            .value_range()
            .filter(ValueRange::is_valid)
            .unwrap_or(self.default_y_range);
        self.draw(x_range, Some(y_range));
        self.publish_status();
    }

    /// Range selector step ending at the latest data point, or at `now_ms`
    /// before any data arrived. The previous window is kept when no such
    /// window can be represented.
    pub fn select_range(&mut self, preset: RangePreset, now_ms: Timestamp) -> Result<TimeWindow> {
        let end = self.buffer.latest().unwrap_or(now_ms);
        let window = preset.window_ending_at(end)?;
        self.window = Some(window);
        self.draw(Some(window), None);
        Ok(window)
    }

    fn data_extent(&self) -> Option<TimeWindow> {
        TimeWindow::new(self.buffer.earliest()?, self.buffer.latest()?).ok()
    }

    fn schedule_settle(&mut self, seq: u64, settle_after: Option<Duration>) -> Option<Duration> {
        match settle_after {
            Some(delay) if delay.is_zero() => {
                self.settle_loading(seq);
                None
            }
            Some(delay) => {
                self.publish_status();
                Some(delay)
            }
            None => {
                self.publish_status();
                None
            }
        }
    }

    fn frame(&mut self, x_range: Option<TimeWindow>, y_range: Option<ValueRange>) -> Frame {
        self.revision += 1;
        let mode = self.interaction.mode();
        Frame {
            revision: self.revision,
            series: self.buffer.snapshot(),
            layout: Layout {
                x_range,
                y_range,
                x_fixed: mode.x_fixed(),
                y_fixed: mode.y_fixed(),
            },
        }
    }

    fn draw(&mut self, x_range: Option<TimeWindow>, y_range: Option<ValueRange>) {
        if !self.mounted {
            let frame = self.frame(x_range, y_range.or(Some(self.default_y_range)));
            self.surface.render(frame);
            self.mounted = true;
            return;
        }
        let frame = self.frame(x_range, y_range);
        self.surface.update(frame);
    }

    fn publish_status(&mut self) {
        let status = self.status();
        self.surface.show_status(&status);
    }
}
