// View runtime - Event loop that owns the live view and its timers
use crate::application::fetch_scheduler::FetchReport;
use crate::application::live_view::LiveView;
use crate::application::render_surface::RenderSurface;
use crate::domain::time_window::RangePreset;
use std::ops::ControlFlow;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{Instant, Interval, MissedTickBehavior};

const EVENT_QUEUE_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// User-triggered refresh.
    Refresh,
    /// Viewport-relative pointer x position in pixels.
    PointerMoved(f64),
    SetAutoUpdate(bool),
    SelectRange(RangePreset),
    /// The owning view went away.
    Shutdown,
}

/// Cloneable sender side used by the presentation layer. The runtime stops on
/// [`ViewEvent::Shutdown`] or once every handle is dropped.
#[derive(Clone)]
pub struct ViewHandle {
    tx: mpsc::Sender<ViewEvent>,
}

impl ViewHandle {
    pub fn channel() -> (Self, mpsc::Receiver<ViewEvent>) {
        let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
        (Self { tx }, rx)
    }

    pub async fn send(&self, event: ViewEvent) -> anyhow::Result<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| anyhow::anyhow!("live view has shut down"))
    }
}

/// Repeating refresh timer. Exists only while auto-update is enabled.
struct AutoUpdate {
    ticker: Interval,
}

impl AutoUpdate {
    fn start(period: Duration) -> Self {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { ticker }
    }
}

pub struct ViewRuntime<S: RenderSurface> {
    view: LiveView<S>,
    events: mpsc::Receiver<ViewEvent>,
    refresh_interval: Duration,
    auto_update: Option<AutoUpdate>,
    fetches: JoinSet<FetchReport>,
    settle: Option<(u64, Instant)>,
}

impl<S: RenderSurface + 'static> ViewRuntime<S> {
    pub fn new(view: LiveView<S>, refresh_interval: Duration) -> (Self, ViewHandle) {
        let (handle, events) = ViewHandle::channel();
        let runtime = Self {
            view,
            events,
            refresh_interval,
            auto_update: None,
            fetches: JoinSet::new(),
            settle: None,
        };
        (runtime, handle)
    }

    /// Drive the view until shutdown. Returning drops the refresh timer, the
    /// loading timer, any fetch still in flight and the surface.
    pub async fn run(mut self) {
        self.view.mount();
        if self.view.auto_updating() {
            self.auto_update = Some(AutoUpdate::start(self.refresh_interval));
        }
        self.refresh();

        loop {
            let settle_at = self.settle.map(|(_, at)| at).unwrap_or_else(Instant::now);

            tokio::select! {
                event = self.events.recv() => match event {
                    Some(event) => {
                        if self.handle_event(event).is_break() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = next_tick(&mut self.auto_update) => {
                    self.refresh();
                }
                Some(joined) = self.fetches.join_next(), if !self.fetches.is_empty() => {
                    match joined {
                        Ok(report) => self.complete(report),
                        Err(e) => tracing::error!("Fetch task failed: {}", e),
                    }
                }
                _ = tokio::time::sleep_until(settle_at), if self.settle.is_some() => {
                    if let Some((seq, _)) = self.settle.take() {
                        self.view.settle_loading(seq);
                    }
                }
            }
        }

        tracing::info!("Live view stopped");
    }

    fn handle_event(&mut self, event: ViewEvent) -> ControlFlow<()> {
        match event {
            ViewEvent::Refresh => self.refresh(),
            ViewEvent::PointerMoved(x) => self.view.pointer_moved(x),
            ViewEvent::SetAutoUpdate(enabled) => {
                if self.view.set_auto_update(enabled) {
                    if enabled {
                        self.auto_update = Some(AutoUpdate::start(self.refresh_interval));
                        self.refresh();
                    } else {
                        self.auto_update = None;
                    }
                }
            }
            ViewEvent::SelectRange(preset) => {
                let now_ms = chrono::Utc::now().timestamp_millis();
                match self.view.select_range(preset, now_ms) {
                    Ok(window) => {
                        tracing::debug!("Range {:?} selected: [{}, {}]", preset, window.start(), window.end());
                        self.refresh();
                    }
                    Err(e) => tracing::warn!("Range {:?} rejected: {}", preset, e),
                }
            }
            ViewEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn refresh(&mut self) {
        let issued = self.view.begin_refresh(Instant::now());
        self.settle = None;
        self.fetches.spawn(issued.run());
    }

    fn complete(&mut self, report: FetchReport) {
        let seq = report.seq;
        if let Some(delay) = self.view.complete_refresh(report, Instant::now()) {
            self.settle = Some((seq, Instant::now() + delay));
        }
    }
}

async fn next_tick(auto_update: &mut Option<AutoUpdate>) {
    match auto_update {
        Some(auto) => {
            auto.ticker.tick().await;
        }
        None => std::future::pending().await,
    }
}
