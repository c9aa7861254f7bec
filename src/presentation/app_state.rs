// Application state for HTTP handlers
use crate::application::view_runtime::ViewHandle;
use crate::infrastructure::frame_publisher::ViewFeed;

#[derive(Clone)]
pub struct AppState {
    pub view: ViewHandle,
    pub feed: ViewFeed,
}
