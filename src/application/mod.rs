// Application layer - Live view use cases and collaborator seams
pub mod auto_pan;
pub mod data_source;
pub mod fetch_scheduler;
pub mod live_view;
pub mod loading_indicator;
pub mod render_surface;
pub mod view_runtime;
