// Infrastructure layer - External dependencies and adapters
pub mod chunked_json;
pub mod config;
pub mod frame_publisher;
pub mod http_power_source;
pub mod http_response;
