// Live power chart view: refresh scheduling, auto-pan and axis interaction
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
