// Domain layer - Value types and state machines of the live view
pub mod error;
pub mod interaction;
pub mod series;
pub mod time_window;
