//! Runtime module - executes commands and feeds results back into update
//!
//! - `app` - the message loop, debounce timers and extraction workers

pub mod app;

pub use app::Runtime;
