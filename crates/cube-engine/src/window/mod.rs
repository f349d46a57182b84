//! Window + event source.
//!
//! Owns the `winit` EventLoop and the single window, and exposes them to the
//! frame loop as a non-blocking [`EventSource`](crate::time::EventSource).

mod runtime;

pub use runtime::{RuntimeConfig, WinitEvents, window_attributes};
