//! Time subsystem.
//!
//! Provides the testable clock abstraction and the fixed-minimum-interval
//! frame loop. Intended usage:
//! - one `FrameLoop` per program, driven by a window `EventSource`
//! - the render callback runs at most once per due tick, inside its own scope

mod frame_clock;
mod frame_loop;

pub use frame_clock::{Clock, SystemClock, TickGate, tick_interval_millis};
pub use frame_loop::{EventSource, FrameLoop, LoopState, LoopStats, Step};
