//! Time subsystem.
//!
//! Provides frame timing for interactive drivers. The runtime itself is
//! driven by explicit `tick(dt)` calls; a `FrameClock` is one way to produce
//! those `dt` values from wall time.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
