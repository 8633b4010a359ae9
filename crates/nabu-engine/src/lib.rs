//! Nabu engine crate.
//!
//! This crate owns the host-facing pieces used by higher layers: geometry and
//! color values, the [`host::UiHost`] capability seam (plus a headless
//! in-memory implementation), logging setup and frame timing.

pub mod time;
pub mod host;

pub mod logging;
pub mod coords;
pub mod paint;
