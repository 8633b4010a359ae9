//! Paint model shared between the runtime and hosts.
//!
//! Only solid colors exist at this level; gradients and materials are a host
//! concern.

pub mod color;

pub use color::Color;
