//! Coordinate and geometry types shared between the runtime and hosts.
//!
//! Canonical layout space follows the host's rect-transform model:
//! - positions are offsets from the anchor reference point
//! - +X right, +Y up
//! - anchors and pivots are normalized `[0, 1]` fractions of the parent rect

mod vec2;
mod vec3;
mod vec4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
