//! The host seam.
//!
//! The runtime never owns render objects. It asks a [`UiHost`] to create
//! nodes, set their rect-transform fields and attach component descriptors,
//! and keeps only the opaque [`NodeId`]s it gets back. A headless in-memory
//! implementation, [`SceneTree`], backs the CLI and every test.

mod component;
mod headless;

use std::fmt;
use std::sync::Arc;

use crate::coords::{Vec2, Vec3};

pub use component::{
    Axis, CanvasSpec, Component, ContentType, Corner, DropdownSpec, FitMode, GridConstraint,
    GridSpec, InputSpec, LinearLayout, Padding, RenderMode, ScrollSpec, SliderDirection,
    SliderSpec, TextAlign, TextAnchor, TextStyle, TintBlock, ToggleSpec,
};
pub use headless::{SceneNode, SceneTree};

/// Opaque handle to a host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Decoded RGBA8 pixels. Cloning shares the pixel buffer.
#[derive(Clone, PartialEq)]
pub struct ImageContent {
    pub width: u32,
    pub height: u32,
    pub rgba8: Arc<[u8]>,
}

impl ImageContent {
    pub fn new(width: u32, height: u32, rgba8: Vec<u8>) -> Self {
        Self { width, height, rgba8: rgba8.into() }
    }
}

impl fmt::Debug for ImageContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageContent")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba8.len())
            .finish()
    }
}

/// Capabilities the runtime needs from a scene/render host.
///
/// Operations on a node id the host no longer knows are ignored.
pub trait UiHost {
    /// The node compiled documents are attached under.
    fn root(&self) -> NodeId;

    fn create_node(&mut self, parent: NodeId, name: &str) -> NodeId;
    /// Destroys `node` and its whole subtree.
    fn destroy_node(&mut self, node: NodeId);
    fn contains(&self, node: NodeId) -> bool;
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    fn set_position(&mut self, node: NodeId, position: Vec2);
    fn set_size(&mut self, node: NodeId, size: Vec2);
    fn set_anchors(&mut self, node: NodeId, min: Vec2, max: Vec2);
    fn set_pivot(&mut self, node: NodeId, pivot: Vec2);
    fn set_scale(&mut self, node: NodeId, scale: Vec3);
    fn set_alpha(&mut self, node: NodeId, alpha: f32);
    fn set_interactable(&mut self, node: NodeId, interactable: bool);

    fn attach(&mut self, node: NodeId, component: Component);

    /// Replaces the text of the node's text component. Returns `false` if the
    /// node carries none.
    fn set_text(&mut self, node: NodeId, text: &str) -> bool;
    /// Replaces the pixels of the node's image component. Returns `false` if
    /// the node carries none.
    fn set_image(&mut self, node: NodeId, image: &ImageContent) -> bool;
    /// Updates the fill anchors / value of a slider component.
    fn set_slider_value(&mut self, node: NodeId, value: f32) -> bool;
    fn set_toggle(&mut self, node: NodeId, is_on: bool) -> bool;

    /// Convenience: all three stretch settings at once.
    fn stretch(&mut self, node: NodeId) {
        self.set_anchors(node, Vec2::ZERO, Vec2::ONE);
        self.set_size(node, Vec2::ZERO);
        self.set_position(node, Vec2::ZERO);
    }
}
