use std::collections::HashMap;
use std::fmt::Write as _;

use crate::coords::{Vec2, Vec3};

use super::{Component, ImageContent, NodeId, UiHost};

// ── SceneNode ─────────────────────────────────────────────────────────────

/// One node of the headless tree with every field the runtime can set.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub position: Vec2,
    pub size: Vec2,
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub pivot: Vec2,
    pub scale: Vec3,
    pub alpha: f32,
    pub interactable: bool,
    pub components: Vec<Component>,
    pub image: Option<ImageContent>,
}

impl SceneNode {
    fn new(name: &str, parent: Option<NodeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            children: Vec::new(),
            position: Vec2::ZERO,
            size: Vec2::new(100.0, 100.0),
            anchor_min: Vec2::HALF,
            anchor_max: Vec2::HALF,
            pivot: Vec2::HALF,
            scale: Vec3::ONE,
            alpha: 1.0,
            interactable: true,
            components: Vec::new(),
            image: None,
        }
    }

    /// Current text of this node's text component, if any.
    pub fn text(&self) -> Option<&str> {
        self.components.iter().find_map(|c| match c {
            Component::Text(style) => Some(style.text.as_str()),
            _ => None,
        })
    }

    pub fn component(&self, kind_name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.kind_name() == kind_name)
    }
}

// ── SceneTree ─────────────────────────────────────────────────────────────

/// In-memory [`UiHost`]: records everything, renders nothing.
#[derive(Debug)]
pub struct SceneTree {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    next_id: u32,
}

impl SceneTree {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, SceneNode::new("Root", None));
        Self { nodes, root, next_id: 1 }
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    /// Number of live nodes, root included.
    pub fn live_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve a `/`-separated path of node names starting below the root.
    /// The first matching child wins at every step.
    pub fn find_path(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let node = self.nodes.get(&current)?;
            current = *node
                .children
                .iter()
                .find(|c| self.nodes.get(c).is_some_and(|n| n.name == segment))?;
        }
        Some(current)
    }

    /// Indented outline of the live tree, one node per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(self.root, 0, &mut out);
        out
    }

    fn dump_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(&id) else { return };
        let comps: Vec<_> = node.components.iter().map(Component::kind_name).collect();
        let _ = write!(
            out,
            "{:indent$}{} pos=({:.1},{:.1}) size=({:.0},{:.0}) alpha={:.2} scale={:.2}",
            "",
            node.name,
            node.position.x,
            node.position.y,
            node.size.x,
            node.size.y,
            node.alpha,
            node.scale.x,
            indent = depth * 2,
        );
        if !node.interactable {
            out.push_str(" [inert]");
        }
        if !comps.is_empty() {
            let _ = write!(out, " [{}]", comps.join(", "));
        }
        if let Some(text) = node.text().filter(|t| !t.is_empty()) {
            let _ = write!(out, " {:?}", text);
        }
        if let Some(img) = &node.image {
            let _ = write!(out, " <{}x{}>", img.width, img.height);
        }
        out.push('\n');
        for child in &node.children {
            self.dump_node(*child, depth + 1, out);
        }
    }

    fn with_node(&mut self, id: NodeId, f: impl FnOnce(&mut SceneNode)) {
        if let Some(node) = self.nodes.get_mut(&id) {
            f(node);
        }
    }
}

impl Default for SceneTree {
    fn default() -> Self {
        Self::new()
    }
}

impl UiHost for SceneTree {
    fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: NodeId, name: &str) -> NodeId {
        let parent = if self.nodes.contains_key(&parent) { parent } else { self.root };
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SceneNode::new(name, Some(parent)));
        self.with_node(parent, |p| p.children.push(id));
        id
    }

    fn destroy_node(&mut self, node: NodeId) {
        if node == self.root {
            for child in self.children(node) {
                self.destroy_node(child);
            }
            return;
        }
        let Some(removed) = self.nodes.remove(&node) else { return };
        if let Some(parent) = removed.parent {
            self.with_node(parent, |p| p.children.retain(|c| *c != node));
        }
        for child in removed.children {
            self.destroy_node(child);
        }
    }

    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.get(&node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn set_position(&mut self, node: NodeId, position: Vec2) {
        self.with_node(node, |n| n.position = position);
    }

    fn set_size(&mut self, node: NodeId, size: Vec2) {
        self.with_node(node, |n| n.size = size);
    }

    fn set_anchors(&mut self, node: NodeId, min: Vec2, max: Vec2) {
        self.with_node(node, |n| {
            n.anchor_min = min;
            n.anchor_max = max;
        });
    }

    fn set_pivot(&mut self, node: NodeId, pivot: Vec2) {
        self.with_node(node, |n| n.pivot = pivot);
    }

    fn set_scale(&mut self, node: NodeId, scale: Vec3) {
        self.with_node(node, |n| n.scale = scale);
    }

    fn set_alpha(&mut self, node: NodeId, alpha: f32) {
        self.with_node(node, |n| n.alpha = alpha);
    }

    fn set_interactable(&mut self, node: NodeId, interactable: bool) {
        self.with_node(node, |n| n.interactable = interactable);
    }

    fn attach(&mut self, node: NodeId, component: Component) {
        self.with_node(node, |n| n.components.push(component));
    }

    fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        let Some(n) = self.nodes.get_mut(&node) else { return false };
        for c in &mut n.components {
            if let Component::Text(style) = c {
                style.text = text.to_string();
                return true;
            }
        }
        false
    }

    fn set_image(&mut self, node: NodeId, image: &ImageContent) -> bool {
        let Some(n) = self.nodes.get_mut(&node) else { return false };
        if n.components.iter().any(|c| matches!(c, Component::Image { .. })) {
            n.image = Some(image.clone());
            true
        } else {
            false
        }
    }

    fn set_slider_value(&mut self, node: NodeId, value: f32) -> bool {
        let Some(n) = self.nodes.get_mut(&node) else { return false };
        for c in &mut n.components {
            if let Component::Slider(spec) = c {
                spec.value = value;
                return true;
            }
        }
        false
    }

    fn set_toggle(&mut self, node: NodeId, is_on: bool) -> bool {
        let Some(n) = self.nodes.get_mut(&node) else { return false };
        for c in &mut n.components {
            if let Component::Toggle(spec) = c {
                spec.is_on = is_on;
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TextStyle;
    use crate::paint::Color;

    fn text(s: &str) -> Component {
        Component::Text(TextStyle { text: s.into(), font_size: 14.0, color: Color::WHITE, align: Default::default() })
    }

    #[test]
    fn create_and_find_path() {
        let mut tree = SceneTree::new();
        let a = tree.create_node(tree.root(), "a");
        let b = tree.create_node(a, "b");
        assert_eq!(tree.find_path("a/b"), Some(b));
        assert_eq!(tree.find_path("a/c"), None);
        assert_eq!(tree.live_count(), 3);
    }

    #[test]
    fn destroy_removes_subtree() {
        let mut tree = SceneTree::new();
        let a = tree.create_node(tree.root(), "a");
        let b = tree.create_node(a, "b");
        tree.create_node(b, "c");
        tree.destroy_node(a);
        assert_eq!(tree.live_count(), 1);
        assert!(tree.children(tree.root()).is_empty());
    }

    #[test]
    fn destroying_root_keeps_root() {
        let mut tree = SceneTree::new();
        tree.create_node(tree.root(), "a");
        tree.create_node(tree.root(), "b");
        tree.destroy_node(tree.root());
        assert_eq!(tree.live_count(), 1);
        assert!(tree.contains(tree.root()));
    }

    #[test]
    fn set_text_requires_text_component() {
        let mut tree = SceneTree::new();
        let a = tree.create_node(tree.root(), "a");
        assert!(!tree.set_text(a, "x"));
        tree.attach(a, text("old"));
        assert!(tree.set_text(a, "new"));
        assert_eq!(tree.node(a).unwrap().text(), Some("new"));
    }

    #[test]
    fn set_image_requires_image_component() {
        let mut tree = SceneTree::new();
        let a = tree.create_node(tree.root(), "a");
        let img = ImageContent::new(1, 1, vec![255, 0, 0, 255]);
        assert!(!tree.set_image(a, &img));
        tree.attach(a, Component::Image { tint: Color::WHITE });
        assert!(tree.set_image(a, &img));
        assert_eq!(tree.node(a).unwrap().image.as_ref().map(|i| i.width), Some(1));
    }

    #[test]
    fn dump_lists_nodes() {
        let mut tree = SceneTree::new();
        let a = tree.create_node(tree.root(), "panel");
        tree.attach(a, text("hi"));
        let out = tree.dump();
        assert!(out.contains("  panel"));
        assert!(out.contains("\"hi\""));
    }
}
