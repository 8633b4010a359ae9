use std::fmt;

use log::warn;

use nabu_engine::coords::{Vec2, Vec3};
use nabu_engine::host::{ImageContent, NodeId, SliderDirection, UiHost};
use nabu_markup::{ElementKind, MarkupNode};

// ── WidgetId ──────────────────────────────────────────────────────────────

/// Index of a [`WidgetHandle`] in the session's [`Widgets`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

// ── Transform ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub size: Vec2,
    pub anchor_min: Vec2,
    pub anchor_max: Vec2,
    pub pivot: Vec2,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            size: Vec2::new(100.0, 100.0),
            anchor_min: Vec2::HALF,
            anchor_max: Vec2::HALF,
            pivot: Vec2::HALF,
            scale: Vec3::ONE,
        }
    }
}

/// Snapshot taken right after creation; the target of every "restore" command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeState {
    pub transform: Transform,
    pub alpha: f32,
    /// Declared `isOn` of a toggle.
    pub toggle_on: Option<bool>,
}

// ── EventHandler ──────────────────────────────────────────────────────────

/// One declared reaction: `onClick="fadeOut(0.5)"` becomes
/// `{ event_type: "click", command: "fadeOut", params: ["0.5"] }`.
#[derive(Debug, Clone, PartialEq)]
pub struct EventHandler {
    /// Lowercased event name without the `on` prefix.
    pub event_type: String,
    pub command: String,
    pub params: Vec<String>,
}

/// `onXxx` with an uppercase third character counts as an event attribute.
fn event_type_of(key: &str) -> Option<String> {
    let rest = key.strip_prefix("on")?;
    rest.chars()
        .next()
        .filter(|c| c.is_ascii_uppercase())
        .map(|_| rest.to_ascii_lowercase())
}

/// Parse `cmd`, `cmd(a, b)` or several of those separated by `;`.
pub fn parse_handler_list(event_type: &str, value: &str) -> Vec<EventHandler> {
    let mut out = Vec::new();
    for part in value.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (command, params) = match part.find('(') {
            None => (part, Vec::new()),
            Some(open) => {
                let Some(inner) = part[open + 1..].strip_suffix(')') else {
                    warn!("ignoring malformed '{}' handler {:?}", event_type, part);
                    continue;
                };
                let params = if inner.trim().is_empty() {
                    Vec::new()
                } else {
                    inner.split(',').map(|p| p.trim().to_string()).collect()
                };
                (part[..open].trim(), params)
            }
        };
        if command.is_empty() {
            warn!("ignoring '{}' handler with no command: {:?}", event_type, part);
            continue;
        }
        out.push(EventHandler {
            event_type: event_type.to_string(),
            command: command.to_string(),
            params,
        });
    }
    out
}

/// Every handler declared on `node`, in attribute order.
pub fn parse_event_handlers(node: &MarkupNode) -> Vec<EventHandler> {
    node.attrs
        .iter()
        .filter_map(|a| event_type_of(&a.key).map(|ev| parse_handler_list(&ev, &a.value)))
        .flatten()
        .collect()
}

// ── WidgetParts ───────────────────────────────────────────────────────────

/// Kind-specific sub-nodes and state.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetParts {
    Plain,
    Button { label: Option<NodeId> },
    ScrollArea { viewport: NodeId, content: NodeId },
    ProgressBar {
        fill: NodeId,
        min: f32,
        max: f32,
        value: f32,
        direction: SliderDirection,
    },
    Toggle { checkmark: NodeId, is_on: bool, group: Option<WidgetId> },
    InputField { text: NodeId },
    Dropdown { label: NodeId, options: Vec<String>, value: usize },
}

/// Fill anchors for a progress value already clamped to `[min, max]`.
pub fn fill_anchors(min: f32, max: f32, value: f32, direction: SliderDirection) -> (Vec2, Vec2) {
    let t = if max > min { ((value - min) / (max - min)).clamp(0.0, 1.0) } else { 0.0 };
    match direction {
        SliderDirection::LeftToRight => (Vec2::new(0.0, 0.0), Vec2::new(t, 1.0)),
        SliderDirection::RightToLeft => (Vec2::new(1.0 - t, 0.0), Vec2::new(1.0, 1.0)),
        SliderDirection::BottomToTop => (Vec2::new(0.0, 0.0), Vec2::new(1.0, t)),
        SliderDirection::TopToBottom => (Vec2::new(0.0, 1.0 - t), Vec2::new(1.0, 1.0)),
    }
}

// ── WidgetHandle ──────────────────────────────────────────────────────────

/// Runtime state of one compiled element.
#[derive(Debug, Clone)]
pub struct WidgetHandle {
    pub name: String,
    pub kind: ElementKind,
    pub node: NodeId,
    pub transform: Transform,
    pub alpha: f32,
    pub interactable: bool,
    pub home: HomeState,
    pub handlers: Vec<EventHandler>,
    pub parts: WidgetParts,
    /// Resource slot this handle is bound to.
    pub slot: Option<usize>,
    text_surface: Option<NodeId>,
    text: Option<String>,
    image_surface: Option<NodeId>,
    image: Option<ImageContent>,
}

impl WidgetHandle {
    pub fn new(name: impl Into<String>, kind: ElementKind, node: NodeId) -> Self {
        let transform = Transform::default();
        Self {
            name: name.into(),
            kind,
            node,
            transform,
            alpha: 1.0,
            interactable: true,
            home: HomeState { transform, alpha: 1.0, toggle_on: None },
            handlers: Vec::new(),
            parts: WidgetParts::Plain,
            slot: None,
            text_surface: None,
            text: None,
            image_surface: None,
            image: None,
        }
    }

    pub fn snapshot_home(&mut self) {
        self.home = HomeState { transform: self.transform, alpha: self.alpha, toggle_on: self.is_on() };
    }

    /// The node children are attached under.
    pub fn content_node(&self) -> NodeId {
        match self.parts {
            WidgetParts::ScrollArea { content, .. } => content,
            _ => self.node,
        }
    }

    // ── surfaces ──────────────────────────────────────────────────────────

    pub fn set_text_surface(&mut self, node: NodeId, initial: impl Into<String>) {
        self.text_surface = Some(node);
        self.text = Some(initial.into());
    }

    pub fn set_image_surface(&mut self, node: NodeId) {
        self.image_surface = Some(node);
    }

    pub fn has_text_surface(&self) -> bool {
        self.text_surface.is_some()
    }

    pub fn has_image_surface(&self) -> bool {
        self.image_surface.is_some()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn image(&self) -> Option<&ImageContent> {
        self.image.as_ref()
    }

    /// Returns `false` if this handle exposes no text surface.
    pub fn show_text(&mut self, host: &mut dyn UiHost, text: &str) -> bool {
        let Some(node) = self.text_surface else { return false };
        host.set_text(node, text);
        self.text = Some(text.to_string());
        true
    }

    /// Returns `false` if this handle exposes no image surface.
    pub fn show_image(&mut self, host: &mut dyn UiHost, image: &ImageContent) -> bool {
        let Some(node) = self.image_surface else { return false };
        host.set_image(node, image);
        self.image = Some(image.clone());
        true
    }

    // ── transform / visual state ─────────────────────────────────────────

    /// Pushes every transform field to the host.
    pub fn apply_transform(&self, host: &mut dyn UiHost) {
        let t = &self.transform;
        host.set_anchors(self.node, t.anchor_min, t.anchor_max);
        host.set_pivot(self.node, t.pivot);
        host.set_size(self.node, t.size);
        host.set_position(self.node, t.position);
        host.set_scale(self.node, t.scale);
    }

    pub fn set_position(&mut self, host: &mut dyn UiHost, position: Vec2) {
        self.transform.position = position;
        host.set_position(self.node, position);
    }

    pub fn set_scale(&mut self, host: &mut dyn UiHost, scale: Vec3) {
        self.transform.scale = scale;
        host.set_scale(self.node, scale);
    }

    pub fn set_alpha(&mut self, host: &mut dyn UiHost, alpha: f32) {
        self.alpha = alpha;
        host.set_alpha(self.node, alpha);
    }

    pub fn set_interactable(&mut self, host: &mut dyn UiHost, interactable: bool) {
        self.interactable = interactable;
        host.set_interactable(self.node, interactable);
    }

    pub fn is_on(&self) -> Option<bool> {
        match self.parts {
            WidgetParts::Toggle { is_on, .. } => Some(is_on),
            _ => None,
        }
    }

    /// Shows or hides the checkmark and syncs the host toggle. No-op for
    /// other kinds.
    pub fn set_toggle(&mut self, host: &mut dyn UiHost, on: bool) -> bool {
        let WidgetParts::Toggle { checkmark, is_on, .. } = &mut self.parts else {
            return false;
        };
        *is_on = on;
        host.set_alpha(*checkmark, if on { 1.0 } else { 0.0 });
        host.set_toggle(self.node, on);
        true
    }

    /// Current progress value, if this is a progress bar.
    pub fn progress(&self) -> Option<f32> {
        match self.parts {
            WidgetParts::ProgressBar { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Clamps to the bar's range and moves the fill. No-op for other kinds.
    pub fn set_progress(&mut self, host: &mut dyn UiHost, new_value: f32) -> bool {
        let WidgetParts::ProgressBar { fill, min, max, value, direction } = &mut self.parts else {
            return false;
        };
        *value = new_value.clamp(*min, *max);
        let (amin, amax) = fill_anchors(*min, *max, *value, *direction);
        host.set_anchors(*fill, amin, amax);
        host.set_slider_value(self.node, *value);
        true
    }
}

// ── Widgets arena ─────────────────────────────────────────────────────────

/// Owns every handle created since the last clear. Ids stay valid until then,
/// even for handles whose names were taken over by later elements.
#[derive(Debug, Default)]
pub struct Widgets {
    handles: Vec<WidgetHandle>,
}

impl Widgets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, handle: WidgetHandle) -> WidgetId {
        let id = WidgetId(self.handles.len() as u32);
        self.handles.push(handle);
        id
    }

    pub fn get(&self, id: WidgetId) -> Option<&WidgetHandle> {
        self.handles.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetHandle> {
        self.handles.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &WidgetHandle)> {
        self.handles.iter().enumerate().map(|(i, h)| (WidgetId(i as u32), h))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}
