//! Component descriptors attached to host nodes.
//!
//! These are plain data: the runtime decides *what* a node carries, the host
//! decides how to render or lay it out.

use crate::coords::Vec2;
use crate::paint::Color;

use super::NodeId;

// ── Style enums ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    Right,
    #[default]
    Center,
    Justified,
    TopLeft,
    TopRight,
    TopCenter,
    BottomLeft,
    BottomRight,
    BottomCenter,
    MidlineLeft,
}

/// Nine-point anchor for aligning children inside a layout group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    UpperLeft,
    UpperCenter,
    UpperRight,
    MiddleLeft,
    #[default]
    MiddleCenter,
    MiddleRight,
    LowerLeft,
    LowerCenter,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Corner {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridConstraint {
    Flexible,
    #[default]
    FixedColumnCount,
    FixedRowCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Overlay,
    Camera,
    World,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliderDirection {
    #[default]
    LeftToRight,
    RightToLeft,
    BottomToTop,
    TopToBottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Standard,
    Integer,
    Decimal,
    Alphanumeric,
    Name,
    Email,
    Password,
    Pin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    #[default]
    Unconstrained,
    Preferred,
}

// ── Descriptors ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub text: String,
    pub font_size: f32,
    pub color: Color,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSpec {
    pub render_mode: RenderMode,
    pub sorting_order: i32,
    pub pixel_perfect: bool,
    pub reference_resolution: Vec2,
    /// Only meaningful for [`RenderMode::Camera`].
    pub plane_distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSpec {
    pub horizontal: bool,
    pub vertical: bool,
    pub elasticity: f32,
    pub inertia: bool,
    pub deceleration: f32,
    pub viewport: NodeId,
    pub content: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SliderSpec {
    pub min: f32,
    pub max: f32,
    pub value: f32,
    pub direction: SliderDirection,
    pub fill: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleSpec {
    pub is_on: bool,
    pub checkmark: NodeId,
    pub group: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSpec {
    pub character_limit: i32,
    pub content_type: ContentType,
    pub text_node: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DropdownSpec {
    pub options: Vec<String>,
    pub value: usize,
    pub label: NodeId,
}

/// Integer paddings in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearLayout {
    pub axis: Axis,
    pub spacing: f32,
    pub child_alignment: TextAnchor,
    pub reverse: bool,
    pub control_child_width: bool,
    pub control_child_height: bool,
    pub force_expand_width: bool,
    pub force_expand_height: bool,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub cell_size: Vec2,
    pub spacing: Vec2,
    pub start_corner: Corner,
    pub start_axis: Axis,
    pub child_alignment: TextAnchor,
    pub constraint: GridConstraint,
    pub constraint_count: i32,
    pub padding: Padding,
}

/// Per-state tint colors for pressable elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintBlock {
    pub normal: Color,
    pub highlighted: Color,
    pub pressed: Color,
    pub disabled: Color,
}

// ── Component ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    /// Solid background fill.
    Fill(Color),
    Text(TextStyle),
    /// Image surface with a tint; pixel content is pushed via `UiHost::set_image`.
    Image { tint: Color },
    /// Clips descendants to this node's rect.
    Mask,
    Canvas(CanvasSpec),
    Scroll(ScrollSpec),
    Slider(SliderSpec),
    ToggleGroup { allow_switch_off: bool },
    Toggle(ToggleSpec),
    InputField(InputSpec),
    Dropdown(DropdownSpec),
    Layout(LinearLayout),
    Grid(GridSpec),
    SizeFitter { horizontal: FitMode, vertical: FitMode },
    ButtonTint(TintBlock),
}

impl Component {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Component::Fill(_)             => "Fill",
            Component::Text(_)             => "Text",
            Component::Image { .. }        => "Image",
            Component::Mask                => "Mask",
            Component::Canvas(_)           => "Canvas",
            Component::Scroll(_)           => "Scroll",
            Component::Slider(_)           => "Slider",
            Component::ToggleGroup { .. }  => "ToggleGroup",
            Component::Toggle(_)           => "Toggle",
            Component::InputField(_)       => "InputField",
            Component::Dropdown(_)         => "Dropdown",
            Component::Layout(_)           => "Layout",
            Component::Grid(_)             => "Grid",
            Component::SizeFitter { .. }   => "SizeFitter",
            Component::ButtonTint(_)       => "ButtonTint",
        }
    }
}
