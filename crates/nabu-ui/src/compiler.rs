use log::{debug, error, warn};

use nabu_engine::coords::{Vec2, Vec3, Vec4};
use nabu_engine::host::{
    Axis, CanvasSpec, Component, ContentType, Corner, DropdownSpec, FitMode, GridConstraint,
    GridSpec, InputSpec, LinearLayout, NodeId, Padding, RenderMode, ScrollSpec, SliderDirection,
    SliderSpec, TextAlign, TextAnchor, TextStyle, TintBlock, ToggleSpec, UiHost,
};
use nabu_engine::paint::Color;
use nabu_markup::{ElementKind, MarkupNode};

use crate::attrs::AttributeResolver;
use crate::config::Theme;
use crate::error::BuildError;
use crate::registry::ElementRegistry;
use crate::resources::ResourceBindingManager;
use crate::widget::{
    fill_anchors, parse_event_handlers, Transform, WidgetHandle, WidgetParts, Widgets,
};

// ── CompileStats ──────────────────────────────────────────────────────────

/// What one compile pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    /// Handles created and registered.
    pub created: usize,
    /// Elements without a name; each was skipped with its subtree.
    pub unnamed: usize,
    /// Elements with an unknown tag; their children were still compiled.
    pub unknown: usize,
    /// Elements whose builder failed; their subtrees were skipped.
    pub failed: usize,
}

// ── MarkupCompiler ────────────────────────────────────────────────────────

/// Walks a markup tree and builds widgets on the host, registering each one.
///
/// Children attach to their parent element's node, except under a
/// `ScrollArea`, whose children go into its inner `Viewport/Content` node.
pub struct MarkupCompiler<'a> {
    pub host: &'a mut dyn UiHost,
    pub attrs: &'a mut AttributeResolver,
    pub widgets: &'a mut Widgets,
    pub registry: &'a mut ElementRegistry,
    pub resources: &'a mut ResourceBindingManager,
    pub theme: &'a Theme,
    stats: CompileStats,
}

impl<'a> MarkupCompiler<'a> {
    pub fn new(
        host: &'a mut dyn UiHost,
        attrs: &'a mut AttributeResolver,
        widgets: &'a mut Widgets,
        registry: &'a mut ElementRegistry,
        resources: &'a mut ResourceBindingManager,
        theme: &'a Theme,
    ) -> Self {
        Self { host, attrs, widgets, registry, resources, theme, stats: CompileStats::default() }
    }

    /// Compiles every child element of `root` under `parent`.
    pub fn compile(mut self, root: &MarkupNode, parent: NodeId) -> CompileStats {
        self.compile_children(root, parent);
        self.stats
    }

    fn compile_children(&mut self, node: &MarkupNode, parent: NodeId) {
        for child in &node.children {
            self.compile_element(child, parent);
        }
    }

    fn compile_element(&mut self, node: &MarkupNode, parent: NodeId) {
        let Some(name) = self.attrs.non_empty(node, "name") else {
            warn!(
                "<{}> at {}:{} has no name; skipping it and its {} descendant(s)",
                node.tag,
                node.line,
                node.col,
                node.subtree_len().saturating_sub(1)
            );
            self.stats.unnamed += 1;
            return;
        };

        let Some(kind) = node.kind() else {
            warn!(
                "unknown element <{}> '{}' at {}:{}; compiling its children in place",
                node.tag, name, node.line, node.col
            );
            self.stats.unknown += 1;
            self.compile_children(node, parent);
            return;
        };

        let host_node = self.host.create_node(parent, name);
        let mut handle = WidgetHandle::new(name, kind, host_node);
        self.configure_common(node, &mut handle);

        if let Err(e) = self.build(node, &mut handle) {
            error!("failed to build {} '{}' at {}:{}: {}", kind, name, node.line, node.col, e);
            self.host.destroy_node(host_node);
            self.stats.failed += 1;
            return;
        }

        handle.apply_transform(&mut *self.host);
        self.host.set_alpha(host_node, handle.alpha);
        self.host.set_interactable(host_node, handle.interactable);
        handle.snapshot_home();

        let content = handle.content_node();
        let id = self.widgets.insert(handle);
        if let Some(prev) = self.registry.insert(name, kind, id) {
            debug!("'{}' now refers to {} {} (was {})", name, kind, id, prev);
        }
        self.stats.created += 1;

        let bind_id = self.attrs.int(node, "bindId", -1);
        if bind_id >= 0 {
            self.resources.bind(bind_id as usize, id, self.widgets, &mut *self.host);
        }

        self.compile_children(node, content);
    }

    // ── Common ────────────────────────────────────────────────────────────

    fn configure_common(&mut self, node: &MarkupNode, handle: &mut WidgetHandle) {
        let a = &mut *self.attrs;

        let position = match a.non_empty(node, "position") {
            Some(_) => a.vec2(node, "position", Vec2::ZERO),
            None => a.vec2(node, "anchoredPosition", Vec2::ZERO),
        };
        let size = match a.non_empty(node, "size") {
            Some(_) => a.vec2(node, "size", Vec2::new(100.0, 100.0)),
            None => Vec2::new(a.float(node, "width", 100.0), a.float(node, "height", 100.0)),
        };
        handle.transform = Transform {
            position,
            size,
            anchor_min: a.vec2(node, "anchorMin", Vec2::HALF),
            anchor_max: a.vec2(node, "anchorMax", Vec2::HALF),
            pivot: a.vec2(node, "pivot", Vec2::HALF),
            scale: a.vec3(node, "scale", Vec3::ONE),
        };

        handle.alpha = a.float(node, "alpha", 1.0);
        let interactable_default = match handle.kind {
            ElementKind::Panel       => handle.alpha > 0.0,
            ElementKind::ProgressBar => false,
            _                        => true,
        };
        handle.interactable = a.boolean(node, "interactable", interactable_default);
        handle.handlers = parse_event_handlers(node);
    }

    /// `key` if present and parseable, else `fallback`.
    fn color_or(&mut self, node: &MarkupNode, key: &str, fallback: Color) -> Color {
        self.attrs.color(node, key, fallback)
    }

    fn padding(&mut self, node: &MarkupNode) -> Padding {
        let p = self.attrs.vec4(node, "padding", Vec4::ZERO);
        Padding { left: p.x as i32, right: p.y as i32, top: p.z as i32, bottom: p.w as i32 }
    }

    /// Child node filling its parent.
    fn stretched_child(&mut self, parent: NodeId, name: &str) -> NodeId {
        let id = self.host.create_node(parent, name);
        self.host.stretch(id);
        id
    }

    fn text_style(&mut self, node: &MarkupNode, text: String, color: Color, align: TextAlign) -> TextStyle {
        TextStyle {
            text,
            font_size: self.attrs.float(node, "fontSize", 14.0),
            color,
            align,
        }
    }

    // ── Builders ──────────────────────────────────────────────────────────

    fn build(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        match h.kind {
            ElementKind::Surface          => self.build_surface(node, h),
            ElementKind::Panel            => self.build_panel(node, h),
            ElementKind::Text             => self.build_text(node, h),
            ElementKind::Button           => self.build_button(node, h),
            ElementKind::Image            => self.build_image(node, h),
            ElementKind::ScrollArea       => self.build_scroll_area(node, h),
            ElementKind::ProgressBar      => self.build_progress_bar(node, h),
            ElementKind::ToggleGroup      => self.build_toggle_group(node, h),
            ElementKind::Toggle           => self.build_toggle(node, h),
            ElementKind::InputField       => self.build_input_field(node, h),
            ElementKind::Dropdown         => self.build_dropdown(node, h),
            ElementKind::HorizontalLayout => self.build_linear_layout(node, h, Axis::Horizontal),
            ElementKind::VerticalLayout   => self.build_linear_layout(node, h, Axis::Vertical),
            ElementKind::GridLayout       => self.build_grid_layout(node, h),
        }
    }

    fn build_surface(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let render_mode = self.attrs.enumeration(node, "renderMode", RenderMode::Overlay);
        let spec = CanvasSpec {
            render_mode,
            sorting_order: self.attrs.int(node, "sortingOrder", 0),
            pixel_perfect: self.attrs.boolean(node, "pixelPerfect", false),
            reference_resolution: self.attrs.vec2(node, "referenceResolution", Vec2::new(1920.0, 1080.0)),
            plane_distance: if render_mode == RenderMode::Camera {
                self.attrs.float(node, "planeDistance", 100.0)
            } else {
                100.0
            },
        };
        self.host.attach(h.node, Component::Canvas(spec));
        Ok(())
    }

    fn build_panel(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let bg = self.color_or(node, "backgroundColor", self.theme.panel);
        self.host.attach(h.node, Component::Fill(bg));
        Ok(())
    }

    fn build_text(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let text = self.attrs.string(node, "text", "");
        let font_size = self.attrs.float(node, "fontSize", self.theme.font_size);
        let color = self.color_or(node, "color", self.theme.text_color);
        let align = self.attrs.enumeration(node, "alignment", TextAlign::Center);
        self.host.attach(h.node, Component::Text(TextStyle { text: text.clone(), font_size, color, align }));
        h.set_text_surface(h.node, text);
        Ok(())
    }

    fn build_button(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let bg = self.color_or(node, "backgroundColor", self.theme.button);
        self.host.attach(h.node, Component::Fill(bg));
        self.host.attach(h.node, Component::ButtonTint(TintBlock {
            normal: bg,
            highlighted: bg.lerp(Color::WHITE, 0.2),
            pressed: bg.lerp(Color::BLACK, 0.2),
            disabled: bg.lerp(Color::GRAY, 0.5),
        }));

        let text = self.attrs.string(node, "text", "");
        let label = if text.is_empty() {
            None
        } else {
            let label = self.stretched_child(h.node, "Text");
            let color = self.color_or(node, "textColor", self.theme.button_text);
            let style = self.text_style(node, text.clone(), color, TextAlign::Center);
            self.host.attach(label, Component::Text(style));
            h.set_text_surface(label, text);
            Some(label)
        };
        h.parts = WidgetParts::Button { label };
        Ok(())
    }

    fn build_image(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let tint = self.color_or(node, "color", Color::WHITE);
        self.host.attach(h.node, Component::Image { tint });
        h.set_image_surface(h.node);
        Ok(())
    }

    fn build_scroll_area(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let bg = self.color_or(node, "backgroundColor", self.theme.scroll_background);
        self.host.attach(h.node, Component::Fill(bg));

        let viewport = self.stretched_child(h.node, "Viewport");
        self.host.attach(viewport, Component::Mask);

        let horizontal = self.attrs.boolean(node, "horizontal", false);
        let vertical = self.attrs.boolean(node, "vertical", true);

        let content = self.host.create_node(viewport, "Content");
        let (amin, amax, pivot, size) = match (horizontal, vertical) {
            (false, true) => (Vec2::new(0.0, 1.0), Vec2::ONE, Vec2::new(0.5, 1.0), Vec2::new(0.0, 300.0)),
            (true, false) => (Vec2::ZERO, Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.5), Vec2::new(300.0, 0.0)),
            _             => (Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0), Vec2::new(300.0, 300.0)),
        };
        self.host.set_anchors(content, amin, amax);
        self.host.set_pivot(content, pivot);
        self.host.set_size(content, size);
        self.host.set_position(content, Vec2::ZERO);

        let fit = |on: bool| if on { FitMode::Preferred } else { FitMode::Unconstrained };
        self.host.attach(content, Component::SizeFitter { horizontal: fit(horizontal), vertical: fit(vertical) });

        if horizontal != vertical {
            let axis = if vertical { Axis::Vertical } else { Axis::Horizontal };
            self.host.attach(content, Component::Layout(LinearLayout {
                axis,
                spacing: 5.0,
                child_alignment: TextAnchor::UpperLeft,
                reverse: false,
                control_child_width: vertical,
                control_child_height: horizontal,
                force_expand_width: vertical,
                force_expand_height: horizontal,
                padding: Padding::default(),
            }));
        }

        self.host.attach(h.node, Component::Scroll(ScrollSpec {
            horizontal,
            vertical,
            elasticity: self.attrs.float(node, "elasticity", 0.1),
            inertia: self.attrs.boolean(node, "inertia", true),
            deceleration: self.attrs.float(node, "deceleration", 0.135),
            viewport,
            content,
        }));
        h.parts = WidgetParts::ScrollArea { viewport, content };
        Ok(())
    }

    fn build_progress_bar(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let min = self.attrs.float(node, "minValue", 0.0);
        let max = self.attrs.float(node, "maxValue", 1.0);
        if min > max {
            return Err(BuildError::InvertedRange { kind: h.kind, min, max });
        }
        let value = self.attrs.float(node, "value", 0.0).clamp(min, max);
        let direction = self.attrs.enumeration(node, "direction", SliderDirection::LeftToRight);

        let background = self.stretched_child(h.node, "Background");
        let bg = self.color_or(node, "backgroundColor", self.theme.progress_background);
        self.host.attach(background, Component::Fill(bg));

        let fill_area = self.stretched_child(h.node, "Fill Area");
        let fill = self.host.create_node(fill_area, "Fill");
        let (amin, amax) = fill_anchors(min, max, value, direction);
        self.host.set_anchors(fill, amin, amax);
        self.host.set_size(fill, Vec2::ZERO);
        self.host.set_position(fill, Vec2::ZERO);
        let fill_color = self.color_or(node, "fillColor", self.theme.progress_fill);
        self.host.attach(fill, Component::Fill(fill_color));

        self.host.attach(h.node, Component::Slider(SliderSpec { min, max, value, direction, fill }));
        h.parts = WidgetParts::ProgressBar { fill, min, max, value, direction };
        Ok(())
    }

    fn build_toggle_group(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let allow_switch_off = self.attrs.boolean(node, "allowSwitchOff", false);
        self.host.attach(h.node, Component::ToggleGroup { allow_switch_off });
        Ok(())
    }

    fn build_toggle(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let background = self.host.create_node(h.node, "Background");
        self.host.set_anchors(background, Vec2::new(0.0, 0.5), Vec2::new(0.0, 0.5));
        self.host.set_position(background, Vec2::new(10.0, 0.0));
        self.host.set_size(background, Vec2::new(20.0, 20.0));
        self.host.attach(background, Component::Fill(self.theme.checkbox));

        let checkmark = self.stretched_child(background, "Checkmark");
        self.host.attach(checkmark, Component::Fill(self.theme.checkmark));

        let is_on = self.attrs.boolean(node, "isOn", false);
        self.host.set_alpha(checkmark, if is_on { 1.0 } else { 0.0 });

        let group = match self.attrs.non_empty(node, "group") {
            None => None,
            Some(group_name) => {
                let found = self.registry.get_kind(ElementKind::ToggleGroup, group_name);
                if found.is_none() {
                    warn!("toggle '{}': no toggle group named '{}' (groups must come first)", h.name, group_name);
                }
                found
            }
        };
        let group_node = group.and_then(|g| self.widgets.get(g)).map(|g| g.node);

        self.host.attach(h.node, Component::Toggle(ToggleSpec { is_on, checkmark, group: group_node }));
        h.parts = WidgetParts::Toggle { checkmark, is_on, group };
        Ok(())
    }

    fn build_input_field(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let bg = self.color_or(node, "backgroundColor", self.theme.input_field);
        self.host.attach(h.node, Component::Fill(bg));

        // Inset 10 horizontally, 5 vertically.
        let area = self.stretched_child(h.node, "Text Area");
        self.host.set_size(area, Vec2::new(-20.0, -10.0));
        self.host.attach(area, Component::Mask);

        let text_node = self.stretched_child(area, "Text");
        let text = self.attrs.string(node, "text", "");
        let color = self.color_or(node, "textColor", Color::WHITE);
        let style = self.text_style(node, text.clone(), color, TextAlign::MidlineLeft);
        self.host.attach(text_node, Component::Text(style));

        let spec = InputSpec {
            character_limit: self.attrs.int(node, "characterLimit", 0),
            content_type: self.attrs.enumeration(node, "contentType", ContentType::Standard),
            text_node,
        };
        self.host.attach(h.node, Component::InputField(spec));
        h.set_text_surface(text_node, text);
        h.parts = WidgetParts::InputField { text: text_node };
        Ok(())
    }

    fn build_dropdown(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let bg = self.color_or(node, "backgroundColor", self.theme.dropdown);
        self.host.attach(h.node, Component::Fill(bg));

        // Inset 10 left, 25 right (arrow), 2 vertically.
        let label = self.stretched_child(h.node, "Label");
        self.host.set_size(label, Vec2::new(-35.0, -4.0));
        self.host.set_position(label, Vec2::new(-7.5, 0.0));

        let options: Vec<String> = self
            .attrs
            .non_empty(node, "options")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
            .unwrap_or_default();
        let requested = self.attrs.int(node, "value", 0);
        let value = if options.is_empty() {
            0
        } else {
            requested.clamp(0, options.len() as i32 - 1) as usize
        };
        let shown = options.get(value).cloned().unwrap_or_default();

        let style = self.text_style(node, shown.clone(), self.theme.text_color, TextAlign::MidlineLeft);
        self.host.attach(label, Component::Text(style));
        self.host.attach(h.node, Component::Dropdown(DropdownSpec { options: options.clone(), value, label }));
        h.set_text_surface(label, shown);
        h.parts = WidgetParts::Dropdown { label, options, value };
        Ok(())
    }

    fn build_linear_layout(&mut self, node: &MarkupNode, h: &mut WidgetHandle, axis: Axis) -> Result<(), BuildError> {
        let horizontal = axis == Axis::Horizontal;
        let spec = LinearLayout {
            axis,
            spacing: self.attrs.float(node, "spacing", 0.0),
            child_alignment: self.attrs.enumeration(
                node,
                "childAlignment",
                if horizontal { TextAnchor::MiddleCenter } else { TextAnchor::UpperCenter },
            ),
            reverse: self.attrs.boolean(node, "reverse", false),
            control_child_width: self.attrs.boolean(node, "controlChildWidth", true),
            control_child_height: self.attrs.boolean(node, "controlChildHeight", true),
            force_expand_width: self.attrs.boolean(node, "forceExpandWidth", horizontal),
            force_expand_height: self.attrs.boolean(node, "forceExpandHeight", !horizontal),
            padding: self.padding(node),
        };
        self.host.attach(h.node, Component::Layout(spec));
        self.attach_auto_size(node, h.node);
        Ok(())
    }

    fn build_grid_layout(&mut self, node: &MarkupNode, h: &mut WidgetHandle) -> Result<(), BuildError> {
        let constraint_count = self.attrs.int(node, "constraintCount", 1);
        if constraint_count < 1 {
            return Err(BuildError::ConstraintCount(constraint_count));
        }
        let spec = GridSpec {
            cell_size: self.attrs.vec2(node, "cellSize", Vec2::new(100.0, 100.0)),
            spacing: self.attrs.vec2(node, "spacing", Vec2::ZERO),
            start_corner: self.attrs.enumeration(node, "startCorner", Corner::UpperLeft),
            start_axis: self.attrs.enumeration(node, "startAxis", Axis::Horizontal),
            child_alignment: self.attrs.enumeration(node, "childAlignment", TextAnchor::UpperLeft),
            constraint: self.attrs.enumeration(node, "constraint", GridConstraint::FixedColumnCount),
            constraint_count,
            padding: self.padding(node),
        };
        self.host.attach(h.node, Component::Grid(spec));
        self.attach_auto_size(node, h.node);
        Ok(())
    }

    fn attach_auto_size(&mut self, node: &MarkupNode, target: NodeId) {
        if self.attrs.boolean(node, "autoSize", false) {
            self.host.attach(target, Component::SizeFitter {
                horizontal: FitMode::Preferred,
                vertical: FitMode::Preferred,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use nabu_engine::host::SceneTree;
    use nabu_markup::parse_str;

    struct Built {
        host: SceneTree,
        widgets: Widgets,
        registry: ElementRegistry,
        stats: CompileStats,
    }

    impl Built {
        fn get(&self, name: &str) -> &WidgetHandle {
            self.registry.get(name).and_then(|id| self.widgets.get(id)).unwrap()
        }

        fn component(&self, node: NodeId, kind: &str) -> &Component {
            self.host.node(node).unwrap().component(kind).unwrap()
        }
    }

    fn build(src: &str) -> Built {
        let doc = parse_str(src).unwrap();
        let config = SessionConfig::default();
        let mut host = SceneTree::new();
        let mut attrs = AttributeResolver::new(false);
        let mut widgets = Widgets::new();
        let mut registry = ElementRegistry::new();
        let mut resources = ResourceBindingManager::new(&config);
        let parent = host.root();
        let stats = MarkupCompiler::new(
            &mut host,
            &mut attrs,
            &mut widgets,
            &mut registry,
            &mut resources,
            &config.theme,
        )
        .compile(&doc.root, parent);
        Built { host, widgets, registry, stats }
    }

    #[test]
    fn transform_attribute_precedence() {
        let b = build(
            r#"<UIML>
                 <Panel name="a" size="10,20" width="99" position="1,2" anchoredPosition="7,7"/>
                 <Panel name="b" width="30" anchoredPosition="3,4" scale="2,2"/>
               </UIML>"#,
        );
        let a = b.get("a");
        assert_eq!(a.transform.size, Vec2::new(10.0, 20.0));
        assert_eq!(a.transform.position, Vec2::new(1.0, 2.0));
        let bb = b.get("b");
        assert_eq!(bb.transform.size, Vec2::new(30.0, 100.0));
        assert_eq!(bb.transform.position, Vec2::new(3.0, 4.0));
        // Two-component scale gets z = 1.
        assert_eq!(bb.transform.scale, Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(bb.home.transform, bb.transform);
        let node = b.host.node(bb.node).unwrap();
        assert_eq!(node.size, Vec2::new(30.0, 100.0));
        assert_eq!(node.anchor_min, Vec2::HALF);
    }

    #[test]
    fn interactable_defaults_by_kind() {
        let b = build(
            r#"<UIML>
                 <Panel name="ghost" alpha="0"/>
                 <Panel name="solid"/>
                 <ProgressBar name="bar"/>
                 <Button name="btn" interactable="off"/>
               </UIML>"#,
        );
        assert!(!b.get("ghost").interactable);
        assert!(b.get("solid").interactable);
        assert!(!b.get("bar").interactable);
        assert!(!b.get("btn").interactable);
        assert!(!b.host.node(b.get("ghost").node).unwrap().interactable);
    }

    #[test]
    fn button_tint_and_optional_label() {
        let b = build(
            r##"<UIML>
                 <Button name="plain" backgroundColor="#FF0000"/>
                 <Button name="labelled" text="Hi" textColor="white" fontSize="20"/>
               </UIML>"##,
        );
        let plain = b.get("plain");
        assert_eq!(plain.parts, WidgetParts::Button { label: None });
        assert!(!plain.has_text_surface());
        match b.component(plain.node, "ButtonTint") {
            Component::ButtonTint(t) => {
                assert_eq!(t.normal, Color::RED);
                assert!(t.pressed.approx_eq(Color::RED.lerp(Color::BLACK, 0.2)));
            }
            other => panic!("unexpected {:?}", other),
        }

        let labelled = b.get("labelled");
        let WidgetParts::Button { label: Some(label) } = labelled.parts else { panic!("no label") };
        match b.component(label, "Text") {
            Component::Text(style) => {
                assert_eq!(style.text, "Hi");
                assert_eq!(style.font_size, 20.0);
                assert_eq!(style.color, Color::WHITE);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn dropdown_options_and_clamped_value() {
        let b = build(
            r#"<UIML>
                 <Dropdown name="d" options=" easy, normal ,hard" value="9"/>
                 <Dropdown name="empty"/>
               </UIML>"#,
        );
        let d = b.get("d");
        match &d.parts {
            WidgetParts::Dropdown { options, value, .. } => {
                assert_eq!(options, &["easy", "normal", "hard"]);
                assert_eq!(*value, 2);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(d.text(), Some("hard"));
        assert_eq!(b.get("empty").text(), Some(""));
    }

    #[test]
    fn input_field_text_surface() {
        let b = build(r#"<UIML><InputField name="who" text="anon" characterLimit="12" contentType="email"/></UIML>"#);
        let h = b.get("who");
        assert_eq!(h.text(), Some("anon"));
        assert!(b.host.find_path("who/Text Area/Text").is_some());
        match b.component(h.node, "InputField") {
            Component::InputField(spec) => {
                assert_eq!(spec.character_limit, 12);
                assert_eq!(spec.content_type, ContentType::Email);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn layouts_and_grid() {
        let b = build(
            r#"<UIML>
                 <VerticalLayout name="v" spacing="4" padding="1,2,3,4" autoSize="true"/>
                 <HorizontalLayout name="h"/>
                 <GridLayout name="g" cellSize="50,25" constraint="fixedRowCount" constraintCount="3"/>
                 <GridLayout name="bad" constraintCount="0"><Text name="lost"/></GridLayout>
               </UIML>"#,
        );
        match b.component(b.get("v").node, "Layout") {
            Component::Layout(l) => {
                assert_eq!(l.axis, Axis::Vertical);
                assert_eq!(l.child_alignment, TextAnchor::UpperCenter);
                assert_eq!(l.padding, Padding { left: 1, right: 2, top: 3, bottom: 4 });
                assert!(l.force_expand_height && !l.force_expand_width);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(b.host.node(b.get("v").node).unwrap().component("SizeFitter").is_some());
        assert!(b.host.node(b.get("h").node).unwrap().component("SizeFitter").is_none());

        match b.component(b.get("g").node, "Grid") {
            Component::Grid(g) => {
                assert_eq!(g.cell_size, Vec2::new(50.0, 25.0));
                assert_eq!(g.constraint, GridConstraint::FixedRowCount);
                assert_eq!(g.constraint_count, 3);
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(b.registry.get("bad").is_none());
        assert!(b.registry.get("lost").is_none());
        assert!(b.host.find_path("bad").is_none());
        assert_eq!(b.stats.failed, 1);
        assert_eq!(b.stats.created, 3);
    }

    #[test]
    fn surface_and_scroll_variants() {
        let b = build(
            r#"<UIML>
                 <Canvas name="hud" renderMode="Camera" planeDistance="40" sortingOrder="2"/>
                 <ScrollView name="both" horizontal="true" vertical="true"/>
                 <ScrollView name="side" horizontal="true" vertical="false"/>
               </UIML>"#,
        );
        match b.component(b.get("hud").node, "Canvas") {
            Component::Canvas(c) => {
                assert_eq!(c.render_mode, RenderMode::Camera);
                assert_eq!(c.plane_distance, 40.0);
                assert_eq!(c.sorting_order, 2);
                assert_eq!(c.reference_resolution, Vec2::new(1920.0, 1080.0));
            }
            other => panic!("unexpected {:?}", other),
        }

        let WidgetParts::ScrollArea { content, .. } = b.get("both").parts else { panic!() };
        let node = b.host.node(content).unwrap();
        assert_eq!((node.anchor_min, node.anchor_max), (Vec2::new(0.0, 1.0), Vec2::new(0.0, 1.0)));
        assert_eq!(node.size, Vec2::new(300.0, 300.0));
        assert!(node.component("Layout").is_none());

        let WidgetParts::ScrollArea { content, .. } = b.get("side").parts else { panic!() };
        match b.component(content, "Layout") {
            Component::Layout(l) => {
                assert_eq!(l.axis, Axis::Horizontal);
                assert_eq!(l.spacing, 5.0);
            }
            other => panic!("unexpected {:?}", other),
        }
        match b.component(content, "SizeFitter") {
            Component::SizeFitter { horizontal, vertical } => {
                assert_eq!(*horizontal, FitMode::Preferred);
                assert_eq!(*vertical, FitMode::Unconstrained);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn progress_fill_follows_direction() {
        let b = build(r#"<UIML><ProgressBar name="p" value="0.25" direction="BottomToTop"/></UIML>"#);
        let WidgetParts::ProgressBar { fill, value, .. } = b.get("p").parts else { panic!() };
        assert_eq!(value, 0.25);
        let node = b.host.node(fill).unwrap();
        assert_eq!((node.anchor_min, node.anchor_max), (Vec2::ZERO, Vec2::new(1.0, 0.25)));
        assert!(b.host.find_path("p/Fill Area/Fill").is_some());
    }

    #[test]
    fn handlers_are_attached() {
        let b = build(r#"<UIML><Button name="go" onClick="start(1); beep" onHover="glow"/></UIML>"#);
        let hs = &b.get("go").handlers;
        assert_eq!(hs.len(), 3);
        assert_eq!(hs[0].params, ["1"]);
        assert_eq!(hs[2].event_type, "hover");
    }
}
