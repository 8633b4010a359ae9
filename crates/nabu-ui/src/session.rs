use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error, info, warn};

use nabu_engine::host::UiHost;
use nabu_markup::{parse_str, ElementKind, MarkupDocument};

use crate::anim::{Animator, Property, Step, TweenValue};
use crate::attrs::AttributeResolver;
use crate::commands::{self, apply_value, CommandBus, CommandCtx, EventInvocation};
use crate::compiler::{CompileStats, MarkupCompiler};
use crate::config::SessionConfig;
use crate::error::{CommandError, LoadError, LoadResult};
use crate::registry::ElementRegistry;
use crate::resources::{Fetcher, ResourceBindingManager, SourceKind};
use crate::widget::{WidgetHandle, WidgetId, Widgets};

/// Progress changes requested with `animate` take this long.
const PROGRESS_TWEEN_SECS: f32 = 0.5;

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

// ── Session ───────────────────────────────────────────────────────────────

/// One live UI: a host, the widgets compiled into it and everything that
/// acts on them. Single-threaded; call [`Session::tick`] once per frame.
///
/// ```rust,ignore
/// let mut ui = Session::new(SceneTree::new(), SessionConfig::default());
/// ui.load_str(r#"<UIML><Button name="go" text="Go"/></UIML>"#)?;
/// ui.execute("go", "bounce", &["0.4"])?;
/// ui.tick(1.0 / 60.0);
/// ```
pub struct Session<H: UiHost> {
    host: H,
    config: SessionConfig,
    attrs: AttributeResolver,
    widgets: Widgets,
    registry: ElementRegistry,
    animator: Animator,
    resources: ResourceBindingManager,
    bus: CommandBus,
    loaded: bool,
}

impl<H: UiHost> Session<H> {
    pub fn new(host: H, config: SessionConfig) -> Self {
        let resources = ResourceBindingManager::new(&config);
        Self {
            host,
            attrs: AttributeResolver::new(config.strict_attributes),
            widgets: Widgets::new(),
            registry: ElementRegistry::new(),
            animator: Animator::new(),
            resources,
            bus: CommandBus::new(),
            loaded: false,
            config,
        }
    }

    /// Replaces the transport used for image loads.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.resources.set_fetcher(fetcher);
        self
    }

    fn ctx(&mut self) -> CommandCtx<'_> {
        CommandCtx {
            host: &mut self.host,
            widgets: &mut self.widgets,
            registry: &self.registry,
            animator: &mut self.animator,
            config: &self.config,
        }
    }

    // ── Loading ───────────────────────────────────────────────────────────

    /// Parses and compiles `src`. With `clear_on_load` the canvas is
    /// cleared first, so a parse error or wrong root tag leaves it empty;
    /// otherwise a failed load changes nothing.
    pub fn load_str(&mut self, src: &str) -> LoadResult<CompileStats> {
        self.clear_if_configured();
        let doc = parse_str(src).inspect_err(|e| error!("{}", e))?;
        self.compile_document(&doc)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> LoadResult<CompileStats> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| {
            let e = LoadError::Io { path: path.display().to_string(), source };
            error!("{}", e);
            e
        })?;
        info!("loading {}", path.display());
        self.load_str(&src)
    }

    pub fn load_document(&mut self, doc: &MarkupDocument) -> LoadResult<CompileStats> {
        self.clear_if_configured();
        self.compile_document(doc)
    }

    fn clear_if_configured(&mut self) {
        if self.config.clear_on_load {
            self.clear_canvas();
        }
    }

    fn compile_document(&mut self, doc: &MarkupDocument) -> LoadResult<CompileStats> {
        let root = &doc.root;
        if !root.tag.eq_ignore_ascii_case(&self.config.root_tag) {
            let e = LoadError::RootTag { expected: self.config.root_tag.clone(), found: root.tag.clone() };
            error!("{}", e);
            return Err(e);
        }

        let parent = self.host.root();
        let stats = MarkupCompiler::new(
            &mut self.host,
            &mut self.attrs,
            &mut self.widgets,
            &mut self.registry,
            &mut self.resources,
            &self.config.theme,
        )
        .compile(root, parent);

        self.loaded = true;
        info!(
            "compiled {} element(s) ({} unnamed, {} unknown, {} failed)",
            stats.created, stats.unnamed, stats.unknown, stats.failed
        );
        Ok(stats)
    }

    /// Unbinds and forgets every widget, stops all animation and empties
    /// the host root. Resource payloads stay in their slots.
    pub fn clear_canvas(&mut self) {
        let (widgets, resources) = (&mut self.widgets, &mut self.resources);
        self.registry.clear_all(|id| {
            resources.unbind(id, widgets);
        });
        // Handles shadowed by a later duplicate name are no longer in the
        // registry but may still hold a binding.
        self.resources.clear_bindings();
        self.animator.clear();

        let root = self.host.root();
        for child in self.host.children(root) {
            self.host.destroy_node(child);
        }
        let dropped = self.widgets.len();
        self.widgets.clear();
        self.loaded = false;
        debug!("cleared canvas ({} handle(s))", dropped);
    }

    // ── Commands ──────────────────────────────────────────────────────────

    pub fn execute(&mut self, element: &str, command: &str, args: &[&str]) -> Result<(), CommandError> {
        let args = owned(args);
        commands::execute(&mut self.ctx(), element, command, &args)
    }

    /// Queues `command` to run once `delay` seconds of ticks have passed.
    pub fn schedule(&mut self, delay: f32, element: &str, command: &str, args: &[&str]) {
        self.animator.schedule(delay, Step::Command {
            element: element.to_string(),
            command: command.to_string(),
            args: owned(args),
        });
    }

    pub fn set_event_handler(&mut self, f: impl FnMut(&EventInvocation) + 'static) {
        self.bus.set_event_handler(f);
    }

    pub fn clear_event_handler(&mut self) {
        self.bus.clear_event_handler();
    }

    /// Forwards `element`'s declared handlers for `event_type`.
    pub fn invoke_event(&mut self, element: &str, event_type: &str, args: &[&str]) -> Result<usize, CommandError> {
        self.bus.invoke_event(&self.widgets, &self.registry, element, event_type, &owned(args))
    }

    /// Sets a progress bar's value, clamped to its range.
    pub fn set_progress_value(&mut self, element: &str, value: f32, animate: bool) -> Result<(), CommandError> {
        let result = self.progress_target(element).map(|id| {
            let duration = if animate { PROGRESS_TWEEN_SECS } else { 0.0 };
            self.ctx().animate(id, Property::Progress, TweenValue::Scalar(value), duration);
        });
        if let Err(e) = &result {
            warn!("set_progress_value: {}", e);
        }
        result
    }

    fn progress_target(&self, element: &str) -> Result<WidgetId, CommandError> {
        let id = self
            .registry
            .get(element)
            .ok_or_else(|| CommandError::UnknownElement(element.to_string()))?;
        match self.widgets.get(id) {
            Some(h) if h.progress().is_some() => Ok(id),
            _ => Err(CommandError::NotAProgressBar(element.to_string())),
        }
    }

    /// Advances animation by `dt` seconds, runs steps that came due and
    /// applies finished image loads.
    pub fn tick(&mut self, dt: f32) {
        let advance = self.animator.advance(dt);
        for u in advance.updates {
            apply_value(&mut self.widgets, &mut self.host, u.widget, u.property, u.value);
        }
        if !advance.due.is_empty() {
            let mut ctx = self.ctx();
            for step in advance.due {
                ctx.run_step(step);
            }
        }
        self.resources.poll_loads(&mut self.widgets, &mut self.host);
    }

    // ── Resources ─────────────────────────────────────────────────────────

    pub fn set_text(&mut self, slot: usize, text: &str) -> usize {
        self.resources.set_text(slot, text, &mut self.widgets, &mut self.host)
    }

    pub fn load_image(&mut self, slot: usize, source: &str, kind: SourceKind) -> Option<u64> {
        self.resources.load_image(slot, source, kind)
    }

    /// Blocks until outstanding image loads land (or `timeout` passes).
    pub fn wait_for_loads(&mut self, timeout: Duration) -> usize {
        self.resources.wait_for_loads(timeout, &mut self.widgets, &mut self.host)
    }

    /// Rebinds the element named `element` to `slot`.
    pub fn change_binding(&mut self, element: &str, slot: usize) -> Result<(), CommandError> {
        let Some(id) = self.registry.get(element) else {
            let e = CommandError::UnknownElement(element.to_string());
            warn!("change_binding: {}", e);
            return Err(e);
        };
        if self.resources.change_binding(id, slot, &mut self.widgets, &mut self.host) {
            Ok(())
        } else {
            Err(CommandError::UnknownSlot(slot))
        }
    }

    pub fn move_binding(&mut self, from: usize, to: usize, index: usize) -> bool {
        self.resources.move_binding(from, to, index, &mut self.widgets, &mut self.host)
    }

    pub fn unbind(&mut self, element: &str) -> bool {
        match self.registry.get(element) {
            Some(id) => self.resources.unbind(id, &mut self.widgets),
            None => false,
        }
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn element(&self, name: &str) -> Option<&WidgetHandle> {
        self.registry.get(name).and_then(|id| self.widgets.get(id))
    }

    pub fn element_id(&self, name: &str) -> Option<WidgetId> {
        self.registry.get(name)
    }

    pub fn element_of(&self, kind: ElementKind, name: &str) -> Option<&WidgetHandle> {
        self.registry.get_kind(kind, name).and_then(|id| self.widgets.get(id))
    }

    pub fn handle(&self, id: WidgetId) -> Option<&WidgetHandle> {
        self.widgets.get(id)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of names currently registered.
    pub fn loaded_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of live handles, including ones shadowed by a later name.
    pub fn handle_count(&self) -> usize {
        self.widgets.len()
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn attrs(&self) -> &AttributeResolver {
        &self.attrs
    }

    pub fn attrs_mut(&mut self) -> &mut AttributeResolver {
        &mut self.attrs
    }

    pub fn resources(&self) -> &ResourceBindingManager {
        &self.resources
    }

    pub fn resources_mut(&mut self) -> &mut ResourceBindingManager {
        &mut self.resources
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::EventQueue;
    use crate::error::FetchError;
    use crate::resources::{FetchRequest, LoadState};
    use crate::widget::WidgetParts;
    use nabu_engine::coords::{Vec2, Vec3};
    use nabu_engine::host::{Component, SceneTree};
    use std::io::Cursor;

    fn session() -> Session<SceneTree> {
        Session::new(SceneTree::new(), SessionConfig::default())
    }

    fn loaded(src: &str) -> Session<SceneTree> {
        let mut s = session();
        s.load_str(src).unwrap();
        s
    }

    fn settle(s: &mut Session<SceneTree>) {
        for _ in 0..600 {
            s.tick(1.0 / 60.0);
        }
    }

    const ROOT_GO: &str = r#"
        <UIML>
          <Panel name="root" size="400,300">
            <Button name="go" text="Go" position="0,-40" />
          </Panel>
        </UIML>"#;

    #[test]
    fn root_go_scenario() {
        let mut s = loaded(ROOT_GO);
        assert_eq!(s.loaded_count(), 2);
        assert!(s.element_of(ElementKind::Panel, "root").is_some());
        let go = s.element_of(ElementKind::Button, "go").unwrap();
        assert_eq!(go.text(), Some("Go"));
        assert_eq!(go.transform.position, Vec2::new(0.0, -40.0));

        let label = s.host().find_path("root/go/Text").unwrap();
        assert_eq!(s.host().node(label).unwrap().text(), Some("Go"));

        let before = s.element("go").unwrap().transform.scale;
        s.execute("go", "bounce", &["2"]).unwrap();
        s.tick(1.0);
        assert_eq!(s.element("go").unwrap().transform.scale, before * 1.2);
        settle(&mut s);
        assert_eq!(s.element("go").unwrap().transform.scale, before);
        assert!(s.animator().is_idle());
    }

    #[test]
    fn clear_canvas_empties_everything() {
        let mut s = loaded(
            r#"<UIML>
                 <Text name="a" bindId="1"/>
                 <Text name="b" bindId="1"/>
                 <Text name="b" bindId="2"/>
               </UIML>"#,
        );
        assert_eq!(s.resources().slot(1).unwrap().bindings().len(), 2);
        s.execute("a", "fadeout", &["5"]).unwrap();

        s.clear_canvas();
        assert!(s.registry().is_empty());
        for kind in ElementKind::ALL {
            assert_eq!(s.registry().len_kind(kind), 0);
        }
        for slot in 0..s.resources().slot_count() {
            assert!(s.resources().slot(slot).unwrap().bindings().is_empty());
        }
        assert!(s.animator().is_idle());
        assert_eq!(s.handle_count(), 0);
        assert!(s.host().children(s.host().root()).is_empty());
        assert!(!s.is_loaded());
    }

    #[test]
    fn handle_count_follows_named_elements() {
        let mut s = loaded(
            r#"<UIML>
                 <Panel name="p">
                   <Widget name="mystery">
                     <Text name="inside_unknown"/>
                   </Widget>
                   <Panel>
                     <Text name="inside_unnamed"/>
                   </Panel>
                   <Text name=""/>
                 </Panel>
               </UIML>"#,
        );
        assert_eq!(s.loaded_count(), 2);
        assert_eq!(s.handle_count(), 2);
        assert!(s.element("mystery").is_none());
        assert!(s.host().find_path("p/inside_unknown").is_some());
        assert!(s.element("inside_unnamed").is_none());

        let stats = s.load_str(r#"<uiml><Widget name="w"/><Panel/></uiml>"#).unwrap();
        assert_eq!(stats, CompileStats { created: 0, unnamed: 1, unknown: 1, failed: 0 });
    }

    #[test]
    fn unnamed_element_drops_its_subtree() {
        let s = loaded(
            r#"<UIML>
                 <Panel>
                   <Button name="inner"><Text name="deeper"/></Button>
                 </Panel>
                 <Text name="sibling"/>
               </UIML>"#,
        );
        assert!(s.element("inner").is_none());
        assert!(s.element("deeper").is_none());
        assert!(s.element("sibling").is_some());
        assert_eq!(s.handle_count(), 1);
        assert_eq!(s.host().children(s.host().root()).len(), 1);
    }

    #[test]
    fn duplicate_names_last_wins() {
        let s = loaded(
            r#"<UIML>
                 <Panel name="x"><Text name="child"/></Panel>
                 <Panel name="x"/>
               </UIML>"#,
        );
        assert_eq!(s.loaded_count(), 2);
        assert_eq!(s.handle_count(), 3);
        assert_eq!(s.element_id("x"), Some(WidgetId(2)));
        // The first panel still owns its child.
        assert!(s.host().find_path("x/child").is_some());
    }

    #[test]
    fn failed_reload_leaves_cleared_canvas() {
        let mut s = loaded(ROOT_GO);
        s.set_text(1, "kept");
        assert!(matches!(s.load_str("<Canvas><Panel"), Err(LoadError::Parse(_))));
        assert_eq!(s.loaded_count(), 0);
        assert_eq!(s.handle_count(), 0);
        assert!(s.element("root").is_none());
        assert!(s.host().children(s.host().root()).is_empty());
        assert!(!s.is_loaded());
        // Slot payloads outlive the canvas.
        assert_eq!(s.resources().slot(1).unwrap().text(), Some("kept"));

        s.load_str(ROOT_GO).unwrap();
        assert!(matches!(s.load_str("<Canvas/>"), Err(LoadError::RootTag { .. })));
        assert!(s.registry().is_empty());
    }

    #[test]
    fn failed_load_without_clearing_keeps_previous_tree() {
        let config = SessionConfig { clear_on_load: false, ..SessionConfig::default() };
        let mut s = Session::new(SceneTree::new(), config);
        s.load_str(ROOT_GO).unwrap();
        assert!(matches!(s.load_str("<UIML><Panel name='a'></UIML>"), Err(LoadError::Parse(_))));
        assert!(matches!(s.load_str("<Canvas/>"), Err(LoadError::RootTag { .. })));
        assert!(matches!(s.load_file("/no/such/file.uiml"), Err(LoadError::Io { .. })));
        assert_eq!(s.loaded_count(), 2);
        assert!(s.element("go").is_some());
        assert!(s.is_loaded());
    }

    #[test]
    fn clear_on_load_can_be_disabled() {
        let config = SessionConfig { clear_on_load: false, ..SessionConfig::default() };
        let mut s = Session::new(SceneTree::new(), config);
        s.load_str(ROOT_GO).unwrap();
        s.load_str(r#"<UIML><Text name="extra"/></UIML>"#).unwrap();
        assert_eq!(s.loaded_count(), 3);
    }

    #[test]
    fn scroll_area_children_go_into_content() {
        let s = loaded(
            r#"<UIML>
                 <ScrollView name="list">
                   <Text name="row1"/>
                   <Text name="row2"/>
                 </ScrollView>
               </UIML>"#,
        );
        let h = s.element("list").unwrap();
        let WidgetParts::ScrollArea { content, .. } = h.parts else { panic!("not a scroll area") };
        let row1 = s.element("row1").unwrap().node;
        assert_eq!(s.host().node(row1).unwrap().parent, Some(content));
        assert!(s.host().find_path("list/Viewport/Content/row2").is_some());

        let content_node = s.host().node(content).unwrap();
        assert_eq!(content_node.anchor_min, Vec2::new(0.0, 1.0));
        assert_eq!(content_node.pivot, Vec2::new(0.5, 1.0));
        assert!(content_node.component("Layout").is_some());
    }

    #[test]
    fn toggle_joins_its_group() {
        let s = loaded(
            r#"<UIML>
                 <ToggleGroup name="opts"/>
                 <Toggle name="a" group="opts" isOn="yes"/>
                 <Toggle name="b" group="missing"/>
               </UIML>"#,
        );
        let group = s.element_id("opts");
        let WidgetParts::Toggle { is_on, group: g, checkmark } = s.element("a").unwrap().parts else {
            panic!("not a toggle")
        };
        assert!(is_on);
        assert_eq!(g, group);
        assert_eq!(s.host().node(checkmark).unwrap().alpha, 1.0);

        let group_node = s.element("opts").unwrap().node;
        let a_node = s.element("a").unwrap().node;
        match s.host().node(a_node).unwrap().component("Toggle") {
            Some(Component::Toggle(spec)) => assert_eq!(spec.group, Some(group_node)),
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(s.element("b").unwrap().parts, WidgetParts::Toggle { group: None, .. }));
    }

    #[test]
    fn restore_state_resets_toggle() {
        let mut s = loaded(r#"<UIML><Toggle name="sound" isOn="true"/></UIML>"#);
        let node = s.element("sound").unwrap().node;
        let WidgetParts::Toggle { checkmark, .. } = s.element("sound").unwrap().parts else {
            panic!("not a toggle")
        };
        // The user switched it off on the host side.
        s.host_mut().set_toggle(node, false);
        s.host_mut().set_alpha(checkmark, 0.0);

        s.execute("sound", "restoreToOriginalState", &[]).unwrap();
        match s.host().node(node).unwrap().component("Toggle") {
            Some(Component::Toggle(spec)) => assert!(spec.is_on),
            other => panic!("unexpected component {:?}", other),
        }
        assert_eq!(s.host().node(checkmark).unwrap().alpha, 1.0);
        assert_eq!(s.element("sound").unwrap().is_on(), Some(true));
    }

    #[test]
    fn progress_bar_clamps_and_animates() {
        let mut s = loaded(
            r#"<UIML>
                 <ProgressBar name="hp" minValue="0" maxValue="10" value="40"/>
                 <ProgressBar name="broken" minValue="5" maxValue="1"/>
                 <Text name="after"/>
               </UIML>"#,
        );
        let hp = s.element("hp").unwrap();
        assert_eq!(hp.progress(), Some(10.0));
        assert!(!hp.interactable);
        assert!(s.element("broken").is_none());
        assert!(s.element("after").is_some());

        s.set_progress_value("hp", 0.0, true).unwrap();
        s.tick(0.25);
        assert!((s.element("hp").unwrap().progress().unwrap() - 5.0).abs() < 1e-4);
        s.tick(0.25);
        assert_eq!(s.element("hp").unwrap().progress(), Some(0.0));

        s.set_progress_value("hp", -3.0, false).unwrap();
        assert_eq!(s.element("hp").unwrap().progress(), Some(0.0));
        assert_eq!(
            s.set_progress_value("after", 1.0, false),
            Err(CommandError::NotAProgressBar("after".into()))
        );
    }

    #[test]
    fn set_text_round_trip() {
        let mut s = loaded(
            r#"<UIML>
                 <Text name="title" bindId="3"/>
                 <Button name="ok" text="OK" bindId="3"/>
                 <Text name="other" bindId="4"/>
               </UIML>"#,
        );
        assert!(s.unbind("other"));
        s.change_binding("other", 3).unwrap();
        s.unbind("ok");
        assert_eq!(s.set_text(3, "X"), 2);
        assert_eq!(s.element("title").unwrap().text(), Some("X"));
        assert_eq!(s.element("other").unwrap().text(), Some("X"));
        assert_eq!(s.element("ok").unwrap().text(), Some("OK"));
        assert_eq!(s.change_binding("title", 999), Err(CommandError::UnknownSlot(999)));
    }

    #[test]
    fn restore_after_commands() {
        let mut s = loaded(ROOT_GO);
        s.execute("root", "moveto", &["1", "50", "50"]).unwrap();
        s.execute("root", "fade", &["1", "0.2"]).unwrap();
        s.tick(0.5);
        s.execute("root", "restoretooriginalstate", &[]).unwrap();
        let h = s.element("root").unwrap();
        assert_eq!(h.transform.position, Vec2::ZERO);
        assert_eq!(h.alpha, 1.0);
        assert_eq!(h.transform.scale, Vec3::ONE);
        settle(&mut s);
        assert_eq!(s.element("root").unwrap().transform.position, Vec2::ZERO);
    }

    #[test]
    fn scheduled_commands_run_on_tick() {
        let mut s = loaded(ROOT_GO);
        s.schedule(0.5, "go", "setalpha", &["0"]);
        s.schedule(0.25, "go", "settext", &["Wait"]);
        s.tick(0.3);
        assert_eq!(s.element("go").unwrap().text(), Some("Wait"));
        assert_eq!(s.element("go").unwrap().alpha, 1.0);
        s.tick(0.3);
        assert_eq!(s.element("go").unwrap().alpha, 0.0);
    }

    #[test]
    fn declared_events_reach_queue() {
        let mut s = loaded(
            r#"<UIML><Button name="go" text="Go" onClick="startGame(easy); playSound"/></UIML>"#,
        );
        let queue = EventQueue::new();
        s.set_event_handler(queue.sink());
        assert_eq!(s.invoke_event("go", "onClick", &["p1"]), Ok(2));
        let events = queue.take_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].element, "go");
        assert_eq!(events[0].args, ["easy", "p1"]);
        assert_eq!(events[1].command, "playSound");
    }

    struct PngFetcher;

    impl Fetcher for PngFetcher {
        fn fetch(&self, request: &FetchRequest) -> Result<Vec<u8>, FetchError> {
            if request.source == "bad" {
                return Err(FetchError::UnknownAddress("bad".into()));
            }
            let img = image::RgbaImage::from_pixel(8, 4, image::Rgba([0, 0, 255, 255]));
            let mut out = Vec::new();
            img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)?;
            Ok(out)
        }
    }

    #[test]
    fn image_load_through_injected_fetcher() {
        let mut s = Session::new(SceneTree::new(), SessionConfig::default()).with_fetcher(Arc::new(PngFetcher));
        s.load_str(r#"<UIML><Image name="logo" bindId="7"/></UIML>"#).unwrap();

        s.load_image(7, "https://example.invalid/logo.png", SourceKind::RemoteUrl).unwrap();
        assert_eq!(s.wait_for_loads(Duration::from_secs(5)), 1);
        let logo = s.element("logo").unwrap();
        assert_eq!(logo.image().map(|i| (i.width, i.height)), Some((8, 4)));
        let node = s.host().node(logo.node).unwrap();
        assert_eq!(node.image.as_ref().map(|i| i.rgba8[2]), Some(255));

        s.load_image(7, "bad", SourceKind::ManagedAddressable).unwrap();
        s.wait_for_loads(Duration::from_secs(5));
        assert_eq!(s.resources().slot(7).unwrap().state, LoadState::Loaded);
        assert_eq!(s.element("logo").unwrap().image().map(|i| i.width), Some(8));
    }
}
