//! Named runtime commands and declared-event dispatch.
//!
//! Built-in commands live in one case-insensitive name → function table.
//! Every failure is logged as a warning and returned; a failed command has
//! changed nothing.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

use nabu_engine::coords::{Vec2, Vec3};
use nabu_engine::host::UiHost;

use crate::anim::{Animator, Property, Step, TweenValue};
use crate::attrs::{parse_bool, AttrEnum};
use crate::config::SessionConfig;
use crate::error::CommandError;
use crate::registry::ElementRegistry;
use crate::widget::{WidgetId, Widgets};

// ── CommandCtx ────────────────────────────────────────────────────────────

/// Everything a command may touch.
pub struct CommandCtx<'a> {
    pub host: &'a mut dyn UiHost,
    pub widgets: &'a mut Widgets,
    pub registry: &'a ElementRegistry,
    pub animator: &'a mut Animator,
    pub config: &'a SessionConfig,
}

impl CommandCtx<'_> {
    fn current(&self, id: WidgetId, property: Property) -> Option<TweenValue> {
        let h = self.widgets.get(id)?;
        Some(match property {
            Property::Alpha    => TweenValue::Scalar(h.alpha),
            Property::Position => TweenValue::Vec2(h.transform.position),
            Property::Scale    => TweenValue::Vec3(h.transform.scale),
            Property::Progress => TweenValue::Scalar(h.progress()?),
        })
    }

    /// Starts a tween from the property's current value. A non-positive
    /// duration applies the target immediately.
    pub fn animate(&mut self, id: WidgetId, property: Property, target: TweenValue, duration: f32) {
        let Some(from) = self.current(id, property) else { return };
        if let Some(now) = self.animator.start(id, property, from, target, duration) {
            apply_value(self.widgets, &mut *self.host, id, property, now);
        }
    }

    /// Runs one step the animator reported as due.
    pub fn run_step(&mut self, step: Step) {
        match step {
            Step::Tween { widget, property, target, duration } => {
                self.animate(widget, property, target, duration);
            }
            Step::BounceSettle { widget, duration } => {
                if let Some(rest) = self.animator.settle_bounce(widget) {
                    self.animate(widget, Property::Scale, TweenValue::Vec3(rest), duration);
                }
            }
            Step::Command { element, command, args } => {
                let _ = execute(self, &element, &command, &args);
            }
        }
    }
}

/// Writes `value` to the handle's property and pushes it to the host.
pub fn apply_value(widgets: &mut Widgets, host: &mut dyn UiHost, id: WidgetId, property: Property, value: TweenValue) {
    let Some(h) = widgets.get_mut(id) else { return };
    match (property, value) {
        (Property::Alpha, TweenValue::Scalar(a))    => h.set_alpha(host, a),
        (Property::Position, TweenValue::Vec2(p))   => h.set_position(host, p),
        (Property::Scale, TweenValue::Vec3(s))      => h.set_scale(host, s),
        (Property::Progress, TweenValue::Scalar(v)) => {
            h.set_progress(host, v);
        }
        (p, v) => debug!("ignoring {:?} value {:?} for {} on '{}'", p, v, id, h.name),
    }
}

// ── Args ──────────────────────────────────────────────────────────────────

/// Positional string arguments with typed accessors.
pub struct Args<'a> {
    command: &'a str,
    raw: &'a [String],
    default_duration: f32,
}

impl<'a> Args<'a> {
    pub fn new(command: &'a str, raw: &'a [String], default_duration: f32) -> Self {
        Self { command, raw, default_duration }
    }

    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.raw.get(index).map(|s| s.trim())
    }

    pub fn float(&self, index: usize, what: &'static str) -> Result<f32, CommandError> {
        let raw = self.get(index).ok_or_else(|| CommandError::missing(self.command, index, what))?;
        raw.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| CommandError::invalid(self.command, raw, what))
    }

    /// Argument 0 as a required duration.
    pub fn duration(&self) -> Result<f32, CommandError> {
        self.float(0, "duration")
    }

    /// Argument 0 as a duration, or the configured default when absent.
    pub fn duration_or_default(&self) -> Result<f32, CommandError> {
        match self.get(0) {
            None | Some("") => Ok(self.default_duration),
            Some(_) => self.duration(),
        }
    }

    pub fn boolean(&self, index: usize, what: &'static str) -> Result<bool, CommandError> {
        let raw = self.get(index).ok_or_else(|| CommandError::missing(self.command, index, what))?;
        parse_bool(raw).ok_or_else(|| CommandError::invalid(self.command, raw, what))
    }
}

// ── Built-in table ────────────────────────────────────────────────────────

type Builtin = fn(&mut CommandCtx<'_>, WidgetId, &Args<'_>) -> Result<(), CommandError>;

const BUILTINS: &[(&str, Builtin)] = &[
    ("show",                      cmd_show),
    ("hide",                      cmd_hide),
    ("toggle",                    cmd_toggle),
    ("fadein",                    cmd_fade_in),
    ("fadeout",                   cmd_fade_out),
    ("fade",                      cmd_fade),
    ("moveto",                    cmd_move_to),
    ("movetooriginal",            cmd_move_to_original),
    ("restoretooriginalposition", cmd_restore_position),
    ("scale",                     cmd_scale),
    ("slideoffscreen",            cmd_slide_off_screen),
    ("bounce",                    cmd_bounce),
    ("setalpha",                  cmd_set_alpha),
    ("setinteractable",           cmd_set_interactable),
    ("settext",                   cmd_set_text),
    ("restoretooriginalstate",    cmd_restore_state),
];

fn builtin(name: &str) -> Option<Builtin> {
    BUILTINS.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, f)| *f)
}

/// Lowercase names of every built-in command.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|(n, _)| *n)
}

pub fn is_command(name: &str) -> bool {
    builtin(name.trim()).is_some()
}

/// Resolves `element` by name and runs `command` on it.
pub fn execute(ctx: &mut CommandCtx<'_>, element: &str, command: &str, args: &[String]) -> Result<(), CommandError> {
    let result = dispatch(ctx, element, command, args);
    if let Err(e) = &result {
        warn!("{}({}) on '{}': {}", command, args.join(", "), element, e);
    }
    result
}

fn dispatch(ctx: &mut CommandCtx<'_>, element: &str, command: &str, args: &[String]) -> Result<(), CommandError> {
    let id = ctx
        .registry
        .get(element)
        .ok_or_else(|| CommandError::UnknownElement(element.to_string()))?;
    let f = builtin(command.trim()).ok_or_else(|| CommandError::UnknownCommand(command.to_string()))?;
    let args = Args::new(command, args, ctx.config.default_duration);
    f(ctx, id, &args)
}

// ── Visibility ────────────────────────────────────────────────────────────

fn home_position(ctx: &CommandCtx<'_>, id: WidgetId) -> Vec2 {
    ctx.widgets.get(id).map(|h| h.home.transform.position).unwrap_or(Vec2::ZERO)
}

fn show(ctx: &mut CommandCtx<'_>, id: WidgetId, d: f32) {
    let home = home_position(ctx, id);
    ctx.animate(id, Property::Alpha, TweenValue::Scalar(1.0), d);
    ctx.animate(id, Property::Position, TweenValue::Vec2(home), d);
    ctx.animate(id, Property::Scale, TweenValue::Vec3(Vec3::ONE), d);
}

fn hide(ctx: &mut CommandCtx<'_>, id: WidgetId, d: f32) {
    ctx.animate(id, Property::Alpha, TweenValue::Scalar(0.0), d);
    slide_off_screen(ctx, id, d, SlideDirection::Left);
}

fn cmd_show(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    show(ctx, id, args.duration()?);
    Ok(())
}

fn cmd_hide(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    hide(ctx, id, args.duration()?);
    Ok(())
}

fn cmd_toggle(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let d = args.duration_or_default()?;
    let visible = ctx.widgets.get(id).is_some_and(|h| h.alpha > 0.5);
    if visible { hide(ctx, id, d) } else { show(ctx, id, d) }
    Ok(())
}

// ── Alpha ─────────────────────────────────────────────────────────────────

fn cmd_fade_in(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    ctx.animate(id, Property::Alpha, TweenValue::Scalar(1.0), args.duration()?);
    Ok(())
}

fn cmd_fade_out(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    ctx.animate(id, Property::Alpha, TweenValue::Scalar(0.0), args.duration()?);
    Ok(())
}

fn cmd_fade(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let d = args.duration()?;
    let alpha = args.float(1, "alpha")?;
    ctx.animate(id, Property::Alpha, TweenValue::Scalar(alpha), d);
    Ok(())
}

fn cmd_set_alpha(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let alpha = args.float(0, "alpha")?;
    ctx.animator.cancel(id, Property::Alpha);
    apply_value(ctx.widgets, &mut *ctx.host, id, Property::Alpha, TweenValue::Scalar(alpha));
    Ok(())
}

// ── Position ──────────────────────────────────────────────────────────────

fn cmd_move_to(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let d = args.duration()?;
    let target = Vec2::new(args.float(1, "x")?, args.float(2, "y")?);
    ctx.animate(id, Property::Position, TweenValue::Vec2(target), d);
    Ok(())
}

fn cmd_move_to_original(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let home = home_position(ctx, id);
    ctx.animate(id, Property::Position, TweenValue::Vec2(home), args.duration()?);
    Ok(())
}

fn cmd_restore_position(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let home = home_position(ctx, id);
    ctx.animate(id, Property::Position, TweenValue::Vec2(home), args.duration_or_default()?);
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
    Up,
    Down,
}

impl AttrEnum for SlideDirection {
    const TYPE_NAME: &'static str = "slide direction";
    const TABLE: &'static [(&'static str, Self)] = &[
        ("left",  SlideDirection::Left),
        ("right", SlideDirection::Right),
        ("up",    SlideDirection::Up),
        ("down",  SlideDirection::Down),
    ];
}

fn slide_off_screen(ctx: &mut CommandCtx<'_>, id: WidgetId, d: f32, dir: SlideDirection) {
    let Some(h) = ctx.widgets.get(id) else { return };
    let screen = ctx.config.screen_extent();
    let offset = match dir {
        SlideDirection::Left  => Vec2::new(-screen.x, 0.0),
        SlideDirection::Right => Vec2::new(screen.x, 0.0),
        SlideDirection::Up    => Vec2::new(0.0, screen.y),
        SlideDirection::Down  => Vec2::new(0.0, -screen.y),
    };
    let target = h.transform.position + offset;
    ctx.animate(id, Property::Position, TweenValue::Vec2(target), d);
}

fn cmd_slide_off_screen(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let d = args.duration()?;
    let dir = match args.get(1) {
        None => SlideDirection::Left,
        Some(raw) => SlideDirection::from_name(raw).unwrap_or_else(|| {
            debug!("unknown slide direction {:?}, using left", raw);
            SlideDirection::Left
        }),
    };
    slide_off_screen(ctx, id, d, dir);
    Ok(())
}

// ── Scale ─────────────────────────────────────────────────────────────────

fn cmd_scale(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let d = args.duration()?;
    let s = args.float(1, "scale")?;
    ctx.animate(id, Property::Scale, TweenValue::Vec3(Vec3::splat(s)), d);
    Ok(())
}

fn cmd_bounce(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let d = args.duration()?;
    let Some(current) = ctx.widgets.get(id).map(|h| h.transform.scale) else { return Ok(()) };
    let half = d / 2.0;
    let rest = ctx.animator.begin_bounce(id, current, half);
    ctx.animate(id, Property::Scale, TweenValue::Vec3(rest * ctx.config.bounce_scale), half);
    Ok(())
}

// ── State ─────────────────────────────────────────────────────────────────

fn cmd_set_interactable(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let on = args.boolean(0, "interactable")?;
    if let Some(h) = ctx.widgets.get_mut(id) {
        h.set_interactable(&mut *ctx.host, on);
    }
    Ok(())
}

fn cmd_set_text(ctx: &mut CommandCtx<'_>, id: WidgetId, args: &Args<'_>) -> Result<(), CommandError> {
    let text = args.raw.first().ok_or_else(|| CommandError::missing(args.command, 0, "text"))?;
    let Some(h) = ctx.widgets.get_mut(id) else { return Ok(()) };
    if h.show_text(&mut *ctx.host, text) {
        Ok(())
    } else {
        Err(CommandError::NoTextSurface(h.name.clone()))
    }
}

fn cmd_restore_state(ctx: &mut CommandCtx<'_>, id: WidgetId, _args: &Args<'_>) -> Result<(), CommandError> {
    ctx.animator.cancel_widget(id);
    let Some(h) = ctx.widgets.get_mut(id) else { return Ok(()) };
    let home = h.home.transform.position;
    h.set_alpha(&mut *ctx.host, 1.0);
    h.set_position(&mut *ctx.host, home);
    h.set_scale(&mut *ctx.host, Vec3::ONE);
    h.set_interactable(&mut *ctx.host, true);
    if let Some(on) = h.home.toggle_on {
        h.set_toggle(&mut *ctx.host, on);
    }
    Ok(())
}

// ── Events ────────────────────────────────────────────────────────────────

/// One declared handler forwarded to the application.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInvocation {
    pub element: String,
    pub event_type: String,
    pub command: String,
    /// Declared parameters followed by the invocation's own arguments.
    pub args: Vec<String>,
}

pub type EventHandlerFn = Box<dyn FnMut(&EventInvocation)>;

/// Routes declared `onXxx` handlers to one application callback.
#[derive(Default)]
pub struct CommandBus {
    external: Option<EventHandlerFn>,
}

impl CommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_event_handler(&mut self, f: impl FnMut(&EventInvocation) + 'static) {
        self.external = Some(Box::new(f));
    }

    pub fn clear_event_handler(&mut self) {
        self.external = None;
    }

    pub fn has_event_handler(&self) -> bool {
        self.external.is_some()
    }

    /// Forwards every handler of `element` whose event type matches, in
    /// declaration order. Returns how many were forwarded.
    pub fn invoke_event(
        &mut self,
        widgets: &Widgets,
        registry: &ElementRegistry,
        element: &str,
        event_type: &str,
        args: &[String],
    ) -> Result<usize, CommandError> {
        let result = self.forward(widgets, registry, element, event_type, args);
        if let Err(e) = &result {
            warn!("event '{}' on '{}': {}", event_type, element, e);
        }
        result
    }

    fn forward(
        &mut self,
        widgets: &Widgets,
        registry: &ElementRegistry,
        element: &str,
        event_type: &str,
        args: &[String],
    ) -> Result<usize, CommandError> {
        let handle = registry
            .get(element)
            .and_then(|id| widgets.get(id))
            .ok_or_else(|| CommandError::UnknownElement(element.to_string()))?;

        let raw = event_type.trim();
        let wanted = match raw.strip_prefix("on") {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_uppercase()) => rest,
            _ => raw,
        }
        .to_ascii_lowercase();
        let matching: Vec<_> = handle.handlers.iter().filter(|h| h.event_type == wanted).collect();
        if matching.is_empty() {
            return Err(CommandError::NoHandlers { element: element.to_string(), event: wanted });
        }
        let external = self.external.as_mut().ok_or(CommandError::NoExternalHandler)?;

        for h in &matching {
            let invocation = EventInvocation {
                element: element.to_string(),
                event_type: h.event_type.clone(),
                command: h.command.clone(),
                args: h.params.iter().chain(args).cloned().collect(),
            };
            debug!("event {} → {}({})", wanted, invocation.command, invocation.args.join(", "));
            external(&invocation);
        }
        Ok(matching.len())
    }
}

impl std::fmt::Debug for CommandBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBus").field("has_event_handler", &self.has_event_handler()).finish()
    }
}

/// Collects forwarded invocations for later draining.
#[derive(Debug, Clone, Default)]
pub struct EventQueue(Rc<RefCell<Vec<EventInvocation>>>);

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback for [`CommandBus::set_event_handler`] that pushes here.
    pub fn sink(&self) -> impl FnMut(&EventInvocation) + 'static {
        let queue = Rc::clone(&self.0);
        move |inv| queue.borrow_mut().push(inv.clone())
    }

    /// Drain all pending invocations.
    pub fn take_events(&self) -> Vec<EventInvocation> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WidgetHandle;
    use nabu_engine::host::SceneTree;
    use nabu_markup::{ElementKind, MarkupNode};

    struct Fixture {
        host: SceneTree,
        widgets: Widgets,
        registry: ElementRegistry,
        animator: Animator,
        config: SessionConfig,
    }

    impl Fixture {
        fn new() -> Self {
            let mut f = Self {
                host: SceneTree::new(),
                widgets: Widgets::new(),
                registry: ElementRegistry::new(),
                animator: Animator::new(),
                config: SessionConfig::default(),
            };
            let node = f.host.create_node(f.host.root(), "box");
            let mut h = WidgetHandle::new("box", ElementKind::Panel, node);
            h.transform.position = Vec2::new(10.0, 20.0);
            h.snapshot_home();
            h.handlers = crate::widget::parse_event_handlers(
                &MarkupNode::new("Panel").with_attr("onClick", "play(a); stop").with_attr("onHover", "glow"),
            );
            let id = f.widgets.insert(h);
            f.registry.insert("box", ElementKind::Panel, id);
            f
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

        fn run(&mut self, command: &str, args: &[&str]) -> Result<(), CommandError> {
            let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
            execute(&mut self.ctx(), "box", command, &args)
        }

        fn tick(&mut self, dt: f32) {
            let adv = self.animator.advance(dt);
            for u in adv.updates {
                apply_value(&mut self.widgets, &mut self.host, u.widget, u.property, u.value);
            }
            let mut ctx = self.ctx();
            for step in adv.due {
                ctx.run_step(step);
            }
        }

        fn boxed(&self) -> &WidgetHandle {
            self.widgets.get(WidgetId(0)).unwrap()
        }
    }

    #[test]
    fn unknown_element_and_command() {
        let mut f = Fixture::new();
        let args = vec![];
        assert_eq!(
            execute(&mut f.ctx(), "ghost", "show", &args),
            Err(CommandError::UnknownElement("ghost".into()))
        );
        assert_eq!(f.run("explode", &[]), Err(CommandError::UnknownCommand("explode".into())));
        assert!(f.animator.is_idle());
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut f = Fixture::new();
        assert!(f.run("FadeOut", &["1"]).is_ok());
        assert!(f.animator.is_animating(WidgetId(0), Property::Alpha));
        assert!(is_command("RestoreToOriginalState"));
        assert_eq!(command_names().count(), 16);
    }

    #[test]
    fn bad_arguments_change_nothing() {
        let mut f = Fixture::new();
        assert!(matches!(f.run("fadein", &[]), Err(CommandError::MissingArgument { .. })));
        assert!(matches!(f.run("moveto", &["1", "x", "2"]), Err(CommandError::InvalidArgument { .. })));
        assert!(matches!(f.run("setalpha", &["nan"]), Err(CommandError::InvalidArgument { .. })));
        assert!(f.animator.is_idle());
        assert_eq!(f.boxed().alpha, 1.0);
    }

    #[test]
    fn fade_interpolates_linearly() {
        let mut f = Fixture::new();
        f.run("fadeout", &["2"]).unwrap();
        f.tick(0.5);
        assert!((f.boxed().alpha - 0.75).abs() < 1e-5);
        f.tick(2.0);
        assert_eq!(f.boxed().alpha, 0.0);
        assert!(f.animator.is_idle());
    }

    #[test]
    fn replacement_starts_from_current_value() {
        let mut f = Fixture::new();
        f.run("fadeout", &["1"]).unwrap();
        f.tick(0.5);
        f.run("fadein", &["1"]).unwrap();
        f.tick(0.5);
        assert!((f.boxed().alpha - 0.75).abs() < 1e-5);
    }

    #[test]
    fn zero_duration_is_immediate() {
        let mut f = Fixture::new();
        f.run("moveto", &["0", "5", "6"]).unwrap();
        assert_eq!(f.boxed().transform.position, Vec2::new(5.0, 6.0));
        assert!(f.animator.is_idle());
    }

    #[test]
    fn hide_slides_left_by_screen_width() {
        let mut f = Fixture::new();
        f.run("hide", &["1"]).unwrap();
        f.tick(1.0);
        assert_eq!(f.boxed().alpha, 0.0);
        assert_eq!(f.boxed().transform.position, Vec2::new(10.0 - 1920.0, 20.0));

        f.run("show", &["1"]).unwrap();
        f.tick(1.0);
        assert_eq!(f.boxed().alpha, 1.0);
        assert_eq!(f.boxed().transform.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn slide_directions() {
        let mut f = Fixture::new();
        f.run("slideoffscreen", &["0", "Up"]).unwrap();
        assert_eq!(f.boxed().transform.position, Vec2::new(10.0, 1100.0));
        f.run("slideoffscreen", &["0", "sideways"]).unwrap();
        assert_eq!(f.boxed().transform.position, Vec2::new(-1910.0, 1100.0));
        f.run("movetooriginal", &["0"]).unwrap();
        assert_eq!(f.boxed().transform.position, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn toggle_uses_default_duration() {
        let mut f = Fixture::new();
        f.run("toggle", &[]).unwrap();
        f.tick(1.0);
        assert!((f.boxed().alpha - 0.5).abs() < 1e-5);
        f.tick(1.0);
        assert_eq!(f.boxed().alpha, 0.0);
    }

    #[test]
    fn bounce_peaks_then_settles() {
        let mut f = Fixture::new();
        f.run("bounce", &["1"]).unwrap();
        f.tick(0.5);
        assert_eq!(f.boxed().transform.scale, Vec3::splat(1.2));
        f.tick(0.5);
        f.tick(0.01);
        assert_eq!(f.boxed().transform.scale, Vec3::ONE);
        assert!(f.animator.is_idle());
    }

    #[test]
    fn overlapping_bounces_settle_at_first_rest() {
        let mut f = Fixture::new();
        f.run("bounce", &["1"]).unwrap();
        f.tick(0.25);
        f.run("bounce", &["1"]).unwrap();
        for _ in 0..20 {
            f.tick(0.1);
        }
        assert_eq!(f.boxed().transform.scale, Vec3::ONE);
        assert!(f.animator.is_idle());
    }

    #[test]
    fn restore_state_is_idempotent() {
        let mut f = Fixture::new();
        f.run("fadeout", &["1"]).unwrap();
        f.run("scale", &["0", "3"]).unwrap();
        f.run("setinteractable", &["false"]).unwrap();
        f.tick(0.3);
        f.run("restoretooriginalstate", &[]).unwrap();
        let once = (f.boxed().alpha, f.boxed().transform, f.boxed().interactable);
        f.run("restoretooriginalstate", &[]).unwrap();
        let twice = (f.boxed().alpha, f.boxed().transform, f.boxed().interactable);
        assert_eq!(once, twice);
        assert_eq!(once.0, 1.0);
        assert_eq!(once.1.scale, Vec3::ONE);
        assert!(once.2);
        assert!(f.animator.is_idle());
    }

    #[test]
    fn set_text_needs_a_surface() {
        let mut f = Fixture::new();
        assert_eq!(f.run("settext", &["hi"]), Err(CommandError::NoTextSurface("box".into())));
    }

    #[test]
    fn scheduled_command_runs_when_due() {
        let mut f = Fixture::new();
        f.animator.schedule(1.0, Step::Command {
            element: "box".into(),
            command: "setalpha".into(),
            args: vec!["0.25".into()],
        });
        f.tick(0.5);
        assert_eq!(f.boxed().alpha, 1.0);
        f.tick(0.5);
        assert_eq!(f.boxed().alpha, 0.25);
    }

    #[test]
    fn events_forward_in_declaration_order() {
        let f = Fixture::new();
        let mut bus = CommandBus::new();
        let queue = EventQueue::new();
        bus.set_event_handler(queue.sink());

        let n = bus.invoke_event(&f.widgets, &f.registry, "box", "Click", &["x".to_string()]).unwrap();
        assert_eq!(n, 2);
        let events = queue.take_events();
        assert_eq!(events[0].command, "play");
        assert_eq!(events[0].args, ["a", "x"]);
        assert_eq!(events[1].command, "stop");
        assert_eq!(events[1].args, ["x"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn event_misses_are_errors() {
        let f = Fixture::new();
        let mut bus = CommandBus::new();
        assert_eq!(
            bus.invoke_event(&f.widgets, &f.registry, "box", "click", &[]),
            Err(CommandError::NoExternalHandler)
        );
        bus.set_event_handler(|_| {});
        assert!(matches!(
            bus.invoke_event(&f.widgets, &f.registry, "box", "drag", &[]),
            Err(CommandError::NoHandlers { .. })
        ));
        assert!(matches!(
            bus.invoke_event(&f.widgets, &f.registry, "nobody", "click", &[]),
            Err(CommandError::UnknownElement(_))
        ));
    }
}
