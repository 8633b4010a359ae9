//! Tick-driven animation.
//!
//! Every running animation is a record keyed by `(widget, property)`; a new
//! animation on the same key replaces the old one and starts from wherever
//! the old one had got to. Delayed work ("after N seconds, do X") is an
//! explicit queue of timed steps drained by the same [`Animator::advance`]
//! call. Nothing here touches widgets or the host: `advance` reports values
//! and the session applies them.

use std::collections::HashMap;

use nabu_engine::coords::{Vec2, Vec3};

use crate::widget::WidgetId;

// ── Values ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Alpha,
    Position,
    Scale,
    Progress,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Scalar(f32),
    Vec2(Vec2),
    Vec3(Vec3),
}

impl TweenValue {
    /// Linear blend. Mismatched variants snap to `to`.
    pub fn lerp(self, to: TweenValue, t: f32) -> TweenValue {
        match (self, to) {
            (TweenValue::Scalar(a), TweenValue::Scalar(b)) => TweenValue::Scalar(a + (b - a) * t),
            (TweenValue::Vec2(a), TweenValue::Vec2(b))     => TweenValue::Vec2(a.lerp(b, t)),
            (TweenValue::Vec3(a), TweenValue::Vec3(b))     => TweenValue::Vec3(a.lerp(b, t)),
            (_, b) => b,
        }
    }
}

#[derive(Debug, Clone)]
struct Tween {
    start: TweenValue,
    target: TweenValue,
    elapsed: f32,
    duration: f32,
}

/// One value produced by [`Animator::advance`].
#[derive(Debug, Clone, PartialEq)]
pub struct TweenUpdate {
    pub widget: WidgetId,
    pub property: Property,
    pub value: TweenValue,
    /// The track reached its target and was removed.
    pub finished: bool,
}

// ── Steps ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Start a tween from the property's value at the time the step runs.
    Tween { widget: WidgetId, property: Property, target: TweenValue, duration: f32 },
    /// Second half of a bounce: scale back to the shared rest scale.
    BounceSettle { widget: WidgetId, duration: f32 },
    /// Run a named command against a named element.
    Command { element: String, command: String, args: Vec<String> },
}

impl Step {
    fn widget(&self) -> Option<WidgetId> {
        match self {
            Step::Tween { widget, .. } | Step::BounceSettle { widget, .. } => Some(*widget),
            Step::Command { .. } => None,
        }
    }
}

#[derive(Debug)]
struct TimedStep {
    due: f64,
    seq: u64,
    step: Step,
}

#[derive(Debug, Clone, Copy)]
struct BounceRest {
    scale: Vec3,
    pending: u32,
}

/// Output of one scheduler tick.
#[derive(Debug, Default)]
pub struct Advance {
    pub updates: Vec<TweenUpdate>,
    /// Steps that came due, in due order.
    pub due: Vec<Step>,
}

// ── Animator ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct Animator {
    tracks: HashMap<(WidgetId, Property), Tween>,
    steps: Vec<TimedStep>,
    bounces: HashMap<WidgetId, BounceRest>,
    now: f64,
    seq: u64,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler time in seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Starts (or replaces) the track for `(widget, property)`.
    ///
    /// With `duration <= 0` no track is created, any running one is dropped,
    /// and the target is handed back for the caller to apply at once.
    #[must_use]
    pub fn start(
        &mut self,
        widget: WidgetId,
        property: Property,
        from: TweenValue,
        to: TweenValue,
        duration: f32,
    ) -> Option<TweenValue> {
        if duration <= 0.0 || !duration.is_finite() {
            self.tracks.remove(&(widget, property));
            return Some(to);
        }
        self.tracks.insert(
            (widget, property),
            Tween { start: from, target: to, elapsed: 0.0, duration },
        );
        None
    }

    pub fn cancel(&mut self, widget: WidgetId, property: Property) {
        self.tracks.remove(&(widget, property));
    }

    /// Drops every track, pending step and bounce record for `widget`.
    pub fn cancel_widget(&mut self, widget: WidgetId) {
        self.tracks.retain(|(w, _), _| *w != widget);
        self.steps.retain(|s| s.step.widget() != Some(widget));
        self.bounces.remove(&widget);
    }

    pub fn is_animating(&self, widget: WidgetId, property: Property) -> bool {
        self.tracks.contains_key(&(widget, property))
    }

    /// Target of the running track, if any.
    pub fn target_of(&self, widget: WidgetId, property: Property) -> Option<TweenValue> {
        self.tracks.get(&(widget, property)).map(|t| t.target)
    }

    pub fn active_tracks(&self) -> usize {
        self.tracks.len()
    }

    pub fn pending_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn is_idle(&self) -> bool {
        self.tracks.is_empty() && self.steps.is_empty()
    }

    /// Queues `step` to run once `delay` more seconds of scheduler time pass.
    pub fn schedule(&mut self, delay: f32, step: Step) {
        let due = self.now + f64::from(delay.max(0.0));
        self.seq += 1;
        self.steps.push(TimedStep { due, seq: self.seq, step });
    }

    // ── Bounce bookkeeping ────────────────────────────────────────────────

    /// Records a bounce starting now and returns the rest scale to come back
    /// to. Overlapping bounces share the rest scale of the first one.
    pub fn begin_bounce(&mut self, widget: WidgetId, current: Vec3, half: f32) -> Vec3 {
        let rest = self
            .bounces
            .entry(widget)
            .or_insert(BounceRest { scale: current, pending: 0 });
        rest.pending += 1;
        let scale = rest.scale;
        self.schedule(half, Step::BounceSettle { widget, duration: half });
        scale
    }

    /// Called when a settle step runs. Returns the rest scale.
    pub fn settle_bounce(&mut self, widget: WidgetId) -> Option<Vec3> {
        let rest = self.bounces.get_mut(&widget)?;
        let scale = rest.scale;
        rest.pending = rest.pending.saturating_sub(1);
        if rest.pending == 0 {
            self.bounces.remove(&widget);
        }
        Some(scale)
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advances every track by `dt` seconds, then collects steps now due.
    pub fn advance(&mut self, dt: f32) -> Advance {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.now += f64::from(dt);

        let mut updates = Vec::with_capacity(self.tracks.len());
        self.tracks.retain(|(widget, property), tween| {
            tween.elapsed += dt;
            let finished = tween.elapsed >= tween.duration;
            let value = if finished {
                tween.target
            } else {
                tween.start.lerp(tween.target, tween.elapsed / tween.duration)
            };
            updates.push(TweenUpdate { widget: *widget, property: *property, value, finished });
            !finished
        });

        let now = self.now;
        let mut ready = Vec::new();
        let mut i = 0;
        while i < self.steps.len() {
            if self.steps[i].due <= now + 1e-9 {
                ready.push(self.steps.swap_remove(i));
            } else {
                i += 1;
            }
        }
        ready.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));

        Advance { updates, due: ready.into_iter().map(|s| s.step).collect() }
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.steps.clear();
        self.bounces.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: WidgetId = WidgetId(0);

    fn scalar(u: &TweenUpdate) -> f32 {
        match u.value {
            TweenValue::Scalar(v) => v,
            _ => panic!("not scalar"),
        }
    }

    #[test]
    fn linear_progress_then_snap() {
        let mut a = Animator::new();
        assert!(a.start(W, Property::Alpha, TweenValue::Scalar(0.0), TweenValue::Scalar(1.0), 2.0).is_none());
        let adv = a.advance(0.5);
        assert!((scalar(&adv.updates[0]) - 0.25).abs() < 1e-6);
        assert!(!adv.updates[0].finished);
        let adv = a.advance(5.0);
        assert_eq!(scalar(&adv.updates[0]), 1.0);
        assert!(adv.updates[0].finished);
        assert!(a.is_idle());
    }

    #[test]
    fn zero_duration_is_immediate() {
        let mut a = Animator::new();
        let _ = a.start(W, Property::Alpha, TweenValue::Scalar(0.0), TweenValue::Scalar(1.0), 1.0);
        let now = a.start(W, Property::Alpha, TweenValue::Scalar(0.0), TweenValue::Scalar(0.3), 0.0);
        assert_eq!(now, Some(TweenValue::Scalar(0.3)));
        assert!(!a.is_animating(W, Property::Alpha));
    }

    #[test]
    fn replacement_keeps_one_track() {
        let mut a = Animator::new();
        let _ = a.start(W, Property::Scale, TweenValue::Scalar(1.0), TweenValue::Scalar(2.0), 1.0);
        let _ = a.start(W, Property::Scale, TweenValue::Scalar(1.5), TweenValue::Scalar(0.0), 1.0);
        assert_eq!(a.active_tracks(), 1);
        assert_eq!(a.target_of(W, Property::Scale), Some(TweenValue::Scalar(0.0)));
    }

    #[test]
    fn steps_run_in_due_order() {
        let mut a = Animator::new();
        let cmd = |c: &str| Step::Command { element: "e".into(), command: c.into(), args: vec![] };
        a.schedule(1.0, cmd("late"));
        a.schedule(0.5, cmd("early"));
        a.schedule(0.5, cmd("early2"));
        assert!(a.advance(0.25).due.is_empty());
        let due = a.advance(1.0).due;
        assert_eq!(due, vec![cmd("early"), cmd("early2"), cmd("late")]);
        assert_eq!(a.pending_steps(), 0);
    }

    #[test]
    fn overlapping_bounces_share_rest() {
        let mut a = Animator::new();
        let rest = a.begin_bounce(W, Vec3::ONE, 0.5);
        assert_eq!(rest, Vec3::ONE);
        let rest2 = a.begin_bounce(W, Vec3::splat(1.1), 0.5);
        assert_eq!(rest2, Vec3::ONE);
        assert_eq!(a.settle_bounce(W), Some(Vec3::ONE));
        assert_eq!(a.settle_bounce(W), Some(Vec3::ONE));
        assert_eq!(a.settle_bounce(W), None);
    }

    #[test]
    fn cancel_widget_drops_everything_for_it() {
        let mut a = Animator::new();
        let other = WidgetId(1);
        let _ = a.start(W, Property::Alpha, TweenValue::Scalar(0.0), TweenValue::Scalar(1.0), 1.0);
        let _ = a.start(other, Property::Alpha, TweenValue::Scalar(0.0), TweenValue::Scalar(1.0), 1.0);
        a.begin_bounce(W, Vec3::ONE, 1.0);
        a.cancel_widget(W);
        assert_eq!(a.active_tracks(), 1);
        assert_eq!(a.pending_steps(), 0);
        assert_eq!(a.settle_bounce(W), None);
    }
}
