use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, after clamping.
    pub dt: f32,
    /// Seconds accumulated over every tick so far.
    pub elapsed: f64,
    pub frame_index: u64,
}

#[derive(Debug, Clone)]
enum Source {
    Wall { last: Instant },
    /// Every tick advances by the same step regardless of wall time.
    Fixed { step: Duration },
}

/// Produces `dt` values for driving the runtime scheduler.
///
/// Wall-clock deltas are clamped so that a stall (debugger, minimized
/// window) does not make every running animation complete in one jump.
/// A fixed-step clock ignores wall time entirely, which keeps scripted
/// runs and tests reproducible.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: Source,
    frame_index: u64,
    elapsed: f64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Wall-clock source, `dt` clamped to `[0.1ms, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            source: Source::Wall { last: Instant::now() },
            frame_index: 0,
            elapsed: 0.0,
            dt_min,
            dt_max,
        }
    }

    /// Deterministic source: every tick is exactly `step`.
    pub fn fixed(step: Duration) -> Self {
        Self {
            source: Source::Fixed { step },
            frame_index: 0,
            elapsed: 0.0,
            dt_min: step,
            dt_max: step,
        }
    }

    /// Resets the wall-clock baseline. No-op for fixed clocks.
    pub fn reset(&mut self) {
        if let Source::Wall { last } = &mut self.source {
            *last = Instant::now();
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        let dt = match &mut self.source {
            Source::Fixed { step } => *step,
            Source::Wall { last } => {
                let now = Instant::now();
                let raw = now.saturating_duration_since(*last);
                *last = now;
                raw.clamp(self.dt_min, self.dt_max)
            }
        };

        self.elapsed += dt.as_secs_f64();
        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: self.elapsed,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_is_deterministic() {
        let mut clock = FrameClock::fixed(Duration::from_millis(100));
        let a = clock.tick();
        let b = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert_eq!(b.frame_index, 1);
        assert!((b.dt - 0.1).abs() < 1e-6);
        assert!((b.elapsed - 0.2).abs() < 1e-9);
    }

    #[test]
    fn wall_clock_is_clamped() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(5), Duration::from_millis(10));
        let ft = clock.tick();
        assert!(ft.dt >= 0.005 - 1e-6 && ft.dt <= 0.010 + 1e-6);
    }
}
