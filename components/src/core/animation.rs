// Animation
// Time-based tweens advanced by the host event loop

use std::time::Duration;

use super::geometry::Lerp;

/// Duration used for discrete, user-perceptible changes (tab selection, page jumps)
pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_millis(300);

/// Ease-in-out curve (smoothstep)
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// A running interpolation between two values
#[derive(Debug, Clone, PartialEq)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: Duration,
    elapsed: Duration,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Final value of the tween
    pub fn target(&self) -> T {
        self.to
    }

    /// Linear progress in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Current eased value
    pub fn value(&self) -> T {
        if self.is_finished() {
            return self.to;
        }
        self.from.lerp(self.to, ease_in_out(self.progress()))
    }

    /// Advance by `dt` and return the new value
    pub fn advance(&mut self, dt: Duration) -> T {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }
}
