//! Eased transitions between projection modes.
//!
//! The animator is a two-state machine:
//!
//! ```text
//!            request(other mode)
//!   Idle ─────────────────────────▶ Transitioning
//!    ▲                                 │    │
//!    │        progress reaches 1       │    │ request(other mode):
//!    └─────────────────────────────────┘    │ restart from the old target
//!                                           ▼
//! ```
//!
//! Progress is `1 - (1 - t)³` of the linear time fraction `t`, so motion
//! decelerates into the new layout.

use nalgebra::Point2;
use std::time::Duration;

use crate::mode::ProjectionMode;

/// Length of a full transition.
pub const DEFAULT_TRANSITION_DURATION: Duration = Duration::from_millis(1500);

/// Cubic ease-out of `t`, clamped to `[0, 1]`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t).powi(3)
}

/// Immutable view of the animator for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSnapshot {
    pub source: ProjectionMode,
    pub target: ProjectionMode,
    /// Eased progress in `[0, 1]`
    pub progress: f64,
}

impl TransitionSnapshot {
    /// Resting in `mode`.
    pub fn idle(mode: ProjectionMode) -> Self {
        Self {
            source: mode,
            target: mode,
            progress: 1.0,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.progress >= 1.0
    }

    pub fn is_transitioning(&self) -> bool {
        !self.is_idle()
    }

    /// Whether the snapshot is resting in `mode`.
    pub fn is_idle_in(&self, mode: ProjectionMode) -> bool {
        self.is_idle() && self.target == mode
    }

    pub fn lerp(&self, from: Point2<f64>, to: Point2<f64>) -> Point2<f64> {
        from + (to - from) * self.progress
    }

    pub fn lerp_scalar(&self, from: f64, to: f64) -> f64 {
        from + (to - from) * self.progress
    }

    /// Opacity of decorations that belong to `mode`.
    ///
    /// 1 while resting in or arriving fully at `mode`, `progress` while
    /// entering it, `1 - progress` while leaving it and 0 otherwise.
    pub fn chrome_alpha(&self, mode: ProjectionMode) -> f64 {
        match (self.source == mode, self.target == mode) {
            (true, true) => 1.0,
            (false, true) => self.progress,
            (true, false) => 1.0 - self.progress,
            (false, false) => 0.0,
        }
    }
}

/// Owner of the transition state.
#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    source: ProjectionMode,
    target: ProjectionMode,
    progress: f64,
    start: Duration,
    duration: Duration,
}

impl TransitionAnimator {
    pub fn new(initial: ProjectionMode, duration: Duration) -> Self {
        Self {
            source: initial,
            target: initial,
            progress: 1.0,
            start: Duration::ZERO,
            duration,
        }
    }

    pub fn target(&self) -> ProjectionMode {
        self.target
    }

    pub fn source(&self) -> ProjectionMode {
        self.source
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn is_idle(&self) -> bool {
        self.progress >= 1.0
    }

    /// Ask for `mode` at time `now`. Returns whether a transition started.
    ///
    /// Requesting the current target is a no-op, even mid transition. Any other
    /// mode restarts from progress 0 with the current target as the source.
    pub fn request(&mut self, mode: ProjectionMode, now: Duration) -> bool {
        if mode == self.target {
            return false;
        }

        if self.is_idle() {
            log::debug!("Transition {} -> {} started", self.target, mode);
        } else {
            log::debug!(
                "Transition {} -> {} interrupted at {:.2}, now heading to {}",
                self.source,
                self.target,
                self.progress,
                mode
            );
        }

        self.source = self.target;
        self.target = mode;
        self.progress = 0.0;
        self.start = now;
        true
    }

    /// Update progress for time `now` and return the resulting snapshot.
    pub fn advance(&mut self, now: Duration) -> TransitionSnapshot {
        if !self.is_idle() {
            let t = if self.duration.is_zero() {
                1.0
            } else {
                now.saturating_sub(self.start).as_secs_f64() / self.duration.as_secs_f64()
            };

            if t >= 1.0 {
                log::debug!("Transition {} -> {} complete", self.source, self.target);
                self.progress = 1.0;
                self.source = self.target;
            } else {
                self.progress = ease_out_cubic(t);
            }
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> TransitionSnapshot {
        TransitionSnapshot {
            source: self.source,
            target: self.target,
            progress: self.progress,
        }
    }
}

impl Default for TransitionAnimator {
    fn default() -> Self {
        Self::new(ProjectionMode::Sky, DEFAULT_TRANSITION_DURATION)
    }
}
