//! Observer parameters and the sidereal clock.
//!
//! Hosts write [`ObserverSettings`]; the render loop combines them with the
//! local sidereal time owned by [`SiderealClock`] into an [`ObserverState`]
//! each frame. Out-of-range values are clamped, never rejected.

use serde::{Deserialize, Serialize};
use starfield::coords::wrap_degrees;

/// Sidereal degrees advanced per millisecond at `time_speed == 1`.
pub const SIDEREAL_DEGREES_PER_MS: f64 = 0.01;

/// The observer fields a host is allowed to change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverSettings {
    /// Geographic latitude in degrees
    pub latitude: f64,
    /// Sky darkness in `[0, 1]`; 1 is a pristine sky
    pub light_pollution_limit: f64,
    pub is_paused: bool,
    /// Sidereal clock multiplier
    pub time_speed: f64,
}

impl Default for ObserverSettings {
    fn default() -> Self {
        Self {
            latitude: 40.0,
            light_pollution_limit: 0.5,
            is_paused: false,
            time_speed: 1.0,
        }
    }
}

/// Clamp to `[lo, hi]`, mapping NaN onto `fallback`.
fn clamp_or(value: f64, lo: f64, hi: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(lo, hi)
    }
}

impl ObserverSettings {
    pub fn clamped(self) -> Self {
        Self {
            latitude: clamp_or(self.latitude, -90.0, 90.0, 0.0),
            light_pollution_limit: clamp_or(self.light_pollution_limit, 0.0, 1.0, 0.0),
            is_paused: self.is_paused,
            time_speed: clamp_or(self.time_speed, 0.0, f64::MAX, 0.0),
        }
    }
}

/// Complete observer state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObserverState {
    pub latitude: f64,
    /// Local sidereal time as an angle in `[0, 360)`
    pub local_sidereal_time: f64,
    pub light_pollution_limit: f64,
    pub is_paused: bool,
    pub time_speed: f64,
}

impl ObserverState {
    pub fn new(settings: ObserverSettings, local_sidereal_time: f64) -> Self {
        Self {
            latitude: settings.latitude,
            local_sidereal_time,
            light_pollution_limit: settings.light_pollution_limit,
            is_paused: settings.is_paused,
            time_speed: settings.time_speed,
        }
        .clamped()
    }

    /// Pull every field back onto its valid domain.
    pub fn clamped(self) -> Self {
        let settings = ObserverSettings {
            latitude: self.latitude,
            light_pollution_limit: self.light_pollution_limit,
            is_paused: self.is_paused,
            time_speed: self.time_speed,
        }
        .clamped();
        let lst = if self.local_sidereal_time.is_finite() {
            wrap_degrees(self.local_sidereal_time)
        } else {
            0.0
        };
        Self {
            latitude: settings.latitude,
            local_sidereal_time: lst,
            light_pollution_limit: settings.light_pollution_limit,
            is_paused: settings.is_paused,
            time_speed: settings.time_speed,
        }
    }

    pub fn settings(&self) -> ObserverSettings {
        ObserverSettings {
            latitude: self.latitude,
            light_pollution_limit: self.light_pollution_limit,
            is_paused: self.is_paused,
            time_speed: self.time_speed,
        }
    }
}

/// Sole owner of the local sidereal time.
#[derive(Debug, Clone, PartialEq)]
pub struct SiderealClock {
    lst: f64,
}

impl SiderealClock {
    pub fn new(initial_lst: f64) -> Self {
        let lst = if initial_lst.is_finite() {
            wrap_degrees(initial_lst)
        } else {
            0.0
        };
        Self { lst }
    }

    /// Current local sidereal time in degrees.
    pub fn lst(&self) -> f64 {
        self.lst
    }

    /// Advance by `delta_ms · 0.01 · time_speed` degrees, wrapping at 360.
    pub fn advance(&mut self, delta_ms: f64, time_speed: f64) -> f64 {
        let step = delta_ms * SIDEREAL_DEGREES_PER_MS * time_speed;
        if step.is_finite() && step > 0.0 {
            self.lst = wrap_degrees(self.lst + step);
        }
        self.lst
    }
}

impl Default for SiderealClock {
    fn default() -> Self {
        Self::new(0.0)
    }
}
