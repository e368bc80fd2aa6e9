//! Which stars are drawn and how strongly.
//!
//! A star is included when its spectral class is active and it is brighter
//! than the effective magnitude limit:
//!
//! ```text
//! instrument_limit = 3 + power · 12
//! pollution_limit  = 2.5 + darkness · 4.5
//! effective_limit  = min(instrument_limit, pollution_limit + power · 5)
//! ```
//!
//! Included stars fade out over the last magnitude before the limit. While
//! the sky view is the target, atmospheric extinction and a horizon fade
//! dim stars with low altitude; leaving the sky view blends extinction away.

use serde::{Deserialize, Serialize};
use starfield::{SpectralType, Star};
use std::fmt;
use std::str::FromStr;

use crate::mode::ProjectionMode;
use crate::transition::TransitionSnapshot;

/// Set of active spectral classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SpectralFilter(u8);

impl SpectralFilter {
    const MASK: u8 = 0b0111_1111;

    pub const fn all() -> Self {
        Self(Self::MASK)
    }

    pub const fn none() -> Self {
        Self(0)
    }

    fn bit(spectral_type: SpectralType) -> u8 {
        1 << spectral_type.index()
    }

    pub fn with(self, spectral_type: SpectralType) -> Self {
        Self(self.0 | Self::bit(spectral_type))
    }

    pub fn without(self, spectral_type: SpectralType) -> Self {
        Self(self.0 & !Self::bit(spectral_type))
    }

    pub fn contains(&self, spectral_type: SpectralType) -> bool {
        self.0 & Self::bit(spectral_type) != 0
    }

    /// Toggle one class, returning the new set.
    pub fn toggled(self, spectral_type: SpectralType) -> Self {
        if self.contains(spectral_type) {
            self.without(spectral_type)
        } else {
            self.with(spectral_type)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = SpectralType> + '_ {
        SpectralType::ALL
            .into_iter()
            .filter(move |t| self.contains(*t))
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for SpectralFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<SpectralType> for SpectralFilter {
    fn from_iter<I: IntoIterator<Item = SpectralType>>(iter: I) -> Self {
        iter.into_iter().fold(Self::none(), Self::with)
    }
}

/// Letters of the active classes, hottest first, e.g. `"OBAFGKM"`.
impl fmt::Display for SpectralFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in self.iter() {
            write!(f, "{}", class)?;
        }
        Ok(())
    }
}

impl FromStr for SpectralFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .filter(|c| !c.is_whitespace() && *c != ',')
            .map(SpectralType::try_from)
            .collect()
    }
}

impl From<SpectralFilter> for String {
    fn from(filter: SpectralFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for SpectralFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Global inputs of the visibility model for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityParams {
    /// Instrument power in `[0, 1]`
    pub observational_power: f64,
    /// Sky darkness in `[0, 1]`
    pub light_pollution_limit: f64,
    pub active_filters: SpectralFilter,
}

impl VisibilityParams {
    pub fn new(observational_power: f64, light_pollution_limit: f64, active_filters: SpectralFilter) -> Self {
        let unit = |v: f64| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            observational_power: unit(observational_power),
            light_pollution_limit: unit(light_pollution_limit),
            active_filters,
        }
    }

    /// Faintest magnitude the instrument can reach.
    pub fn instrument_limit(&self) -> f64 {
        3.0 + self.observational_power * 12.0
    }

    /// Faintest magnitude the naked eye reaches under this sky.
    pub fn pollution_limit(&self) -> f64 {
        2.5 + self.light_pollution_limit * 4.5
    }

    pub fn effective_limit(&self) -> f64 {
        self.instrument_limit()
            .min(self.pollution_limit() + self.observational_power * 5.0)
    }

    /// Spectral class is active and the star is within the magnitude limit.
    pub fn includes(&self, star: &Star) -> bool {
        self.active_filters.contains(star.spectral_type)
            && star.apparent_magnitude <= self.effective_limit()
    }

    /// Fade over the last magnitude before the limit.
    pub fn magnitude_alpha(&self, apparent_magnitude: f64) -> f64 {
        let limit = self.effective_limit();
        if apparent_magnitude > limit - 1.0 {
            (limit - apparent_magnitude).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

/// Extinction multiplier `1 - 0.7 · max(0, (30 - alt) / 30)`.
pub fn extinction_factor(altitude_deg: f64) -> f64 {
    let excess = ((30.0 - altitude_deg) / 30.0).max(0.0);
    1.0 - 0.7 * excess
}

/// Fade to zero over the five degrees below the horizon.
pub fn horizon_fade(altitude_deg: f64) -> f64 {
    (1.0 + altitude_deg / 5.0).clamp(0.0, 1.0)
}

/// Altitude dependent alpha multiplier for the current transition.
pub fn atmospheric_alpha(altitude_deg: f64, snapshot: &TransitionSnapshot) -> f64 {
    if snapshot.target == ProjectionMode::Sky {
        extinction_factor(altitude_deg) * horizon_fade(altitude_deg)
    } else if snapshot.source == ProjectionMode::Sky {
        let f = extinction_factor(altitude_deg);
        f + (1.0 - f) * snapshot.progress
    } else {
        1.0
    }
}

/// Final alpha of `star`, or `None` when it is not drawn.
pub fn evaluate(
    star: &Star,
    params: &VisibilityParams,
    altitude_deg: f64,
    snapshot: &TransitionSnapshot,
) -> Option<f64> {
    if !params.includes(star) {
        return None;
    }
    let alpha = params.magnitude_alpha(star.apparent_magnitude)
        * atmospheric_alpha(altitude_deg, snapshot);
    let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    (alpha > 0.0).then_some(alpha)
}
