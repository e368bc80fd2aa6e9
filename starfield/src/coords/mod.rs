//! Celestial coordinate frames.
//!
//! All public angles are in degrees. Internally the frames are related by
//! exact spherical rotations of unit vectors; nothing here is approximated.
//!
//! - [`Equatorial`]: right ascension / declination, fixed to the stars
//! - [`Galactic`]: galactic longitude / latitude
//! - [`HorizontalCoords`]: altitude / azimuth for an observer at a given
//!   latitude and local sidereal time

mod galactic;
mod horizontal;

pub use galactic::{Galactic, EQ_TO_GAL, GAL_TO_EQ, NGP_DEC_DEG, NGP_RA_DEG, NCP_LONGITUDE_DEG};
pub use horizontal::HorizontalCoords;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Guard against vanishing `atan2` arguments at the poles and zenith.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Wrap an angle in degrees onto `[0, 360)`.
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// `asin` with its argument clamped onto the valid domain.
pub fn safe_asin(value: f64) -> f64 {
    value.clamp(-1.0, 1.0).asin()
}

/// `atan2` that returns zero instead of an arbitrary angle when both
/// arguments vanish.
pub fn safe_atan2(y: f64, x: f64) -> f64 {
    if y.abs() < DEGENERATE_EPSILON && x.abs() < DEGENERATE_EPSILON {
        0.0
    } else {
        y.atan2(x)
    }
}

/// Unit vector for a longitude-like / latitude-like pair in degrees.
pub(crate) fn unit_vector(lon_deg: f64, lat_deg: f64) -> Vector3<f64> {
    let (lon, lat) = (lon_deg.to_radians(), lat_deg.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// Longitude-like / latitude-like pair in degrees from a (not necessarily
/// normalized) vector.
pub(crate) fn spherical_from_vector(v: &Vector3<f64>) -> (f64, f64) {
    let norm = v.norm();
    if norm < DEGENERATE_EPSILON {
        return (0.0, 0.0);
    }
    let lon = wrap_degrees(safe_atan2(v.y, v.x).to_degrees());
    let lat = safe_asin(v.z / norm).to_degrees();
    (lon, lat)
}

/// Equatorial position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Equatorial {
    /// Right ascension in `[0, 360)`
    pub ra: f64,
    /// Declination in `[-90, 90]`
    pub dec: f64,
}

impl Equatorial {
    /// Create a position, wrapping RA and clamping Dec.
    pub fn from_degrees(ra: f64, dec: f64) -> Self {
        Self {
            ra: wrap_degrees(ra),
            dec: dec.clamp(-90.0, 90.0),
        }
    }

    pub fn unit_vector(&self) -> Vector3<f64> {
        unit_vector(self.ra, self.dec)
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        let (ra, dec) = spherical_from_vector(v);
        Self { ra, dec }
    }

    /// Convert to galactic coordinates.
    pub fn to_galactic(&self) -> Galactic {
        Galactic::from_vector(&(*EQ_TO_GAL * self.unit_vector()))
    }
}
