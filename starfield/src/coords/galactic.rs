//! Galactic frame and its rotation to and from the equatorial frame.
//!
//! The rotation is fixed by the north galactic pole (RA 192.85°, Dec 27.13°)
//! and the galactic longitude of the north celestial pole (122.93°). The
//! rotation matrix columns are the equatorial images of the galactic basis
//! vectors, each computed with the exact spherical formulas.

use lazy_static::lazy_static;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use super::{safe_asin, safe_atan2, spherical_from_vector, unit_vector, wrap_degrees, Equatorial};

/// Right ascension of the north galactic pole, degrees.
pub const NGP_RA_DEG: f64 = 192.85;
/// Declination of the north galactic pole, degrees.
pub const NGP_DEC_DEG: f64 = 27.13;
/// Galactic longitude of the north celestial pole, degrees.
pub const NCP_LONGITUDE_DEG: f64 = 122.93;

/// Exact spherical galactic -> equatorial conversion in degrees.
fn galactic_to_equatorial_degrees(l: f64, b: f64) -> (f64, f64) {
    let (l, b) = (l.to_radians(), b.to_radians());
    let dec_p = NGP_DEC_DEG.to_radians();
    let dl = NCP_LONGITUDE_DEG.to_radians() - l;

    let sin_dec = b.sin() * dec_p.sin() + b.cos() * dec_p.cos() * dl.cos();
    let dec = safe_asin(sin_dec);

    let y = b.cos() * dl.sin();
    let x = b.sin() * dec_p.cos() - b.cos() * dec_p.sin() * dl.cos();
    let ra = NGP_RA_DEG + safe_atan2(y, x).to_degrees();

    (wrap_degrees(ra), dec.to_degrees())
}

lazy_static! {
    /// Rotation taking galactic unit vectors to equatorial unit vectors.
    pub static ref GAL_TO_EQ: Matrix3<f64> = {
        let column = |l: f64, b: f64| {
            let (ra, dec) = galactic_to_equatorial_degrees(l, b);
            unit_vector(ra, dec)
        };
        Matrix3::from_columns(&[column(0.0, 0.0), column(90.0, 0.0), column(0.0, 90.0)])
    };

    /// Inverse of [`GAL_TO_EQ`]. The rotation is orthonormal so this is the transpose.
    pub static ref EQ_TO_GAL: Matrix3<f64> = GAL_TO_EQ.transpose();
}

/// Galactic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Galactic {
    /// Longitude in `[0, 360)`
    pub l: f64,
    /// Latitude in `[-90, 90]`
    pub b: f64,
}

impl Galactic {
    pub fn from_degrees(l: f64, b: f64) -> Self {
        Self {
            l: wrap_degrees(l),
            b: b.clamp(-90.0, 90.0),
        }
    }

    /// Direction of a galactic Cartesian position as seen from the origin.
    ///
    /// `l = atan2(y, x)`, `b = atan2(z, sqrt(x² + y²))`. The origin maps to
    /// `(0, 0)`.
    pub fn from_cartesian(x: f64, y: f64, z: f64) -> Self {
        let l = wrap_degrees(safe_atan2(y, x).to_degrees());
        let b = safe_atan2(z, x.hypot(y)).to_degrees();
        Self { l, b }
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        let (l, b) = spherical_from_vector(v);
        Self { l, b }
    }

    pub fn unit_vector(&self) -> Vector3<f64> {
        unit_vector(self.l, self.b)
    }

    /// Convert to equatorial coordinates.
    pub fn to_equatorial(&self) -> Equatorial {
        Equatorial::from_vector(&(*GAL_TO_EQ * self.unit_vector()))
    }
}
