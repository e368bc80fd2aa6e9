//! Mapping stars onto the shared 2D projection plane.
//!
//! The plane is unitless with +y pointing down the screen; the viewport maps
//! it to pixels. Layouts per mode:
//!
//! - **Sky / Classification**: azimuthal projection of the visible hemisphere.
//!   The zenith sits at the origin and the horizon on a circle of radius 1.8,
//!   north up and east to the right.
//! - **Galaxy**: the galactic disk rotated by the spin angle, tilted 60° and
//!   scaled by 2.5.
//! - **HR Diagram**: `(hr_x · 1.5, hr_y · 0.8)`.

use nalgebra::Point2;
use starfield::{HorizontalCoords, Star};
use std::time::Duration;

use crate::mode::ProjectionMode;
use crate::transition::TransitionSnapshot;

/// Plane radius of the horizon circle.
pub const SKY_SCALE: f64 = 1.8;
pub const GALAXY_SCALE: f64 = 2.5;
/// Inclination of the galactic disk towards the viewer.
pub const GALAXY_TILT_DEG: f64 = 60.0;
pub const HR_X_SCALE: f64 = 1.5;
pub const HR_Y_SCALE: f64 = 0.8;
/// Stars further below the horizon are not considered while resting in a
/// horizon based mode.
pub const HORIZON_CULL_ALTITUDE_DEG: f64 = -5.0;
/// Galaxy spin in radians per second of wall-clock time.
pub const DEFAULT_GALAXY_SPIN_RATE: f64 = 0.1;

/// Horizon projection of an altitude / azimuth pair.
pub fn sky_position(horizontal: &HorizontalCoords) -> Point2<f64> {
    let r = (90.0 - horizontal.altitude_deg) / 90.0;
    let theta = (horizontal.azimuth_deg - 90.0).to_radians();
    Point2::new(r * theta.cos(), r * theta.sin()) * SKY_SCALE
}

/// Spinning, tilted galactic disk.
pub fn galaxy_position(star: &Star, galaxy_angle: f64) -> Point2<f64> {
    let (sin_a, cos_a) = galaxy_angle.sin_cos();
    let xr = star.gal_x * cos_a - star.gal_y * sin_a;
    let yr = star.gal_x * sin_a + star.gal_y * cos_a;

    let (sin_t, cos_t) = GALAXY_TILT_DEG.to_radians().sin_cos();
    let y = yr * cos_t - star.gal_z * sin_t;

    Point2::new(xr, y) * GALAXY_SCALE
}

pub fn hr_position(star: &Star) -> Point2<f64> {
    Point2::new(star.hr_x * HR_X_SCALE, star.hr_y * HR_Y_SCALE)
}

/// Position of `star` in `mode`.
///
/// `horizontal` must be the star's horizontal coordinates for the current
/// observer; it is computed every frame because transitions need it even
/// when neither end is a horizon mode.
pub fn project(
    star: &Star,
    mode: ProjectionMode,
    horizontal: &HorizontalCoords,
    galaxy_angle: f64,
) -> Point2<f64> {
    match mode {
        ProjectionMode::Sky | ProjectionMode::Classification => sky_position(horizontal),
        ProjectionMode::Galaxy => galaxy_position(star, galaxy_angle),
        ProjectionMode::HrDiagram => hr_position(star),
    }
}

/// Drawn radius of `star` in CSS pixels for `mode`.
pub fn star_radius(star: &Star, mode: ProjectionMode) -> f64 {
    match mode {
        ProjectionMode::HrDiagram => ((star.radius * 10.0).log10() * 2.0).max(1.0),
        ProjectionMode::Sky | ProjectionMode::Classification | ProjectionMode::Galaxy => {
            star.base_size
        }
    }
}

/// Skip stars well below the horizon while resting in a horizon mode.
pub fn is_culled(altitude_deg: f64, snapshot: &TransitionSnapshot) -> bool {
    snapshot.is_idle()
        && snapshot.target.is_horizon_based()
        && altitude_deg < HORIZON_CULL_ALTITUDE_DEG
}

pub fn is_finite_point(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Galaxy rotation driven by wall-clock time. Keeps spinning while the
/// sidereal clock is paused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxySpin {
    /// Radians per second
    pub rate: f64,
}

impl GalaxySpin {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: if rate.is_finite() { rate } else { 0.0 },
        }
    }

    /// Rotation angle in radians after `elapsed` session time.
    pub fn angle(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() * self.rate
    }
}

impl Default for GalaxySpin {
    fn default() -> Self {
        Self::new(DEFAULT_GALAXY_SPIN_RATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use starfield::CatalogGenerator;

    fn sample_star() -> Star {
        let mut star = CatalogGenerator::with_seed(3).generate(1).unwrap().remove(0);
        star.gal_x = 0.4;
        star.gal_y = 0.0;
        star.gal_z = 0.1;
        star.hr_x = -0.5;
        star.hr_y = 1.0;
        star
    }

    #[test]
    fn test_sky_layout() {
        let zenith = sky_position(&HorizontalCoords::new(90.0, 123.0));
        assert_relative_eq!(zenith.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(zenith.y, 0.0, epsilon = 1e-12);

        // North on the horizon is straight up
        let north = sky_position(&HorizontalCoords::new(0.0, 0.0));
        assert_relative_eq!(north.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(north.y, -SKY_SCALE, epsilon = 1e-12);

        // East is to the right
        let east = sky_position(&HorizontalCoords::new(0.0, 90.0));
        assert_relative_eq!(east.x, SKY_SCALE, epsilon = 1e-12);
        assert_relative_eq!(east.y, 0.0, epsilon = 1e-12);

        // Halfway up in the south
        let south = sky_position(&HorizontalCoords::new(45.0, 180.0));
        assert_relative_eq!(south.y, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_galaxy_layout() {
        let star = sample_star();
        let still = galaxy_position(&star, 0.0);
        assert_relative_eq!(still.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(
            still.y,
            -0.1 * GALAXY_TILT_DEG.to_radians().sin() * GALAXY_SCALE,
            epsilon = 1e-12
        );

        // Quarter turn moves the star from +x onto the foreshortened +y axis
        let turned = galaxy_position(&star, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(turned.x, 0.0, epsilon = 1e-12);
        let expected = (0.4 * 0.5 - 0.1 * GALAXY_TILT_DEG.to_radians().sin()) * GALAXY_SCALE;
        assert_relative_eq!(turned.y, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_hr_layout_and_radius() {
        let mut star = sample_star();
        let p = hr_position(&star);
        assert_relative_eq!(p.x, -0.75);
        assert_relative_eq!(p.y, 0.8);

        star.radius = 10.0;
        assert_relative_eq!(star_radius(&star, ProjectionMode::HrDiagram), 4.0);
        star.radius = 0.01;
        assert_relative_eq!(star_radius(&star, ProjectionMode::HrDiagram), 1.0);
        assert_relative_eq!(star_radius(&star, ProjectionMode::Sky), star.base_size);
    }

    #[test]
    fn test_project_dispatches_on_mode() {
        let star = sample_star();
        let horizontal = HorizontalCoords::new(30.0, 270.0);
        assert_eq!(
            project(&star, ProjectionMode::Classification, &horizontal, 0.0),
            project(&star, ProjectionMode::Sky, &horizontal, 0.0)
        );
        assert_eq!(project(&star, ProjectionMode::HrDiagram, &horizontal, 1.0), hr_position(&star));
    }

    #[test]
    fn test_culling_only_when_resting_in_horizon_mode() {
        let sky = TransitionSnapshot::idle(ProjectionMode::Sky);
        assert!(is_culled(-6.0, &sky));
        assert!(!is_culled(-4.0, &sky));
        assert!(is_culled(-6.0, &TransitionSnapshot::idle(ProjectionMode::Classification)));
        assert!(!is_culled(-60.0, &TransitionSnapshot::idle(ProjectionMode::Galaxy)));

        let moving = TransitionSnapshot {
            source: ProjectionMode::Galaxy,
            target: ProjectionMode::Sky,
            progress: 0.5,
        };
        assert!(!is_culled(-60.0, &moving));
    }

    #[test]
    fn test_spin_angle() {
        let spin = GalaxySpin::default();
        assert_relative_eq!(spin.angle(Duration::from_secs(10)), 1.0);
        assert_eq!(GalaxySpin::new(f64::NAN).angle(Duration::from_secs(5)), 0.0);
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(is_finite_point(&Point2::new(1.0, -2.0)));
        assert!(!is_finite_point(&Point2::new(f64::NAN, 0.0)));
        assert!(!is_finite_point(&Point2::new(0.0, f64::INFINITY)));
    }
}
