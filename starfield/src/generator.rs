//! Seeded synthetic star catalog generation.
//!
//! Each star is built in four steps:
//!
//! 1. **Spectral class and temperature**: a uniform draw walks the cumulative
//!    population table in [`SpectralType`], then the temperature is sampled
//!    uniformly inside that class's range.
//! 2. **Physical properties**: with `t = T / 5778`,
//!    `L = t^7 · U(0.5, 1.5)` and `R = sqrt(L) / t²` (solar units).
//! 3. **Position in the galaxy**: a twisted spiral disk. Radial distance is
//!    `|N(0, σ)|`, the azimuth is twisted by `k · d` and the disk height is
//!    `N(0, h)`. The galactic direction of that point is rotated exactly into
//!    equatorial RA/Dec.
//! 4. **Photometry**: distance is log-uniform, `M = -2.5 log10(L) + 4.83` and
//!    `m = M + 5 (log10(d) - 1)`.
//!
//! The catalog is returned sorted brightest first. Star ids record the
//! generation order and survive the sort.

use std::f64::consts::TAU;
use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::catalogs::{Catalog, CatalogCensus, Star};
use crate::coords::Galactic;
use crate::spectral::SpectralType;
use crate::{CatalogError, Result};

/// Number of stars in a session catalog.
pub const DEFAULT_STAR_COUNT: usize = 7000;

/// Effective temperature of the Sun in Kelvin.
pub const SOLAR_TEMPERATURE: f64 = 5778.0;

/// Absolute visual magnitude of the Sun.
pub const SOLAR_ABSOLUTE_MAGNITUDE: f64 = 4.83;

/// Map an effective temperature onto the HR-diagram abscissa.
///
/// `log10(T)` over `[3.3, 4.7]` spans the axis, reversed so hot stars sit on
/// the left. Clamped to `[-1, 1]`.
pub fn hr_x_for_temperature(temperature: f64) -> f64 {
    let normalized = 2.0 * (temperature.log10() - 3.3) / 1.4 - 1.0;
    (-normalized).clamp(-1.0, 1.0)
}

/// Map a luminosity onto the HR-diagram ordinate.
///
/// `log10(L)` over `[-4, 6]` spans the axis; screen y grows downward so
/// luminous stars get negative values. Clamped to `[-1, 1]`.
pub fn hr_y_for_luminosity(luminosity: f64) -> f64 {
    let normalized = 2.0 * (luminosity.log10() + 4.0) / 10.0 - 1.0;
    (-normalized).clamp(-1.0, 1.0)
}

/// Shape parameters of the synthetic galaxy and distance distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyShape {
    /// Standard deviation of the radial distance
    pub radial_sigma: f64,
    /// Extra azimuth per unit radius, radians
    pub spiral_twist: f64,
    /// Standard deviation of the disk height
    pub disk_thickness: f64,
    /// Upper bound of `log10(distance / pc)`
    pub max_log_distance: f64,
}

impl Default for GalaxyShape {
    fn default() -> Self {
        Self {
            radial_sigma: 0.6,
            spiral_twist: 4.0,
            disk_thickness: 0.08,
            max_log_distance: 3.8,
        }
    }
}

impl GalaxyShape {
    fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(CatalogError::InvalidParameter(format!(
                    "{name} must be positive and finite, got {value}"
                )))
            }
        };
        positive("radial_sigma", self.radial_sigma)?;
        positive("disk_thickness", self.disk_thickness)?;
        positive("max_log_distance", self.max_log_distance)?;
        if !self.spiral_twist.is_finite() {
            return Err(CatalogError::InvalidParameter(format!(
                "spiral_twist must be finite, got {}",
                self.spiral_twist
            )));
        }
        Ok(())
    }
}

/// Star catalog generator driven by a caller supplied RNG.
pub struct CatalogGenerator<R: Rng> {
    rng: R,
    shape: GalaxyShape,
}

impl CatalogGenerator<ChaCha8Rng> {
    /// Reproducible generator: the same seed always yields the same catalog.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system, different every session.
    pub fn from_entropy() -> Self {
        Self::new(ChaCha8Rng::from_os_rng())
    }
}

impl<R: Rng> CatalogGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            shape: GalaxyShape::default(),
        }
    }

    pub fn with_shape(mut self, shape: GalaxyShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn shape(&self) -> &GalaxyShape {
        &self.shape
    }

    /// Generate `count` stars sorted by ascending apparent magnitude.
    pub fn generate(&mut self, count: usize) -> Result<Vec<Star>> {
        if count == 0 {
            return Err(CatalogError::InvalidParameter(
                "star count must be at least 1".to_string(),
            ));
        }
        self.shape.validate()?;

        let radial = Normal::new(0.0, self.shape.radial_sigma)
            .map_err(|e| CatalogError::Distribution(format!("radial distance: {e}")))?;
        let vertical = Normal::new(0.0, self.shape.disk_thickness)
            .map_err(|e| CatalogError::Distribution(format!("disk height: {e}")))?;

        let start = Instant::now();
        let mut stars: Vec<Star> = (0..count as u64)
            .map(|id| self.sample_star(id, &radial, &vertical))
            .collect();

        stars.sort_by(|a, b| a.apparent_magnitude.total_cmp(&b.apparent_magnitude));

        log::info!(
            "Generated {} stars in {:.1} ms",
            stars.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        if log::log_enabled!(log::Level::Debug) {
            let census = CatalogCensus::from_stars(&stars);
            for class in SpectralType::ALL {
                log::debug!(
                    "  {class}: {} ({:.2}%)",
                    census.count(class),
                    census.fraction(class) * 100.0
                );
            }
        }

        Ok(stars)
    }

    /// Generate straight into a shared [`Catalog`].
    pub fn generate_catalog(&mut self, count: usize) -> Result<Catalog> {
        self.generate(count).map(Catalog::new)
    }

    fn sample_star(&mut self, id: u64, radial: &Normal<f64>, vertical: &Normal<f64>) -> Star {
        let rng = &mut self.rng;

        let spectral_type = SpectralType::from_cumulative(rng.random::<f64>());
        let temperature = rng.random_range(spectral_type.temperature_range());

        let t = temperature / SOLAR_TEMPERATURE;
        let luminosity = t.powi(7) * rng.random_range(0.5..1.5);
        let radius = luminosity.sqrt() / (t * t);

        let phi = rng.random_range(0.0..TAU);
        let d = radial.sample(rng).abs();
        let twisted = phi + self.shape.spiral_twist * d;
        let gal_x = d * twisted.cos();
        let gal_y = d * twisted.sin();
        let gal_z = vertical.sample(rng);

        let equatorial = Galactic::from_cartesian(gal_x, gal_y, gal_z).to_equatorial();

        let distance = 10f64.powf(rng.random_range(0.0..self.shape.max_log_distance));
        let absolute_magnitude = -2.5 * luminosity.log10() + SOLAR_ABSOLUTE_MAGNITUDE;
        let apparent_magnitude = absolute_magnitude + 5.0 * (distance.log10() - 1.0);

        Star {
            id,
            ra: equatorial.ra,
            dec: equatorial.dec,
            gal_x,
            gal_y,
            gal_z,
            hr_x: hr_x_for_temperature(temperature),
            hr_y: hr_y_for_luminosity(luminosity),
            spectral_type,
            temperature,
            luminosity,
            radius,
            apparent_magnitude,
            absolute_magnitude,
            distance,
            color: spectral_type.color(),
            base_size: Star::base_size_for_magnitude(apparent_magnitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Equatorial;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn catalog(seed: u64, count: usize) -> Vec<Star> {
        CatalogGenerator::with_seed(seed).generate(count).unwrap()
    }

    #[test]
    fn test_zero_count_rejected() {
        let err = CatalogGenerator::with_seed(1).generate(0).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidParameter(_)));
    }

    #[test]
    fn test_invalid_shape_rejected() {
        let shape = GalaxyShape {
            radial_sigma: -1.0,
            ..GalaxyShape::default()
        };
        let err = CatalogGenerator::with_seed(1)
            .with_shape(shape)
            .generate(10)
            .unwrap_err();
        assert!(err.to_string().contains("radial_sigma"));
    }

    #[test]
    fn test_fields_in_range() {
        for star in catalog(11, 3000) {
            assert!((-1.0..=1.0).contains(&star.hr_x), "hr_x {}", star.hr_x);
            assert!((-1.0..=1.0).contains(&star.hr_y), "hr_y {}", star.hr_y);
            assert!(star.apparent_magnitude.is_finite());
            assert!(star.absolute_magnitude.is_finite());
            assert!((0.0..360.0).contains(&star.ra));
            assert!((-90.0..=90.0).contains(&star.dec));
            assert!((1.0..10f64.powf(3.8)).contains(&star.distance));
            assert!(star
                .spectral_type
                .temperature_range()
                .contains(&star.temperature));
            assert!(star.base_size >= 0.5);
            assert_eq!(star.color, star.spectral_type.color());
        }
    }

    #[test]
    fn test_sorted_brightest_first_with_unique_ids() {
        let stars = catalog(5, 2000);
        for pair in stars.windows(2) {
            assert!(pair[0].apparent_magnitude <= pair[1].apparent_magnitude);
        }
        let mut ids: Vec<u64> = stars.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..2000).collect::<Vec<u64>>());
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        assert_eq!(catalog(42, 500), catalog(42, 500));
        assert_ne!(catalog(42, 500), catalog(43, 500));
    }

    #[test]
    fn test_coordinates_are_consistent() {
        for star in catalog(3, 500) {
            let expected = star.galactic().to_equatorial();
            let diff = (expected.ra - star.ra).rem_euclid(360.0);
            assert!(diff.min(360.0 - diff) < 1e-9);
            assert_relative_eq!(expected.dec, star.dec, epsilon = 1e-9);

            let back = Equatorial::from_degrees(star.ra, star.dec).to_galactic();
            let gal = star.galactic();
            let dl = (back.l - gal.l).rem_euclid(360.0);
            assert!(dl.min(360.0 - dl) < 1e-8);
            assert_relative_eq!(back.b, gal.b, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_physical_relations() {
        for star in catalog(8, 500) {
            let t = star.temperature / SOLAR_TEMPERATURE;
            assert_relative_eq!(star.radius, star.luminosity.sqrt() / (t * t), max_relative = 1e-12);
            let ratio = star.luminosity / t.powi(7);
            assert!((0.5..1.5).contains(&ratio));
            assert_relative_eq!(
                star.apparent_magnitude,
                star.absolute_magnitude + 5.0 * (star.distance.log10() - 1.0),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_population_mix_matches_weights() {
        let stars = catalog(2024, DEFAULT_STAR_COUNT);
        let census = CatalogCensus::from_stars(&stars);
        assert_eq!(census.total(), DEFAULT_STAR_COUNT);

        // M also absorbs the table remainder, so its share is ~0.7657
        let m = census.fraction(SpectralType::M);
        assert!((m - 0.7645).abs() < 0.025, "M fraction {m}");
        assert!(census.fraction(SpectralType::O) < 0.002);
        let k = census.fraction(SpectralType::K);
        assert!((k - 0.121).abs() < 0.02, "K fraction {k}");
    }

    #[test]
    fn test_disk_is_thin() {
        let stars = catalog(9, 4000);
        let mean_abs_z: f64 = stars.iter().map(|s| s.gal_z.abs()).sum::<f64>() / stars.len() as f64;
        let mean_r: f64 = stars
            .iter()
            .map(|s| s.gal_x.hypot(s.gal_y))
            .sum::<f64>()
            / stars.len() as f64;
        // |N(0, σ)| has mean σ·sqrt(2/π)
        assert!((mean_r - 0.6 * (2.0 / std::f64::consts::PI).sqrt()).abs() < 0.03);
        assert!(mean_abs_z < mean_r / 4.0);
    }

    #[rstest]
    #[case(100000.0, -1.0)]
    #[case(1500.0, 1.0)]
    fn test_hr_x_extremes(#[case] temperature: f64, #[case] expected: f64) {
        assert_relative_eq!(hr_x_for_temperature(temperature), expected);
    }

    #[test]
    fn test_hr_axes_orientation() {
        assert!(hr_x_for_temperature(30000.0) < hr_x_for_temperature(3000.0));
        assert!(hr_y_for_luminosity(1e5) < hr_y_for_luminosity(1e-3));
        // The Sun sits near the middle of the luminosity axis
        assert_relative_eq!(hr_y_for_luminosity(1.0), 0.2, epsilon = 1e-12);
        assert_relative_eq!(hr_y_for_luminosity(1e-9), 1.0);
    }
}
