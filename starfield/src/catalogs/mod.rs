//! Star records and catalog containers.
//!
//! A [`Catalog`] is generated once per session and then only read. It wraps an
//! `Arc<[Star]>` so the render loop, hosts and tests can share it without
//! copying.

mod census;

pub use census::CatalogCensus;

use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::coords::{Equatorial, Galactic};
use crate::spectral::{Rgb, SpectralType};

/// Anything with an equatorial position.
pub trait StarPosition {
    /// Right ascension in degrees
    fn ra(&self) -> f64;
    /// Declination in degrees
    fn dec(&self) -> f64;

    fn equatorial(&self) -> Equatorial {
        Equatorial {
            ra: self.ra(),
            dec: self.dec(),
        }
    }
}

/// Generic trait for all star catalogs
pub trait StarCatalog {
    /// Star entry type for this catalog
    type Star;

    /// Get a star by its identifier
    fn get_star(&self, id: u64) -> Option<&Self::Star>;

    /// Get all stars in the catalog
    fn stars(&self) -> impl Iterator<Item = &Self::Star>;

    /// Get the number of stars in the catalog
    fn len(&self) -> usize;

    /// Check if the catalog is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Filter stars based on a predicate
    fn filter<F>(&self, predicate: F) -> Vec<&Self::Star>
    where
        F: Fn(&Self::Star) -> bool;
}

/// A single synthetic star. Every coordinate field is fixed at generation time
/// and all of them describe the same object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    /// Generation order index, stable across sorting
    pub id: u64,
    /// Right ascension, degrees in `[0, 360)`
    pub ra: f64,
    /// Declination, degrees in `[-90, 90]`
    pub dec: f64,
    /// Galactic Cartesian position, roughly within `[-1, 1]`
    pub gal_x: f64,
    pub gal_y: f64,
    pub gal_z: f64,
    /// HR-diagram abscissa (hot stars left, cool stars right), `[-1, 1]`
    pub hr_x: f64,
    /// HR-diagram ordinate (luminous stars up), `[-1, 1]`
    pub hr_y: f64,
    pub spectral_type: SpectralType,
    /// Effective temperature in Kelvin
    pub temperature: f64,
    /// Solar luminosities
    pub luminosity: f64,
    /// Solar radii
    pub radius: f64,
    pub apparent_magnitude: f64,
    pub absolute_magnitude: f64,
    /// Parsecs
    pub distance: f64,
    pub color: Rgb,
    /// Point-source radius in CSS pixels
    pub base_size: f64,
}

impl Star {
    /// Point-source radius for an apparent magnitude: `max(0.5, (15 - m) / 5)`.
    pub fn base_size_for_magnitude(apparent_magnitude: f64) -> f64 {
        ((15.0 - apparent_magnitude) / 5.0).max(0.5)
    }

    /// Direction of the star's galactic position.
    pub fn galactic(&self) -> Galactic {
        Galactic::from_cartesian(self.gal_x, self.gal_y, self.gal_z)
    }
}

impl StarPosition for Star {
    fn ra(&self) -> f64 {
        self.ra
    }

    fn dec(&self) -> f64 {
        self.dec
    }
}

/// Shared, immutable, magnitude-ordered star list.
#[derive(Debug, Clone)]
pub struct Catalog {
    stars: Arc<[Star]>,
}

impl Catalog {
    pub fn new(stars: Vec<Star>) -> Self {
        Self {
            stars: stars.into(),
        }
    }

    pub fn as_slice(&self) -> &[Star] {
        &self.stars
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Star> {
        self.stars.iter()
    }

    /// Shared handle to the underlying storage.
    pub fn shared(&self) -> Arc<[Star]> {
        Arc::clone(&self.stars)
    }

    pub fn census(&self) -> CatalogCensus {
        CatalogCensus::from_stars(&self.stars)
    }
}

impl From<Vec<Star>> for Catalog {
    fn from(stars: Vec<Star>) -> Self {
        Self::new(stars)
    }
}

impl Deref for Catalog {
    type Target = [Star];

    fn deref(&self) -> &Self::Target {
        &self.stars
    }
}

impl StarCatalog for Catalog {
    type Star = Star;

    fn get_star(&self, id: u64) -> Option<&Star> {
        self.stars.iter().find(|s| s.id == id)
    }

    fn stars(&self) -> impl Iterator<Item = &Star> {
        self.stars.iter()
    }

    fn len(&self) -> usize {
        self.stars.len()
    }

    fn filter<F>(&self, predicate: F) -> Vec<&Star>
    where
        F: Fn(&Star) -> bool,
    {
        self.stars.iter().filter(|s| predicate(s)).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) fn star_with(id: u64, spectral_type: SpectralType, magnitude: f64) -> Star {
        Star {
            id,
            ra: 10.0 * id as f64,
            dec: 5.0,
            gal_x: 0.1,
            gal_y: 0.2,
            gal_z: 0.0,
            hr_x: 0.0,
            hr_y: 0.0,
            spectral_type,
            temperature: 5000.0,
            luminosity: 1.0,
            radius: 1.0,
            apparent_magnitude: magnitude,
            absolute_magnitude: 4.83,
            distance: 10.0 + id as f64,
            color: spectral_type.color(),
            base_size: Star::base_size_for_magnitude(magnitude),
        }
    }

    #[test]
    fn test_base_size() {
        assert_relative_eq!(Star::base_size_for_magnitude(0.0), 3.0);
        assert_relative_eq!(Star::base_size_for_magnitude(10.0), 1.0);
        assert_relative_eq!(Star::base_size_for_magnitude(14.0), 0.5);
        assert_relative_eq!(Star::base_size_for_magnitude(20.0), 0.5);
    }

    #[test]
    fn test_catalog_lookup_and_filter() {
        let catalog = Catalog::new(vec![
            star_with(3, SpectralType::G, 1.0),
            star_with(1, SpectralType::M, 2.0),
            star_with(2, SpectralType::M, 5.0),
        ]);

        assert_eq!(catalog.len(), 3);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.get_star(1).map(|s| s.apparent_magnitude), Some(2.0));
        assert!(catalog.get_star(42).is_none());

        let red = catalog.filter(|s| s.spectral_type == SpectralType::M);
        assert_eq!(red.len(), 2);
    }

    #[test]
    fn test_shared_handle_points_to_same_storage() {
        let catalog = Catalog::new(vec![star_with(0, SpectralType::A, 1.0)]);
        let shared = catalog.shared();
        assert!(std::ptr::eq(shared.as_ptr(), catalog.as_slice().as_ptr()));
    }

    #[test]
    fn test_star_position_trait() {
        let star = star_with(4, SpectralType::K, 3.0);
        let eq = star.equatorial();
        assert_relative_eq!(eq.ra, 40.0);
        assert_relative_eq!(eq.dec, 5.0);
    }
}
