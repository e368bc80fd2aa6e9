//! Procedural star catalogs and celestial coordinate frames.
//!
//! This crate produces a synthetic, physically plausible star population and
//! provides the coordinate transforms needed to place it on the sky, in the
//! galaxy, and on a Hertzsprung–Russell diagram.
//!
//! # Modules
//!
//! - [`spectral`]: Harvard spectral classes, their temperature ranges,
//!   population weights and display colors
//! - [`coords`]: equatorial, galactic and horizontal frames with exact
//!   spherical rotations between them
//! - [`catalogs`]: the immutable [`Star`] record, the shared [`Catalog`]
//!   container and census statistics
//! - [`generator`]: the seeded catalog generator
//!
//! # Example
//!
//! ```rust
//! use starfield::{CatalogGenerator, CatalogCensus, SpectralType};
//!
//! let catalog = CatalogGenerator::with_seed(7).generate_catalog(2000).unwrap();
//! let census = CatalogCensus::from_stars(catalog.as_slice());
//!
//! assert_eq!(census.total(), 2000);
//! assert!(census.fraction(SpectralType::M) > 0.6);
//! ```

use thiserror::Error;

pub mod catalogs;
pub mod coords;
pub mod generator;
pub mod spectral;

pub use catalogs::{Catalog, CatalogCensus, Star, StarCatalog, StarPosition};
pub use coords::{Equatorial, Galactic, HorizontalCoords};
pub use generator::{CatalogGenerator, DEFAULT_STAR_COUNT};
pub use spectral::{Rgb, SpectralType};

/// Errors raised while building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A generator parameter is outside its valid domain.
    #[error("Invalid generator parameter: {0}")]
    InvalidParameter(String),

    /// A sampling distribution could not be constructed.
    #[error("Distribution error: {0}")]
    Distribution(String),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
