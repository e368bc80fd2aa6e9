use std::fmt;

use serde::Serialize;

use super::Star;
use crate::spectral::SpectralType;

/// Summary statistics of a star population.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogCensus {
    counts: [usize; 7],
    brightest_magnitude: Option<f64>,
    faintest_magnitude: Option<f64>,
    mean_distance: Option<f64>,
}

impl CatalogCensus {
    pub fn from_stars(stars: &[Star]) -> Self {
        let mut counts = [0usize; 7];
        let mut brightest: Option<f64> = None;
        let mut faintest: Option<f64> = None;
        let mut distance_sum = 0.0;

        for star in stars {
            counts[star.spectral_type.index()] += 1;
            let m = star.apparent_magnitude;
            brightest = Some(brightest.map_or(m, |b| b.min(m)));
            faintest = Some(faintest.map_or(m, |f| f.max(m)));
            distance_sum += star.distance;
        }

        let mean_distance = if stars.is_empty() {
            None
        } else {
            Some(distance_sum / stars.len() as f64)
        };

        Self {
            counts,
            brightest_magnitude: brightest,
            faintest_magnitude: faintest,
            mean_distance,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn count(&self, spectral_type: SpectralType) -> usize {
        self.counts[spectral_type.index()]
    }

    /// Share of the population in `spectral_type`; zero for an empty census.
    pub fn fraction(&self, spectral_type: SpectralType) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.count(spectral_type) as f64 / total as f64
        }
    }

    pub fn brightest_magnitude(&self) -> Option<f64> {
        self.brightest_magnitude
    }

    pub fn faintest_magnitude(&self) -> Option<f64> {
        self.faintest_magnitude
    }

    /// Mean distance in parsecs.
    pub fn mean_distance(&self) -> Option<f64> {
        self.mean_distance
    }
}

impl fmt::Display for CatalogCensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Class  Count   Fraction")?;
        for class in SpectralType::ALL {
            writeln!(
                f,
                "{:<5}  {:>5}   {:>7.3}%",
                class,
                self.count(class),
                self.fraction(class) * 100.0
            )?;
        }
        writeln!(f, "Total  {:>5}", self.total())?;
        match (self.brightest_magnitude, self.faintest_magnitude) {
            (Some(b), Some(fa)) => writeln!(f, "Magnitudes: {b:.2} .. {fa:.2}")?,
            _ => writeln!(f, "Magnitudes: n/a")?,
        }
        match self.mean_distance {
            Some(d) => write!(f, "Mean distance: {d:.1} pc"),
            None => write!(f, "Mean distance: n/a"),
        }
    }
}
