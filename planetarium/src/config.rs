//! Session configuration stored as JSON.

use serde::{Deserialize, Serialize};
use starfield::{Catalog, CatalogGenerator, DEFAULT_STAR_COUNT};
use std::path::Path;
use std::time::Duration;

use crate::mode::ViewMode;
use crate::observer::ObserverSettings;
use crate::projection::DEFAULT_GALAXY_SPIN_RATE;
use crate::render::{FrameInput, RenderSettings};
use crate::transition::DEFAULT_TRANSITION_DURATION;
use crate::viewport::Viewport;
use crate::visibility::SpectralFilter;
use crate::{PlanetariumError, Result};

/// Everything needed to start a session. Missing JSON fields take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub star_count: usize,
    /// Catalog seed; `None` draws from OS entropy
    pub seed: Option<u64>,
    pub observer: ObserverSettings,
    pub initial_view: ViewMode,
    pub observational_power: f64,
    pub active_filters: SpectralFilter,
    pub viewport: Viewport,
    pub transition_ms: u64,
    /// Radians per second
    pub galaxy_spin_rate: f64,
    /// Degrees
    pub initial_lst: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            star_count: DEFAULT_STAR_COUNT,
            seed: None,
            observer: ObserverSettings::default(),
            initial_view: ViewMode::Sky,
            observational_power: 0.3,
            active_filters: SpectralFilter::all(),
            viewport: Viewport::default(),
            transition_ms: DEFAULT_TRANSITION_DURATION.as_millis() as u64,
            galaxy_spin_rate: DEFAULT_GALAXY_SPIN_RATE,
            initial_lst: 0.0,
        }
    }
}

impl SessionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded session config from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Reject settings no session can run with. Observer values are clamped
    /// later instead.
    pub fn validate(&self) -> Result<()> {
        if self.star_count == 0 {
            return Err(PlanetariumError::InvalidConfig(
                "star_count must be positive".to_string(),
            ));
        }
        if self.viewport.is_empty() {
            return Err(PlanetariumError::InvalidConfig(format!(
                "viewport {} has no area",
                self.viewport
            )));
        }
        if !self.galaxy_spin_rate.is_finite() {
            return Err(PlanetariumError::InvalidConfig(
                "galaxy_spin_rate must be finite".to_string(),
            ));
        }
        if !self.initial_lst.is_finite() {
            return Err(PlanetariumError::InvalidConfig(
                "initial_lst must be finite".to_string(),
            ));
        }
        Ok(())
    }

    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            transition_duration: self.transition_duration(),
            galaxy_spin_rate: self.galaxy_spin_rate,
            initial_lst: self.initial_lst,
        }
    }

    /// Frame input for the first frame of the session.
    pub fn frame_input(&self) -> FrameInput {
        FrameInput {
            view: self.initial_view,
            observational_power: self.observational_power,
            active_filters: self.active_filters,
            observer: self.observer,
            viewport: self.viewport,
        }
    }

    pub fn generate_catalog(&self) -> Result<Catalog> {
        let catalog = match self.seed {
            Some(seed) => CatalogGenerator::with_seed(seed).generate_catalog(self.star_count)?,
            None => CatalogGenerator::from_entropy().generate_catalog(self.star_count)?,
        };
        Ok(catalog)
    }
}
