//! Projection modes and the presentation views built on top of them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four coordinate spaces a star can be projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectionMode {
    /// Horizon view from the observer's location
    Sky,
    /// Horizon view with spectral classes highlighted
    Classification,
    /// Face-on galactic disk
    Galaxy,
    /// Temperature against luminosity
    HrDiagram,
}

impl ProjectionMode {
    pub const ALL: [ProjectionMode; 4] = [
        ProjectionMode::Sky,
        ProjectionMode::Classification,
        ProjectionMode::Galaxy,
        ProjectionMode::HrDiagram,
    ];

    /// Whether positions depend on the observer's horizon.
    pub fn is_horizon_based(&self) -> bool {
        match self {
            ProjectionMode::Sky | ProjectionMode::Classification => true,
            ProjectionMode::Galaxy | ProjectionMode::HrDiagram => false,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Sky => write!(f, "sky"),
            ProjectionMode::Classification => write!(f, "classification"),
            ProjectionMode::Galaxy => write!(f, "galaxy"),
            ProjectionMode::HrDiagram => write!(f, "hr-diagram"),
        }
    }
}

/// What the host asks to show. Each view selects a projection and carries its
/// own title and explanatory text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Sky,
    Classification,
    Galaxy,
    HrDiagram,
    /// Population statistics over the classification layout
    Census,
}

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Sky,
        ViewMode::Classification,
        ViewMode::Galaxy,
        ViewMode::HrDiagram,
        ViewMode::Census,
    ];

    /// Projection used to place stars in this view.
    pub fn projection(&self) -> ProjectionMode {
        match self {
            ViewMode::Sky => ProjectionMode::Sky,
            ViewMode::Classification | ViewMode::Census => ProjectionMode::Classification,
            ViewMode::Galaxy => ProjectionMode::Galaxy,
            ViewMode::HrDiagram => ProjectionMode::HrDiagram,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Sky => "The Night Sky",
            ViewMode::Classification => "Spectral Classification",
            ViewMode::Galaxy => "Our Galaxy",
            ViewMode::HrDiagram => "Hertzsprung-Russell Diagram",
            ViewMode::Census => "Stellar Census",
        }
    }

    pub fn narrative(&self) -> &'static str {
        match self {
            ViewMode::Sky => {
                "Stars as seen from your latitude. The sky turns with sidereal time; \
                 stars near the horizon are dimmed by the thicker column of air, and \
                 light pollution and your instrument decide how faint you can see."
            }
            ViewMode::Classification | ViewMode::Census => {
                "Every star is colored by its spectral class, from hot blue O stars to \
                 cool red M dwarfs. Color follows surface temperature."
            }
            ViewMode::Galaxy => {
                "The same stars placed in the disk of the galaxy, seen tilted from \
                 above. Spiral structure emerges from how the stars are distributed."
            }
            ViewMode::HrDiagram => {
                "Temperature runs hot to cool from left to right and luminosity rises \
                 upward. Most stars fall along the main sequence."
            }
        }
    }

    /// Whether the spectral legend is shown.
    pub fn shows_spectral_legend(&self) -> bool {
        match self {
            ViewMode::Classification | ViewMode::Census => true,
            ViewMode::Sky | ViewMode::Galaxy | ViewMode::HrDiagram => false,
        }
    }

    /// The view after this one in presentation order, wrapping around.
    pub fn next(&self) -> ViewMode {
        match self {
            ViewMode::Sky => ViewMode::Classification,
            ViewMode::Classification => ViewMode::Galaxy,
            ViewMode::Galaxy => ViewMode::HrDiagram,
            ViewMode::HrDiagram => ViewMode::Census,
            ViewMode::Census => ViewMode::Sky,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Sky => write!(f, "sky"),
            ViewMode::Classification => write!(f, "classification"),
            ViewMode::Galaxy => write!(f, "galaxy"),
            ViewMode::HrDiagram => write!(f, "hr-diagram"),
            ViewMode::Census => write!(f, "census"),
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sky" => Ok(ViewMode::Sky),
            "classification" | "class" | "spectral" => Ok(ViewMode::Classification),
            "galaxy" => Ok(ViewMode::Galaxy),
            "hr" | "hr-diagram" | "hrdiagram" | "hr_diagram" => Ok(ViewMode::HrDiagram),
            "census" => Ok(ViewMode::Census),
            other => Err(format!(
                "Unknown view '{other}' (expected sky, classification, galaxy, hr-diagram or census)"
            )),
        }
    }
}
