//! Planetarium - animated multi-projection sky renderer.
//!
//! Renders a synthetic star catalog under four spatial projections and
//! animates between them:
//!
//! - **Sky**: the horizon view of an observer at a given latitude and local
//!   sidereal time, with atmospheric extinction near the horizon
//! - **Classification**: the same sky with a spectral legend
//! - **Galaxy**: the face-on, slowly spinning spiral disk
//! - **HR Diagram**: luminosity against temperature
//!
//! The per-frame pipeline lives in [`render::RenderLoop`]. It advances the
//! [`observer::SiderealClock`] and the [`transition::TransitionAnimator`],
//! evaluates [`visibility`] and [`projection`] for every star and emits draw
//! calls on a [`surface::DrawSurface`]. [`engine::Engine`] wraps the loop with
//! message-passing inputs and outputs for hosts.
//!
//! # Example
//!
//! ```rust
//! use planetarium::render::{FrameInput, RenderLoop, RenderSettings};
//! use planetarium::surface::RecordingSurface;
//! use starfield::CatalogGenerator;
//! use std::time::Duration;
//!
//! let catalog = CatalogGenerator::with_seed(1).generate_catalog(500).unwrap();
//! let mut render = RenderLoop::new(catalog.shared(), RenderSettings::default());
//! let mut surface = RecordingSurface::new();
//!
//! let report = render.frame(&FrameInput::default(), Duration::ZERO, &mut surface);
//! assert_eq!(report.frame_index, 0);
//! assert!(report.visible_count <= 500);
//! ```

use thiserror::Error;

pub mod config;
pub mod engine;
pub mod frame_writer;
pub mod mode;
pub mod observer;
pub mod projection;
pub mod render;
pub mod shared_args;
pub mod surface;
pub mod transition;
pub mod viewport;
pub mod visibility;

pub use config::SessionConfig;
pub use engine::{Engine, InputSender};
pub use mode::{ProjectionMode, ViewMode};
pub use observer::{ObserverSettings, ObserverState, SiderealClock};
pub use render::{FrameInput, FrameReport, RenderLoop, RenderSettings};
pub use surface::{DrawSurface, RasterSurface, RecordingSurface};
pub use transition::{TransitionAnimator, TransitionSnapshot};
pub use viewport::Viewport;
pub use visibility::{SpectralFilter, VisibilityParams};

/// Errors outside the per-frame numerical path.
#[derive(Debug, Error)]
pub enum PlanetariumError {
    /// The raster backend refused a surface of this size
    #[error("Cannot allocate a {width}x{height} drawing surface")]
    SurfaceAllocation { width: u32, height: u32 },

    #[error("SVG error: {0}")]
    Svg(#[from] usvg::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] starfield::CatalogError),

    #[error("Frame writer queue full, cannot write {}", .0.display())]
    WriterQueueFull(std::path::PathBuf),

    #[error("Frame writer workers have shut down")]
    WriterClosed,
}

/// Result type for planetarium operations.
pub type Result<T> = std::result::Result<T, PlanetariumError>;
