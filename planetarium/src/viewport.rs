//! Viewport dimensions and the mapping from the projection plane to pixels.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plane units spanned by the shorter viewport side.
const PLANE_UNITS_ACROSS_SHORT_SIDE: f64 = 4.0;

/// Drawing area in CSS pixels plus the device pixel ratio.
///
/// All draw calls are issued in CSS pixels; raster backends multiply by the
/// device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    pub fn with_device_pixel_ratio(mut self, dpr: f64) -> Self {
        self.device_pixel_ratio = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixels per plane unit: `min(width, height) / 4`.
    pub fn scale_factor(&self) -> f64 {
        f64::from(self.width.min(self.height)) / PLANE_UNITS_ACROSS_SHORT_SIDE
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Map a plane point to CSS pixel coordinates.
    pub fn to_screen(&self, plane: Point2<f64>) -> Point2<f64> {
        self.center() + plane.coords * self.scale_factor()
    }

    /// Inverse of [`Viewport::to_screen`].
    pub fn to_plane(&self, screen: Point2<f64>) -> Point2<f64> {
        let scale = self.scale_factor();
        if scale == 0.0 {
            return Point2::origin();
        }
        Point2::from((screen - self.center()) / scale)
    }

    pub fn size(&self) -> Vector2<f64> {
        Vector2::new(f64::from(self.width), f64::from(self.height))
    }

    /// Backing store width in device pixels.
    pub fn pixel_width(&self) -> u32 {
        (f64::from(self.width) * self.device_pixel_ratio).round() as u32
    }

    /// Backing store height in device pixels.
    pub fn pixel_height(&self) -> u32 {
        (f64::from(self.height) * self.device_pixel_ratio).round() as u32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

impl From<(u32, u32)> for Viewport {
    fn from(dimensions: (u32, u32)) -> Self {
        Self::new(dimensions.0, dimensions.1)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)?;
        if self.device_pixel_ratio != 1.0 {
            write!(f, "@{}x", self.device_pixel_ratio)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_scale_uses_short_side() {
        assert_relative_eq!(Viewport::new(1280, 800).scale_factor(), 200.0);
        assert_relative_eq!(Viewport::new(400, 1000).scale_factor(), 100.0);
    }

    #[test]
    fn test_screen_mapping_round_trip() {
        let viewport = Viewport::new(1280, 800);
        let origin = viewport.to_screen(Point2::origin());
        assert_relative_eq!(origin.x, 640.0);
        assert_relative_eq!(origin.y, 400.0);

        let p = Point2::new(0.5, -1.25);
        let screen = viewport.to_screen(p);
        assert_relative_eq!(screen.x, 740.0);
        assert_relative_eq!(screen.y, 150.0);
        let back = viewport.to_plane(screen);
        assert_relative_eq!(back.x, p.x, epsilon = 1e-12);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-12);
    }

    #[test]
    fn test_pixel_dimensions() {
        let viewport = Viewport::new(300, 200).with_device_pixel_ratio(2.0);
        assert_eq!(viewport.pixel_width(), 600);
        assert_eq!(viewport.pixel_height(), 400);
        assert_eq!(viewport.to_string(), "300x200@2x");

        let bad = Viewport::new(10, 10).with_device_pixel_ratio(f64::NAN);
        assert_eq!(bad.device_pixel_ratio, 1.0);
    }

    #[test]
    fn test_empty() {
        assert!(Viewport::new(0, 10).is_empty());
        assert!(!Viewport::from((1, 1)).is_empty());
        assert_eq!(Viewport::default().to_string(), "1280x800");
    }
}
