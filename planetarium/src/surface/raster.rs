//! tiny-skia raster surface.
//!
//! Shapes are filled directly on a [`Pixmap`] sized in device pixels; every
//! call is issued in CSS pixels and scaled by the device pixel ratio. Text is
//! rendered by wrapping each run in a one-element SVG document and passing it
//! through usvg/resvg.

use std::path::Path;
use std::sync::Arc;

use image::{ImageFormat, Rgba, RgbaImage};
use nalgebra::{Point2, Vector2};
use starfield::Rgb;
use tiny_skia::{
    Color, FillRule, GradientStop, Paint, PathBuilder, Pixmap, Point, RadialGradient, Rect,
    SpreadMode, Stroke, Transform,
};
use usvg::{fontdb, Options, Tree};

use super::{DrawSurface, Glow, TextAlign, TextStyle};
use crate::viewport::Viewport;
use crate::{PlanetariumError, Result};

/// Peak opacity of a glow halo relative to the star itself.
const GLOW_PEAK_ALPHA: f32 = 0.45;

pub struct RasterSurface {
    pixmap: Pixmap,
    viewport: Viewport,
    global_alpha: f64,
    fontdb: Arc<fontdb::Database>,
}

fn allocate(viewport: &Viewport) -> Result<Pixmap> {
    let (width, height) = (viewport.pixel_width(), viewport.pixel_height());
    Pixmap::new(width, height).ok_or(PlanetariumError::SurfaceAllocation { width, height })
}

/// Escape the characters that are special in SVG text content.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn color_with_alpha(color: Rgb, alpha: f64) -> Color {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(color.r, color.g, color.b, a)
}

impl RasterSurface {
    /// Create a surface and load the system fonts for text.
    pub fn new(viewport: Viewport) -> Result<Self> {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        log::debug!("Loaded {} font faces", fontdb.len());
        Self::with_fontdb(viewport, Arc::new(fontdb))
    }

    /// Create a surface sharing an already loaded font database.
    pub fn with_fontdb(viewport: Viewport, fontdb: Arc<fontdb::Database>) -> Result<Self> {
        Ok(Self {
            pixmap: allocate(&viewport)?,
            viewport,
            global_alpha: 1.0,
            fontdb,
        })
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of the device pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
    }

    /// Copy the frame into an `image` buffer.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let width = self.pixmap.width();
        let mut img = RgbaImage::new(width, self.pixmap.height());
        for (i, pixel) in self.pixmap.pixels().iter().enumerate() {
            let c = pixel.demultiply();
            let (x, y) = (i as u32 % width, i as u32 / width);
            img.put_pixel(x, y, Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
        }
        img
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_rgba_image()
            .save_with_format(path.as_ref(), ImageFormat::Png)?;
        Ok(())
    }

    fn transform(&self) -> Transform {
        let dpr = self.viewport.device_pixel_ratio as f32;
        Transform::from_scale(dpr, dpr)
    }

    fn paint(&self, color: Rgb) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color(color_with_alpha(color, self.global_alpha));
        paint.anti_alias = true;
        paint
    }

    fn draw_glow(&mut self, center: Point2<f64>, glow: Glow, color: Rgb) {
        let (cx, cy, r) = (center.x as f32, center.y as f32, glow.radius as f32);
        let peak = GLOW_PEAK_ALPHA * self.global_alpha as f32;
        let stops = vec![
            GradientStop::new(0.0, color_with_alpha(color, f64::from(peak))),
            GradientStop::new(1.0, color_with_alpha(color, 0.0)),
        ];
        let Some(shader) = RadialGradient::new(
            Point::from_xy(cx, cy),
            Point::from_xy(cx, cy),
            r,
            stops,
            SpreadMode::Pad,
            Transform::identity(),
        ) else {
            return;
        };
        let Some(path) = PathBuilder::from_circle(cx, cy, r) else {
            return;
        };
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Default::default()
        };
        let transform = self.transform();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }
}

impl DrawSurface for RasterSurface {
    fn resize(&mut self, viewport: &Viewport) -> Result<()> {
        if viewport.pixel_width() != self.pixmap.width()
            || viewport.pixel_height() != self.pixmap.height()
        {
            self.pixmap = allocate(viewport)?;
            log::debug!("Raster surface resized to {}", viewport);
        }
        self.viewport = *viewport;
        Ok(())
    }

    fn clear(&mut self, color: Rgb) {
        self.global_alpha = 1.0;
        self.pixmap.fill(color_with_alpha(color, 1.0));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Rgb, glow: Option<Glow>) {
        if let Some(glow) = glow.filter(|g| g.radius > radius) {
            self.draw_glow(center, glow, color);
        }
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        let paint = self.paint(color);
        let transform = self.transform();
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, color: Rgb, width: f64) {
        let Some(path) = PathBuilder::from_circle(center.x as f32, center.y as f32, radius as f32)
        else {
            return;
        };
        let stroke = Stroke {
            width: width as f32,
            ..Default::default()
        };
        let paint = self.paint(color);
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn fill_rect(&mut self, origin: Point2<f64>, size: Vector2<f64>, color: Rgb) {
        let Some(rect) =
            Rect::from_xywh(origin.x as f32, origin.y as f32, size.x as f32, size.y as f32)
        else {
            return;
        };
        let paint = self.paint(color);
        let transform = self.transform();
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Rgb, width: f64) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);
        let Some(path) = builder.finish() else {
            return;
        };
        let stroke = Stroke {
            width: width as f32,
            ..Default::default()
        };
        let paint = self.paint(color);
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &paint, &stroke, transform, None);
    }

    fn text(&mut self, position: Point2<f64>, text: &str, style: &TextStyle) {
        if text.trim().is_empty() || self.global_alpha <= 0.0 {
            return;
        }
        let anchor = match style.align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}"><text x="{x}" y="{y}" font-family="DejaVu Sans, sans-serif" font-size="{size}" text-anchor="{anchor}" fill="{fill}" fill-opacity="{alpha}">{content}</text></svg>"#,
            w = self.viewport.width,
            h = self.viewport.height,
            x = position.x,
            y = position.y,
            size = style.size,
            fill = style.color.to_hex_string(),
            alpha = self.global_alpha,
            content = escape_xml(text),
        );

        let options = Options {
            fontdb: Arc::clone(&self.fontdb),
            font_family: "DejaVu Sans".to_string(),
            ..Default::default()
        };
        match Tree::from_str(&svg, &options) {
            Ok(tree) => {
                let transform = self.transform();
                resvg::render(&tree, transform, &mut self.pixmap.as_mut());
            }
            Err(e) => log::warn!("Failed to lay out text {:?}: {}", text, e),
        }
    }
}
