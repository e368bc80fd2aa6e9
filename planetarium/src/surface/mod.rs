//! Drawing surfaces.
//!
//! The render loop only needs to draw circles, lines, rectangles and text.
//! [`DrawSurface`] captures that contract; [`RecordingSurface`] keeps a
//! display list and [`RasterSurface`] rasterizes with tiny-skia.
//!
//! Coordinates are CSS pixels with the origin at the top left.

pub mod raster;

pub use raster::RasterSurface;

use nalgebra::{Point2, Vector2};
use serde::Serialize;
use starfield::Rgb;

use crate::viewport::Viewport;
use crate::Result;

/// Horizontal anchoring of a text run relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    /// Font size in CSS pixels
    pub size: f64,
    pub color: Rgb,
    pub align: TextAlign,
}

impl TextStyle {
    pub fn new(size: f64, color: Rgb) -> Self {
        Self {
            size,
            color,
            align: TextAlign::Left,
        }
    }

    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Soft halo drawn behind a filled circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glow {
    /// Outer radius of the halo in CSS pixels
    pub radius: f64,
}

/// Minimal immediate-mode drawing contract.
///
/// Every draw call is modulated by the current global alpha.
pub trait DrawSurface {
    /// Adopt a new viewport. Called before the first frame and on every change.
    fn resize(&mut self, viewport: &Viewport) -> Result<()>;

    /// Start a frame by filling the whole surface.
    fn clear(&mut self, color: Rgb);

    fn set_global_alpha(&mut self, alpha: f64);

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Rgb, glow: Option<Glow>);

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, color: Rgb, width: f64);

    fn fill_rect(&mut self, origin: Point2<f64>, size: Vector2<f64>, color: Rgb);

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Rgb, width: f64);

    /// Draw `text` with its baseline at `position.y`, anchored per `style.align`.
    fn text(&mut self, position: Point2<f64>, text: &str, style: &TextStyle);
}

/// One recorded draw call, with the global alpha in effect when it was made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Clear {
        color: Rgb,
    },
    FillCircle {
        center: [f64; 2],
        radius: f64,
        color: Rgb,
        alpha: f64,
        glow: Option<Glow>,
    },
    StrokeCircle {
        center: [f64; 2],
        radius: f64,
        color: Rgb,
        alpha: f64,
        width: f64,
    },
    FillRect {
        origin: [f64; 2],
        size: [f64; 2],
        color: Rgb,
        alpha: f64,
    },
    Line {
        from: [f64; 2],
        to: [f64; 2],
        color: Rgb,
        alpha: f64,
        width: f64,
    },
    Text {
        position: [f64; 2],
        text: String,
        style: TextStyle,
        alpha: f64,
    },
}

/// Display-list surface. `clear` starts a new list, so after a frame the list
/// holds exactly that frame's commands.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    viewport: Option<Viewport>,
    global_alpha: f64,
    resize_count: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            viewport: None,
            global_alpha: 1.0,
            resize_count: 0,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Hand the current display list to the caller, leaving it empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.viewport.as_ref()
    }

    /// Number of times the surface was resized.
    pub fn resize_count(&self) -> usize {
        self.resize_count
    }

    /// Filled circles in the list as `(center, radius, alpha)`.
    pub fn circles(&self) -> impl Iterator<Item = ([f64; 2], f64, f64)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillCircle {
                center,
                radius,
                alpha,
                ..
            } => Some((*center, *radius, *alpha)),
            _ => None,
        })
    }

    /// Text runs in the list.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Serialize the display list for hosts that replay it.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.commands)?)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn xy(p: Point2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

impl DrawSurface for RecordingSurface {
    fn resize(&mut self, viewport: &Viewport) -> Result<()> {
        self.viewport = Some(*viewport);
        self.resize_count += 1;
        Ok(())
    }

    fn clear(&mut self, color: Rgb) {
        self.commands.clear();
        self.global_alpha = 1.0;
        self.commands.push(DrawCommand::Clear { color });
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_circle(&mut self, center: Point2<f64>, radius: f64, color: Rgb, glow: Option<Glow>) {
        self.commands.push(DrawCommand::FillCircle {
            center: xy(center),
            radius,
            color,
            alpha: self.global_alpha,
            glow,
        });
    }

    fn stroke_circle(&mut self, center: Point2<f64>, radius: f64, color: Rgb, width: f64) {
        self.commands.push(DrawCommand::StrokeCircle {
            center: xy(center),
            radius,
            color,
            alpha: self.global_alpha,
            width,
        });
    }

    fn fill_rect(&mut self, origin: Point2<f64>, size: Vector2<f64>, color: Rgb) {
        self.commands.push(DrawCommand::FillRect {
            origin: xy(origin),
            size: [size.x, size.y],
            color,
            alpha: self.global_alpha,
        });
    }

    fn line(&mut self, from: Point2<f64>, to: Point2<f64>, color: Rgb, width: f64) {
        self.commands.push(DrawCommand::Line {
            from: xy(from),
            to: xy(to),
            color,
            alpha: self.global_alpha,
            width,
        });
    }

    fn text(&mut self, position: Point2<f64>, text: &str, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            position: xy(position),
            text: text.to_string(),
            style: *style,
            alpha: self.global_alpha,
        });
    }
}
