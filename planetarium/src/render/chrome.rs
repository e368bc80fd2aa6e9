//! Decorations drawn over the stars: horizon ring, HR axes, spectral legend
//! and the view title. Mode-bound pieces fade with the transition.

use nalgebra::{Point2, Vector2};
use starfield::generator::{hr_x_for_temperature, hr_y_for_luminosity};
use starfield::{HorizontalCoords, Rgb, SpectralType};

use super::FrameReport;
use crate::mode::{ProjectionMode, ViewMode};
use crate::projection::{sky_position, HR_X_SCALE, HR_Y_SCALE, SKY_SCALE};
use crate::surface::{DrawSurface, TextAlign, TextStyle};
use crate::transition::TransitionSnapshot;
use crate::viewport::Viewport;

pub const BACKGROUND: Rgb = Rgb::new(0x05, 0x07, 0x10);
pub const RING_COLOR: Rgb = Rgb::new(0x44, 0x66, 0x88);
pub const LABEL_COLOR: Rgb = Rgb::new(0xaa, 0xbb, 0xcc);

const MARGIN: f64 = 16.0;
const LABEL_OFFSET: f64 = 14.0;
const NARRATIVE_WRAP: usize = 64;

const COMPASS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)];
const TEMPERATURE_TICKS: [f64; 5] = [30000.0, 10000.0, 6000.0, 4000.0, 3000.0];
const LUMINOSITY_TICKS: [f64; 5] = [1e-2, 1.0, 1e2, 1e4, 1e6];

pub fn draw(
    surface: &mut dyn DrawSurface,
    viewport: &Viewport,
    snapshot: &TransitionSnapshot,
    report: &FrameReport,
) {
    let ring_alpha = snapshot.chrome_alpha(ProjectionMode::Sky);
    if ring_alpha > 0.0 {
        surface.set_global_alpha(ring_alpha);
        draw_horizon(surface, viewport);
    }

    let axes_alpha = snapshot.chrome_alpha(ProjectionMode::HrDiagram);
    if axes_alpha > 0.0 {
        surface.set_global_alpha(axes_alpha);
        draw_hr_axes(surface, viewport);
    }

    if report.view.shows_spectral_legend() {
        surface.set_global_alpha(snapshot.chrome_alpha(ProjectionMode::Classification));
        draw_legend(surface, viewport, report);
    }

    surface.set_global_alpha(1.0);
    draw_title(surface, viewport, report);
}

fn draw_horizon(surface: &mut dyn DrawSurface, viewport: &Viewport) {
    let scale = viewport.scale_factor();
    surface.stroke_circle(viewport.center(), SKY_SCALE * scale, RING_COLOR, 1.0);

    let style = TextStyle::new(14.0, LABEL_COLOR).aligned(TextAlign::Center);
    for (label, azimuth) in COMPASS {
        let on_ring = sky_position(&HorizontalCoords::new(0.0, azimuth));
        let outward = on_ring.coords.normalize();
        let anchor = viewport.to_screen(on_ring) + outward * LABEL_OFFSET + Vector2::new(0.0, 5.0);
        surface.text(anchor, label, &style);
    }
}

fn draw_hr_axes(surface: &mut dyn DrawSurface, viewport: &Viewport) {
    let left = -HR_X_SCALE - 0.1;
    let right = HR_X_SCALE + 0.1;
    let top = -HR_Y_SCALE - 0.1;
    let bottom = HR_Y_SCALE + 0.1;

    let origin = viewport.to_screen(Point2::new(left, bottom));
    let x_end = viewport.to_screen(Point2::new(right, bottom));
    let y_end = viewport.to_screen(Point2::new(left, top));
    surface.line(origin, x_end, RING_COLOR, 1.0);
    surface.line(origin, y_end, RING_COLOR, 1.0);

    let tick = TextStyle::new(11.0, LABEL_COLOR).aligned(TextAlign::Center);
    for temperature in TEMPERATURE_TICKS {
        let x = hr_x_for_temperature(temperature) * HR_X_SCALE;
        let at = viewport.to_screen(Point2::new(x, bottom));
        surface.line(at, at + Vector2::new(0.0, 4.0), RING_COLOR, 1.0);
        surface.text(at + Vector2::new(0.0, 16.0), &format!("{temperature:.0}"), &tick);
    }

    let tick = tick.aligned(TextAlign::Right);
    for luminosity in LUMINOSITY_TICKS {
        let y = hr_y_for_luminosity(luminosity) * HR_Y_SCALE;
        let at = viewport.to_screen(Point2::new(left, y));
        surface.line(at, at - Vector2::new(4.0, 0.0), RING_COLOR, 1.0);
        surface.text(at + Vector2::new(-6.0, 4.0), &format_luminosity(luminosity), &tick);
    }

    let axis_title = TextStyle::new(12.0, LABEL_COLOR).aligned(TextAlign::Center);
    let x_mid = viewport.to_screen(Point2::new(0.0, bottom));
    surface.text(x_mid + Vector2::new(0.0, 32.0), "Temperature (K)", &axis_title);
    let y_top = viewport.to_screen(Point2::new(left, top));
    surface.text(
        y_top - Vector2::new(0.0, 8.0),
        "Luminosity (L_sun)",
        &axis_title.aligned(TextAlign::Left),
    );
}

fn format_luminosity(luminosity: f64) -> String {
    if luminosity >= 1.0 {
        format!("{luminosity:.0}")
    } else {
        format!("{luminosity}")
    }
}

fn draw_legend(surface: &mut dyn DrawSurface, viewport: &Viewport, report: &FrameReport) {
    let x = f64::from(viewport.width) - MARGIN - 110.0;
    let mut y = MARGIN + 20.0;
    let style = TextStyle::new(12.0, LABEL_COLOR);
    let census = report.view == ViewMode::Census;

    for spectral_type in SpectralType::ALL {
        surface.fill_circle(Point2::new(x, y - 4.0), 5.0, spectral_type.color(), None);
        let count = report.visible(spectral_type);
        let line = if census && report.visible_count > 0 {
            let share = 100.0 * count as f64 / report.visible_count as f64;
            format!("{spectral_type}  {count:>5}  {share:4.1}%")
        } else {
            format!("{spectral_type}  {count:>5}")
        };
        surface.text(Point2::new(x + 12.0, y), &line, &style);
        y += 18.0;
    }

    if census {
        surface.text(
            Point2::new(x + 12.0, y + 4.0),
            &format!("total {:>5}", report.visible_count),
            &style,
        );
    }
}

fn draw_title(surface: &mut dyn DrawSurface, viewport: &Viewport, report: &FrameReport) {
    let mut y = MARGIN + 18.0;
    surface.text(
        Point2::new(MARGIN, y),
        report.view.title(),
        &TextStyle::new(20.0, LABEL_COLOR),
    );

    let body = TextStyle::new(12.0, LABEL_COLOR);
    for line in wrap(report.view.narrative(), NARRATIVE_WRAP) {
        y += 16.0;
        surface.text(Point2::new(MARGIN, y), &line, &body);
    }

    let status = format!(
        "LST {:6.2}°   visible {}",
        report.local_sidereal_time, report.visible_count
    );
    surface.text(
        Point2::new(MARGIN, f64::from(viewport.height) - MARGIN),
        &status,
        &body,
    );
}

/// Greedy word wrap to at most `width` characters per line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
