//! The per-frame driver.
//!
//! [`RenderLoop::frame`] takes the host's latest [`FrameInput`] and the
//! session time, advances the sidereal clock and the transition animator,
//! then runs visibility and projection for every star and draws the result
//! followed by the mode chrome.

pub mod chrome;

use nalgebra::Point2;
use serde::Serialize;
use starfield::{HorizontalCoords, SpectralType, Star};
use std::sync::Arc;
use std::time::Duration;

use crate::mode::{ProjectionMode, ViewMode};
use crate::observer::{ObserverSettings, ObserverState, SiderealClock};
use crate::projection::{self, GalaxySpin, DEFAULT_GALAXY_SPIN_RATE};
use crate::surface::{DrawSurface, Glow};
use crate::transition::{TransitionAnimator, TransitionSnapshot, DEFAULT_TRANSITION_DURATION};
use crate::viewport::Viewport;
use crate::visibility::{self, SpectralFilter, VisibilityParams};

/// Stars brighter than this get a glow halo.
pub const GLOW_MAGNITUDE: f64 = 2.0;
/// Halo radius relative to the star radius.
pub const GLOW_SCALE: f64 = 4.0;
/// Extra pick tolerance around a drawn star, CSS pixels.
pub const HOVER_TOLERANCE: f64 = 4.0;

/// Everything the host controls, sampled once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameInput {
    pub view: ViewMode,
    /// Instrument power in `[0, 1]`
    pub observational_power: f64,
    pub active_filters: SpectralFilter,
    pub observer: ObserverSettings,
    pub viewport: Viewport,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            view: ViewMode::Sky,
            observational_power: 0.3,
            active_filters: SpectralFilter::all(),
            observer: ObserverSettings::default(),
            viewport: Viewport::default(),
        }
    }
}

impl FrameInput {
    pub fn visibility(&self) -> VisibilityParams {
        VisibilityParams::new(
            self.observational_power,
            self.observer.light_pollution_limit,
            self.active_filters,
        )
    }
}

/// Summary of one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameReport {
    pub frame_index: u64,
    /// Stars drawn with a positive alpha
    pub visible_count: usize,
    /// `visible_count` split by spectral type, indexed by [`SpectralType::index`]
    pub visible_by_type: [usize; 7],
    pub local_sidereal_time: f64,
    pub transitioning: bool,
    pub view: ViewMode,
    /// Eased transition progress
    pub progress: f64,
    /// Stars dropped because their projection was not finite
    pub skipped: usize,
}

impl FrameReport {
    pub fn visible(&self, spectral_type: SpectralType) -> usize {
        self.visible_by_type[spectral_type.index()]
    }
}

/// Session constants of the loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub transition_duration: Duration,
    /// Galaxy spin in radians per second
    pub galaxy_spin_rate: f64,
    /// Local sidereal time at session start, degrees
    pub initial_lst: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            transition_duration: DEFAULT_TRANSITION_DURATION,
            galaxy_spin_rate: DEFAULT_GALAXY_SPIN_RATE,
            initial_lst: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HitTarget {
    id: u64,
    center: Point2<f64>,
    radius: f64,
}

pub struct RenderLoop {
    stars: Arc<[Star]>,
    clock: SiderealClock,
    animator: TransitionAnimator,
    spin: GalaxySpin,
    frame_index: u64,
    last_time: Option<Duration>,
    viewport: Option<Viewport>,
    hit_targets: Vec<HitTarget>,
    last_snapshot: TransitionSnapshot,
}

impl RenderLoop {
    pub fn new(stars: Arc<[Star]>, settings: RenderSettings) -> Self {
        Self {
            stars,
            clock: SiderealClock::new(settings.initial_lst),
            animator: TransitionAnimator::new(ProjectionMode::Sky, settings.transition_duration),
            spin: GalaxySpin::new(settings.galaxy_spin_rate),
            frame_index: 0,
            last_time: None,
            viewport: None,
            hit_targets: Vec::new(),
            last_snapshot: TransitionSnapshot::idle(ProjectionMode::Sky),
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn local_sidereal_time(&self) -> f64 {
        self.clock.lst()
    }

    /// Transition state as of the last frame.
    pub fn snapshot(&self) -> TransitionSnapshot {
        self.last_snapshot
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_index
    }

    /// Render one frame at session time `now`.
    pub fn frame(
        &mut self,
        input: &FrameInput,
        now: Duration,
        surface: &mut dyn DrawSurface,
    ) -> FrameReport {
        let settings = input.observer.clamped();
        let requested = input.view.projection();

        // The session opens resting in whatever view the host asked for
        let delta_ms = match self.last_time {
            Some(last) => now.saturating_sub(last).as_secs_f64() * 1000.0,
            None => {
                self.animator = TransitionAnimator::new(requested, self.animator.duration());
                0.0
            }
        };
        self.last_time = Some(now);

        if !settings.is_paused && self.animator.target() == ProjectionMode::Sky {
            self.clock.advance(delta_ms, settings.time_speed);
        }

        self.animator.request(requested, now);
        let snapshot = self.animator.advance(now);
        self.last_snapshot = snapshot;

        let observer = ObserverState::new(settings, self.clock.lst());
        let viewport = input.viewport;
        if self.viewport != Some(viewport) {
            if let Err(e) = surface.resize(&viewport) {
                log::warn!("Surface rejected viewport {}: {}", viewport, e);
            }
            self.viewport = Some(viewport);
        }

        surface.clear(chrome::BACKGROUND);

        let params = input.visibility();
        let galaxy_angle = self.spin.angle(now);
        let mut visible_by_type = [0usize; 7];
        let mut skipped = 0usize;
        self.hit_targets.clear();

        for star in self.stars.iter() {
            let horizontal = HorizontalCoords::from_equatorial(
                star.ra,
                star.dec,
                observer.latitude,
                observer.local_sidereal_time,
            );
            if projection::is_culled(horizontal.altitude_deg, &snapshot) {
                continue;
            }
            let Some(alpha) =
                visibility::evaluate(star, &params, horizontal.altitude_deg, &snapshot)
            else {
                continue;
            };

            let from = projection::project(star, snapshot.source, &horizontal, galaxy_angle);
            let to = projection::project(star, snapshot.target, &horizontal, galaxy_angle);
            let plane = snapshot.lerp(from, to);
            if !projection::is_finite_point(&plane) {
                skipped += 1;
                continue;
            }

            let radius = snapshot.lerp_scalar(
                projection::star_radius(star, snapshot.source),
                projection::star_radius(star, snapshot.target),
            );
            let center = viewport.to_screen(plane);
            let glow = (star.apparent_magnitude < GLOW_MAGNITUDE).then(|| Glow {
                radius: radius * GLOW_SCALE,
            });

            surface.set_global_alpha(alpha);
            surface.fill_circle(center, radius, star.color, glow);

            visible_by_type[star.spectral_type.index()] += 1;
            self.hit_targets.push(HitTarget {
                id: star.id,
                center,
                radius,
            });
        }

        if skipped > 0 {
            log::warn!(
                "Frame {}: skipped {} stars with non-finite projections",
                self.frame_index,
                skipped
            );
        }

        let report = FrameReport {
            frame_index: self.frame_index,
            visible_count: visible_by_type.iter().sum(),
            visible_by_type,
            local_sidereal_time: observer.local_sidereal_time,
            transitioning: snapshot.is_transitioning(),
            view: input.view,
            progress: snapshot.progress,
            skipped,
        };

        chrome::draw(surface, &viewport, &snapshot, &report);

        log::debug!(
            "Frame {} [{}] visible={} lst={:.2} progress={:.3}",
            report.frame_index,
            report.view,
            report.visible_count,
            report.local_sidereal_time,
            report.progress
        );

        self.frame_index += 1;
        report
    }

    /// Id of the drawn star nearest to `(x, y)` in CSS pixels.
    ///
    /// Only stars within their radius plus a small tolerance are considered.
    /// Always `None` while a transition is running.
    pub fn hovered(&self, x: f64, y: f64) -> Option<u64> {
        if self.last_snapshot.is_transitioning() {
            return None;
        }
        let cursor = Point2::new(x, y);
        self.hit_targets
            .iter()
            .filter_map(|t| {
                let distance = nalgebra::distance(&t.center, &cursor);
                (distance <= t.radius + HOVER_TOLERANCE).then_some((t.id, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use approx::assert_relative_eq;
    use starfield::CatalogGenerator;

    fn render_loop(count: usize) -> RenderLoop {
        let catalog = CatalogGenerator::with_seed(11).generate_catalog(count).unwrap();
        RenderLoop::new(catalog.shared(), RenderSettings::default())
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_lst_advances_in_sky_only() {
        let mut render = render_loop(50);
        let mut surface = RecordingSurface::new();
        let mut input = FrameInput::default();

        render.frame(&input, ms(0), &mut surface);
        let report = render.frame(&input, ms(1000), &mut surface);
        assert_relative_eq!(report.local_sidereal_time, 10.0, epsilon = 1e-9);

        input.observer.is_paused = true;
        let report = render.frame(&input, ms(2000), &mut surface);
        assert_relative_eq!(report.local_sidereal_time, 10.0, epsilon = 1e-9);

        input.observer.is_paused = false;
        input.view = ViewMode::Galaxy;
        // Sky is still the target at the top of this frame
        let report = render.frame(&input, ms(3000), &mut surface);
        assert_relative_eq!(report.local_sidereal_time, 20.0, epsilon = 1e-9);
        let report = render.frame(&input, ms(4000), &mut surface);
        assert_relative_eq!(report.local_sidereal_time, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_first_frame_rests_in_requested_view() {
        let mut render = render_loop(20);
        let mut surface = RecordingSurface::new();
        let input = FrameInput {
            view: ViewMode::HrDiagram,
            ..Default::default()
        };
        let report = render.frame(&input, ms(500), &mut surface);
        assert!(!report.transitioning);
        assert!(render.snapshot().is_idle_in(ProjectionMode::HrDiagram));
    }

    #[test]
    fn test_report_counts_match_draw_calls() {
        let mut render = render_loop(400);
        let mut surface = RecordingSurface::new();
        let input = FrameInput {
            view: ViewMode::HrDiagram,
            observational_power: 1.0,
            ..Default::default()
        };
        let report = render.frame(&input, ms(0), &mut surface);
        let star_circles = surface
            .circles()
            .filter(|(_, _, alpha)| *alpha > 0.0)
            .count();
        // The legend is hidden in the HR view so every circle is a star
        assert_eq!(star_circles, report.visible_count);
        assert_eq!(report.visible_by_type.iter().sum::<usize>(), report.visible_count);
        assert_eq!(report.frame_index, 0);
        assert_eq!(render.frame_count(), 1);
    }

    #[test]
    fn test_non_finite_star_is_skipped() {
        let mut stars = CatalogGenerator::with_seed(11).generate(200).unwrap();
        let input = FrameInput {
            view: ViewMode::HrDiagram,
            observational_power: 1.0,
            ..Default::default()
        };

        let mut render = RenderLoop::new(stars.clone().into(), RenderSettings::default());
        let baseline = render.frame(&input, ms(0), &mut RecordingSurface::new());
        assert_eq!(baseline.skipped, 0);

        // Brightest star, always visible at full power
        stars[0].hr_x = f64::NAN;
        let broken_type = stars[0].spectral_type;
        let mut render = RenderLoop::new(stars.into(), RenderSettings::default());
        let mut surface = RecordingSurface::new();
        let report = render.frame(&input, ms(0), &mut surface);

        assert_eq!(report.skipped, 1);
        assert_eq!(report.visible_count, baseline.visible_count - 1);
        assert_eq!(report.visible(broken_type), baseline.visible(broken_type) - 1);
        assert!(surface
            .circles()
            .all(|([x, y], radius, _)| x.is_finite() && y.is_finite() && radius.is_finite()));
    }

    #[test]
    fn test_filters_hide_classes() {
        let mut render = render_loop(300);
        let mut surface = RecordingSurface::new();
        let input = FrameInput {
            view: ViewMode::Galaxy,
            observational_power: 1.0,
            active_filters: SpectralFilter::none().with(SpectralType::M),
            ..Default::default()
        };
        let report = render.frame(&input, ms(0), &mut surface);
        for spectral_type in SpectralType::ALL {
            if spectral_type != SpectralType::M {
                assert_eq!(report.visible(spectral_type), 0);
            }
        }
    }

    #[test]
    fn test_resize_only_on_change() {
        let mut render = render_loop(10);
        let mut surface = RecordingSurface::new();
        let mut input = FrameInput::default();
        render.frame(&input, ms(0), &mut surface);
        render.frame(&input, ms(16), &mut surface);
        assert_eq!(surface.resize_count(), 1);

        input.viewport = Viewport::new(300, 200);
        render.frame(&input, ms(32), &mut surface);
        assert_eq!(surface.resize_count(), 2);
        assert_eq!(surface.viewport(), Some(&Viewport::new(300, 200)));
    }

    #[test]
    fn test_no_hover_during_transition() {
        let mut render = render_loop(300);
        let mut surface = RecordingSurface::new();
        let mut input = FrameInput {
            view: ViewMode::HrDiagram,
            observational_power: 1.0,
            ..Default::default()
        };
        render.frame(&input, ms(0), &mut surface);

        let ([x, y], _, _) = surface.circles().next().unwrap();
        assert!(render.hovered(x, y).is_some());
        assert_eq!(render.hovered(-1000.0, -1000.0), None);

        input.view = ViewMode::Galaxy;
        render.frame(&input, ms(100), &mut surface);
        assert!(render.snapshot().is_transitioning());
        assert_eq!(render.hovered(x, y), None);
    }
}
