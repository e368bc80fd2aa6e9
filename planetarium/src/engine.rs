//! Host-facing wrapper around [`RenderLoop`].
//!
//! Hosts push [`FrameInput`] snapshots through an [`InputSender`] and read
//! [`FrameReport`]s from a channel. At the top of every tick the engine
//! drains the input channel and keeps the newest snapshot, so parameter
//! changes never restart the session. Reports are sent without blocking; a
//! slow or vanished reader never stalls frame production.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender, TrySendError};
use starfield::Star;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::SessionConfig;
use crate::render::{FrameInput, FrameReport, RenderLoop, RenderSettings};
use crate::surface::DrawSurface;
use crate::Result;

/// Reports buffered for the host before new ones are dropped.
pub const REPORT_QUEUE_DEPTH: usize = 64;

/// Cloneable handle for publishing new frame inputs.
#[derive(Debug, Clone)]
pub struct InputSender {
    sender: Sender<FrameInput>,
}

impl InputSender {
    /// Queue `input` for the next tick. Returns `false` once the engine is gone.
    pub fn send(&self, input: FrameInput) -> bool {
        self.sender.send(input).is_ok()
    }
}

pub struct Engine<S: DrawSurface> {
    render: RenderLoop,
    surface: Option<S>,
    inputs: Receiver<FrameInput>,
    input: FrameInput,
    reports: Sender<FrameReport>,
    started: Instant,
    dropped_reports: u64,
}

impl<S: DrawSurface> Engine<S> {
    pub fn new(
        stars: Arc<[Star]>,
        surface: S,
        initial: FrameInput,
        settings: RenderSettings,
    ) -> (Self, InputSender, Receiver<FrameReport>) {
        let (input_tx, input_rx) = unbounded();
        let (report_tx, report_rx) = bounded(REPORT_QUEUE_DEPTH);

        log::info!(
            "Starting planetarium session: {} stars, view {}, viewport {}",
            stars.len(),
            initial.view,
            initial.viewport
        );

        let engine = Self {
            render: RenderLoop::new(stars, settings),
            surface: Some(surface),
            inputs: input_rx,
            input: initial,
            reports: report_tx,
            started: Instant::now(),
            dropped_reports: 0,
        };
        (engine, InputSender { sender: input_tx }, report_rx)
    }

    /// Generate the catalog described by `config` and start a session on it.
    pub fn from_config(
        config: &SessionConfig,
        surface: S,
    ) -> Result<(Self, InputSender, Receiver<FrameReport>)> {
        config.validate()?;
        let catalog = config.generate_catalog()?;
        Ok(Self::new(
            catalog.shared(),
            surface,
            config.frame_input(),
            config.render_settings(),
        ))
    }

    /// Render a frame at the current wall-clock session time.
    pub fn tick(&mut self) -> Option<FrameReport> {
        let now = self.started.elapsed();
        self.tick_at(now)
    }

    /// Render a frame at session time `now`. `None` after shutdown.
    pub fn tick_at(&mut self, now: Duration) -> Option<FrameReport> {
        let surface = self.surface.as_mut()?;

        if let Some(latest) = self.inputs.try_iter().last() {
            self.input = latest;
        }

        let report = self.render.frame(&self.input, now, surface);

        match self.reports.try_send(report) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                if self.dropped_reports == 0 {
                    log::debug!("Report queue full, dropping frame reports");
                }
                self.dropped_reports += 1;
            }
            Err(TrySendError::Disconnected(_)) => {}
        }

        Some(report)
    }

    /// Inputs used for the most recent frame.
    pub fn input(&self) -> &FrameInput {
        &self.input
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn render_loop(&self) -> &RenderLoop {
        &self.render
    }

    pub fn hovered(&self, x: f64, y: f64) -> Option<u64> {
        self.surface.as_ref()?;
        self.render.hovered(x, y)
    }

    /// Reports that could not be queued because the reader fell behind.
    pub fn dropped_reports(&self) -> u64 {
        self.dropped_reports
    }

    pub fn is_running(&self) -> bool {
        self.surface.is_some()
    }

    /// Stop producing frames and hand back the surface. Only the first call
    /// returns it.
    pub fn shutdown(&mut self) -> Option<S> {
        let surface = self.surface.take()?;
        log::info!(
            "Planetarium session stopped after {} frames ({} reports dropped)",
            self.render.frame_count(),
            self.dropped_reports
        );
        Some(surface)
    }
}

impl<S: DrawSurface> Drop for Engine<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{ProjectionMode, ViewMode};
    use crate::surface::RecordingSurface;
    use starfield::CatalogGenerator;

    fn engine() -> (Engine<RecordingSurface>, InputSender, Receiver<FrameReport>) {
        let catalog = CatalogGenerator::with_seed(5).generate_catalog(100).unwrap();
        Engine::new(
            catalog.shared(),
            RecordingSurface::new(),
            FrameInput::default(),
            RenderSettings::default(),
        )
    }

    #[test]
    fn test_latest_input_wins() {
        let (mut engine, inputs, _reports) = engine();
        engine.tick_at(Duration::ZERO).unwrap();

        for view in [ViewMode::Galaxy, ViewMode::Census, ViewMode::HrDiagram] {
            assert!(inputs.send(FrameInput {
                view,
                ..Default::default()
            }));
        }
        let report = engine.tick_at(Duration::from_millis(16)).unwrap();
        assert_eq!(report.view, ViewMode::HrDiagram);
        assert_eq!(engine.render_loop().snapshot().target, ProjectionMode::HrDiagram);
        assert_eq!(engine.input().view, ViewMode::HrDiagram);
    }

    #[test]
    fn test_reports_are_published() {
        let (mut engine, _inputs, reports) = engine();
        for i in 0..3 {
            engine.tick_at(Duration::from_millis(16 * i)).unwrap();
        }
        let indices: Vec<u64> = reports.try_iter().map(|r| r.frame_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_full_or_closed_report_queue_never_blocks() {
        let (mut engine, _inputs, reports) = engine();
        for i in 0..(REPORT_QUEUE_DEPTH as u64 + 10) {
            assert!(engine.tick_at(Duration::from_millis(i)).is_some());
        }
        assert_eq!(engine.dropped_reports(), 10);

        drop(reports);
        assert!(engine.tick_at(Duration::from_secs(5)).is_some());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (mut engine, inputs, _reports) = engine();
        engine.tick_at(Duration::ZERO).unwrap();

        let surface = engine.shutdown().unwrap();
        assert!(!surface.commands().is_empty());
        assert!(engine.shutdown().is_none());
        assert!(!engine.is_running());
        assert!(engine.tick_at(Duration::from_secs(1)).is_none());
        assert_eq!(engine.hovered(0.0, 0.0), None);

        drop(engine);
        assert!(!inputs.send(FrameInput::default()));
    }

    #[test]
    fn test_from_config() {
        let config = SessionConfig {
            star_count: 64,
            seed: Some(3),
            initial_view: ViewMode::Galaxy,
            ..Default::default()
        };
        let (mut engine, _inputs, _reports) =
            Engine::from_config(&config, RecordingSurface::new()).unwrap();
        assert_eq!(engine.render_loop().stars().len(), 64);
        let report = engine.tick().unwrap();
        assert_eq!(report.view, ViewMode::Galaxy);
        assert!(!report.transitioning);
    }
}
