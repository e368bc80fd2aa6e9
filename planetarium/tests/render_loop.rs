use planetarium::render::{FrameInput, FrameReport, RenderLoop, RenderSettings};
use planetarium::surface::RecordingSurface;
use planetarium::{Engine, ObserverSettings, ProjectionMode, SpectralFilter, ViewMode};
use starfield::{CatalogGenerator, SpectralType, Star};
use std::sync::Arc;
use std::time::Duration;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn stars(count: usize) -> Arc<[Star]> {
    CatalogGenerator::with_seed(2024)
        .generate_catalog(count)
        .unwrap()
        .shared()
}

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

fn run(
    render: &mut RenderLoop,
    surface: &mut RecordingSurface,
    input: &FrameInput,
    times: impl IntoIterator<Item = u64>,
) -> Vec<FrameReport> {
    times
        .into_iter()
        .map(|t| render.frame(input, ms(t), surface))
        .collect()
}

#[test]
fn lst_wraps_while_watching_the_sky() {
    init_logging();
    let mut render = RenderLoop::new(stars(500), RenderSettings::default());
    let mut surface = RecordingSurface::new();
    let input = FrameInput {
        observer: ObserverSettings {
            time_speed: 100.0,
            ..Default::default()
        },
        ..Default::default()
    };

    // 100 ms at speed 100 is 100 degrees per frame
    let reports = run(&mut render, &mut surface, &input, (0..6).map(|i| i * 100));
    let lsts: Vec<f64> = reports.iter().map(|r| r.local_sidereal_time).collect();
    let expected = [0.0, 100.0, 200.0, 300.0, 40.0, 140.0];
    for (lst, want) in lsts.iter().zip(expected) {
        assert!((lst - want).abs() < 1e-6, "lst {lst} expected {want}");
        assert!((0.0..360.0).contains(lst));
    }
}

#[test]
fn transition_runs_to_completion() {
    init_logging();
    let mut render = RenderLoop::new(stars(800), RenderSettings::default());
    let mut surface = RecordingSurface::new();
    let sky = FrameInput::default();
    render.frame(&sky, ms(0), &mut surface);

    let galaxy = FrameInput {
        view: ViewMode::Galaxy,
        ..sky
    };
    let reports = run(&mut render, &mut surface, &galaxy, (1..=20).map(|i| i * 100));

    let mut last = 0.0;
    for report in &reports[..14] {
        assert!(report.transitioning);
        assert!(report.progress > last || report.progress == 0.0);
        last = report.progress;
    }
    let done = reports.last().unwrap();
    assert!(!done.transitioning);
    assert_eq!(done.progress, 1.0);
    assert!(render.snapshot().is_idle_in(ProjectionMode::Galaxy));
}

#[test]
fn interrupting_a_transition_restarts_from_previous_target() {
    let mut render = RenderLoop::new(stars(200), RenderSettings::default());
    let mut surface = RecordingSurface::new();
    let sky = FrameInput::default();
    render.frame(&sky, ms(0), &mut surface);

    let galaxy = FrameInput {
        view: ViewMode::Galaxy,
        ..sky
    };
    render.frame(&galaxy, ms(100), &mut surface);
    render.frame(&galaxy, ms(600), &mut surface);

    let hr = FrameInput {
        view: ViewMode::HrDiagram,
        ..sky
    };
    let report = render.frame(&hr, ms(700), &mut surface);
    assert!(report.transitioning);
    assert_eq!(report.progress, 0.0);
    let snapshot = render.snapshot();
    assert_eq!(snapshot.source, ProjectionMode::Galaxy);
    assert_eq!(snapshot.target, ProjectionMode::HrDiagram);
}

#[test]
fn more_power_never_shows_fewer_stars() {
    let stars = stars(3000);
    let mut last = 0;
    for step in 0..=10 {
        let mut render = RenderLoop::new(Arc::clone(&stars), RenderSettings::default());
        let mut surface = RecordingSurface::new();
        let input = FrameInput {
            view: ViewMode::HrDiagram,
            observational_power: step as f64 / 10.0,
            ..Default::default()
        };
        let report = render.frame(&input, ms(0), &mut surface);
        assert!(report.visible_count >= last);
        last = report.visible_count;
    }
    assert!(last > 0);
}

#[test]
fn pole_observer_sees_the_same_sky_at_any_sidereal_time() {
    let stars = stars(2000);
    let input = FrameInput {
        observational_power: 1.0,
        observer: ObserverSettings {
            latitude: 90.0,
            is_paused: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let counts: Vec<[usize; 7]> = [0.0, 90.0, 211.5]
        .into_iter()
        .map(|initial_lst| {
            let settings = RenderSettings {
                initial_lst,
                ..Default::default()
            };
            let mut render = RenderLoop::new(Arc::clone(&stars), settings);
            let mut surface = RecordingSurface::new();
            render.frame(&input, ms(0), &mut surface).visible_by_type
        })
        .collect();

    assert_eq!(counts[0], counts[1]);
    assert_eq!(counts[0], counts[2]);
}

#[test]
fn filtered_classes_are_never_counted() {
    let mut render = RenderLoop::new(stars(2000), RenderSettings::default());
    let mut surface = RecordingSurface::new();
    let input = FrameInput {
        view: ViewMode::Census,
        observational_power: 1.0,
        active_filters: SpectralFilter::all().without(SpectralType::M),
        ..Default::default()
    };
    let report = render.frame(&input, ms(0), &mut surface);
    assert_eq!(report.visible(SpectralType::M), 0);
    assert!(report.visible(SpectralType::K) + report.visible(SpectralType::G) > 0);
    assert!(surface.texts().any(|t| t == "Stellar Census"));
}

#[test]
fn display_list_is_written_for_inspection() {
    let mut render = RenderLoop::new(stars(300), RenderSettings::default());
    let mut surface = RecordingSurface::new();
    let input = FrameInput {
        view: ViewMode::Classification,
        ..Default::default()
    };
    render.frame(&input, ms(0), &mut surface);

    let json = surface.to_json().unwrap();
    let path = test_helpers::output_path("display_lists/classification.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, &json).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), surface.commands().len());
}

#[test]
fn engine_picks_up_inputs_from_other_threads() {
    init_logging();
    let (mut engine, inputs, reports) = Engine::new(
        stars(400),
        RecordingSurface::new(),
        FrameInput::default(),
        RenderSettings::default(),
    );
    engine.tick_at(ms(0)).unwrap();

    let sender = std::thread::spawn(move || {
        inputs.send(FrameInput {
            view: ViewMode::Galaxy,
            ..Default::default()
        })
    });
    assert!(sender.join().unwrap());

    let report = engine.tick_at(ms(16)).unwrap();
    assert_eq!(report.view, ViewMode::Galaxy);
    assert!(report.transitioning);

    let received: Vec<FrameReport> = reports.try_iter().collect();
    assert_eq!(received.len(), 2);
    assert_eq!(received[1], report);

    assert!(engine.shutdown().is_some());
    assert!(engine.tick_at(ms(32)).is_none());
}
