use clap::Args;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::SessionConfig;
use crate::mode::ViewMode;
use crate::visibility::SpectralFilter;

/// Parse duration string with units (e.g., "1.5s", "150ms", "2000us", "1h", "30m")
fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();

    let (num_str, unit) = if let Some(n) = s.strip_suffix("ms") {
        (n, "ms")
    } else if let Some(n) = s.strip_suffix("us") {
        (n, "us")
    } else if let Some(n) = s.strip_suffix('s') {
        (n, "s")
    } else if let Some(n) = s.strip_suffix('h') {
        (n, "h")
    } else if let Some(n) = s.strip_suffix('m') {
        (n, "m")
    } else {
        // Default to milliseconds if no unit specified
        (s, "ms")
    };

    let value: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid numeric value: {}", num_str))?;

    if !value.is_finite() || value < 0.0 {
        return Err("Duration must be a non-negative number".to_string());
    }

    let duration = match unit {
        "us" => Duration::from_nanos((value * 1e3).round() as u64),
        "ms" => Duration::from_nanos((value * 1e6).round() as u64),
        "s" => Duration::from_secs_f64(value),
        "m" => Duration::from_secs_f64(value * 60.0),
        "h" => Duration::from_secs_f64(value * 3600.0),
        _ => return Err(format!("Unknown time unit: {}", unit)),
    };

    Ok(duration)
}

/// Duration argument accepting unit suffixes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationArg(pub Duration);

impl FromStr for DurationArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).map(DurationArg)
    }
}

impl fmt::Display for DurationArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.0;
        let total_ms = duration.as_millis();

        if total_ms >= 1000 && total_ms % 1000 == 0 {
            write!(f, "{}s", total_ms / 1000)
        } else if total_ms >= 1000 {
            write!(f, "{:.3}s", duration.as_secs_f64())
        } else {
            write!(f, "{}ms", total_ms)
        }
    }
}

/// Ordered list of views to cycle through, e.g. "sky,galaxy,hr".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSchedule(Vec<ViewMode>);

impl ViewSchedule {
    /// Schedule over `views`, or `None` when `views` is empty.
    pub fn new(views: Vec<ViewMode>) -> Option<Self> {
        (!views.is_empty()).then_some(ViewSchedule(views))
    }

    pub fn views(&self) -> &[ViewMode] {
        &self.0
    }

    /// View for `frame` when each view is held for `frames_per_view` frames.
    pub fn view_at(&self, frame: u64, frames_per_view: u64) -> ViewMode {
        let slot = frame / frames_per_view.max(1);
        self.0[(slot % self.0.len() as u64) as usize]
    }
}

impl Default for ViewSchedule {
    fn default() -> Self {
        ViewSchedule(ViewMode::ALL.to_vec())
    }
}

impl FromStr for ViewSchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let views = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(ViewMode::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        ViewSchedule::new(views).ok_or_else(|| "View schedule needs at least one view".to_string())
    }
}

impl fmt::Display for ViewSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", names.join(","))
    }
}

/// Session overrides shared by the planetarium binaries. Unset flags keep
/// the value from the config file or its defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// Number of stars to generate
    #[arg(long)]
    pub stars: Option<usize>,

    /// Catalog seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Observer latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Instrument power in [0, 1]
    #[arg(long)]
    pub power: Option<f64>,

    /// Sky darkness in [0, 1] (1 is a pristine sky)
    #[arg(long)]
    pub light_pollution: Option<f64>,

    /// Sidereal clock multiplier
    #[arg(long)]
    pub time_speed: Option<f64>,

    /// Start with the sidereal clock paused
    #[arg(long)]
    pub paused: bool,

    /// Active spectral classes (e.g. "OBAFGKM" or "G,K,M")
    #[arg(long)]
    pub filters: Option<SpectralFilter>,

    /// Viewport width in CSS pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in CSS pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Device pixel ratio
    #[arg(long)]
    pub dpr: Option<f64>,

    /// Transition length (e.g. "1500ms", "2s")
    #[arg(long)]
    pub transition: Option<DurationArg>,
}

impl SessionArgs {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut SessionConfig) {
        if let Some(stars) = self.stars {
            config.star_count = stars;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(latitude) = self.latitude {
            config.observer.latitude = latitude;
        }
        if let Some(power) = self.power {
            config.observational_power = power;
        }
        if let Some(light_pollution) = self.light_pollution {
            config.observer.light_pollution_limit = light_pollution;
        }
        if let Some(time_speed) = self.time_speed {
            config.observer.time_speed = time_speed;
        }
        if self.paused {
            config.observer.is_paused = true;
        }
        if let Some(filters) = self.filters {
            config.active_filters = filters;
        }
        if let Some(width) = self.width {
            config.viewport.width = width;
        }
        if let Some(height) = self.height {
            config.viewport.height = height;
        }
        if let Some(dpr) = self.dpr {
            config.viewport = config.viewport.with_device_pixel_ratio(dpr);
        }
        if let Some(transition) = self.transition {
            config.transition_ms = transition.0.as_millis() as u64;
        }
    }
}
