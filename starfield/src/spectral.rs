//! Harvard spectral classification used by the catalog generator.
//!
//! Each class carries the effective temperature range it is sampled from,
//! its population weight in the synthetic catalog and a fixed display color.
//!
//! # Population weights
//!
//! The weights follow the local stellar census and are walked cumulatively
//! from O to M. They do not sum to exactly one; M absorbs the remainder as the
//! fallback class.
//!
//! | Class | Temperature (K) | Weight  |
//! |-------|-----------------|---------|
//! | O     | 30000 – 50000   | 0.00003 |
//! | B     | 10000 – 30000   | 0.0013  |
//! | A     | 7500 – 10000    | 0.006   |
//! | F     | 6000 – 7500     | 0.03    |
//! | G     | 5200 – 6000     | 0.076   |
//! | K     | 3700 – 5200     | 0.121   |
//! | M     | 2400 – 3700     | 0.7645  |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// An 8-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    /// CSS style `#rrggbb` string.
    pub fn to_hex_string(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The Morgan-Keenan spectral classes, hottest to coolest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpectralType {
    /// Blue, above 30,000K
    O,
    /// Blue-white, 10,000-30,000K
    B,
    /// White, 7,500-10,000K
    A,
    /// Yellow-white, 6,000-7,500K
    F,
    /// Yellow, 5,200-6,000K
    G,
    /// Orange, 3,700-5,200K
    K,
    /// Red, below 3,700K
    M,
}

impl SpectralType {
    /// All classes in generation order (hottest first).
    pub const ALL: [SpectralType; 7] = [
        SpectralType::O,
        SpectralType::B,
        SpectralType::A,
        SpectralType::F,
        SpectralType::G,
        SpectralType::K,
        SpectralType::M,
    ];

    /// Position of this class in [`SpectralType::ALL`].
    pub fn index(&self) -> usize {
        match self {
            SpectralType::O => 0,
            SpectralType::B => 1,
            SpectralType::A => 2,
            SpectralType::F => 3,
            SpectralType::G => 4,
            SpectralType::K => 5,
            SpectralType::M => 6,
        }
    }

    /// Fraction of the synthetic population drawn from this class.
    pub fn population_weight(&self) -> f64 {
        match self {
            SpectralType::O => 0.00003,
            SpectralType::B => 0.0013,
            SpectralType::A => 0.006,
            SpectralType::F => 0.03,
            SpectralType::G => 0.076,
            SpectralType::K => 0.121,
            SpectralType::M => 0.7645,
        }
    }

    /// Effective temperature range in Kelvin.
    pub fn temperature_range(&self) -> Range<f64> {
        match self {
            SpectralType::O => 30000.0..50000.0,
            SpectralType::B => 10000.0..30000.0,
            SpectralType::A => 7500.0..10000.0,
            SpectralType::F => 6000.0..7500.0,
            SpectralType::G => 5200.0..6000.0,
            SpectralType::K => 3700.0..5200.0,
            SpectralType::M => 2400.0..3700.0,
        }
    }

    /// Display color for stars of this class.
    pub fn color(&self) -> Rgb {
        match self {
            SpectralType::O => Rgb::from_hex(0x9bb0ff),
            SpectralType::B => Rgb::from_hex(0xaabfff),
            SpectralType::A => Rgb::from_hex(0xcad7ff),
            SpectralType::F => Rgb::from_hex(0xf8f7ff),
            SpectralType::G => Rgb::from_hex(0xfff4ea),
            SpectralType::K => Rgb::from_hex(0xffd2a1),
            SpectralType::M => Rgb::from_hex(0xffcc6f),
        }
    }

    /// Pick a class by walking the cumulative weight table with `u ∈ [0, 1)`.
    ///
    /// M is returned whenever `u` runs past the table.
    pub fn from_cumulative(u: f64) -> SpectralType {
        let mut cumulative = 0.0;
        for class in SpectralType::ALL {
            cumulative += class.population_weight();
            if u < cumulative {
                return class;
            }
        }
        SpectralType::M
    }

    /// Classify an effective temperature.
    pub fn from_temperature(temperature: f64) -> SpectralType {
        if temperature >= 30000.0 {
            SpectralType::O
        } else if temperature >= 10000.0 {
            SpectralType::B
        } else if temperature >= 7500.0 {
            SpectralType::A
        } else if temperature >= 6000.0 {
            SpectralType::F
        } else if temperature >= 5200.0 {
            SpectralType::G
        } else if temperature >= 3700.0 {
            SpectralType::K
        } else {
            SpectralType::M
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            SpectralType::O => 'O',
            SpectralType::B => 'B',
            SpectralType::A => 'A',
            SpectralType::F => 'F',
            SpectralType::G => 'G',
            SpectralType::K => 'K',
            SpectralType::M => 'M',
        }
    }
}

impl fmt::Display for SpectralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for SpectralType {
    type Error = String;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'O' => Ok(SpectralType::O),
            'B' => Ok(SpectralType::B),
            'A' => Ok(SpectralType::A),
            'F' => Ok(SpectralType::F),
            'G' => Ok(SpectralType::G),
            'K' => Ok(SpectralType::K),
            'M' => Ok(SpectralType::M),
            other => Err(format!("Unknown spectral class '{other}'")),
        }
    }
}

impl FromStr for SpectralType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => SpectralType::try_from(c),
            _ => Err(format!("Spectral class must be a single letter, got '{s}'")),
        }
    }
}
