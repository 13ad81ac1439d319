//! Intensity bucketing and colour palettes
//!
//! Buckets are relative to the busiest day of the series being drawn, so the
//! same count can land in different buckets in two different calendars.

use crate::error::CalendarError;
use crate::types::IntensityLevel;
use serde::{Deserialize, Serialize};

/// Upper ratio bounds (inclusive) for levels 1..=3; anything above is level 4
const LEVEL_THRESHOLDS: [f64; 3] = [0.25, 0.5, 0.75];

/// Maps counts to intensity levels
pub struct IntensityBucketer;

impl IntensityBucketer {
    /// Bucket `count` against the maximum of the displayed series.
    ///
    /// Zero is always [`IntensityLevel::Empty`] and `max_count` itself is always
    /// [`IntensityLevel::Level4`].
    pub fn bucket(count: u64, max_count: u64) -> IntensityLevel {
        if count == 0 {
            return IntensityLevel::Empty;
        }

        let ratio = count as f64 / max_count.max(1) as f64;
        if ratio <= LEVEL_THRESHOLDS[0] {
            IntensityLevel::Level1
        } else if ratio <= LEVEL_THRESHOLDS[1] {
            IntensityLevel::Level2
        } else if ratio <= LEVEL_THRESHOLDS[2] {
            IntensityLevel::Level3
        } else {
            IntensityLevel::Level4
        }
    }
}

/// Built-in colour schemes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn palette(&self) -> IntensityPalette {
        let colors = match self {
            Theme::Light => ["#ebedf0", "#9be9a8", "#40c463", "#30a14e", "#216e39"],
            Theme::Dark => ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"],
        };
        IntensityPalette {
            colors: colors.map(str::to_string),
        }
    }

    /// Colour for text drawn on top of the page background
    pub fn text_color(&self) -> &'static str {
        match self {
            Theme::Light => "#57606a",
            Theme::Dark => "#8b949e",
        }
    }
}

/// One colour per intensity level, empty first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct IntensityPalette {
    colors: [String; 5],
}

impl Default for IntensityPalette {
    fn default() -> Self {
        Theme::default().palette()
    }
}

impl IntensityPalette {
    pub fn color(&self, level: IntensityLevel) -> &str {
        &self.colors[level.as_u8() as usize]
    }
}

impl TryFrom<Vec<String>> for IntensityPalette {
    type Error = CalendarError;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        let len = colors.len();
        let colors: [String; 5] = colors.try_into().map_err(|_| {
            CalendarError::InvalidConfig(format!("palette needs exactly 5 colours, got {len}"))
        })?;
        if let Some(blank) = colors.iter().position(|c| c.trim().is_empty()) {
            return Err(CalendarError::InvalidConfig(format!(
                "palette colour {blank} is empty"
            )));
        }
        Ok(Self { colors })
    }
}

impl From<IntensityPalette> for Vec<String> {
    fn from(palette: IntensityPalette) -> Self {
        palette.colors.into()
    }
}
