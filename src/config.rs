//! Calendar configuration
//!
//! Every field has a default, so a config file only needs the values it changes.

use crate::error::CalendarError;
use crate::intensity::{IntensityPalette, Theme};
use crate::types::{CellMetrics, WeekStart};
use serde::{Deserialize, Serialize};

/// Default minimum distance between month labels, in layout units
pub const DEFAULT_MIN_LABEL_SPACING: f64 = 24.0;

/// Settings shared by layout, labelling and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
    pub metrics: CellMetrics,
    /// Month labels closer than this to the previous one are dropped
    pub min_label_spacing: f64,
    pub theme: Theme,
    /// Overrides the theme's palette when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<IntensityPalette>,
    pub show_month_labels: bool,
    pub show_day_labels: bool,
    pub show_legend: bool,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: WeekStart::Sunday,
            metrics: CellMetrics::default(),
            min_label_spacing: DEFAULT_MIN_LABEL_SPACING,
            theme: Theme::Light,
            palette: None,
            show_month_labels: true,
            show_day_labels: true,
            show_legend: true,
        }
    }
}

impl CalendarConfig {
    /// Load and validate a config from JSON
    pub fn from_json(json: &str) -> Result<Self, CalendarError> {
        let config: CalendarConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, CalendarError> {
        serde_json::to_string_pretty(self).map_err(CalendarError::JsonError)
    }

    pub fn validate(&self) -> Result<(), CalendarError> {
        let m = &self.metrics;
        if !(m.cell_size.is_finite() && m.cell_size > 0.0) {
            return Err(CalendarError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                m.cell_size
            )));
        }
        for (name, value) in [
            ("cell_gap", m.cell_gap),
            ("left_gutter", m.left_gutter),
            ("top_gutter", m.top_gutter),
            ("min_label_spacing", self.min_label_spacing),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalendarError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Palette in effect: the explicit one, else the theme's
    pub fn effective_palette(&self) -> IntensityPalette {
        self.palette
            .clone()
            .unwrap_or_else(|| self.theme.palette())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntensityLevel;

    #[test]
    fn test_empty_json_is_default() {
        let config = CalendarConfig::from_json("{}").unwrap();
        assert_eq!(config, CalendarConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = CalendarConfig::from_json(
            r#"{"week_start": 1, "theme": "dark", "metrics": {"cell_size": 14}}"#,
        )
        .unwrap();

        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.metrics.cell_size, 14.0);
        assert_eq!(config.metrics.cell_gap, 2.0);
        assert_eq!(
            config.effective_palette().color(IntensityLevel::Empty),
            "#161b22"
        );
    }

    #[test]
    fn test_custom_palette_wins() {
        let config = CalendarConfig::from_json(
            r##"{"theme": "dark", "palette": ["#fff","#ccc","#999","#666","#333"]}"##,
        )
        .unwrap();
        assert_eq!(
            config.effective_palette().color(IntensityLevel::Level4),
            "#333"
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            CalendarConfig::from_json(r#"{"metrics": {"cell_size": 0}}"#),
            Err(CalendarError::InvalidConfig(_))
        ));
        assert!(CalendarConfig::from_json(r#"{"min_label_spacing": -1}"#).is_err());
        assert!(CalendarConfig::from_json(r#"{"week_start": 2}"#).is_err());
    }

    #[test]
    fn test_round_trip_json() {
        let config = CalendarConfig {
            show_legend: false,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(CalendarConfig::from_json(&json).unwrap(), config);
    }
}
