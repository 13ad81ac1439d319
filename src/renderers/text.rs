//! Terminal text renderer
//!
//! One character per day, seven rows, month labels on a header line.

use std::fmt::Write;

use crate::config::CalendarConfig;
use crate::error::CalendarError;
use crate::intensity::IntensityPalette;
use crate::types::{GridLayout, IntensityLevel, LabelPlan};

use super::CalendarRenderer;

/// Glyph per intensity level, empty first
const SHADES: [char; 5] = ['·', '░', '▒', '▓', '█'];
/// Width of the weekday label gutter
const GUTTER: usize = 4;
const ANSI_RESET: &str = "\x1b[0m";

/// Text renderer for terminal previews
#[derive(Debug, Clone)]
pub struct TextRenderer {
    palette: IntensityPalette,
    colored: bool,
    show_month_labels: bool,
    show_day_labels: bool,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::from_config(&CalendarConfig::default())
    }
}

impl TextRenderer {
    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            palette: config.effective_palette(),
            colored: false,
            show_month_labels: config.show_month_labels,
            show_day_labels: config.show_day_labels,
        }
    }

    /// Paint glyphs with 24-bit ANSI colours from the palette
    pub fn colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    fn glyph(&self, level: IntensityLevel) -> String {
        let shade = SHADES[level.as_u8() as usize];
        match (self.colored, hex_to_rgb(self.palette.color(level))) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{shade}{ANSI_RESET}"),
            _ => shade.to_string(),
        }
    }

    fn month_header(&self, grid: &GridLayout, labels: &LabelPlan) -> String {
        let mut header: Vec<char> = vec![' '; GUTTER + grid.weeks.len()];
        let mut next_free = 0;
        for label in &labels.month_labels {
            let start = GUTTER + label.week_index;
            // One column per week, so labels closer than their own width would collide
            if start < next_free {
                continue;
            }
            for (i, c) in label.text.chars().enumerate() {
                match header.get_mut(start + i) {
                    Some(slot) => *slot = c,
                    None => header.push(c),
                }
            }
            next_free = start + label.text.chars().count() + 1;
        }
        header.into_iter().collect::<String>().trim_end().to_string()
    }
}

impl CalendarRenderer for TextRenderer {
    fn render(&self, grid: &GridLayout, labels: &LabelPlan) -> Result<String, CalendarError> {
        let mut out = String::new();

        if self.show_month_labels {
            writeln!(out, "{}", self.month_header(grid, labels))?;
        }

        for row in 0..7 {
            let day_label = labels
                .day_labels
                .iter()
                .find(|l| l.row_index == row)
                .filter(|_| self.show_day_labels)
                .map(|l| l.text.as_str())
                .unwrap_or("");
            let mut line = format!("{day_label:<width$}", width = GUTTER);

            for week in &grid.weeks {
                match week.days[row].intensity_level {
                    Some(level) => line.push_str(&self.glyph(level)),
                    None => line.push(' '),
                }
            }
            writeln!(out, "{}", line.trim_end())?;
        }

        Ok(out)
    }
}

/// Parse `#rgb` or `#rrggbb`
fn hex_to_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').filter(|h| h.is_ascii())?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}
