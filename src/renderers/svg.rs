//! SVG renderer
//!
//! Emits a standalone SVG document: one `<rect>` per in-range day with a
//! tooltip, month labels above the grid, weekday labels in the left gutter and
//! an optional "Less .. More" legend underneath.

use std::fmt::Write;

use crate::config::CalendarConfig;
use crate::date_index::DateIndex;
use crate::error::CalendarError;
use crate::intensity::IntensityPalette;
use crate::types::{GridGeometry, GridLayout, IntensityLevel, LabelPlan};

use super::{contribution_title, CalendarRenderer};

const FONT_SIZE: f64 = 9.0;
const FONT_FAMILY: &str = "-apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif";
const CELL_RADIUS: f64 = 2.0;
/// Gap between the grid and the legend row
const LEGEND_MARGIN: f64 = 8.0;

/// SVG renderer
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    palette: IntensityPalette,
    text_color: String,
    show_month_labels: bool,
    show_day_labels: bool,
    show_legend: bool,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::from_config(&CalendarConfig::default())
    }
}

impl SvgRenderer {
    pub fn from_config(config: &CalendarConfig) -> Self {
        Self {
            palette: config.effective_palette(),
            text_color: config.theme.text_color().to_string(),
            show_month_labels: config.show_month_labels,
            show_day_labels: config.show_day_labels,
            show_legend: config.show_legend,
        }
    }

    fn legend_height(&self, geometry: &GridGeometry) -> f64 {
        if self.show_legend {
            LEGEND_MARGIN + geometry.cell_size
        } else {
            0.0
        }
    }

    fn write_labels(
        &self,
        out: &mut String,
        geometry: &GridGeometry,
        labels: &LabelPlan,
    ) -> Result<(), CalendarError> {
        let text_color = escape_xml(&self.text_color);

        if self.show_month_labels {
            let y = geometry.top_gutter - FONT_SIZE / 2.0;
            for label in &labels.month_labels {
                let (x, _) = geometry.cell_origin(label.week_index, 0);
                writeln!(
                    out,
                    r#"  <text class="month" x="{x}" y="{y}" fill="{text_color}">{}</text>"#,
                    escape_xml(&label.text)
                )?;
            }
        }

        if self.show_day_labels {
            let x = geometry.left_gutter - 4.0;
            for label in &labels.day_labels {
                let (_, top) = geometry.cell_origin(0, label.row_index);
                let y = top + geometry.cell_size - 1.0;
                writeln!(
                    out,
                    r#"  <text class="wday" x="{x}" y="{y}" text-anchor="end" fill="{text_color}">{}</text>"#,
                    escape_xml(&label.text)
                )?;
            }
        }

        Ok(())
    }

    fn write_cells(&self, out: &mut String, grid: &GridLayout) -> Result<(), CalendarError> {
        let size = grid.geometry.cell_size;
        for (week_index, week) in grid.weeks.iter().enumerate() {
            writeln!(out, r#"  <g class="week" data-week="{week_index}">"#)?;
            for (row, cell) in week.days.iter().enumerate() {
                let (Some(count), Some(level)) = (cell.count, cell.intensity_level) else {
                    continue;
                };
                let (x, y) = grid.geometry.cell_origin(week_index, row);
                let date = DateIndex::format(cell.date);
                writeln!(
                    out,
                    r#"    <rect class="day" x="{x}" y="{y}" width="{size}" height="{size}" rx="{CELL_RADIUS}" fill="{}" data-date="{date}" data-count="{count}" data-level="{}"><title>{}</title></rect>"#,
                    escape_xml(self.palette.color(level)),
                    level.as_u8(),
                    contribution_title(count, &date)
                )?;
            }
            writeln!(out, "  </g>")?;
        }
        Ok(())
    }

    fn write_legend(&self, out: &mut String, geometry: &GridGeometry) -> Result<(), CalendarError> {
        let size = geometry.cell_size;
        let pitch = geometry.column_pitch;
        let y = geometry.height + LEGEND_MARGIN;
        let text_y = y + size - 1.0;
        let text_color = escape_xml(&self.text_color);

        // Right-aligned: "Less" [5 swatches] "More"
        let more_x = geometry.width;
        let swatches_x = more_x - 4.0 - 5.0 * pitch;
        let less_x = swatches_x - 4.0;

        writeln!(out, r#"  <g class="legend">"#)?;
        writeln!(
            out,
            r#"    <text x="{less_x}" y="{text_y}" text-anchor="end" fill="{text_color}">Less</text>"#
        )?;
        for (i, level) in IntensityLevel::ALL.iter().enumerate() {
            let x = swatches_x + i as f64 * pitch;
            writeln!(
                out,
                r#"    <rect x="{x}" y="{y}" width="{size}" height="{size}" rx="{CELL_RADIUS}" fill="{}"/>"#,
                escape_xml(self.palette.color(*level))
            )?;
        }
        writeln!(
            out,
            r#"    <text x="{more_x}" y="{text_y}" text-anchor="end" fill="{text_color}">More</text>"#
        )?;
        writeln!(out, "  </g>")?;
        Ok(())
    }
}

impl CalendarRenderer for SvgRenderer {
    fn render(&self, grid: &GridLayout, labels: &LabelPlan) -> Result<String, CalendarError> {
        let geometry = &grid.geometry;
        let width = geometry.width;
        let height = geometry.height + self.legend_height(geometry);

        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}">"#
        )?;
        self.write_labels(&mut out, geometry, labels)?;
        self.write_cells(&mut out, grid)?;
        if self.show_legend {
            self.write_legend(&mut out, geometry)?;
        }
        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

fn escape_xml(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridLayoutEngine;
    use crate::types::{ActivityPoint, ActivitySeries, DateRange, WeekStart};

    fn render(config: &CalendarConfig, series: &ActivitySeries, start: &str, end: &str) -> String {
        let range = DateRange::parse(start, end).unwrap();
        let grid = GridLayoutEngine::new(config.metrics).build(series, range, config.week_start);
        let labels = LabelPlan::build(&grid, config.min_label_spacing);
        SvgRenderer::from_config(config).render(&grid, &labels).unwrap()
    }

    #[test]
    fn test_one_rect_per_in_range_day() {
        let config = CalendarConfig {
            show_legend: false,
            ..Default::default()
        };
        let svg = render(&config, &ActivitySeries::new(), "2024-06-15", "2024-06-15");

        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<rect").count(), 1);
        assert!(svg.contains(r#"data-date="2024-06-15""#));
        assert!(svg.contains("No contributions on 2024-06-15"));
    }

    #[test]
    fn test_cell_colours_follow_palette() {
        let date = DateIndex::parse("2024-01-02").unwrap();
        let series = ActivitySeries::from_points([ActivityPoint { date, count: 3 }]);
        let svg = render(&CalendarConfig::default(), &series, "2024-01-01", "2024-01-07");

        assert!(svg.contains(r##"fill="#216e39" data-date="2024-01-02" data-count="3" data-level="4""##));
        assert!(svg.contains("3 contributions on 2024-01-02"));
        assert!(svg.contains(r##"fill="#ebedf0" data-date="2024-01-01""##));
    }

    #[test]
    fn test_labels_and_legend() {
        let svg = render(
            &CalendarConfig::default(),
            &ActivitySeries::new(),
            "2024-01-07",
            "2024-03-31",
        );
        assert!(svg.contains(">Jan</text>"));
        assert!(svg.contains(">Mon</text>"));
        assert!(svg.contains(">Less</text>"));
        // 85 days plus 5 legend swatches
        assert_eq!(svg.matches("<rect").count(), 85 + 5);
    }

    #[test]
    fn test_hidden_labels() {
        let config = CalendarConfig {
            show_month_labels: false,
            show_day_labels: false,
            ..Default::default()
        };
        let svg = render(&config, &ActivitySeries::new(), "2024-01-01", "2024-03-31");
        assert!(!svg.contains(r#"class="month""#));
        assert!(!svg.contains(r#"class="wday""#));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"<a & "b">"#), "&lt;a &amp; &quot;b&quot;&gt;");
    }

    #[test]
    fn test_monday_start_places_first_cell_on_row_zero() {
        let config = CalendarConfig {
            week_start: WeekStart::Monday,
            show_legend: false,
            ..Default::default()
        };
        // 2024-01-01 is a Monday
        let svg = render(&config, &ActivitySeries::new(), "2024-01-01", "2024-01-01");
        assert!(svg.contains(r#"x="28" y="16""#));
    }
}
