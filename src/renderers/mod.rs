//! Renderers
//!
//! Thin adapters that paint a [`GridLayout`] and its [`LabelPlan`]. They decide
//! nothing about placement or intensity; that is all in the layout they receive.

mod svg;
mod text;

pub use svg::SvgRenderer;
pub use text::TextRenderer;

use crate::error::CalendarError;
use crate::types::{GridLayout, LabelPlan};

/// Trait for calendar renderers
pub trait CalendarRenderer {
    /// Paint the grid and labels into a document
    fn render(&self, grid: &GridLayout, labels: &LabelPlan) -> Result<String, CalendarError>;
}

/// Tooltip text for an in-range day
pub(crate) fn contribution_title(count: u64, date: &str) -> String {
    match count {
        0 => format!("No contributions on {date}"),
        1 => format!("1 contribution on {date}"),
        n => format!("{n} contributions on {date}"),
    }
}

impl From<std::fmt::Error> for CalendarError {
    fn from(e: std::fmt::Error) -> Self {
        CalendarError::RenderError(e.to_string())
    }
}
