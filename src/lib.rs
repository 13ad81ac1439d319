//! Contrib Calendar - contribution calendar layout and commit activity aggregation
//!
//! Turns raw commit timestamps into a per-date activity series, then lays that
//! series out as a week-aligned calendar grid: event parsing → aggregation →
//! grid layout and intensity bucketing → label placement → rendering.
//!
//! ## Modules
//!
//! - **Aggregation**: Count events per UTC day, merge series, compute streaks
//! - **Layout**: Week-aligned grid, relative intensity buckets, month/weekday labels
//! - **Renderers**: Thin SVG and terminal adapters over the layout

pub mod aggregator;
pub mod config;
pub mod date_index;
pub mod error;
pub mod grid;
pub mod intensity;
pub mod labels;
pub mod pipeline;
pub mod renderers;
pub mod schema;
pub mod types;

pub use aggregator::ActivityAggregator;
pub use config::CalendarConfig;
pub use date_index::DateIndex;
pub use error::CalendarError;
pub use grid::GridLayoutEngine;
pub use intensity::{IntensityBucketer, IntensityPalette, Theme};
pub use labels::LabelPlacer;
pub use pipeline::{events_to_summary_json, events_to_svg, CalendarProcessor, CalendarSnapshot};

// Schema exports
pub use schema::{CommitEvent, EventAdapter};

pub use types::{
    ActivityPoint, ActivitySeries, ActivitySummary, DateRange, DayCell, GridLayout,
    IntensityLevel, LabelPlan, MostActiveDay, WeekColumn, WeekStart,
};

/// Crate version reported by the CLI
pub const CALENDAR_VERSION: &str = env!("CARGO_PKG_VERSION");
