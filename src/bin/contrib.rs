//! Contrib CLI - Command-line interface for the contribution calendar
//!
//! Commands:
//! - aggregate: Count events per day (series JSON)
//! - summary: Streaks, totals and busiest day
//! - layout: Grid and label plan as JSON, for external renderers
//! - render: Draw the calendar as SVG or terminal text
//! - validate: Report events whose timestamps will be skipped

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use contrib_calendar::schema::{CommitEvent, EventAdapter, EventIssue};
use contrib_calendar::{
    ActivityAggregator, CalendarConfig, CalendarError, CalendarProcessor, DateIndex, DateRange,
    Theme, WeekStart, CALENDAR_VERSION,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Contrib - contribution calendars from commit timestamps
#[derive(Parser)]
#[command(name = "contrib")]
#[command(version = CALENDAR_VERSION)]
#[command(about = "Aggregate commit activity and render contribution calendars", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); overrides RUST_LOG
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count events per UTC day and print the series
    Aggregate {
        #[command(flatten)]
        input: InputArgs,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Emit one series per repository
        #[arg(long)]
        by_repository: bool,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Summarize activity over a date range
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        range: RangeArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the grid layout and label plan as JSON
    Layout {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,
    },

    /// Render the calendar
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        range: RangeArgs,

        #[command(flatten)]
        style: StyleArgs,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "svg")]
        format: RenderFormat,

        /// Colour text output
        #[arg(long, default_value = "auto")]
        color: ColorChoice,
    },

    /// Report events whose timestamps cannot be used
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Input file path (use - for stdin)
    #[arg(short, long, default_value = "-")]
    input: PathBuf,

    /// Input format
    #[arg(long, default_value = "json")]
    input_format: InputFormat,
}

#[derive(Args)]
struct RangeArgs {
    /// First date shown (YYYY-MM-DD); defaults to 365 days before --end
    #[arg(long)]
    start: Option<String>,

    /// Last date shown (YYYY-MM-DD); defaults to today (UTC)
    #[arg(long)]
    end: Option<String>,
}

#[derive(Args)]
struct StyleArgs {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// First row of each week: 0 = Sunday, 1 = Monday
    #[arg(long)]
    week_start: Option<u8>,

    /// Colour theme
    #[arg(long)]
    theme: Option<ThemeArg>,

    /// Minimum distance between month labels, in layout units
    #[arg(long)]
    min_label_spacing: Option<f64>,

    /// Hide the "Less .. More" legend
    #[arg(long)]
    no_legend: bool,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// JSON array of events
    Json,
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// One timestamp per line, optionally prefixed by a commit hash
    Lines,
}

#[derive(Clone, ValueEnum)]
enum RenderFormat {
    Svg,
    Text,
}

#[derive(Clone, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

#[derive(Clone, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<(), ContribCliError> {
    match cli.command {
        Commands::Aggregate {
            input,
            output,
            by_repository,
            pretty,
        } => cmd_aggregate(&input, &output, by_repository, pretty),

        Commands::Summary { input, range, json } => cmd_summary(&input, &range, json),

        Commands::Layout {
            input,
            range,
            style,
            output,
        } => cmd_layout(&input, &range, &style, &output),

        Commands::Render {
            input,
            range,
            style,
            output,
            format,
            color,
        } => cmd_render(&input, &range, &style, &output, format, color),

        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn cmd_aggregate(
    input: &InputArgs,
    output: &Path,
    by_repository: bool,
    pretty: bool,
) -> Result<(), ContribCliError> {
    let events = read_events(input)?;

    let value = if by_repository {
        serde_json::to_value(ActivityAggregator::aggregate_by_repository(&events))?
    } else {
        serde_json::to_value(ActivityAggregator::aggregate_by_date(&events))?
    };

    let mut data = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    data.push('\n');
    write_output(output, &data)
}

fn cmd_summary(input: &InputArgs, range: &RangeArgs, json: bool) -> Result<(), ContribCliError> {
    let events = read_events(input)?;
    let range = resolve_range(range)?;
    let series = ActivityAggregator::aggregate_by_date(&events);
    let summary = ActivityAggregator::summarize(&series, range);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "Activity {} .. {}",
        DateIndex::format(range.start()),
        DateIndex::format(range.end())
    );
    println!("==============================");
    println!("Total commits:     {}", summary.total_commits);
    println!("Active days:       {}", summary.active_days);
    println!("Longest streak:    {} days", summary.longest_streak);
    println!("Current streak:    {} days", summary.current_streak);
    println!("Average per day:   {:.1}", summary.average_commits_per_day);
    match summary.most_active_day.date {
        Some(date) => println!(
            "Most active day:   {} ({} commits)",
            DateIndex::format(date),
            summary.most_active_day.count
        ),
        None => println!("Most active day:   -"),
    }
    Ok(())
}

fn cmd_layout(
    input: &InputArgs,
    range: &RangeArgs,
    style: &StyleArgs,
    output: &Path,
) -> Result<(), ContribCliError> {
    let events = read_events(input)?;
    let range = resolve_range(range)?;
    let processor = CalendarProcessor::with_config(load_config(style)?)?;
    let snapshot = processor.process_events(&events, range);

    let data = serde_json::to_string_pretty(&snapshot)? + "\n";
    write_output(output, &data)
}

fn cmd_render(
    input: &InputArgs,
    range: &RangeArgs,
    style: &StyleArgs,
    output: &Path,
    format: RenderFormat,
    color: ColorChoice,
) -> Result<(), ContribCliError> {
    let events = read_events(input)?;
    let range = resolve_range(range)?;
    let processor = CalendarProcessor::with_config(load_config(style)?)?;
    let snapshot = processor.process_events(&events, range);

    let rendered = match format {
        RenderFormat::Svg => processor.render_svg(&snapshot)?,
        RenderFormat::Text => {
            let colored = match color {
                ColorChoice::Always => true,
                ColorChoice::Never => false,
                ColorChoice::Auto => is_stdio(output) && atty::is(atty::Stream::Stdout),
            };
            processor.render_text(&snapshot, colored)?
        }
    };

    info!(
        weeks = snapshot.grid.weeks.len(),
        total = snapshot.summary.total_commits,
        "rendered calendar"
    );
    write_output(output, &rendered)
}

fn cmd_validate(input: &InputArgs, json: bool) -> Result<(), ContribCliError> {
    let events = read_events(input)?;
    let issues = EventAdapter::validate_events(&events);

    let report = ValidationReport {
        total_events: events.len(),
        usable_events: events.len() - issues.len(),
        skipped_events: issues.len(),
        issues,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Usable events:  {}", report.usable_events);
        println!("Skipped events: {}", report.skipped_events);

        if !report.issues.is_empty() {
            println!("\nIssues:");
            for issue in &report.issues {
                println!(
                    "  - Event {} (index {}): {}",
                    issue.sha.as_deref().unwrap_or("unknown"),
                    issue.index,
                    issue.reason
                );
            }
        }
    }

    if report.skipped_events > 0 {
        Err(ContribCliError::ValidationFailed(report.skipped_events))
    } else {
        Ok(())
    }
}

fn read_events(args: &InputArgs) -> Result<Vec<CommitEvent>, ContribCliError> {
    let input_data = if is_stdio(&args.input) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(&args.input)?
    };

    let events = match args.input_format {
        InputFormat::Json => EventAdapter::parse_array(&input_data)?,
        InputFormat::Ndjson => EventAdapter::parse_ndjson(&input_data)?,
        InputFormat::Lines => EventAdapter::parse_lines(&input_data),
    };
    debug!(events = events.len(), "read input events");
    Ok(events)
}

fn resolve_range(args: &RangeArgs) -> Result<DateRange, ContribCliError> {
    let range = match (&args.start, &args.end) {
        (Some(start), Some(end)) => DateRange::parse(start, end)?,
        (None, Some(end)) => DateRange::last_365_days(DateIndex::parse(end)?),
        (Some(start), None) => {
            DateRange::new(DateIndex::parse(start)?, DateRange::ending_today().end())?
        }
        (None, None) => DateRange::ending_today(),
    };
    Ok(range)
}

fn load_config(style: &StyleArgs) -> Result<CalendarConfig, ContribCliError> {
    let mut config = match &style.config {
        Some(path) => CalendarConfig::from_json(&fs::read_to_string(path)?)?,
        None => CalendarConfig::default(),
    };

    if let Some(week_start) = style.week_start {
        config.week_start = WeekStart::try_from(week_start)?;
    }
    if let Some(theme) = &style.theme {
        config.theme = match theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        };
    }
    if let Some(spacing) = style.min_label_spacing {
        config.min_label_spacing = spacing;
    }
    if style.no_legend {
        config.show_legend = false;
    }

    config.validate()?;
    Ok(config)
}

fn write_output(output: &Path, data: &str) -> Result<(), ContribCliError> {
    if is_stdio(output) {
        print!("{}", data);
    } else {
        fs::write(output, data)?;
    }
    Ok(())
}

fn is_stdio(path: &Path) -> bool {
    path.to_string_lossy() == "-"
}

// Error handling

#[derive(Debug)]
enum ContribCliError {
    Io(io::Error),
    Calendar(CalendarError),
    Json(serde_json::Error),
    ValidationFailed(usize),
}

impl From<io::Error> for ContribCliError {
    fn from(e: io::Error) -> Self {
        ContribCliError::Io(e)
    }
}

impl From<CalendarError> for ContribCliError {
    fn from(e: CalendarError) -> Self {
        ContribCliError::Calendar(e)
    }
}

impl From<serde_json::Error> for ContribCliError {
    fn from(e: serde_json::Error) -> Self {
        ContribCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ContribCliError> for CliError {
    fn from(e: ContribCliError) -> Self {
        match e {
            ContribCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ContribCliError::Calendar(e) => {
                let (code, hint) = match &e {
                    CalendarError::InvalidDateFormat(_) => {
                        ("INVALID_DATE", "Dates must be YYYY-MM-DD and exist")
                    }
                    CalendarError::InvalidDateRange { .. } => {
                        ("INVALID_RANGE", "--start must not be after --end")
                    }
                    CalendarError::InvalidWeekStart(_) => {
                        ("INVALID_WEEK_START", "Use 0 for Sunday or 1 for Monday")
                    }
                    CalendarError::InvalidConfig(_) => {
                        ("INVALID_CONFIG", "Check the config file and style flags")
                    }
                    CalendarError::ParseError(_) | CalendarError::JsonError(_) => {
                        ("PARSE_ERROR", "Ensure input matches --input-format")
                    }
                    CalendarError::RenderError(_) => ("RENDER_ERROR", "Retry with -vv for details"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            ContribCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ContribCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} events have unusable timestamps", count),
                hint: None,
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_events: usize,
    usable_events: usize,
    skipped_events: usize,
    issues: Vec<EventIssue>,
}
