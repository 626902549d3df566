//! Trackline CLI - chart data from a JSON health record file
//!
//! Commands:
//! - dashboard: Build all chart data for the window ending today
//! - select: Resolve a chart cursor to a sample
//! - add: Validate and append a user-entered value
//! - list: Print daily values for a metric, newest first

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{NaiveDate, Utc};
use tracing_subscriber::EnvFilter;
use trackline::{
    Calendar, ComputeError, Dashboard, DashboardBuilder, DashboardError, HealthStore, MemoryStore,
    MetricContext, Sample, SelectionResolver, Settings, StoreError, TRACKLINE_VERSION,
};

/// Trackline - step and weight chart data
#[derive(Parser)]
#[command(name = "trackline")]
#[command(version = TRACKLINE_VERSION)]
#[command(about = "Turn health records into chart-ready data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Record store file (JSON)
    #[arg(short, long)]
    store: PathBuf,

    /// Settings file (JSON)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Calendar timezone, "UTC" or "+HH:MM" (overrides settings; must match
    /// an existing store)
    #[arg(long)]
    timezone: Option<String>,

    /// Window in days (overrides settings)
    #[arg(long)]
    window_days: Option<u32>,

    /// Last day of the window, YYYY-MM-DD (defaults to today)
    #[arg(long)]
    today: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all dashboard chart data
    Dashboard {
        #[command(flatten)]
        common: CommonArgs,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Resolve a chart cursor to the sample it points at
    Select {
        #[command(flatten)]
        common: CommonArgs,

        /// Metric to select from
        #[arg(long, value_enum)]
        metric: MetricArg,

        /// Date cursor (YYYY-MM-DD) for bar and line charts
        #[arg(long, conflicts_with = "averages")]
        date: Option<String>,

        /// Cumulative offset for the weekday-average radial chart
        #[arg(long, requires = "averages")]
        offset: Option<f64>,

        /// Select from the step weekday averages (radial chart)
        #[arg(long)]
        averages: bool,
    },

    /// Validate and append a value
    Add {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_enum)]
        metric: MetricArg,

        /// Day the value belongs to, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Value as typed by the user
        #[arg(long)]
        value: String,
    },

    /// List daily values, newest first
    List {
        #[command(flatten)]
        common: CommonArgs,

        #[arg(long, value_enum)]
        metric: MetricArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Steps,
    Weight,
}

impl From<MetricArg> for MetricContext {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Steps => MetricContext::Steps,
            MetricArg::Weight => MetricContext::Weight,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

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

fn run(cli: Cli) -> Result<(), TracklineCliError> {
    match cli.command {
        Commands::Dashboard {
            common,
            output,
            output_format,
        } => cmd_dashboard(&common, &output, output_format),

        Commands::Select {
            common,
            metric,
            date,
            offset,
            averages,
        } => cmd_select(&common, metric.into(), date.as_deref(), offset, averages),

        Commands::Add {
            common,
            metric,
            date,
            value,
        } => cmd_add(&common, metric.into(), &date, &value),

        Commands::List { common, metric } => cmd_list(&common, metric.into()),
    }
}

fn cmd_dashboard(
    common: &CommonArgs,
    output: &Path,
    output_format: OutputFormat,
) -> Result<(), TracklineCliError> {
    let dashboard = load_dashboard(common)?;

    let output_data = match output_format {
        OutputFormat::Json => serde_json::to_string(&dashboard)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&dashboard)?,
    };

    if output.to_string_lossy() == "-" {
        println!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }

    Ok(())
}

fn cmd_select(
    common: &CommonArgs,
    metric: MetricContext,
    date: Option<&str>,
    offset: Option<f64>,
    averages: bool,
) -> Result<(), TracklineCliError> {
    // Weight changes are signed, so they cannot be laid out as radial spans
    if averages && metric != MetricContext::Steps {
        return Err(TracklineCliError::Usage(
            "--averages selects from the step radial chart; use --metric steps".to_string(),
        ));
    }

    let dashboard = load_dashboard(common)?;

    let selected: Option<&Sample> = if averages {
        SelectionResolver::by_offset(&dashboard.step_weekday_averages, offset)
    } else {
        let chart = match metric {
            MetricContext::Steps => &dashboard.steps,
            MetricContext::Weight => &dashboard.weights,
        };
        let cursor = date.map(parse_date).transpose()?;
        SelectionResolver::by_date(&chart.samples, cursor)
    };

    println!("{}", serde_json::to_string_pretty(&selected)?);
    Ok(())
}

fn cmd_add(
    common: &CommonArgs,
    metric: MetricContext,
    date: &str,
    value: &str,
) -> Result<(), TracklineCliError> {
    let settings = load_settings(common)?;
    let date = parse_date(date)?;
    let value = trackline::parse_entry_value(value, metric)?;

    let mut store = if common.store.exists() {
        let store = load_store(&common.store)?;
        settings.calendar_for(store.calendar())?;
        store
    } else {
        MemoryStore::new(settings.calendar()?.unwrap_or_default())
    };

    store.append(metric, date, value)?;
    fs::write(&common.store, store.to_json()?)?;

    println!(
        "Added {} {} on {}",
        metric.format_value(value),
        metric.unit(),
        date
    );
    Ok(())
}

fn cmd_list(common: &CommonArgs, metric: MetricContext) -> Result<(), TracklineCliError> {
    let dashboard = load_dashboard(common)?;
    let chart = match metric {
        MetricContext::Steps => &dashboard.steps,
        MetricContext::Weight => &dashboard.weights,
    };

    println!("{} ({})", metric.title(), chart.subtitle);
    for sample in chart.samples.iter().rev() {
        println!(
            "  {}  {:>10}",
            sample.date.format("%b %-d, %Y"),
            metric.format_value(sample.value)
        );
    }
    Ok(())
}

// Helper functions

fn load_settings(common: &CommonArgs) -> Result<Settings, TracklineCliError> {
    let mut settings = match &common.settings {
        Some(path) => Settings::from_json(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };

    if let Some(timezone) = &common.timezone {
        settings.timezone = Some(timezone.clone());
    }
    if let Some(window_days) = common.window_days {
        settings.window_days = window_days;
    }
    Ok(settings)
}

fn load_store(path: &Path) -> Result<MemoryStore, TracklineCliError> {
    let json = fs::read_to_string(path)?;
    Ok(MemoryStore::from_json(&json)?)
}

fn load_dashboard(common: &CommonArgs) -> Result<Dashboard, TracklineCliError> {
    let settings = load_settings(common)?;
    let store = load_store(&common.store)?;
    let calendar = settings.calendar_for(store.calendar())?;
    let today = resolve_today(common.today.as_deref(), &calendar)?;

    Ok(DashboardBuilder::new(settings)?.build(&store, today)?)
}

fn resolve_today(today: Option<&str>, calendar: &Calendar) -> Result<NaiveDate, TracklineCliError> {
    match today {
        Some(s) => parse_date(s),
        None => Ok(calendar.day_of(&Utc::now())),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, TracklineCliError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ComputeError::DateParseError(format!("{s}: {e}")).into())
}

// Error types

#[derive(Debug)]
enum TracklineCliError {
    Io(io::Error),
    Compute(ComputeError),
    Store(StoreError),
    Json(serde_json::Error),
    Usage(String),
}

impl From<io::Error> for TracklineCliError {
    fn from(e: io::Error) -> Self {
        TracklineCliError::Io(e)
    }
}

impl From<ComputeError> for TracklineCliError {
    fn from(e: ComputeError) -> Self {
        TracklineCliError::Compute(e)
    }
}

impl From<StoreError> for TracklineCliError {
    fn from(e: StoreError) -> Self {
        TracklineCliError::Store(e)
    }
}

impl From<DashboardError> for TracklineCliError {
    fn from(e: DashboardError) -> Self {
        match e {
            DashboardError::Compute(e) => TracklineCliError::Compute(e),
            DashboardError::Store(e) => TracklineCliError::Store(e),
        }
    }
}

impl From<serde_json::Error> for TracklineCliError {
    fn from(e: serde_json::Error) -> Self {
        TracklineCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<TracklineCliError> for CliError {
    fn from(e: TracklineCliError) -> Self {
        match e {
            TracklineCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            TracklineCliError::Compute(e) => CliError {
                code: "INPUT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check dates (YYYY-MM-DD) and timezone (UTC or +HH:MM)".to_string()),
            },
            TracklineCliError::Store(e) => CliError {
                code: store_error_code(&e).to_string(),
                message: e.to_string(),
                hint: Some(e.failure_reason()),
            },
            TracklineCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            TracklineCliError::Usage(message) => CliError {
                code: "USAGE_ERROR".to_string(),
                message,
                hint: Some("Run with --help for usage".to_string()),
            },
        }
    }
}

fn store_error_code(e: &StoreError) -> &'static str {
    match e {
        StoreError::AuthorizationNotDetermined => "AUTH_NOT_DETERMINED",
        StoreError::SharingDenied { .. } => "SHARING_DENIED",
        StoreError::NoData => "NO_DATA",
        StoreError::InvalidValue => "INVALID_VALUE",
        StoreError::UnableToCompleteRequest => "UNABLE_TO_COMPLETE",
    }
}
