//! CLI interface for trueprofit
//!
//! This module defines the command-line interface using clap. Running the
//! binary without a subcommand produces the profit report, so
//! `trueprofit --since 2025-06` is the same as `trueprofit report --since 2025-06`.
//!
//! # Example
//!
//! ```bash
//! # Full report over every trip in the default data file
//! trueprofit
//!
//! # June, Uber only, with the matching trips listed
//! trueprofit report --since 2025-06 --until 2025-06 --platform Uber --trips
//!
//! # Regenerate the demo data set
//! trueprofit generate --trips 1000 --seed 42
//! ```

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;
use trueprofit_core::error::{Result, TrueProfitError};
use trueprofit_core::filters::FilterCriteria;
use trueprofit_core::types::{Platform, TripDate, decimal_serde};
use trueprofit_store::TripStore;

/// Derive the true profit of gig driving from raw trip records
#[derive(Parser, Debug, Clone)]
#[command(name = "trueprofit")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Trip data CSV file
    #[arg(
        long,
        short = 'd',
        global = true,
        env = "TRUEPROFIT_DATA",
        default_value = "gig_work_data.csv"
    )]
    pub data: PathBuf,

    /// JSON file with cost rates and commissions
    #[arg(long, short = 'c', global = true, env = "TRUEPROFIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Fuel cost per km (overrides the config file)
    #[arg(long, global = true, value_parser = parse_rate)]
    pub fuel_cost: Option<Decimal>,

    /// Maintenance cost per km (overrides the config file)
    #[arg(long, global = true, value_parser = parse_rate)]
    pub maintenance_cost: Option<Decimal>,

    /// Report options used when no subcommand is given
    #[command(flatten)]
    pub report: ReportArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The command to run; a bare invocation is a report
    pub fn effective_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Report(self.report.clone()))
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show KPIs, daily profit, per-platform wage and the cost breakdown
    Report(ReportArgs),

    /// List the platforms and date range found in the data
    Platforms,

    /// Write a synthetic trip data set
    Generate(GenerateArgs),
}

/// Arguments for the report
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// First date to include (YYYY-MM-DD or YYYY-MM)
    #[arg(long)]
    pub since: Option<String>,

    /// Last date to include (YYYY-MM-DD, or YYYY-MM for the whole month)
    #[arg(long)]
    pub until: Option<String>,

    /// Platform to include; repeat for several (default: all)
    #[arg(long = "platform", short = 'p', value_delimiter = ',')]
    pub platforms: Vec<String>,

    /// Also list the matching trips
    #[arg(long)]
    pub trips: bool,

    /// Aggregate across all CPU cores
    #[arg(long)]
    pub parallel: bool,
}

impl ReportArgs {
    /// Build filter criteria, defaulting to the store's full range
    ///
    /// Missing bounds come from the store. An empty store is reported as
    /// [`TrueProfitError::EmptyStore`] rather than as an empty selection.
    pub fn criteria(&self, store: &TripStore) -> Result<FilterCriteria> {
        let since = self.since.as_deref().map(parse_date_filter).transpose()?;
        let until = self.until.as_deref().map(parse_until_filter).transpose()?;
        if store.is_empty() {
            return Err(TrueProfitError::EmptyStore);
        }

        let (start, end) = match (since, until) {
            (Some(start), Some(end)) => (TripDate::new(start), TripDate::new(end)),
            (since, until) => {
                let (min, max) = store.date_bounds()?;
                (
                    since.map_or(min, TripDate::new),
                    until.map_or(max, TripDate::new),
                )
            }
        };

        let platforms: Vec<Platform> = if self.platforms.is_empty() {
            store.distinct_platforms().iter().cloned().collect()
        } else {
            self.platforms
                .iter()
                .map(|p| Platform::new(p.trim()))
                .collect()
        };

        FilterCriteria::new(start, end, platforms)
    }
}

/// Arguments for the fixture generator
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Where to write the CSV
    #[arg(long, short = 'o', default_value = "gig_work_data.csv")]
    pub output: PathBuf,

    /// Number of trips
    #[arg(long, short = 'n', default_value = "1000")]
    pub trips: usize,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// First trip date (YYYY-MM-DD or YYYY-MM, default 2025-05-01)
    #[arg(long)]
    pub since: Option<String>,

    /// Last trip date (YYYY-MM-DD or YYYY-MM, default 2025-07-22)
    #[arg(long)]
    pub until: Option<String>,

    /// Platforms to generate
    #[arg(
        long = "platform",
        short = 'p',
        value_delimiter = ',',
        default_values = ["Uber", "Lyft"]
    )]
    pub platforms: Vec<String>,
}

/// Parse a date filter string into a NaiveDate
///
/// Accepts YYYY-MM-DD, or YYYY-MM which resolves to the first day of the
/// month.
///
/// # Examples
///
/// ```
/// use trueprofit::cli::parse_date_filter;
/// use chrono::Datelike;
///
/// let date = parse_date_filter("2025-06").unwrap();
/// assert_eq!((date.month(), date.day()), (6, 1));
/// ```
pub fn parse_date_filter(date_str: &str) -> Result<NaiveDate> {
    // Try YYYY-MM-DD format first
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let (year, month) = parse_year_month(date_str)?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| TrueProfitError::InvalidDate(format!("Invalid date: {date_str}")))
}

/// Parse an end-of-range filter
///
/// Like [`parse_date_filter`], except YYYY-MM resolves to the last day of
/// the month so the whole month is included.
pub fn parse_until_filter(date_str: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let (year, month) = parse_year_month(date_str)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(|| TrueProfitError::InvalidDate(format!("Invalid date: {date_str}")))
}

fn parse_year_month(date_str: &str) -> Result<(i32, u32)> {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() != 2 {
        return Err(TrueProfitError::InvalidDate(format!(
            "Invalid date format '{date_str}', expected YYYY-MM-DD or YYYY-MM"
        )));
    }

    let year = parts[0]
        .parse::<i32>()
        .map_err(|_| TrueProfitError::InvalidDate(format!("Invalid year in '{date_str}'")))?;
    let month = parts[1]
        .parse::<u32>()
        .map_err(|_| TrueProfitError::InvalidDate(format!("Invalid month in '{date_str}'")))?;

    if !(1..=12).contains(&month) {
        return Err(TrueProfitError::InvalidDate(format!(
            "Month must be between 1-12, got {month}"
        )));
    }
    Ok((year, month))
}

/// clap value parser for non-negative per-km rates
fn parse_rate(value: &str) -> std::result::Result<Decimal, String> {
    let rate = decimal_serde::parse(value).ok_or_else(|| format!("'{value}' is not a number"))?;
    if rate < Decimal::ZERO {
        return Err(format!("rate must be non-negative, got {rate}"));
    }
    Ok(rate)
}
