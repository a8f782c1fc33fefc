//! Output formatting module for trueprofit
//!
//! This module provides formatters for displaying profit reports in
//! different formats:
//! - Table format for human-readable terminal output
//! - JSON format for machine-readable output and integration with other tools
//!
//! Amounts are exact decimals up to this point; rounding to cents happens
//! here and nowhere else.
//!
//! # Examples
//!
//! ```
//! use trueprofit::aggregation_types::AggregationResult;
//! use trueprofit::filters::FilterCriteria;
//! use trueprofit::output::{Report, get_formatter};
//! use trueprofit::types::{Platform, TripDate};
//! use chrono::NaiveDate;
//!
//! let day = TripDate::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
//! let criteria = FilterCriteria::new(day, day, [Platform::new("Uber")]).unwrap();
//! let result = AggregationResult::default();
//! let report = Report::new("gig_work_data.csv", &criteria, &result);
//!
//! let json = get_formatter(true).format_report(&report);
//! assert!(json.contains("\"empty_reason\": \"no_trips_in_range\""));
//! ```

use colored::Colorize;
use prettytable::{Table, format, row};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::collections::BTreeSet;
use std::path::Path;
use trueprofit_core::aggregation_types::{AggregationResult, EmptyReason};
use trueprofit_core::filters::FilterCriteria;
use trueprofit_core::types::{Platform, TripDate, TripRecord};

/// Everything a report formatter needs
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Name of the data source
    pub source: &'a str,
    /// Criteria the records were filtered with
    pub criteria: &'a FilterCriteria,
    /// Aggregation over the filtered records
    pub result: &'a AggregationResult,
    /// Filtered records, when the trip listing was requested
    pub trips: Option<&'a [&'a TripRecord]>,
}

impl<'a> Report<'a> {
    pub fn new(source: &'a str, criteria: &'a FilterCriteria, result: &'a AggregationResult) -> Self {
        Self {
            source,
            criteria,
            result,
            trips: None,
        }
    }

    /// Include the trip listing
    pub fn with_trips(mut self, trips: &'a [&'a TripRecord]) -> Self {
        self.trips = Some(trips);
        self
    }

    /// Why the result is empty, if it is
    pub fn empty_reason(&self) -> Option<EmptyReason> {
        EmptyReason::detect(self.criteria, self.result)
    }
}

/// What a data source contains
#[derive(Debug, Clone)]
pub struct PlatformSummary<'a> {
    pub source: &'a str,
    pub trip_count: usize,
    pub platforms: &'a BTreeSet<Platform>,
    /// `None` when the source has no trips
    pub date_bounds: Option<(TripDate, TripDate)>,
}

/// Trait for output formatters
///
/// Implementations can provide different output formats (table, JSON, ...).
pub trait OutputFormatter {
    /// Format a profit report
    fn format_report(&self, report: &Report<'_>) -> String;

    /// Format the platforms and date range of a data source
    fn format_platforms(&self, summary: &PlatformSummary<'_>) -> String;

    /// Confirm a generated data set
    fn format_generated(&self, path: &Path, trips: usize) -> String;
}

/// Share of `part` in `whole` as a percentage, zero when `whole` is zero
fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part * dec!(100) / whole
    }
}

/// Table formatter for human-readable output
///
/// Produces ASCII tables suitable for terminal display. Money is shown
/// in dollars with two decimals.
pub struct TableFormatter {
    /// Whether to use colored output (respects NO_COLOR environment variable)
    colored_output: bool,
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter {
    /// Create a new TableFormatter
    pub fn new() -> Self {
        Self {
            colored_output: std::env::var("NO_COLOR").is_err(),
        }
    }

    /// Force colors on or off
    pub fn with_colors(mut self, colored_output: bool) -> Self {
        self.colored_output = colored_output;
        self
    }

    /// Format currency with dollar sign, sign before the symbol
    fn format_currency(amount: Decimal) -> String {
        let rounded = amount.round_dp(2);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-${:.2}", rounded.abs())
        } else {
            format!("${:.2}", rounded.abs())
        }
    }

    fn format_decimal(value: Decimal) -> String {
        format!("{:.2}", value.round_dp(2))
    }

    fn format_wage(wage: Decimal) -> String {
        format!("{}/h", Self::format_currency(wage))
    }

    fn warning(&self, message: &str) -> String {
        if self.colored_output {
            format!("{} {}", "Warning:".yellow().bold(), message.yellow())
        } else {
            format!("Warning: {message}")
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.colored_output {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn describe_filters(criteria: &FilterCriteria) -> String {
        let platforms: Vec<&str> = criteria.platforms().iter().map(Platform::as_str).collect();
        format!(
            "{} to {} | {}",
            criteria.start_date(),
            criteria.end_date(),
            if platforms.is_empty() {
                "no platforms".to_string()
            } else {
                platforms.join(", ")
            }
        )
    }

    fn kpi_table(result: &AggregationResult) -> Table {
        let totals = &result.totals;
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Metric", b -> "Value"]);

        table.add_row(row!["Trips", r -> totals.trip_count]);
        table.add_row(row!["Gross Fare", r -> Self::format_currency(totals.gross_fare)]);
        table.add_row(row!["Platform Fees", r -> Self::format_currency(totals.platform_fees)]);
        table.add_row(row!["Net Earnings", r -> Self::format_currency(totals.net_earnings)]);
        table.add_row(row!["Vehicle Costs", r -> Self::format_currency(totals.vehicle_costs)]);
        table.add_row(row![b -> "True Profit", br -> Self::format_currency(totals.true_profit)]);
        table.add_row(row!["Hours Worked", r -> Self::format_decimal(result.total_hours_worked)]);
        table.add_row(row![b -> "True Hourly Wage", br -> Self::format_wage(result.true_hourly_wage)]);
        table
    }

    fn daily_table(result: &AggregationResult) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Date", b -> "Trips", b -> "True Profit"]);

        for day in &result.profit_by_date {
            table.add_row(row![
                day.date,
                r -> day.trip_count,
                r -> Self::format_currency(day.true_profit)
            ]);
        }

        table.add_row(row![
            b -> "TOTAL",
            br -> result.totals.trip_count,
            br -> Self::format_currency(result.totals.true_profit)
        ]);
        table
    }

    fn platform_table(result: &AggregationResult) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Platform",
            b -> "Trips",
            b -> "Hours",
            b -> "True Profit",
            b -> "True Hourly Wage"
        ]);

        for platform in &result.hourly_wage_by_platform {
            table.add_row(row![
                platform.platform,
                r -> platform.trip_count,
                r -> Self::format_decimal(platform.hours_worked),
                r -> Self::format_currency(platform.true_profit),
                r -> Self::format_wage(platform.true_hourly_wage)
            ]);
        }
        table
    }

    fn breakdown_table(result: &AggregationResult) -> Table {
        let gross = result.totals.gross_fare;
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Where the Fare Went", b -> "Amount", b -> "Share"]);

        for slice in result.cost_breakdown() {
            table.add_row(row![
                slice.category,
                r -> Self::format_currency(slice.amount),
                r -> format!("{}%", Self::format_decimal(percentage(slice.amount, gross)))
            ]);
        }

        table.add_row(row![
            b -> "Gross Fare",
            br -> Self::format_currency(gross),
            br -> if gross.is_zero() { "0.00%" } else { "100.00%" }
        ]);
        table
    }

    fn trips_table(trips: &[&TripRecord]) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![
            b -> "Trip",
            b -> "Date",
            b -> "Platform",
            b -> "Minutes",
            b -> "Km",
            b -> "Gross Fare",
            b -> "Fees",
            b -> "Vehicle",
            b -> "True Profit"
        ]);

        for trip in trips {
            let f = trip.financials();
            table.add_row(row![
                trip.id(),
                trip.date(),
                trip.platform(),
                r -> trip.total_time_minutes(),
                r -> Self::format_decimal(trip.distance_km()),
                r -> Self::format_currency(trip.gross_fare()),
                r -> Self::format_currency(f.platform_fees),
                r -> Self::format_currency(f.vehicle_costs),
                r -> Self::format_currency(f.true_profit)
            ]);
        }
        table
    }
}

impl OutputFormatter for TableFormatter {
    fn format_report(&self, report: &Report<'_>) -> String {
        let mut output = format!(
            "{}\n{}\n",
            self.heading("True Profit Report"),
            Self::describe_filters(report.criteria)
        );

        if let Some(reason) = report.empty_reason() {
            output.push('\n');
            output.push_str(&self.warning(reason.message()));
            output.push('\n');
            return output;
        }

        let result = report.result;
        let sections = [
            ("Key Figures", Self::kpi_table(result)),
            ("True Profit by Date", Self::daily_table(result)),
            ("True Hourly Wage by Platform", Self::platform_table(result)),
            ("Cost Breakdown", Self::breakdown_table(result)),
        ];
        for (title, table) in sections {
            output.push_str(&format!("\n{}\n{}", self.heading(title), table));
        }

        if let Some(trips) = report.trips {
            output.push_str(&format!(
                "\n{}\n{}",
                self.heading("Trips"),
                Self::trips_table(trips)
            ));
        }

        output
    }

    fn format_platforms(&self, summary: &PlatformSummary<'_>) -> String {
        let mut output = format!(
            "{}: {} trips\n",
            self.heading(summary.source),
            summary.trip_count
        );

        match summary.date_bounds {
            Some((start, end)) => output.push_str(&format!("Dates: {start} to {end}\n")),
            None => {
                output.push_str(&self.warning("No trips loaded."));
                output.push('\n');
                return output;
            }
        }

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        table.set_titles(row![b -> "Platform"]);
        for platform in summary.platforms {
            table.add_row(row![platform]);
        }
        output.push_str(&table.to_string());
        output
    }

    fn format_generated(&self, path: &Path, trips: usize) -> String {
        format!("Wrote {trips} trips to {}", path.display())
    }
}

/// JSON formatter for machine-readable output
///
/// Amounts are emitted as JSON numbers, unrounded.
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &Report<'_>) -> String {
        let criteria = report.criteria;
        let reason = report.empty_reason();

        let mut output = json!({
            "source": report.source,
            "filters": {
                "start_date": criteria.start_date(),
                "end_date": criteria.end_date(),
                "platforms": criteria.platforms(),
            },
            "summary": report.result,
            "cost_breakdown": report.result.cost_breakdown(),
            "empty_reason": reason,
        });

        if let Some(reason) = reason {
            output["message"] = json!(reason.message());
        }
        if let Some(trips) = report.trips {
            output["trips"] = json!(trips);
        }

        pretty(&output)
    }

    fn format_platforms(&self, summary: &PlatformSummary<'_>) -> String {
        let output = json!({
            "source": summary.source,
            "trip_count": summary.trip_count,
            "platforms": summary.platforms,
            "start_date": summary.date_bounds.map(|(start, _)| start),
            "end_date": summary.date_bounds.map(|(_, end)| end),
        });
        pretty(&output)
    }

    fn format_generated(&self, path: &Path, trips: usize) -> String {
        pretty(&json!({
            "output": path.display().to_string(),
            "trips": trips,
        }))
    }
}

fn pretty(value: &Value) -> String {
    format!("{value:#}")
}

/// Get the appropriate formatter based on output format
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonFormatter)
    } else {
        Box::new(TableFormatter::new())
    }
}
