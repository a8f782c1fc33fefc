//! Example of exporting a trueprofit report as JSON
//!
//! Writes the report for a CSV file (first argument, default
//! `gig_work_data.csv`) to `trueprofit_report.json`.

use std::fs;
use trueprofit::{
    Result,
    aggregation::Aggregator,
    costs::ProfitCalculator,
    output::{JsonFormatter, OutputFormatter, Report},
    store::{CsvTripSource, TripStore},
};

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "gig_work_data.csv".to_string());

    println!("Loading trips from {path}...");
    let store = TripStore::load(&CsvTripSource::from_path(&path), &ProfitCalculator::default())?;

    let criteria = store.full_range_criteria()?;
    let trips = store.query(&criteria)?;
    let result = Aggregator::new().with_parallel(true).aggregate(&trips);

    let report = Report::new(store.source_name(), &criteria, &result);
    let json = JsonFormatter.format_report(&report);

    fs::write("trueprofit_report.json", &json)?;
    println!(
        "Exported {} trips across {} days to trueprofit_report.json",
        result.totals.trip_count,
        result.profit_by_date.len()
    );

    Ok(())
}
