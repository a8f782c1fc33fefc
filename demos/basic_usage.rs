//! Basic usage example for the trueprofit library
//!
//! Loads a trip CSV, derives every trip's financials and prints the headline
//! figures. Pass a CSV path as the first argument; without one a seeded
//! synthetic data set is generated in memory.

use trueprofit::{
    Result,
    aggregation::Aggregator,
    costs::ProfitCalculator,
    generator::{GeneratorConfig, TripGenerator},
    store::{CsvTripSource, MemoryTripSource, TripStore},
};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let calculator = ProfitCalculator::default();
    let store = match std::env::args().nth(1) {
        Some(path) => TripStore::load(&CsvTripSource::from_path(path), &calculator)?,
        None => {
            let config = GeneratorConfig {
                seed: Some(42),
                ..GeneratorConfig::default()
            };
            let trips = TripGenerator::new(config)?.generate()?;
            TripStore::load(&MemoryTripSource::named("synthetic", trips), &calculator)?
        }
    };
    println!("Loaded {} trips from {}", store.len(), store.source_name());

    // Everything in the store, all platforms
    let criteria = store.full_range_criteria()?;
    let trips = store.query(&criteria)?;
    let result = Aggregator::new().aggregate(&trips);

    println!("\nTotals {} to {}:", criteria.start_date(), criteria.end_date());
    println!("=============================");
    println!("Gross fare:       ${:.2}", result.totals.gross_fare);
    println!("Platform fees:    ${:.2}", result.totals.platform_fees);
    println!("Vehicle costs:    ${:.2}", result.totals.vehicle_costs);
    println!("True profit:      ${:.2}", result.totals.true_profit);
    println!("Hours worked:     {:.2}", result.total_hours_worked);
    println!("True hourly wage: ${:.2}/h", result.true_hourly_wage);

    println!("\nBy platform:");
    for platform in &result.hourly_wage_by_platform {
        println!(
            "{}: {} trips, ${:.2}/h",
            platform.platform, platform.trip_count, platform.true_hourly_wage
        );
    }

    Ok(())
}
