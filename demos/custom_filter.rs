//! Example of filtering trips before aggregating
//!
//! Compares one month on a single platform against the same month on all
//! platforms, with a custom cost model.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use trueprofit::{
    Result, TrueProfitError,
    aggregation::aggregate,
    aggregation_types::EmptyReason,
    config::CostConfig,
    costs::ProfitCalculator,
    filters::FilterCriteria,
    generator::{GeneratorConfig, TripGenerator},
    store::{MemoryTripSource, TripStore},
    types::{Platform, TripDate},
};

fn date(year: i32, month: u32, day: u32) -> Result<TripDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .map(TripDate::new)
        .ok_or_else(|| TrueProfitError::InvalidDate(format!("{year}-{month}-{day}")))
}

fn main() -> Result<()> {
    // A thirstier car than the defaults
    let config = CostConfig::new(dec!(0.18), dec!(0.10))?;
    let calculator = ProfitCalculator::new(config);

    let trips = TripGenerator::new(GeneratorConfig {
        seed: Some(7),
        ..GeneratorConfig::default()
    })?
    .generate()?;
    let store = TripStore::load(&MemoryTripSource::new(trips), &calculator)?;

    let june = FilterCriteria::new(
        date(2025, 6, 1)?,
        date(2025, 6, 30)?,
        store.distinct_platforms().iter().cloned(),
    )?;
    let june_lyft = june.clone().with_platforms([Platform::new("Lyft")]);
    let nothing = june.clone().with_platforms(Vec::new());

    let views = [
        ("All platforms", &june),
        ("Lyft only", &june_lyft),
        ("None", &nothing),
    ];
    for (label, criteria) in views {
        let result = aggregate(store.query(criteria)?);
        match EmptyReason::detect(criteria, &result) {
            Some(reason) => println!("{label}: {}", reason.message()),
            None => println!(
                "{label}: {} trips over {} days, ${:.2} true profit, ${:.2}/h",
                result.totals.trip_count,
                result.profit_by_date.len(),
                result.totals.true_profit,
                result.true_hourly_wage
            ),
        }
    }

    Ok(())
}
