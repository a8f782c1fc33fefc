//! Aggregation module for summarizing trip records
//!
//! Turns a filtered slice of records into an [`AggregationResult`]: scalar
//! KPIs, true profit per date and true hourly wage per platform.
//!
//! Grouping happens in a single pass into `BTreeMap` accumulators, so both
//! series come out sorted (dates ascending, platforms by label) and groups
//! without records never appear.
//!
//! # Parallel aggregation
//!
//! [`aggregate_parallel`] folds rayon partitions into independent
//! accumulators and merges them. Every field is a sum of exact decimals, so
//! merging is associative and commutative and the result is identical to
//! [`aggregate`] for any partitioning.
//!
//! # Examples
//!
//! ```
//! use trueprofit::aggregation::Aggregator;
//! use trueprofit::store::{MemoryTripSource, TripStore};
//! use trueprofit::costs::ProfitCalculator;
//!
//! let store = TripStore::load(&MemoryTripSource::new(Vec::new()), &ProfitCalculator::default())?;
//! let records: Vec<_> = store.records().iter().collect();
//!
//! let result = Aggregator::new().aggregate(&records);
//! assert!(result.is_empty());
//! assert!(result.profit_by_date.is_empty());
//! # Ok::<(), trueprofit::TrueProfitError>(())
//! ```

use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info};
use trueprofit_core::aggregation_types::{AggregationResult, DailyProfit, PlatformWage, Totals};
use trueprofit_core::types::{Platform, TripDate, TripRecord};

/// Running sums for one date
#[derive(Debug, Clone, Copy, Default)]
struct DateAccumulator {
    trip_count: usize,
    true_profit: Decimal,
}

/// Running sums for one platform
#[derive(Debug, Clone, Copy, Default)]
struct PlatformAccumulator {
    trip_count: usize,
    true_profit: Decimal,
    total_time_minutes: Decimal,
}

/// Partial aggregation state, mergeable across partitions
#[derive(Debug, Clone, Default)]
struct Accumulator {
    totals: Totals,
    by_date: BTreeMap<TripDate, DateAccumulator>,
    by_platform: BTreeMap<Platform, PlatformAccumulator>,
}

impl Accumulator {
    fn add(&mut self, record: &TripRecord) {
        let financials = record.financials();
        let minutes = record.total_time_minutes();

        self.totals += Totals {
            trip_count: 1,
            gross_fare: record.gross_fare(),
            platform_fees: financials.platform_fees,
            net_earnings: financials.net_earnings,
            vehicle_costs: financials.vehicle_costs,
            true_profit: financials.true_profit,
            total_time_minutes: minutes,
        };

        let day = self.by_date.entry(record.date()).or_default();
        day.trip_count += 1;
        day.true_profit += financials.true_profit;

        let platform = self.by_platform.entry(record.platform().clone()).or_default();
        platform.trip_count += 1;
        platform.true_profit += financials.true_profit;
        platform.total_time_minutes += minutes;
    }

    fn merge(mut self, other: Self) -> Self {
        self.totals += other.totals;

        for (date, day) in other.by_date {
            let entry = self.by_date.entry(date).or_default();
            entry.trip_count += day.trip_count;
            entry.true_profit += day.true_profit;
        }

        for (label, platform) in other.by_platform {
            let entry = self.by_platform.entry(label).or_default();
            entry.trip_count += platform.trip_count;
            entry.true_profit += platform.true_profit;
            entry.total_time_minutes += platform.total_time_minutes;
        }

        self
    }

    fn finish(self) -> AggregationResult {
        let profit_by_date = self
            .by_date
            .into_iter()
            .map(|(date, day)| DailyProfit {
                date,
                trip_count: day.trip_count,
                true_profit: day.true_profit,
            })
            .collect();

        let hourly_wage_by_platform = self
            .by_platform
            .into_iter()
            .map(|(platform, acc)| {
                let totals = Totals {
                    trip_count: acc.trip_count,
                    true_profit: acc.true_profit,
                    total_time_minutes: acc.total_time_minutes,
                    ..Totals::default()
                };
                PlatformWage {
                    platform,
                    trip_count: acc.trip_count,
                    hours_worked: totals.hours_worked(),
                    true_profit: acc.true_profit,
                    true_hourly_wage: totals.true_hourly_wage(),
                }
            })
            .collect();

        AggregationResult {
            total_hours_worked: self.totals.hours_worked(),
            true_hourly_wage: self.totals.true_hourly_wage(),
            totals: self.totals,
            profit_by_date,
            hourly_wage_by_platform,
        }
    }
}

/// Aggregate records sequentially
///
/// Empty input yields zeroed totals and empty series.
pub fn aggregate<'a, I>(records: I) -> AggregationResult
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut acc = Accumulator::default();
    for record in records {
        acc.add(record);
    }
    acc.finish()
}

/// Aggregate records across the rayon thread pool
///
/// Always equal to [`aggregate`] over the same records.
pub fn aggregate_parallel(records: &[&TripRecord]) -> AggregationResult {
    records
        .par_iter()
        .fold(Accumulator::default, |mut acc, record| {
            acc.add(record);
            acc
        })
        .reduce(Accumulator::default, Accumulator::merge)
        .finish()
}

/// Runs aggregation with the configured strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    parallel: bool,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the rayon reduction instead of a single pass
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Aggregate already-filtered records
    pub fn aggregate(&self, records: &[&TripRecord]) -> AggregationResult {
        debug!(
            "Aggregating {} records ({})",
            records.len(),
            if self.parallel { "parallel" } else { "sequential" }
        );

        let result = if self.parallel {
            aggregate_parallel(records)
        } else {
            aggregate(records.iter().copied())
        };

        info!(
            "Aggregated {} trips over {} dates and {} platform(s)",
            result.totals.trip_count,
            result.profit_by_date.len(),
            result.hourly_wage_by_platform.len()
        );
        result
    }
}
