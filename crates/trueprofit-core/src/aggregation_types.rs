//! Aggregation data types for trueprofit
//!
//! Pure data structures describing an aggregated view over trip records.
//! These types have no dependencies on the cost calculator or the store;
//! they are built by the aggregation engine and consumed by formatters.

use crate::filters::FilterCriteria;
use crate::types::{Platform, TripDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

const MINUTES_PER_HOUR: Decimal = dec!(60);

/// True hourly wage for a profit earned over a number of minutes
///
/// Zero when no time was worked; never divides by zero. Loaded trips are
/// bounded so the division fits, and a result past `Decimal` range
/// saturates to `Decimal::MAX` or `Decimal::MIN` instead of panicking.
///
/// # Examples
/// ```
/// use trueprofit_core::aggregation_types::hourly_wage;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(hourly_wage(dec!(13.00), dec!(25)), dec!(31.20));
/// assert_eq!(hourly_wage(dec!(13.00), dec!(0)), dec!(0));
/// ```
pub fn hourly_wage(true_profit: Decimal, total_minutes: Decimal) -> Decimal {
    if total_minutes > Decimal::ZERO {
        // profit / (minutes / 60), with a single division
        true_profit
            .checked_mul(MINUTES_PER_HOUR)
            .and_then(|scaled| scaled.checked_div(total_minutes))
            .unwrap_or(if true_profit.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            })
    } else {
        Decimal::ZERO
    }
}

/// Convert minutes to hours
pub fn minutes_to_hours(minutes: Decimal) -> Decimal {
    minutes / MINUTES_PER_HOUR
}

/// Scalar sums over a set of trips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Number of trips summed
    pub trip_count: usize,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub gross_fare: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub platform_fees: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub net_earnings: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub vehicle_costs: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub true_profit: Decimal,
    /// Driving plus waiting minutes
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_time_minutes: Decimal,
}

impl Totals {
    /// Hours worked (total minutes / 60)
    pub fn hours_worked(&self) -> Decimal {
        minutes_to_hours(self.total_time_minutes)
    }

    /// True profit per hour worked, zero when no time was worked
    pub fn true_hourly_wage(&self) -> Decimal {
        hourly_wage(self.true_profit, self.total_time_minutes)
    }
}

impl std::ops::AddAssign for Totals {
    fn add_assign(&mut self, other: Self) {
        self.trip_count += other.trip_count;
        self.gross_fare += other.gross_fare;
        self.platform_fees += other.platform_fees;
        self.net_earnings += other.net_earnings;
        self.vehicle_costs += other.vehicle_costs;
        self.true_profit += other.true_profit;
        self.total_time_minutes += other.total_time_minutes;
    }
}

/// True profit earned on one date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyProfit {
    /// Date of the trips
    pub date: TripDate,
    /// Trips on that date
    pub trip_count: usize,
    /// Sum of true profit for the date
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub true_profit: Decimal,
}

/// Profitability of one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformWage {
    /// Platform label
    pub platform: Platform,
    /// Trips on the platform
    pub trip_count: usize,
    /// Hours worked on the platform
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub hours_worked: Decimal,
    /// Sum of true profit on the platform
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub true_profit: Decimal,
    /// True profit per hour, zero when no time was worked
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub true_hourly_wage: Decimal,
}

/// Where the gross fare went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostCategory {
    TrueProfit,
    PlatformFees,
    VehicleCosts,
}

impl CostCategory {
    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::TrueProfit => "True Profit",
            Self::PlatformFees => "Platform Fees",
            Self::VehicleCosts => "Vehicle Costs",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One slice of the gross fare breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostSlice {
    pub category: CostCategory,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
}

/// KPIs and grouped series over a filtered set of trips
///
/// Derived on demand and never persisted. An empty input produces zeroed
/// totals and empty series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationResult {
    /// Scalar sums
    pub totals: Totals,
    /// Total hours worked
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_hours_worked: Decimal,
    /// Total true profit per hour worked
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub true_hourly_wage: Decimal,
    /// True profit per date with activity, ascending by date
    pub profit_by_date: Vec<DailyProfit>,
    /// Wage per platform with activity, ascending by label
    pub hourly_wage_by_platform: Vec<PlatformWage>,
}

impl AggregationResult {
    /// Whether no trip contributed to the result
    pub fn is_empty(&self) -> bool {
        self.totals.trip_count == 0
    }

    /// Gross fare split into true profit, platform fees and vehicle costs
    ///
    /// The three amounts always sum to the total gross fare.
    pub fn cost_breakdown(&self) -> [CostSlice; 3] {
        [
            CostSlice {
                category: CostCategory::TrueProfit,
                amount: self.totals.true_profit,
            },
            CostSlice {
                category: CostCategory::PlatformFees,
                amount: self.totals.platform_fees,
            },
            CostSlice {
                category: CostCategory::VehicleCosts,
                amount: self.totals.vehicle_costs,
            },
        ]
    }
}

/// Why an aggregation came back empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// The platform selection was empty
    NoPlatformsSelected,
    /// Platforms were selected but no trip matched the range
    NoTripsInRange,
}

impl EmptyReason {
    /// Explain an empty result, or `None` when the result has data
    pub fn detect(criteria: &FilterCriteria, result: &AggregationResult) -> Option<Self> {
        if !result.is_empty() {
            None
        } else if criteria.selects_nothing() {
            Some(Self::NoPlatformsSelected)
        } else {
            Some(Self::NoTripsInRange)
        }
    }

    /// Message for the end user
    pub fn message(&self) -> &'static str {
        match self {
            Self::NoPlatformsSelected => {
                "No platforms selected. Select at least one platform to see results."
            }
            Self::NoTripsInRange => {
                "No data available for the selected filters. Please adjust your selection."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> TripDate {
        TripDate::new(NaiveDate::from_ymd_opt(2025, 5, day).unwrap())
    }

    #[test]
    fn test_hourly_wage_zero_guard() {
        assert_eq!(hourly_wage(dec!(100), dec!(0)), Decimal::ZERO);
        assert_eq!(hourly_wage(dec!(-5), dec!(0)), Decimal::ZERO);
        assert_eq!(hourly_wage(dec!(30), dec!(60)), dec!(30));
        assert_eq!(hourly_wage(dec!(-10), dec!(30)), dec!(-20));
    }

    #[test]
    fn test_hourly_wage_saturates() {
        let tiny = dec!(0.0000000000000000000000000001);
        assert_eq!(hourly_wage(dec!(100000), tiny), Decimal::MAX);
        assert_eq!(hourly_wage(dec!(-100000), tiny), Decimal::MIN);
        assert_eq!(hourly_wage(Decimal::MAX, dec!(1)), Decimal::MAX);
    }

    #[test]
    fn test_totals_add_assign() {
        let mut a = Totals {
            trip_count: 1,
            gross_fare: dec!(20),
            platform_fees: dec!(5),
            net_earnings: dec!(15),
            vehicle_costs: dec!(2),
            true_profit: dec!(13),
            total_time_minutes: dec!(25),
        };
        a += a;

        assert_eq!(a.trip_count, 2);
        assert_eq!(a.gross_fare, dec!(40));
        assert_eq!(a.true_profit, dec!(26));
        assert_eq!(a.total_time_minutes, dec!(50));
        assert_eq!(a.true_hourly_wage(), dec!(31.2));
    }

    #[test]
    fn test_hours_worked() {
        let totals = Totals {
            total_time_minutes: dec!(90),
            ..Totals::default()
        };
        assert_eq!(totals.hours_worked(), dec!(1.5));
    }

    #[test]
    fn test_cost_breakdown_sums_to_gross() {
        let result = AggregationResult {
            totals: Totals {
                trip_count: 1,
                gross_fare: dec!(20),
                platform_fees: dec!(5),
                net_earnings: dec!(15),
                vehicle_costs: dec!(2),
                true_profit: dec!(13),
                total_time_minutes: dec!(25),
            },
            ..AggregationResult::default()
        };

        let breakdown = result.cost_breakdown();
        let sum: Decimal = breakdown.iter().map(|s| s.amount).sum();
        assert_eq!(sum, result.totals.gross_fare);
        assert_eq!(breakdown[0].category.label(), "True Profit");
    }

    #[test]
    fn test_empty_reason() {
        let empty = AggregationResult::default();
        let no_platforms = FilterCriteria::new(date(1), date(2), Vec::new()).unwrap();
        let some_platforms =
            FilterCriteria::new(date(1), date(2), [Platform::new("Uber")]).unwrap();

        assert_eq!(
            EmptyReason::detect(&no_platforms, &empty),
            Some(EmptyReason::NoPlatformsSelected)
        );
        assert_eq!(
            EmptyReason::detect(&some_platforms, &empty),
            Some(EmptyReason::NoTripsInRange)
        );

        let non_empty = AggregationResult {
            totals: Totals {
                trip_count: 1,
                ..Totals::default()
            },
            ..AggregationResult::default()
        };
        assert_eq!(EmptyReason::detect(&some_platforms, &non_empty), None);
    }

    #[test]
    fn test_json_shape() {
        let result = AggregationResult {
            profit_by_date: vec![DailyProfit {
                date: date(1),
                trip_count: 1,
                true_profit: dec!(13),
            }],
            ..AggregationResult::default()
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["true_hourly_wage"], 0.0);
        assert_eq!(json["profit_by_date"][0]["date"], "2025-05-01");
        assert_eq!(json["profit_by_date"][0]["true_profit"], 13.0);
        assert!(json["hourly_wage_by_platform"].as_array().unwrap().is_empty());
    }
}
