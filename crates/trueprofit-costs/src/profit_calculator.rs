//! Profit calculator for deriving trip financials
//!
//! This module applies the cost model to raw trips. Derivation happens once
//! per trip, when the record is built; records never recompute their
//! financials afterwards.
//!
//! # Examples
//!
//! ```
//! use trueprofit_core::config::CostConfig;
//! use trueprofit_costs::ProfitCalculator;
//! use rust_decimal_macros::dec;
//!
//! let financials = ProfitCalculator::calculate_financials(
//!     dec!(20.00), // gross fare
//!     dec!(0.25),  // commission
//!     dec!(10),    // km
//!     CostConfig::default().vehicle_cost_per_km(),
//! );
//!
//! assert_eq!(financials.platform_fees, dec!(5.00));
//! assert_eq!(financials.net_earnings, dec!(15.00));
//! assert_eq!(financials.vehicle_costs, dec!(2.00));
//! assert_eq!(financials.true_profit, dec!(13.00));
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace};
use trueprofit_core::config::CostConfig;
use trueprofit_core::error::{Result, TrueProfitError};
use trueprofit_core::types::{Financials, RawTrip, TripRecord};

/// Derives trip financials under a fixed cost configuration
///
/// The configuration is owned by the calculator, so two calculators with
/// different rates can derive the same trips independently.
#[derive(Debug, Clone, Default)]
pub struct ProfitCalculator {
    config: CostConfig,
}

impl ProfitCalculator {
    /// Create a calculator for the given cost model
    pub fn new(config: CostConfig) -> Self {
        Self { config }
    }

    /// The cost model in use
    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    /// Compute financials from fare, commission and distance
    ///
    /// Pure function of its inputs. Net earnings are computed as
    /// `gross_fare - platform_fees`, so fees plus net always equal the fare.
    pub fn calculate_financials(
        gross_fare: Decimal,
        commission: Decimal,
        distance_km: Decimal,
        vehicle_cost_per_km: Decimal,
    ) -> Financials {
        let platform_fees = gross_fare * commission;
        let net_earnings = gross_fare - platform_fees;
        let vehicle_costs = distance_km * vehicle_cost_per_km;
        let true_profit = net_earnings - vehicle_costs;

        trace!(
            "Derived fees {} net {} vehicle {} profit {} from fare {}",
            platform_fees, net_earnings, vehicle_costs, true_profit, gross_fare
        );

        Financials {
            platform_fees,
            net_earnings,
            vehicle_costs,
            true_profit,
        }
    }

    /// Commission to apply to a trip
    ///
    /// The trip's own rate wins; otherwise the schedule's rate for the
    /// platform, then the schedule's fallback.
    ///
    /// # Errors
    ///
    /// Returns [`TrueProfitError::Config`] when neither the trip nor the
    /// schedule provides a rate for the platform.
    pub fn resolve_commission(&self, trip: &RawTrip) -> Result<Decimal> {
        if let Some(rate) = trip.platform_commission_percent {
            return Ok(rate);
        }

        self.config
            .commissions
            .rate_for(&trip.platform)
            .ok_or_else(|| {
                TrueProfitError::Config(format!(
                    "no commission rate for platform '{}' (trip {}); add it under \
                     \"commissions\" or set \"fallback_commission\"",
                    trip.platform, trip.trip_id
                ))
            })
    }

    /// Build an immutable record from a raw trip
    ///
    /// # Errors
    ///
    /// Returns [`TrueProfitError::InvalidArgument`] for out-of-range fields
    /// and [`TrueProfitError::Config`] when no commission can be resolved.
    pub fn derive(&self, trip: RawTrip) -> Result<TripRecord> {
        trip.validate().map_err(TrueProfitError::InvalidArgument)?;

        let commission = self.resolve_commission(&trip)?;
        let financials = Self::calculate_financials(
            trip.gross_fare,
            commission,
            trip.trip_distance_km,
            self.config.vehicle_cost_per_km(),
        );

        Ok(TripRecord::new(trip, commission, financials))
    }

    /// Derive every trip, stopping at the first failure
    pub fn derive_all(&self, trips: impl IntoIterator<Item = RawTrip>) -> Result<Vec<TripRecord>> {
        let records = trips
            .into_iter()
            .map(|trip| self.derive(trip))
            .collect::<Result<Vec<_>>>()?;

        debug!("Derived financials for {} trips", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use trueprofit_core::config::CommissionSchedule;
    use trueprofit_core::types::{Platform, TripDate, TripId};

    fn uber_trip() -> RawTrip {
        RawTrip {
            trip_id: TripId::new("1000"),
            date: TripDate::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
            platform: Platform::new("Uber"),
            trip_duration_minutes: dec!(20),
            wait_time_minutes: dec!(5),
            trip_distance_km: dec!(10),
            gross_fare: dec!(20.00),
            platform_commission_percent: Some(dec!(0.25)),
        }
    }

    #[test]
    fn test_reference_trip() {
        let calculator = ProfitCalculator::default();
        let record = calculator.derive(uber_trip()).unwrap();
        let f = record.financials();

        assert_eq!(f.platform_fees, dec!(5.00));
        assert_eq!(f.net_earnings, dec!(15.00));
        assert_eq!(f.vehicle_costs, dec!(2.00));
        assert_eq!(f.true_profit, dec!(13.00));
        assert_eq!(record.total_time_minutes(), dec!(25));
    }

    #[test]
    fn test_fees_plus_net_is_exact() {
        // Fractions that drift in binary floating point
        let f = ProfitCalculator::calculate_financials(dec!(17.23), dec!(0.28), dec!(3.3), dec!(0.2));
        assert_eq!(f.platform_fees + f.net_earnings, dec!(17.23));
        assert_eq!(f.true_profit, dec!(17.23) - f.platform_fees - f.vehicle_costs);
    }

    #[test]
    fn test_losing_trip_has_negative_profit() {
        let f = ProfitCalculator::calculate_financials(dec!(3.00), dec!(0.28), dec!(30), dec!(0.2));
        assert_eq!(f.vehicle_costs, dec!(6.0));
        assert!(f.true_profit < Decimal::ZERO);
    }

    #[test]
    fn test_zero_fare_and_distance() {
        let f = ProfitCalculator::calculate_financials(dec!(0), dec!(0.25), dec!(0), dec!(0.2));
        assert_eq!(f, Financials::default());
    }

    #[test]
    fn test_custom_rates_change_vehicle_costs() {
        let config = CostConfig::new(dec!(0.30), dec!(0.10)).unwrap();
        let calculator = ProfitCalculator::new(config);
        let record = calculator.derive(uber_trip()).unwrap();

        assert_eq!(record.financials().vehicle_costs, dec!(4.00));
        assert_eq!(record.financials().true_profit, dec!(11.00));
    }

    #[test]
    fn test_commission_from_schedule() {
        let mut trip = uber_trip();
        trip.platform = Platform::new("Lyft");
        trip.platform_commission_percent = None;

        let record = ProfitCalculator::default().derive(trip).unwrap();
        assert_eq!(record.commission(), dec!(0.28));
        assert_eq!(record.financials().platform_fees, dec!(5.6));
    }

    #[test]
    fn test_trip_commission_overrides_schedule() {
        let mut trip = uber_trip();
        trip.platform_commission_percent = Some(dec!(0.10));

        let record = ProfitCalculator::default().derive(trip).unwrap();
        assert_eq!(record.commission(), dec!(0.10));
    }

    #[test]
    fn test_unknown_platform_without_fallback() {
        let mut trip = uber_trip();
        trip.platform = Platform::new("Bolt");
        trip.platform_commission_percent = None;

        let err = ProfitCalculator::default().derive(trip).unwrap_err();
        assert!(matches!(err, TrueProfitError::Config(_)));
        assert!(err.to_string().contains("Bolt"));
    }

    #[test]
    fn test_unknown_platform_with_fallback() {
        let mut trip = uber_trip();
        trip.platform = Platform::new("Bolt");
        trip.platform_commission_percent = None;

        let schedule = CommissionSchedule::default().with_fallback(dec!(0.2)).unwrap();
        let calculator = ProfitCalculator::new(CostConfig::default().with_commissions(schedule));

        let record = calculator.derive(trip).unwrap();
        assert_eq!(record.commission(), dec!(0.2));
    }

    #[test]
    fn test_invalid_trip_rejected() {
        let mut trip = uber_trip();
        trip.trip_distance_km = dec!(-1);

        let err = ProfitCalculator::default().derive(trip).unwrap_err();
        assert!(matches!(err, TrueProfitError::InvalidArgument(_)));
    }

    #[test]
    fn test_derive_all_stops_at_first_error() {
        let mut bad = uber_trip();
        bad.gross_fare = dec!(-5);

        let calculator = ProfitCalculator::default();
        assert_eq!(calculator.derive_all(vec![uber_trip(), uber_trip()]).unwrap().len(), 2);
        assert!(calculator.derive_all(vec![uber_trip(), bad]).is_err());
    }
}
