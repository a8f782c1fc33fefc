//! Random trip generation
//!
//! Amounts are drawn on a fixed decimal grid (hundredths of a km, thousandths
//! of the surge factor) so the generated values are exact and need no
//! float-to-decimal conversion.

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use trueprofit_core::config::CommissionSchedule;
use trueprofit_core::error::{Result, TrueProfitError};
use trueprofit_core::types::{Platform, RawTrip, TripDate, TripId};

const BASE_FARE: Decimal = dec!(2.50);
const FARE_PER_KM: Decimal = dec!(1.10);
const FARE_PER_MINUTE: Decimal = dec!(0.25);
const FIRST_TRIP_ID: u64 = 1000;

const FIXTURE_COLUMNS: [&str; 9] = [
    "trip_id",
    "date",
    "platform",
    "trip_duration_minutes",
    "wait_time_minutes",
    "total_time_minutes",
    "trip_distance_km",
    "gross_fare",
    "platform_commission_percent",
];

/// Settings for a generation run
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of trips to produce
    pub trips: usize,
    /// First possible trip date
    pub start_date: TripDate,
    /// Last possible trip date
    pub end_date: TripDate,
    /// Platforms to pick from, uniformly
    pub platforms: Vec<Platform>,
    /// Commission written for each platform
    pub commissions: CommissionSchedule,
    /// Seed for reproducible output; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            trips: 1000,
            start_date: fixed_date(2025, 5, 1),
            end_date: fixed_date(2025, 7, 22),
            platforms: vec![Platform::new("Uber"), Platform::new("Lyft")],
            commissions: CommissionSchedule::default(),
            seed: None,
        }
    }
}

fn fixed_date(year: i32, month: u32, day: u32) -> TripDate {
    TripDate::new(NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default())
}

impl GeneratorConfig {
    /// Check the range and that every platform has a commission
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(TrueProfitError::InvalidArgument(format!(
                "generator start date {} is after end date {}",
                self.start_date, self.end_date
            )));
        }
        if self.platforms.is_empty() {
            return Err(TrueProfitError::InvalidArgument(
                "generator needs at least one platform".to_string(),
            ));
        }
        if let Some(platform) = self
            .platforms
            .iter()
            .find(|p| self.commissions.rate_for(p).is_none())
        {
            return Err(TrueProfitError::InvalidArgument(format!(
                "no commission rate for generated platform '{platform}'"
            )));
        }
        Ok(())
    }
}

/// Produces synthetic trips from a [`GeneratorConfig`]
///
/// # Example
///
/// ```
/// use trueprofit_generator::{GeneratorConfig, TripGenerator};
///
/// let config = GeneratorConfig { trips: 10, seed: Some(7), ..GeneratorConfig::default() };
/// let trips = TripGenerator::new(config).unwrap().generate().unwrap();
/// assert_eq!(trips.len(), 10);
/// assert_eq!(trips[0].trip_id.as_str(), "1000");
/// ```
pub struct TripGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl TripGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// Draw every configured trip
    pub fn generate(&mut self) -> Result<Vec<RawTrip>> {
        let span_days = self
            .config
            .end_date
            .inner()
            .signed_duration_since(*self.config.start_date.inner())
            .num_days()
            .unsigned_abs();

        let trips = (0..self.config.trips as u64)
            .map(|i| self.next_trip(FIRST_TRIP_ID + i, span_days))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Generated {} trips between {} and {}",
            trips.len(),
            self.config.start_date,
            self.config.end_date
        );
        Ok(trips)
    }

    fn next_trip(&mut self, id: u64, span_days: u64) -> Result<RawTrip> {
        let pick = self.rng.gen_range(0..self.config.platforms.len());
        let platform = self.config.platforms[pick].clone();

        let offset = self.rng.gen_range(0..=span_days);
        let date = self
            .config
            .start_date
            .inner()
            .checked_add_days(Days::new(offset))
            .map(TripDate::new)
            .ok_or_else(|| TrueProfitError::InvalidArgument(format!("date overflow at trip {id}")))?;

        let duration = Decimal::from(self.rng.gen_range(5..=45i64));
        let wait = Decimal::from(self.rng.gen_range(2..=15i64));
        let distance = Decimal::new(self.rng.gen_range(200..=3000), 2);
        let surge = Decimal::new(self.rng.gen_range(900..1300), 3);

        let fare = (BASE_FARE + distance * FARE_PER_KM + duration * FARE_PER_MINUTE) * surge;

        Ok(RawTrip {
            trip_id: TripId::new(id.to_string()),
            date,
            platform_commission_percent: self.config.commissions.rate_for(&platform),
            platform,
            trip_duration_minutes: duration,
            wait_time_minutes: wait,
            trip_distance_km: distance,
            gross_fare: fare.round_dp(2),
        })
    }
}

/// One CSV row; column order follows the established export layout
#[derive(Serialize)]
struct FixtureRow<'a> {
    trip_id: &'a TripId,
    date: TripDate,
    platform: &'a Platform,
    trip_duration_minutes: Decimal,
    wait_time_minutes: Decimal,
    total_time_minutes: Decimal,
    trip_distance_km: Decimal,
    gross_fare: Decimal,
    platform_commission_percent: Option<Decimal>,
}

impl<'a> From<&'a RawTrip> for FixtureRow<'a> {
    fn from(trip: &'a RawTrip) -> Self {
        Self {
            trip_id: &trip.trip_id,
            date: trip.date,
            platform: &trip.platform,
            trip_duration_minutes: trip.trip_duration_minutes,
            wait_time_minutes: trip.wait_time_minutes,
            total_time_minutes: trip.total_time_minutes(),
            trip_distance_km: trip.trip_distance_km,
            gross_fare: trip.gross_fare,
            platform_commission_percent: trip.platform_commission_percent,
        }
    }
}

/// Write trips as CSV with a header row
///
/// Derived money columns are not written; loading recomputes them.
pub fn write_csv<W: Write>(trips: &[RawTrip], writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    // serialize() only emits the header alongside the first row
    if trips.is_empty() {
        csv.write_record(FIXTURE_COLUMNS)?;
    }
    for trip in trips {
        csv.serialize(FixtureRow::from(trip))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write trips to a CSV file, replacing any existing file
pub fn write_csv_file(trips: &[RawTrip], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(trips, std::io::BufWriter::new(file))?;
    info!("Wrote {} trips to {}", trips.len(), path.display());
    Ok(())
}
