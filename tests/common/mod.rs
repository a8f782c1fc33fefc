//! Common test utilities and helpers for trueprofit tests
//!
//! This module provides reusable builders and fixtures so integration tests
//! only spell out the trip fields they care about.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::path::PathBuf;
use tempfile::TempDir;
use trueprofit::{
    costs::ProfitCalculator,
    store::{MemoryTripSource, TripStore},
    types::{Platform, RawTrip, TripDate, TripId},
};

/// Header of a full data export, precomputed money columns included
pub const EXPORT_HEADER: &str = "trip_id,date,platform,trip_duration_minutes,wait_time_minutes,\
total_time_minutes,trip_distance_km,gross_fare,platform_commission_percent,platform_fees,\
net_earnings,vehicle_costs,true_profit";

pub fn date(year: i32, month: u32, day: u32) -> TripDate {
    TripDate::new(NaiveDate::from_ymd_opt(year, month, day).unwrap())
}

/// Builder for creating test RawTrip instances
///
/// Starts from the reference trip: 2025-05-01 on Uber, $20.00 gross,
/// 10 km, 20 minutes driving plus 5 waiting, 25% commission.
pub struct TripBuilder {
    trip_id: String,
    date: TripDate,
    platform: String,
    duration: Decimal,
    wait: Decimal,
    distance: Decimal,
    gross_fare: Decimal,
    commission: Option<Decimal>,
}

impl TripBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            trip_id: id.to_string(),
            date: date(2025, 5, 1),
            platform: "Uber".to_string(),
            duration: dec!(20),
            wait: dec!(5),
            distance: dec!(10),
            gross_fare: dec!(20.00),
            commission: Some(dec!(0.25)),
        }
    }

    pub fn on(mut self, date: TripDate) -> Self {
        self.date = date;
        self
    }

    pub fn platform(mut self, platform: &str) -> Self {
        self.platform = platform.to_string();
        self
    }

    pub fn minutes(mut self, duration: Decimal, wait: Decimal) -> Self {
        self.duration = duration;
        self.wait = wait;
        self
    }

    pub fn distance(mut self, km: Decimal) -> Self {
        self.distance = km;
        self
    }

    pub fn fare(mut self, gross_fare: Decimal) -> Self {
        self.gross_fare = gross_fare;
        self
    }

    pub fn commission(mut self, commission: Option<Decimal>) -> Self {
        self.commission = commission;
        self
    }

    pub fn build(self) -> RawTrip {
        RawTrip {
            trip_id: TripId::new(self.trip_id),
            date: self.date,
            platform: Platform::new(self.platform),
            trip_duration_minutes: self.duration,
            wait_time_minutes: self.wait,
            trip_distance_km: self.distance,
            gross_fare: self.gross_fare,
            platform_commission_percent: self.commission,
        }
    }
}

/// A week of mixed trips on both default platforms
pub fn sample_trips() -> Vec<RawTrip> {
    vec![
        TripBuilder::new("1000").build(),
        TripBuilder::new("1001")
            .platform("Lyft")
            .commission(Some(dec!(0.28)))
            .fare(dec!(14.35))
            .distance(dec!(6.2))
            .minutes(dec!(14), dec!(6))
            .build(),
        TripBuilder::new("1002")
            .on(date(2025, 5, 3))
            .fare(dec!(41.10))
            .distance(dec!(27.85))
            .minutes(dec!(44), dec!(3))
            .build(),
        // Commission resolved from the default schedule
        TripBuilder::new("1003")
            .on(date(2025, 5, 4))
            .platform("Lyft")
            .commission(None)
            .fare(dec!(8.75))
            .distance(dec!(2.4))
            .minutes(dec!(7), dec!(12))
            .build(),
        // Loss-making: long empty drive for a small fare
        TripBuilder::new("1004")
            .on(date(2025, 5, 7))
            .fare(dec!(3.10))
            .distance(dec!(18))
            .minutes(dec!(25), dec!(15))
            .build(),
    ]
}

/// Load trips into a store with the default cost model
pub fn store_of(trips: Vec<RawTrip>) -> TripStore {
    TripStore::load(&MemoryTripSource::new(trips), &ProfitCalculator::default()).unwrap()
}

/// Write CSV text into a fresh temporary directory
///
/// The returned `TempDir` must outlive every use of the path.
pub fn write_csv(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gig_work_data.csv");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
