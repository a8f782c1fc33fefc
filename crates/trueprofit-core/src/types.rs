//! Core domain types for trueprofit
//!
//! This module contains the fundamental types used throughout the trueprofit
//! crates. Identifiers, platforms and dates get their own wrappers, and every
//! amount, distance and duration is a [`Decimal`] so sums stay exact.

use crate::error::{Result, TrueProfitError};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest fare, distance or minutes value accepted on a single trip
///
/// Keeps every sum and every per-hour division far inside `Decimal` range.
pub const MAX_TRIP_QUANTITY: Decimal = dec!(1000000);

/// Smallest nonzero total time a trip may report, in minutes
pub const MIN_NONZERO_MINUTES: Decimal = dec!(0.01);

/// Strongly-typed trip identifier
///
/// Integer ids from the source are kept as their string form.
///
/// # Examples
/// ```
/// use trueprofit_core::types::TripId;
///
/// let id = TripId::new("1000");
/// assert_eq!(id.as_str(), "1000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(String);

impl TripId {
    /// Create a new TripId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly-typed platform label
///
/// Platforms are an open set: whatever labels appear in the data are valid.
///
/// # Examples
/// ```
/// use trueprofit_core::types::Platform;
///
/// let platform = Platform::new("Uber");
/// assert_eq!(platform.as_str(), "Uber");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Platform(String);

impl Platform {
    /// Create a new Platform from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Platform {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Calendar date of a trip, without time-of-day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripDate(NaiveDate);

impl TripDate {
    /// Create a new TripDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }

    /// Parse a date column value, dropping any time-of-day
    ///
    /// Accepts plain dates, naive date-times with a space or `T` separator,
    /// and RFC 3339 timestamps. Offsets are not applied: the calendar date
    /// as written is the trip date.
    ///
    /// # Examples
    /// ```
    /// use trueprofit_core::types::TripDate;
    ///
    /// let a = TripDate::parse("2025-05-01").unwrap();
    /// let b = TripDate::parse("2025-05-01 23:15:00").unwrap();
    /// let c = TripDate::parse("2025-05-01T23:15:00-07:00").unwrap();
    /// assert_eq!(a, b);
    /// assert_eq!(a, c);
    /// ```
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return Ok(Self(date));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.date_naive()));
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M",
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        ];
        DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
            .map(|dt| Self(dt.date()))
            .ok_or_else(|| {
                TrueProfitError::InvalidDate(format!(
                    "'{value}', expected YYYY-MM-DD with optional time-of-day"
                ))
            })
    }
}

impl fmt::Display for TripDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for TripDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Raw trip fields as they arrive from a record source
///
/// Only the inputs of the derivation step live here. Precomputed money
/// columns in the source are never read into this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrip {
    /// Trip identifier
    pub trip_id: TripId,
    /// Calendar date of the trip
    #[serde(deserialize_with = "decimal_serde::deserialize_trip_date")]
    pub date: TripDate,
    /// Platform the trip was taken on
    pub platform: Platform,
    /// Minutes spent driving the rider
    #[serde(
        deserialize_with = "decimal_serde::deserialize",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub trip_duration_minutes: Decimal,
    /// Minutes spent waiting for or picking up the rider
    #[serde(
        deserialize_with = "decimal_serde::deserialize",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub wait_time_minutes: Decimal,
    /// Distance driven in kilometres
    #[serde(
        deserialize_with = "decimal_serde::deserialize",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub trip_distance_km: Decimal,
    /// Amount charged to the rider
    #[serde(
        deserialize_with = "decimal_serde::deserialize",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub gross_fare: Decimal,
    /// Commission fraction, when the source carries one
    #[serde(
        default,
        deserialize_with = "decimal_serde::deserialize_option",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub platform_commission_percent: Option<Decimal>,
}

impl RawTrip {
    /// Total minutes worked for the trip (driving plus waiting)
    pub fn total_time_minutes(&self) -> Decimal {
        self.trip_duration_minutes + self.wait_time_minutes
    }

    /// Check the value ranges a trip must satisfy
    ///
    /// Returns a description of the first violation found.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.trip_id.as_str().trim().is_empty() {
            return Err("empty trip_id".to_string());
        }
        if self.platform.as_str().trim().is_empty() {
            return Err(format!("trip {}: empty platform", self.trip_id));
        }

        let quantities = [
            ("trip_duration_minutes", self.trip_duration_minutes),
            ("wait_time_minutes", self.wait_time_minutes),
            ("trip_distance_km", self.trip_distance_km),
            ("gross_fare", self.gross_fare),
        ];
        if let Some((column, value)) = quantities.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(format!("trip {}: negative {column} ({value})", self.trip_id));
        }
        if let Some((column, value)) = quantities.iter().find(|(_, v)| *v > MAX_TRIP_QUANTITY) {
            return Err(format!(
                "trip {}: {column} ({value}) exceeds {MAX_TRIP_QUANTITY}",
                self.trip_id
            ));
        }

        let total = self.total_time_minutes();
        if total > Decimal::ZERO && total < MIN_NONZERO_MINUTES {
            return Err(format!(
                "trip {}: total time {total} minutes is below {MIN_NONZERO_MINUTES}",
                self.trip_id
            ));
        }

        if let Some(rate) = self.platform_commission_percent {
            validate_commission(rate).map_err(|e| format!("trip {}: {e}", self.trip_id))?;
        }

        Ok(())
    }
}

/// Check that a commission fraction lies in [0, 1)
pub fn validate_commission(rate: Decimal) -> std::result::Result<(), String> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        Err(format!("commission {rate} outside [0, 1)"))
    } else {
        Ok(())
    }
}

/// Financial fields derived from a raw trip
///
/// Produced once by the derivation step and never recomputed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Financials {
    /// gross_fare × commission
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub platform_fees: Decimal,
    /// gross_fare − platform_fees
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub net_earnings: Decimal,
    /// distance × (fuel + maintenance) per km
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub vehicle_costs: Decimal,
    /// net_earnings − vehicle_costs; negative for a losing trip
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub true_profit: Decimal,
}

/// A trip with its derived financials
///
/// Records are immutable: fields are only readable, and the derived values
/// are fixed at construction. Build them with the cost calculator rather
/// than by hand so the financials match the configured cost model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    #[serde(flatten)]
    trip: RawTrip,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    total_time_minutes: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    commission: Decimal,
    #[serde(flatten)]
    financials: Financials,
}

impl TripRecord {
    /// Assemble a record from its raw fields, resolved commission and financials
    pub fn new(trip: RawTrip, commission: Decimal, financials: Financials) -> Self {
        Self {
            total_time_minutes: trip.total_time_minutes(),
            trip,
            commission,
            financials,
        }
    }

    /// Raw input fields
    pub fn trip(&self) -> &RawTrip {
        &self.trip
    }

    /// Trip identifier
    pub fn id(&self) -> &TripId {
        &self.trip.trip_id
    }

    /// Calendar date of the trip
    pub fn date(&self) -> TripDate {
        self.trip.date
    }

    /// Platform label
    pub fn platform(&self) -> &Platform {
        &self.trip.platform
    }

    /// Minutes driving plus minutes waiting
    pub fn total_time_minutes(&self) -> Decimal {
        self.total_time_minutes
    }

    /// Distance driven in kilometres
    pub fn distance_km(&self) -> Decimal {
        self.trip.trip_distance_km
    }

    /// Amount charged to the rider
    pub fn gross_fare(&self) -> Decimal {
        self.trip.gross_fare
    }

    /// Commission fraction actually applied
    pub fn commission(&self) -> Decimal {
        self.commission
    }

    /// Derived financial fields
    pub fn financials(&self) -> &Financials {
        &self.financials
    }
}

/// Serde helpers for decimal columns
///
/// Sources are read as strings and parsed exactly, scientific notation
/// included. Output goes through `rust_decimal::serde::float` so JSON
/// consumers get numbers.
pub mod decimal_serde {
    use super::TripDate;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    /// Parse a decimal from text, accepting plain and scientific notation
    pub fn parse(value: &str) -> Option<Decimal> {
        let value = value.trim();
        Decimal::from_str(value)
            .or_else(|_| Decimal::from_scientific(value))
            .ok()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("non-numeric value '{raw}'")))
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) if !s.trim().is_empty() => parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("non-numeric value '{s}'"))),
            _ => Ok(None),
        }
    }

    pub fn deserialize_trip_date<'de, D>(deserializer: D) -> Result<TripDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        TripDate::parse(&raw).map_err(serde::de::Error::custom)
    }
}
