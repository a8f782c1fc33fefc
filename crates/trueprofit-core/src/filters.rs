//! Filter criteria for trip records
//!
//! A filter is an inclusive date range plus the set of selected platforms.
//! Both parts are required: an empty platform selection matches nothing
//! rather than everything.
//!
//! # Examples
//!
//! ```
//! use trueprofit_core::filters::FilterCriteria;
//! use trueprofit_core::types::{Platform, TripDate};
//! use chrono::NaiveDate;
//!
//! let criteria = FilterCriteria::new(
//!     TripDate::new(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
//!     TripDate::new(NaiveDate::from_ymd_opt(2025, 5, 31).unwrap()),
//!     [Platform::new("Uber")],
//! )
//! .unwrap();
//!
//! assert!(criteria.includes_platform(&Platform::new("Uber")));
//! assert!(!criteria.includes_platform(&Platform::new("Lyft")));
//! ```

use crate::error::{Result, TrueProfitError};
use crate::types::{Platform, TripDate, TripRecord};
use std::collections::BTreeSet;

/// Date range and platform selection applied to trip records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    start_date: TripDate,
    end_date: TripDate,
    platforms: BTreeSet<Platform>,
}

impl FilterCriteria {
    /// Create criteria for `[start_date, end_date]` and the given platforms
    ///
    /// # Errors
    ///
    /// Returns [`TrueProfitError::InvalidFilter`] when `start_date` is after
    /// `end_date`.
    pub fn new(
        start_date: TripDate,
        end_date: TripDate,
        platforms: impl IntoIterator<Item = Platform>,
    ) -> Result<Self> {
        if start_date > end_date {
            return Err(TrueProfitError::InvalidFilter(format!(
                "start date {start_date} is after end date {end_date}"
            )));
        }

        Ok(Self {
            start_date,
            end_date,
            platforms: platforms.into_iter().collect(),
        })
    }

    /// Replace the platform selection
    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    /// First date included
    pub fn start_date(&self) -> TripDate {
        self.start_date
    }

    /// Last date included
    pub fn end_date(&self) -> TripDate {
        self.end_date
    }

    /// Selected platforms
    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    /// Whether no platform is selected
    pub fn selects_nothing(&self) -> bool {
        self.platforms.is_empty()
    }

    /// Whether a platform is selected
    pub fn includes_platform(&self, platform: &Platform) -> bool {
        self.platforms.contains(platform)
    }

    /// Whether a date falls inside the range (both ends inclusive)
    pub fn includes_date(&self, date: TripDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Check if a record passes the filter
    pub fn matches(&self, record: &TripRecord) -> bool {
        self.includes_date(record.date()) && self.includes_platform(record.platform())
    }

    /// Reject selections that name platforms outside `known`
    ///
    /// # Errors
    ///
    /// Returns [`TrueProfitError::InvalidFilter`] listing the unknown labels.
    pub fn validate_platforms(&self, known: &BTreeSet<Platform>) -> Result<()> {
        let unknown: Vec<&str> = self
            .platforms
            .difference(known)
            .map(Platform::as_str)
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(TrueProfitError::InvalidFilter(format!(
                "unknown platform(s): {}",
                unknown.join(", ")
            )))
        }
    }
}

/// Keep the records that match `criteria`, in their original order
///
/// Works on any iterator of record references, so a filtered result can be
/// filtered again.
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a TripRecord>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    if criteria.selects_nothing() {
        return Vec::new();
    }

    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}
