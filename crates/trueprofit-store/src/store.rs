//! The trip store
//!
//! Holds the derived records of one load. Records are never mutated after
//! the load; filtering and aggregation borrow them.

use crate::source::TripSource;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};
use trueprofit_core::error::{Result, TrueProfitError};
use trueprofit_core::filters::{self, FilterCriteria};
use trueprofit_core::types::{Platform, TripDate, TripRecord};
use trueprofit_costs::ProfitCalculator;

/// Loads a source into a [`TripStore`]
///
/// # Example
///
/// ```
/// use trueprofit_costs::ProfitCalculator;
/// use trueprofit_store::{MemoryTripSource, StoreLoader};
///
/// let store = StoreLoader::new(ProfitCalculator::default())
///     .with_progress(false)
///     .load(&MemoryTripSource::new(Vec::new()))
///     .unwrap();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StoreLoader {
    calculator: ProfitCalculator,
    show_progress: bool,
}

impl StoreLoader {
    pub fn new(calculator: ProfitCalculator) -> Self {
        Self {
            calculator,
            show_progress: false,
        }
    }

    /// Enable or disable the load spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Read, derive and index every trip of `source`
    ///
    /// # Errors
    ///
    /// Every failure is reported as [`TrueProfitError::DataSource`] naming
    /// the source: unreadable or malformed rows, duplicate trip ids, and
    /// trips whose commission cannot be resolved.
    pub fn load(&self, source: &dyn TripSource) -> Result<TripStore> {
        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} [{elapsed_precise}]")
            {
                pb.set_style(style);
            }
            pb.set_message(format!("Loading trips from {}", source.name()));
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let result = self.load_inner(source);

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        result
    }

    fn load_inner(&self, source: &dyn TripSource) -> Result<TripStore> {
        let raw = source.load_raw()?;

        let mut seen = HashSet::with_capacity(raw.len());
        for trip in &raw {
            if !seen.insert(&trip.trip_id) {
                return Err(TrueProfitError::data_source(
                    source.name(),
                    format!("duplicate trip_id {}", trip.trip_id),
                ));
            }
        }

        let records = self.calculator.derive_all(raw).map_err(|e| match e {
            e if e.is_data_source() => e,
            e => TrueProfitError::data_source(source.name(), e.to_string()),
        })?;

        let store = TripStore::from_records(source.name(), records);
        if store.is_empty() {
            warn!("{} contains no trips", source.name());
        } else {
            info!(
                "Loaded {} trips on {} platform(s) from {}",
                store.len(),
                store.platforms.len(),
                source.name()
            );
        }
        Ok(store)
    }
}

/// Immutable collection of derived trip records
#[derive(Debug, Clone)]
pub struct TripStore {
    source_name: String,
    records: Vec<TripRecord>,
    platforms: BTreeSet<Platform>,
}

impl TripStore {
    /// Load a source with the given calculator and no progress display
    pub fn load(source: &dyn TripSource, calculator: &ProfitCalculator) -> Result<Self> {
        StoreLoader::new(calculator.clone()).load(source)
    }

    fn from_records(source_name: &str, records: Vec<TripRecord>) -> Self {
        let platforms = records.iter().map(|r| r.platform().clone()).collect();
        Self {
            source_name: source_name.to_string(),
            records,
            platforms,
        }
    }

    /// Name of the source the records came from
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Records in source order
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Platform labels observed in the records
    pub fn distinct_platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    /// Earliest and latest trip dates
    ///
    /// # Errors
    ///
    /// Returns [`TrueProfitError::EmptyStore`] when there are no records.
    pub fn date_bounds(&self) -> Result<(TripDate, TripDate)> {
        let mut dates = self.records.iter().map(TripRecord::date);
        let first = dates.next().ok_or(TrueProfitError::EmptyStore)?;
        Ok(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }

    /// Criteria selecting every record: full date bounds and all platforms
    pub fn full_range_criteria(&self) -> Result<FilterCriteria> {
        let (start, end) = self.date_bounds()?;
        FilterCriteria::new(start, end, self.platforms.iter().cloned())
    }

    /// Records matching `criteria`, in source order
    ///
    /// # Errors
    ///
    /// Returns [`TrueProfitError::InvalidFilter`] if the criteria select a
    /// platform the store has never seen.
    pub fn query(&self, criteria: &FilterCriteria) -> Result<Vec<&TripRecord>> {
        criteria.validate_platforms(&self.platforms)?;
        Ok(filters::filter(&self.records, criteria))
    }
}
