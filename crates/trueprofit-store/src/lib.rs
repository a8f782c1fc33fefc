//! Trip record sources and the trip store
//!
//! A [`TripSource`] yields raw trips; a [`TripStore`] derives their
//! financials once and keeps the immutable records for filtering and
//! aggregation.
//!
//! # Example
//!
//! ```no_run
//! use trueprofit_costs::ProfitCalculator;
//! use trueprofit_store::{CsvTripSource, TripStore};
//!
//! let source = CsvTripSource::from_path("gig_work_data.csv");
//! let store = TripStore::load(&source, &ProfitCalculator::default())?;
//! println!("{} trips across {:?}", store.len(), store.distinct_platforms());
//! # Ok::<(), trueprofit_core::TrueProfitError>(())
//! ```

pub mod source;
pub mod store;

pub use source::{CsvTripSource, MemoryTripSource, REQUIRED_COLUMNS, TripSource};
pub use store::{StoreLoader, TripStore};
