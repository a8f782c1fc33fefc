//! trueprofit - Derive the true profit of gig-economy driving
//!
//! This library provides functionality to:
//! - Load raw trip records from CSV and derive fees, vehicle costs and true profit
//! - Filter trips by date range and platform
//! - Aggregate KPIs, profit per day and true hourly wage per platform
//! - Generate reports in table and JSON formats
//! - Generate synthetic trip data sets
//!
//! # Examples
//!
//! ```no_run
//! use trueprofit::{
//!     aggregation::Aggregator,
//!     config::CostConfig,
//!     costs::ProfitCalculator,
//!     store::{CsvTripSource, TripStore},
//! };
//!
//! fn main() -> trueprofit::Result<()> {
//!     let calculator = ProfitCalculator::new(CostConfig::default());
//!     let store = TripStore::load(&CsvTripSource::from_path("gig_work_data.csv"), &calculator)?;
//!
//!     let criteria = store.full_range_criteria()?;
//!     let trips = store.query(&criteria)?;
//!     let result = Aggregator::new().aggregate(&trips);
//!
//!     println!("True hourly wage: {:.2}", result.true_hourly_wage);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod output;

// Re-export the workspace crates under short names
pub use trueprofit_core::{aggregation_types, config, error, filters, types};
pub use trueprofit_costs as costs;
pub use trueprofit_generator as generator;
pub use trueprofit_store as store;

// Re-export commonly used types
pub use error::{Result, TrueProfitError};
pub use types::{Platform, TripDate, TripId, TripRecord};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
