//! Core types, errors, and configuration for trueprofit
//!
//! This crate provides the foundational types used by every other
//! trueprofit crate: trip records and their derived financials, the
//! error taxonomy, the cost configuration, filter criteria, and the
//! aggregation result types handed to the presentation layer.

pub mod aggregation_types;
pub mod config;
pub mod error;
pub mod filters;
pub mod types;

// Re-export commonly used types
pub use config::{CommissionSchedule, CostConfig};
pub use error::{Result, TrueProfitError};
pub use filters::FilterCriteria;
pub use types::{Financials, Platform, RawTrip, TripDate, TripId, TripRecord};
