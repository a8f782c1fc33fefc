//! Trip financial derivation for trueprofit
//!
//! This crate turns raw trips into records carrying platform fees, net
//! earnings, vehicle costs and true profit under a given cost model.

pub mod profit_calculator;

pub use profit_calculator::ProfitCalculator;
