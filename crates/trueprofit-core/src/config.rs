//! Cost model configuration
//!
//! The per-km vehicle rates and the platform commission schedule are plain
//! values passed into the derivation step, so several configurations can be
//! evaluated side by side. A configuration is assembled in layers: built-in
//! defaults, then an optional JSON file, then explicit overrides (usually CLI
//! flags).
//!
//! # Example
//!
//! ```
//! use trueprofit_core::config::CostConfig;
//! use rust_decimal_macros::dec;
//!
//! let config = CostConfig::from_json_str(r#"{ "fuel_cost_per_km": 0.15 }"#).unwrap();
//! assert_eq!(config.fuel_cost_per_km, dec!(0.15));
//! assert_eq!(config.maintenance_cost_per_km, dec!(0.08));
//! ```

use crate::error::{Result, TrueProfitError};
use crate::types::{Platform, decimal_serde, validate_commission};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Default fuel cost per kilometre
pub const DEFAULT_FUEL_COST_PER_KM: Decimal = dec!(0.12);
/// Default maintenance (wear and tear) cost per kilometre
pub const DEFAULT_MAINTENANCE_COST_PER_KM: Decimal = dec!(0.08);

/// Upper bound for either per-km rate
pub const MAX_COST_PER_KM: Decimal = dec!(1000);

/// Commission fractions keyed by platform
///
/// Lookups fall back to `fallback` for platforms without an explicit rate.
/// With no fallback, an unknown platform has no commission and the caller
/// must treat that as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct CommissionSchedule {
    rates: BTreeMap<Platform, Decimal>,
    fallback: Option<Decimal>,
}

impl Default for CommissionSchedule {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(Platform::new("Uber"), dec!(0.25));
        rates.insert(Platform::new("Lyft"), dec!(0.28));
        Self {
            rates,
            fallback: None,
        }
    }
}

impl CommissionSchedule {
    /// Create an empty schedule with no fallback
    pub fn empty() -> Self {
        Self {
            rates: BTreeMap::new(),
            fallback: None,
        }
    }

    /// Set the rate for a platform
    pub fn with_rate(mut self, platform: Platform, rate: Decimal) -> Result<Self> {
        validate_commission(rate)
            .map_err(|e| TrueProfitError::Config(format!("platform {platform}: {e}")))?;
        self.rates.insert(platform, rate);
        Ok(self)
    }

    /// Set the rate used for platforms without an explicit entry
    pub fn with_fallback(mut self, rate: Decimal) -> Result<Self> {
        validate_commission(rate)
            .map_err(|e| TrueProfitError::Config(format!("fallback: {e}")))?;
        self.fallback = Some(rate);
        Ok(self)
    }

    /// Commission for a platform, if one is configured
    pub fn rate_for(&self, platform: &Platform) -> Option<Decimal> {
        self.rates.get(platform).copied().or(self.fallback)
    }

    /// Platforms with an explicit rate, in label order
    pub fn platforms(&self) -> impl Iterator<Item = &Platform> {
        self.rates.keys()
    }

    /// The fallback rate, if any
    pub fn fallback(&self) -> Option<Decimal> {
        self.fallback
    }
}

/// Cost model applied when deriving trip financials
#[derive(Debug, Clone, PartialEq)]
pub struct CostConfig {
    /// Fuel cost per kilometre driven
    pub fuel_cost_per_km: Decimal,
    /// Maintenance cost per kilometre driven
    pub maintenance_cost_per_km: Decimal,
    /// Commission fractions per platform
    pub commissions: CommissionSchedule,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            fuel_cost_per_km: DEFAULT_FUEL_COST_PER_KM,
            maintenance_cost_per_km: DEFAULT_MAINTENANCE_COST_PER_KM,
            commissions: CommissionSchedule::default(),
        }
    }
}

/// On-disk configuration; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    fuel_cost_per_km: Option<f64>,
    maintenance_cost_per_km: Option<f64>,
    #[serde(default)]
    commissions: BTreeMap<String, f64>,
    fallback_commission: Option<f64>,
}

fn decimal_from_f64(field: &str, value: f64) -> Result<Decimal> {
    // f64 Display is the shortest round-trip form, so 0.12 parses as exactly 0.12
    decimal_serde::parse(&value.to_string())
        .ok_or_else(|| TrueProfitError::Config(format!("{field}: not a finite number")))
}

impl CostConfig {
    /// Create a configuration with the given per-km rates and default commissions
    pub fn new(fuel_cost_per_km: Decimal, maintenance_cost_per_km: Decimal) -> Result<Self> {
        let config = Self {
            fuel_cost_per_km,
            maintenance_cost_per_km,
            commissions: CommissionSchedule::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the commission schedule
    pub fn with_commissions(mut self, commissions: CommissionSchedule) -> Self {
        self.commissions = commissions;
        self
    }

    /// Combined vehicle cost per kilometre
    pub fn vehicle_cost_per_km(&self) -> Decimal {
        self.fuel_cost_per_km + self.maintenance_cost_per_km
    }

    /// Reject per-km rates outside [0, MAX_COST_PER_KM]
    pub fn validate(&self) -> Result<()> {
        for (field, rate) in [
            ("fuel_cost_per_km", self.fuel_cost_per_km),
            ("maintenance_cost_per_km", self.maintenance_cost_per_km),
        ] {
            if rate < Decimal::ZERO {
                return Err(TrueProfitError::Config(format!(
                    "{field} must be non-negative, got {rate}"
                )));
            }
            if rate > MAX_COST_PER_KM {
                return Err(TrueProfitError::Config(format!(
                    "{field} must be at most {MAX_COST_PER_KM}, got {rate}"
                )));
            }
        }
        Ok(())
    }

    /// Layer a JSON document over the defaults
    ///
    /// Commission entries in the document add to or replace the default
    /// schedule entry for the same platform.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let mut config = Self::default();

        if let Some(fuel) = file.fuel_cost_per_km {
            config.fuel_cost_per_km = decimal_from_f64("fuel_cost_per_km", fuel)?;
        }
        if let Some(maintenance) = file.maintenance_cost_per_km {
            config.maintenance_cost_per_km =
                decimal_from_f64("maintenance_cost_per_km", maintenance)?;
        }
        for (platform, rate) in file.commissions {
            let rate = decimal_from_f64(&format!("commissions.{platform}"), rate)?;
            config.commissions = config.commissions.with_rate(Platform::new(platform), rate)?;
        }
        if let Some(fallback) = file.fallback_commission {
            let rate = decimal_from_f64("fallback_commission", fallback)?;
            config.commissions = config.commissions.with_fallback(rate)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TrueProfitError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json_str(&contents)?;
        debug!("Loaded cost configuration from {}", path.display());
        Ok(config)
    }

    /// Build the effective configuration from CLI inputs
    ///
    /// Flags win over the file, the file wins over the defaults.
    pub fn from_cli(
        config_path: Option<&Path>,
        fuel_cost_per_km: Option<Decimal>,
        maintenance_cost_per_km: Option<Decimal>,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(fuel) = fuel_cost_per_km {
            config.fuel_cost_per_km = fuel;
        }
        if let Some(maintenance) = maintenance_cost_per_km {
            config.maintenance_cost_per_km = maintenance;
        }

        config.validate()?;
        debug!(
            "Cost model: fuel {}/km, maintenance {}/km",
            config.fuel_cost_per_km, config.maintenance_cost_per_km
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CostConfig::default();
        assert_eq!(config.fuel_cost_per_km, dec!(0.12));
        assert_eq!(config.maintenance_cost_per_km, dec!(0.08));
        assert_eq!(config.vehicle_cost_per_km(), dec!(0.20));
        assert_eq!(config.commissions.rate_for(&Platform::new("Uber")), Some(dec!(0.25)));
        assert_eq!(config.commissions.rate_for(&Platform::new("Lyft")), Some(dec!(0.28)));
        assert_eq!(config.commissions.rate_for(&Platform::new("Bolt")), None);
    }

    #[test]
    fn test_negative_rates_rejected() {
        assert!(CostConfig::new(dec!(-0.01), dec!(0.08)).is_err());
        assert!(CostConfig::new(dec!(0.12), dec!(-1)).is_err());
        assert!(CostConfig::new(dec!(0), dec!(0)).is_ok());
    }

    #[test]
    fn test_oversized_rates_rejected() {
        assert!(CostConfig::new(MAX_COST_PER_KM, dec!(0.08)).is_ok());
        let err = CostConfig::new(dec!(0.12), MAX_COST_PER_KM + dec!(1)).unwrap_err();
        assert!(err.to_string().contains("maintenance_cost_per_km"));
        assert!(CostConfig::from_cli(None, Some(dec!(100000000000000000000)), None).is_err());
    }

    #[test]
    fn test_commission_schedule_fallback() {
        let schedule = CommissionSchedule::empty()
            .with_rate(Platform::new("Bolt"), dec!(0.2))
            .unwrap()
            .with_fallback(dec!(0.3))
            .unwrap();

        assert_eq!(schedule.rate_for(&Platform::new("Bolt")), Some(dec!(0.2)));
        assert_eq!(schedule.rate_for(&Platform::new("DoorDash")), Some(dec!(0.3)));
        assert_eq!(schedule.platforms().count(), 1);
    }

    #[test]
    fn test_commission_schedule_rejects_out_of_range() {
        assert!(CommissionSchedule::empty().with_rate(Platform::new("X"), dec!(1)).is_err());
        assert!(CommissionSchedule::empty().with_fallback(dec!(-0.5)).is_err());
    }

    #[test]
    fn test_from_json_layers_over_defaults() {
        let config = CostConfig::from_json_str(
            r#"{
                "maintenance_cost_per_km": 0.1,
                "commissions": { "Bolt": 0.2, "Uber": 0.3 },
                "fallback_commission": 0.27
            }"#,
        )
        .unwrap();

        assert_eq!(config.fuel_cost_per_km, dec!(0.12));
        assert_eq!(config.maintenance_cost_per_km, dec!(0.1));
        assert_eq!(config.commissions.rate_for(&Platform::new("Uber")), Some(dec!(0.3)));
        assert_eq!(config.commissions.rate_for(&Platform::new("Lyft")), Some(dec!(0.28)));
        assert_eq!(config.commissions.rate_for(&Platform::new("Bolt")), Some(dec!(0.2)));
        assert_eq!(config.commissions.rate_for(&Platform::new("Other")), Some(dec!(0.27)));
    }

    #[test]
    fn test_from_json_rejects_unknown_fields() {
        let err = CostConfig::from_json_str(r#"{ "fuel": 0.1 }"#).unwrap_err();
        assert!(matches!(err, TrueProfitError::Json(_)));
    }

    #[test]
    fn test_from_cli_overrides() {
        let config = CostConfig::from_cli(None, Some(dec!(0.2)), None).unwrap();
        assert_eq!(config.fuel_cost_per_km, dec!(0.2));
        assert_eq!(config.maintenance_cost_per_km, dec!(0.08));

        assert!(CostConfig::from_cli(None, None, Some(dec!(-0.5))).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = CostConfig::from_file(Path::new("/nonexistent/trueprofit.json")).unwrap_err();
        assert!(matches!(err, TrueProfitError::Config(_)));
    }
}
