//! User settings for tripsplit
//!
//! Manages display preferences, the settlement tolerance and the default payer.

use serde::{Deserialize, Serialize};

use super::paths::TripsplitPaths;
use crate::error::TripsplitError;

/// Default tolerance used when comparing balances against zero
pub const DEFAULT_SETTLEMENT_EPSILON: f64 = 1e-6;

/// User settings for tripsplit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when formatting amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// ISO currency code, display only
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Tolerance for treating a balance as settled
    #[serde(default = "default_settlement_epsilon")]
    pub settlement_epsilon: f64,

    /// Payer used when `expense add` is called without `--payer`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_payer: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_settlement_epsilon() -> f64 {
    DEFAULT_SETTLEMENT_EPSILON
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency_symbol(),
            currency_code: default_currency_code(),
            date_format: default_date_format(),
            settlement_epsilon: default_settlement_epsilon(),
            default_payer: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &TripsplitPaths) -> Result<Self, TripsplitError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                TripsplitError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TripsplitError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TripsplitPaths) -> Result<(), TripsplitError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            TripsplitError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TripsplitError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the settlement engine cannot work with
    pub fn validate(&self) -> Result<(), TripsplitError> {
        if !self.settlement_epsilon.is_finite() || self.settlement_epsilon <= 0.0 {
            return Err(TripsplitError::Config(format!(
                "settlement_epsilon must be a positive number, got {}",
                self.settlement_epsilon
            )));
        }
        Ok(())
    }
}
