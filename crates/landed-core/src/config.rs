//! # Costing Configuration
//!
//! Parameters the engine needs but must not hard-code.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where a CostingConfig comes from                     │
//! │                                                                         │
//! │  1. Caller-built struct (highest priority)                             │
//! │     CostingConfig { freight_tax_rate: dec!(0.12), .. }                 │
//! │                                                                         │
//! │  2. TOML document handed in as a string                                │
//! │     CostingConfig::from_toml_str(&text)                                │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     freight_tax_rate = 0.18, money_decimal_places = 2                  │
//! │                                                                         │
//! │  The core never reads files or environment variables itself.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # costing.toml
//! freight_tax_rate = "0.18"   # fraction, gross = net × (1 + rate)
//! money_decimal_places = 2    # scale for tax and freight rounding
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CostingError, CostingResult};
use crate::money::MONEY_DECIMAL_PLACES;
use crate::DEFAULT_FREIGHT_TAX_RATE;

/// Largest money scale the engine accepts.
pub const MAX_DECIMAL_PLACES: u32 = 10;

/// Engine parameters, passed explicitly to every computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostingConfig {
    /// Freight GST as a fraction (0.18 = 18%).
    #[serde(default = "default_freight_tax_rate")]
    pub freight_tax_rate: Decimal,

    /// Decimal places money is rounded to where the engine rounds.
    #[serde(default = "default_money_decimal_places")]
    pub money_decimal_places: u32,
}

fn default_freight_tax_rate() -> Decimal {
    DEFAULT_FREIGHT_TAX_RATE
}

fn default_money_decimal_places() -> u32 {
    MONEY_DECIMAL_PLACES
}

impl Default for CostingConfig {
    fn default() -> Self {
        CostingConfig {
            freight_tax_rate: default_freight_tax_rate(),
            money_decimal_places: default_money_decimal_places(),
        }
    }
}

impl CostingConfig {
    /// Same defaults with a different freight rate.
    pub fn with_freight_tax_rate(mut self, rate: Decimal) -> Self {
        self.freight_tax_rate = rate;
        self
    }

    /// Parses and validates a TOML document.
    ///
    /// Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> CostingResult<Self> {
        let config: CostingConfig =
            toml::from_str(text).map_err(|e| CostingError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        debug!(
            freight_tax_rate = %config.freight_tax_rate,
            money_decimal_places = config.money_decimal_places,
            "Loaded costing config"
        );
        Ok(config)
    }

    /// Renders the config as TOML.
    pub fn to_toml_string(&self) -> CostingResult<String> {
        toml::to_string_pretty(self).map_err(|e| CostingError::InvalidConfig(e.to_string()))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CostingResult<()> {
        if self.freight_tax_rate < Decimal::ZERO {
            return Err(CostingError::InvalidConfig(format!(
                "freight_tax_rate must not be negative, got {}",
                self.freight_tax_rate
            )));
        }

        if self.money_decimal_places > MAX_DECIMAL_PLACES {
            return Err(CostingError::InvalidConfig(format!(
                "money_decimal_places must be at most {}, got {}",
                MAX_DECIMAL_PLACES, self.money_decimal_places
            )));
        }

        Ok(())
    }
}
