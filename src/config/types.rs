//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::types::OddsFormat;
use crate::odds::movement::DropThreshold;

/// Main engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Odds parsing/display settings
    #[serde(default)]
    pub odds: OddsSettings,
    /// Dropping-odds settings
    #[serde(default)]
    pub movement: MovementSettings,
    /// Arbitrage calculator settings
    #[serde(default)]
    pub arbitrage: ArbitrageSettings,
    /// Remote list settings
    #[serde(default)]
    pub feed: FeedSettings,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Odds display settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OddsSettings {
    /// Format odds are rendered in unless the user picks another
    #[serde(default)]
    pub display_format: OddsFormat,
    /// Format assumed for bare numbers in raw feeds (decimal when unset)
    #[serde(default)]
    pub source_format_guess: Option<OddsFormat>,
}

/// Dropping-odds settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementSettings {
    /// Thresholds offered to the user, in percent
    #[serde(default = "default_threshold_presets")]
    pub threshold_presets: Vec<DropThreshold>,
    /// Threshold used when none is selected
    #[serde(default)]
    pub default_threshold: DropThreshold,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            threshold_presets: default_threshold_presets(),
            default_threshold: DropThreshold::default(),
        }
    }
}

fn default_threshold_presets() -> Vec<DropThreshold> {
    vec![DropThreshold::TWENTY, DropThreshold::THIRTY, DropThreshold::FIFTY]
}

/// Arbitrage calculator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageSettings {
    /// Total stake pre-filled in the calculator
    #[serde(default = "default_total_stake")]
    pub default_total_stake: Decimal,
    /// Decimal places money amounts are shown with
    #[serde(default = "default_money_decimal_places")]
    pub money_decimal_places: u32,
}

impl Default for ArbitrageSettings {
    fn default() -> Self {
        Self {
            default_total_stake: default_total_stake(),
            money_decimal_places: default_money_decimal_places(),
        }
    }
}

fn default_total_stake() -> Decimal {
    dec!(100)
}

fn default_money_decimal_places() -> u32 {
    2
}

/// Remote list settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedSettings {
    /// Rows per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> u32 {
    20
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
