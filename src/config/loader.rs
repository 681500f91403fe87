//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;
use std::str::FromStr;

use super::types::EngineConfig;
use crate::common::errors::{EngineError, Result};
use crate::common::types::OddsFormat;
use crate::odds::movement::DropThreshold;

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__, e.g. `APP__MOVEMENT__DEFAULT_THRESHOLD=30`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<EngineConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    let config: EngineConfig = config
        .try_deserialize()
        .map_err(|e| EngineError::Configuration(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

/// Load configuration from plain environment variables only
pub fn load_from_env() -> Result<EngineConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let mut config = EngineConfig::default();

    if let Ok(format) = std::env::var("ODDS_DISPLAY_FORMAT") {
        config.odds.display_format = OddsFormat::from_str(&format)?;
    }
    if let Ok(threshold) = std::env::var("ODDS_DROP_THRESHOLD") {
        let percent = threshold.trim().parse().map_err(|e| {
            EngineError::Configuration(format!("invalid ODDS_DROP_THRESHOLD: {}", e))
        })?;
        config.movement.default_threshold = DropThreshold::new(percent);
    }
    if let Ok(level) = std::env::var("ODDS_LOG_LEVEL") {
        config.settings.log_level = level;
    }

    validate(&config)?;
    Ok(config)
}

fn validate(config: &EngineConfig) -> Result<()> {
    if config.movement.threshold_presets.is_empty() {
        return Err(EngineError::Configuration(
            "at least one drop threshold preset is required".to_string(),
        ));
    }
    if config.arbitrage.default_total_stake <= rust_decimal::Decimal::ZERO {
        return Err(EngineError::Configuration(
            "default arbitrage stake must be positive".to_string(),
        ));
    }
    if config.feed.page_size == 0 {
        return Err(EngineError::Configuration(
            "page size must be positive".to_string(),
        ));
    }
    Ok(())
}
