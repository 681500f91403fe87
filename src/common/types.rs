//! Unified types used across the engine

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::EngineError;

/// Smallest decimal price a bookmaker can offer
pub const MIN_DECIMAL_ODDS: Decimal = dec!(1.01);

/// Largest decimal price accepted when parsing raw odds
pub const MAX_DECIMAL_ODDS: Decimal = dec!(1000);

/// Canonical odds value in decimal form
///
/// Always `>= 1.01`. There is no way to build one from an invalid price, so
/// "missing odds" is `None` at the call site rather than a silent `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DecimalOdds(Decimal);

impl DecimalOdds {
    /// Validate a decimal price
    pub fn new(value: Decimal) -> Result<Self, EngineError> {
        if value < MIN_DECIMAL_ODDS {
            return Err(EngineError::InvalidOdds(format!(
                "{} is below the minimum of {}",
                value, MIN_DECIMAL_ODDS
            )));
        }
        Ok(Self(value))
    }

    /// Validate a decimal price, discarding the reason
    pub fn checked(value: Decimal) -> Option<Self> {
        Self::new(value).ok()
    }

    /// The underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for DecimalOdds {
    type Error = EngineError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DecimalOdds> for Decimal {
    fn from(odds: DecimalOdds) -> Self {
        odds.0
    }
}

impl fmt::Display for DecimalOdds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Odds display/input convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OddsFormat {
    /// American odds, e.g. `+150` / `-200`
    #[serde(alias = "american")]
    Moneyline,
    /// Decimal odds, e.g. `2.50`
    #[default]
    Decimal,
    /// Fractional odds, e.g. `3/2`
    Fractional,
}

impl fmt::Display for OddsFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OddsFormat::Moneyline => write!(f, "moneyline"),
            OddsFormat::Decimal => write!(f, "decimal"),
            OddsFormat::Fractional => write!(f, "fractional"),
        }
    }
}

impl FromStr for OddsFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "moneyline" | "american" => Ok(OddsFormat::Moneyline),
            "decimal" => Ok(OddsFormat::Decimal),
            "fractional" => Ok(OddsFormat::Fractional),
            other => Err(EngineError::Configuration(format!(
                "unknown odds format: {}",
                other
            ))),
        }
    }
}

/// Outcome of a match market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// All outcomes of a three-way market in board order
    pub const ALL: [Outcome; 3] = [Outcome::Home, Outcome::Draw, Outcome::Away];

    /// Board label (`1`, `X`, `2`)
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Home => "1",
            Outcome::Draw => "X",
            Outcome::Away => "2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Home => write!(f, "home"),
            Outcome::Draw => write!(f, "draw"),
            Outcome::Away => write!(f, "away"),
        }
    }
}

impl FromStr for Outcome {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" | "1" => Ok(Outcome::Home),
            "draw" | "x" => Ok(Outcome::Draw),
            "away" | "2" => Ok(Outcome::Away),
            other => Err(EngineError::InvalidMarket(format!("unknown outcome: {}", other))),
        }
    }
}

/// Match identifier as handed over by the fixtures collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(String);

impl MatchId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MatchId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for MatchId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_odds_minimum() {
        assert!(DecimalOdds::new(dec!(1.01)).is_ok());
        assert!(DecimalOdds::new(dec!(1.00)).is_err());
        assert!(DecimalOdds::checked(dec!(0)).is_none());
    }

    #[test]
    fn test_decimal_odds_deserialize_rejects_low_price() {
        assert!(serde_json::from_str::<DecimalOdds>("\"2.5\"").is_ok());
        assert!(serde_json::from_str::<DecimalOdds>("\"1.0\"").is_err());
    }

    #[test]
    fn test_outcome_parsing_and_labels() {
        assert_eq!("X".parse::<Outcome>().unwrap(), Outcome::Draw);
        assert_eq!("away".parse::<Outcome>().unwrap(), Outcome::Away);
        assert_eq!(Outcome::Home.label(), "1");
        assert!("over".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_odds_format_aliases() {
        assert_eq!("American".parse::<OddsFormat>().unwrap(), OddsFormat::Moneyline);
        assert_eq!(OddsFormat::default(), OddsFormat::Decimal);
        let parsed: OddsFormat = serde_json::from_str("\"american\"").unwrap();
        assert_eq!(parsed, OddsFormat::Moneyline);
    }
}
