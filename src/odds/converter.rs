use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::common::errors::{EngineError, Result};
use crate::common::types::{DecimalOdds, OddsFormat, MAX_DECIMAL_ODDS};

/// Smallest absolute moneyline accepted when inferring the format of raw input
const MIN_MONEYLINE_MAGNITUDE: Decimal = dec!(100);

/// Fractional odds are rounded to this many decimal places before reduction
const FRACTIONAL_PRECISION: u32 = 2;

/// Raw odds as handed over by a feed: either text of unknown format or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawOdds {
    Number(f64),
    Text(String),
}

impl From<&str> for RawOdds {
    fn from(value: &str) -> Self {
        RawOdds::Text(value.to_string())
    }
}

impl From<String> for RawOdds {
    fn from(value: String) -> Self {
        RawOdds::Text(value)
    }
}

impl From<f64> for RawOdds {
    fn from(value: f64) -> Self {
        RawOdds::Number(value)
    }
}

/// Reduced profit-to-stake ratio, e.g. `3/2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u64,
    pub denominator: u64,
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Conversion between decimal, American and fractional odds
///
/// Decimal is the canonical form; every other representation goes through it.
pub struct OddsConverter;

impl OddsConverter {
    /// Decimal → American
    ///
    /// `d >= 2.0` gives a positive line `(d - 1) * 100`, shorter prices give
    /// the negative line `-100 / (d - 1)`.
    pub fn decimal_to_american(odds: DecimalOdds) -> Decimal {
        let profit = odds.value() - Decimal::ONE;
        if odds.value() >= dec!(2) {
            profit * dec!(100)
        } else {
            dec!(-100) / profit
        }
    }

    /// American → decimal
    pub fn american_to_decimal(american: Decimal) -> Result<DecimalOdds> {
        if american.is_zero() {
            return Err(EngineError::InvalidOdds("moneyline of 0".to_string()));
        }
        let decimal = if american > Decimal::ZERO {
            american / dec!(100) + Decimal::ONE
        } else {
            dec!(100) / american.abs() + Decimal::ONE
        };
        DecimalOdds::new(decimal)
    }

    /// Decimal → fractional
    ///
    /// This is an approximation, not an exact rational reconstruction: the
    /// profit part `d - 1` is rounded half away from zero to 2 decimal places
    /// and `round((d - 1) * 100) / 100` is then reduced by its GCD. The
    /// denominator is therefore always a divisor of 100. `None` when the
    /// numerator does not fit in a `u64`.
    pub fn decimal_to_fractional(odds: DecimalOdds) -> Option<Fraction> {
        let scale = 10u64.pow(FRACTIONAL_PRECISION);
        let profit = (odds.value() - Decimal::ONE)
            .round_dp_with_strategy(FRACTIONAL_PRECISION, RoundingStrategy::MidpointAwayFromZero);
        let hundredths = profit.checked_mul(Decimal::from(scale))?.to_u64()?;
        let divisor = gcd(hundredths, scale).max(1);

        Some(Fraction {
            numerator: hundredths / divisor,
            denominator: scale / divisor,
        })
    }

    /// Fractional → decimal
    pub fn fractional_to_decimal(numerator: Decimal, denominator: Decimal) -> Result<DecimalOdds> {
        if denominator <= Decimal::ZERO || numerator < Decimal::ZERO {
            return Err(EngineError::InvalidOdds(format!(
                "{}/{} is not a valid fraction",
                numerator, denominator
            )));
        }
        DecimalOdds::new(numerator / denominator + Decimal::ONE)
    }

    /// Implied probability of a decimal price (`1 / d`)
    pub fn implied_probability(odds: DecimalOdds) -> Decimal {
        Decimal::ONE / odds.value()
    }

    /// Parse raw odds of unknown format into canonical decimal odds
    ///
    /// Placeholders (`""`, `"-"`, `"N/A"`), zero, NaN and anything outside
    /// 1.01..=1000 come back as `None`. A leading `+`/`-` marks a moneyline, `a/b` marks a
    /// fractional price, and bare numbers follow `source_format_guess`
    /// (decimal when no guess is given).
    pub fn to_decimal(raw: &RawOdds, source_format_guess: Option<OddsFormat>) -> Option<DecimalOdds> {
        let parsed = match raw {
            RawOdds::Text(text) => Self::parse_text(text, source_format_guess),
            RawOdds::Number(value) => Decimal::from_f64(*value)
                .and_then(|value| Self::interpret(value, false, source_format_guess)),
        }
        .filter(|odds| odds.value() <= MAX_DECIMAL_ODDS);

        if parsed.is_none() {
            debug!("Rejected raw odds {:?} (guess: {:?})", raw, source_format_guess);
        }
        parsed
    }

    /// Render decimal odds in the target format
    ///
    /// Missing/invalid odds render as an empty string. Callers rely on this to
    /// decide whether the odds control is clickable, so never return a
    /// placeholder like `"-"` here.
    pub fn format_in_format(odds: Option<DecimalOdds>, target: OddsFormat) -> String {
        let Some(odds) = odds else {
            return String::new();
        };

        match target {
            OddsFormat::Decimal => {
                let rounded = odds
                    .value()
                    .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
                format!("{:.2}", rounded)
            }
            OddsFormat::Moneyline => {
                let american = Self::decimal_to_american(odds)
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
                if american > Decimal::ZERO {
                    format!("+{}", american)
                } else {
                    american.to_string()
                }
            }
            OddsFormat::Fractional => Self::decimal_to_fractional(odds)
                .map(|fraction| fraction.to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse raw odds and render them in the target format in one step
    pub fn format_raw(
        raw: &RawOdds,
        source_format_guess: Option<OddsFormat>,
        target: OddsFormat,
    ) -> String {
        Self::format_in_format(Self::to_decimal(raw, source_format_guess), target)
    }

    fn parse_text(text: &str, guess: Option<OddsFormat>) -> Option<DecimalOdds> {
        let text = text.trim();
        if text.is_empty() || text == "-" || text.eq_ignore_ascii_case("n/a") {
            return None;
        }

        if let Some((numerator, denominator)) = text.split_once('/') {
            let numerator = Decimal::from_str(numerator.trim()).ok()?;
            let denominator = Decimal::from_str(denominator.trim()).ok()?;
            return Self::fractional_to_decimal(numerator, denominator).ok();
        }

        let signed = text.starts_with('+') || text.starts_with('-');
        let value = Decimal::from_str(text.trim_start_matches('+')).ok()?;
        Self::interpret(value, signed, guess)
    }

    fn interpret(value: Decimal, signed: bool, guess: Option<OddsFormat>) -> Option<DecimalOdds> {
        if value.is_zero() {
            return None;
        }

        match (signed, guess) {
            (true, _) | (false, Some(OddsFormat::Moneyline)) => {
                if value.abs() < MIN_MONEYLINE_MAGNITUDE {
                    return None;
                }
                Self::american_to_decimal(value).ok()
            }
            (false, Some(OddsFormat::Fractional)) => {
                Self::fractional_to_decimal(value, Decimal::ONE).ok()
            }
            (false, _) => DecimalOdds::checked(value),
        }
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}
