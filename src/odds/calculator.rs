use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::converter::OddsConverter;
use crate::common::errors::{EngineError, Result};
use crate::common::types::DecimalOdds;

/// Outcome of a winning single wager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagerReturn {
    /// Stake plus winnings
    pub total_return: Decimal,
    /// Winnings only (`total_return - stake`)
    pub profit: Decimal,
    /// Decimal odds the figures were computed with
    pub decimal_odds: DecimalOdds,
}

/// Stake → return math for single wagers
pub struct BettingCalculator;

impl BettingCalculator {
    /// Return and profit for `stake` at decimal odds
    ///
    /// # Arguments
    /// * `stake` - Amount wagered, must be positive
    /// * `odds_decimal` - Decimal price, must be at least 1.01
    pub fn calculate_return(stake: Decimal, odds_decimal: Decimal) -> Result<WagerReturn> {
        let odds = DecimalOdds::new(odds_decimal)?;
        Self::calculate_with_odds(stake, odds)
    }

    /// Same as [`Self::calculate_return`] for odds that are already validated
    pub fn calculate_with_odds(stake: Decimal, odds: DecimalOdds) -> Result<WagerReturn> {
        if stake <= Decimal::ZERO {
            return Err(EngineError::InvalidStake(format!(
                "stake must be positive, got {}",
                stake
            )));
        }

        let total_return = stake.checked_mul(odds.value()).ok_or_else(|| {
            EngineError::InvalidStake(format!("return on stake {} does not fit", stake))
        })?;
        Ok(WagerReturn {
            total_return,
            profit: total_return - stake,
            decimal_odds: odds,
        })
    }

    /// Return and profit for `stake` at an American line
    ///
    /// The line is converted to decimal first; the decimal odds actually used
    /// are reported back for auditing.
    pub fn calculate_return_american(stake: Decimal, american: Decimal) -> Result<WagerReturn> {
        let odds = OddsConverter::american_to_decimal(american)?;
        Self::calculate_with_odds(stake, odds)
    }
}
