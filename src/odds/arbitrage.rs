use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::common::errors::{EngineError, Result};
use crate::common::types::DecimalOdds;

/// Stake split across every outcome of a mutually exclusive market
///
/// This field set is also what remote sources return for pre-computed rows,
/// so both can be displayed interchangeably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// Best available odds per outcome
    pub odds_per_outcome: Vec<DecimalOdds>,
    pub total_stake: Decimal,
    /// Stake per outcome, same order as `odds_per_outcome`
    pub stake_per_outcome: Vec<Decimal>,
    /// Payout whichever outcome wins
    pub guaranteed_return: Decimal,
    /// Negative when the market carries a margin
    pub profit_percent: Decimal,
}

impl ArbitrageOpportunity {
    /// Sum of implied probabilities across outcomes
    pub fn inverse_probability_sum(&self) -> Decimal {
        self.odds_per_outcome
            .iter()
            .map(|odds| Decimal::ONE / odds.value())
            .sum()
    }

    /// True only when every outcome returns more than the total stake
    pub fn is_sure_bet(&self) -> bool {
        self.inverse_probability_sum() < Decimal::ONE
    }

    /// Money fields rounded for display
    pub fn rounded(&self, decimal_places: u32) -> Self {
        let round =
            |value: Decimal| value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero);

        Self {
            odds_per_outcome: self.odds_per_outcome.clone(),
            total_stake: round(self.total_stake),
            stake_per_outcome: self.stake_per_outcome.iter().copied().map(round).collect(),
            guaranteed_return: round(self.guaranteed_return),
            profit_percent: round(self.profit_percent),
        }
    }
}

/// Best price found for one outcome across bookmakers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestPrice {
    pub bookmaker: String,
    pub odds: DecimalOdds,
}

/// One bookmaker's prices for a market, indexed by outcome
///
/// `None` marks an outcome the bookmaker does not price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmakerOdds {
    pub bookmaker: String,
    pub odds: Vec<Option<DecimalOdds>>,
}

impl BookmakerOdds {
    pub fn new(bookmaker: impl Into<String>, odds: Vec<Option<DecimalOdds>>) -> Self {
        Self {
            bookmaker: bookmaker.into(),
            odds,
        }
    }
}

/// Guaranteed-return stake distribution for n-way markets
pub struct ArbitrageStakeDistributor;

impl ArbitrageStakeDistributor {
    /// Split `total_stake` so every outcome pays the same amount
    ///
    /// With `inv = Σ 1/o_i`, each outcome gets `T * (1/o_i) / inv` and pays
    /// `T / inv`. Works for any number of outcomes; the result is returned even
    /// when `inv >= 1`, check [`ArbitrageOpportunity::is_sure_bet`] before
    /// labelling it.
    pub fn distribute(odds: &[Decimal], total_stake: Decimal) -> Result<ArbitrageOpportunity> {
        if odds.len() < 2 {
            return Err(EngineError::InvalidMarket(format!(
                "need at least two outcomes, got {}",
                odds.len()
            )));
        }
        if total_stake <= Decimal::ZERO {
            return Err(EngineError::InvalidStake(format!(
                "total stake must be positive, got {}",
                total_stake
            )));
        }

        let odds_per_outcome = odds
            .iter()
            .map(|value| DecimalOdds::new(*value))
            .collect::<Result<Vec<_>>>()?;

        let inverse: Vec<Decimal> = odds_per_outcome
            .iter()
            .map(|odds| Decimal::ONE / odds.value())
            .collect();
        let inv_prob_sum: Decimal = inverse.iter().sum();

        let guaranteed_return = total_stake.checked_div(inv_prob_sum).ok_or_else(|| {
            EngineError::InvalidStake(format!("return on total stake {} does not fit", total_stake))
        })?;
        // Each share is at most `total_stake / inv_prob_sum`, which fits
        let stake_per_outcome = inverse
            .iter()
            .map(|inv| guaranteed_return * inv)
            .collect();

        Ok(ArbitrageOpportunity {
            odds_per_outcome,
            total_stake,
            stake_per_outcome,
            guaranteed_return,
            profit_percent: (Decimal::ONE / inv_prob_sum - Decimal::ONE) * dec!(100),
        })
    }

    /// Highest price per outcome across bookmakers
    ///
    /// Every bookmaker must list `outcomes` prices. Fails when some outcome has
    /// no price anywhere, since a partial market cannot be covered.
    pub fn best_odds(quotes: &[BookmakerOdds], outcomes: usize) -> Result<Vec<BestPrice>> {
        let mut best: Vec<Option<BestPrice>> = vec![None; outcomes];

        for quote in quotes {
            if quote.odds.len() != outcomes {
                return Err(EngineError::InvalidMarket(format!(
                    "{} lists {} prices for a {}-way market",
                    quote.bookmaker,
                    quote.odds.len(),
                    outcomes
                )));
            }
            for (slot, price) in best.iter_mut().zip(&quote.odds) {
                let Some(price) = price else { continue };
                if slot.as_ref().map_or(true, |current| *price > current.odds) {
                    *slot = Some(BestPrice {
                        bookmaker: quote.bookmaker.clone(),
                        odds: *price,
                    });
                }
            }
        }

        best.into_iter()
            .enumerate()
            .map(|(index, price)| {
                price.ok_or_else(|| {
                    EngineError::InvalidMarket(format!("no price for outcome {}", index))
                })
            })
            .collect()
    }

    /// Pick the best price per outcome, then distribute `total_stake`
    pub fn from_quotes(
        quotes: &[BookmakerOdds],
        outcomes: usize,
        total_stake: Decimal,
    ) -> Result<(Vec<BestPrice>, ArbitrageOpportunity)> {
        let best = Self::best_odds(quotes, outcomes)?;
        let odds: Vec<Decimal> = best.iter().map(|price| price.odds.value()).collect();
        let opportunity = Self::distribute(&odds, total_stake)?;
        Ok((best, opportunity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(value: Decimal) -> Option<DecimalOdds> {
        DecimalOdds::checked(value)
    }

    fn assert_close(a: Decimal, b: Decimal) {
        assert!((a - b).abs() < dec!(0.000000001), "{} != {}", a, b);
    }

    #[test]
    fn test_three_way_equal_returns() {
        let arb = ArbitrageStakeDistributor::distribute(&[dec!(2.1), dec!(3.4), dec!(4.0)], dec!(100))
            .unwrap();

        for (stake, odds) in arb.stake_per_outcome.iter().zip(&arb.odds_per_outcome) {
            assert_close(*stake * odds.value(), arb.guaranteed_return);
        }
        let stake_sum: Decimal = arb.stake_per_outcome.iter().sum();
        assert_close(stake_sum, dec!(100));

        let expected = (Decimal::ONE / arb.inverse_probability_sum() - Decimal::ONE) * dec!(100);
        assert_eq!(arb.profit_percent.round_dp(2), expected.round_dp(2));
        assert_eq!(arb.profit_percent.round_dp(2), dec!(-1.99));
        assert!(!arb.is_sure_bet());
    }

    #[test]
    fn test_sure_bet_detected() {
        let arb = ArbitrageStakeDistributor::distribute(&[dec!(2.2), dec!(3.6), dec!(4.5)], dec!(100))
            .unwrap();
        assert!(arb.is_sure_bet());
        assert!(arb.profit_percent > Decimal::ZERO);
        assert_eq!(arb.rounded(2).guaranteed_return, dec!(104.76));
        assert_eq!(
            arb.rounded(2).stake_per_outcome,
            vec![dec!(47.62), dec!(29.10), dec!(23.28)]
        );
    }

    #[test]
    fn test_two_way_market() {
        let arb = ArbitrageStakeDistributor::distribute(&[dec!(2.1), dec!(2.1)], dec!(100)).unwrap();
        assert_close(arb.guaranteed_return, dec!(105));
        assert_close(arb.profit_percent, dec!(5));
        assert_close(arb.stake_per_outcome[0], dec!(50));
    }

    #[test]
    fn test_invalid_inputs_propagate() {
        assert!(matches!(
            ArbitrageStakeDistributor::distribute(&[dec!(2.1), dec!(1.0), dec!(4.0)], dec!(100)),
            Err(EngineError::InvalidOdds(_))
        ));
        assert!(matches!(
            ArbitrageStakeDistributor::distribute(&[dec!(2.1), dec!(3.4)], Decimal::ZERO),
            Err(EngineError::InvalidStake(_))
        ));
        assert!(matches!(
            ArbitrageStakeDistributor::distribute(&[dec!(2.1)], dec!(100)),
            Err(EngineError::InvalidMarket(_))
        ));
        assert!(matches!(
            ArbitrageStakeDistributor::distribute(&[dec!(2.2), dec!(3.6), dec!(4.5)], Decimal::MAX),
            Err(EngineError::InvalidStake(_))
        ));
    }

    #[test]
    fn test_best_odds_across_bookmakers() {
        let quotes = vec![
            BookmakerOdds::new("alpha", vec![price(dec!(2.2)), price(dec!(3.1)), price(dec!(4.0))]),
            BookmakerOdds::new("beta", vec![price(dec!(2.0)), price(dec!(3.6)), None]),
            BookmakerOdds::new("gamma", vec![price(dec!(1.9)), price(dec!(3.2)), price(dec!(4.5))]),
        ];

        let (best, arb) = ArbitrageStakeDistributor::from_quotes(&quotes, 3, dec!(100)).unwrap();
        let books: Vec<&str> = best.iter().map(|p| p.bookmaker.as_str()).collect();
        assert_eq!(books, vec!["alpha", "beta", "gamma"]);
        assert!(arb.is_sure_bet());
    }

    #[test]
    fn test_best_odds_requires_every_outcome() {
        let quotes = vec![BookmakerOdds::new("alpha", vec![price(dec!(2.2)), None])];
        assert!(ArbitrageStakeDistributor::best_odds(&quotes, 2).is_err());

        let short = vec![BookmakerOdds::new("alpha", vec![price(dec!(2.2))])];
        assert!(ArbitrageStakeDistributor::best_odds(&short, 2).is_err());
    }
}
