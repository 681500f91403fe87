use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

use super::slip::BetSlip;
use super::types::{Confirmation, ConfirmationContext, Selection, Settlement, SlipPhase};
use crate::common::errors::{EngineError, Result};
use crate::common::traits::FundsGateway;
use crate::common::types::{MatchId, Outcome};
use crate::odds::calculator::BettingCalculator;

/// Owns one session's betslip and drives it through confirmation
///
/// Single writer: every operation takes `&mut self`. Hosts that share a
/// manager between threads wrap it in a mutex.
#[derive(Debug, Clone, Default)]
pub struct BetSlipManager {
    slip: BetSlip,
    /// Set while confirming and after a confirmation attempt; cleared on edit
    outcome: Option<SlipPhase>,
}

impl BetSlipManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slip(&self) -> &BetSlip {
        &self.slip
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SlipPhase {
        if let Some(phase) = self.outcome {
            return phase;
        }
        if self.slip.is_empty() {
            SlipPhase::Empty
        } else if self.slip.is_valid() {
            SlipPhase::Valid
        } else {
            SlipPhase::Invalid
        }
    }

    pub fn add_or_toggle(&mut self, selection: Selection) {
        self.apply(|slip| slip.add_or_toggle(selection));
    }

    pub fn remove_selection(&mut self, match_id: &MatchId, outcome: Outcome) {
        self.apply(|slip| slip.remove_selection(match_id, outcome));
    }

    pub fn set_stake(&mut self, match_id: &MatchId, outcome: Outcome, stake: impl Into<String>) {
        self.apply(|slip| slip.set_stake(match_id, outcome, stake));
    }

    pub fn is_valid(&self) -> bool {
        self.slip.is_valid()
    }

    pub fn compute_total_stake(&self) -> Decimal {
        self.slip.compute_total_stake()
    }

    pub fn compute_aggregate_preview_return(&self) -> Decimal {
        self.slip.compute_aggregate_preview_return()
    }

    /// Validate the slip and compute per-selection settlements
    ///
    /// Does not touch any state. Checks run in this order: duplicate match in
    /// the slip, bet already placed, stake, funds.
    pub fn validate(&self, ctx: &ConfirmationContext) -> Result<Confirmation> {
        if let Some(match_id) = self.slip.conflicting_matches().into_iter().next() {
            return Err(EngineError::SlipInvalid { match_id });
        }

        if let Some(key) = self.slip.duplicates_against(&ctx.existing_bets).into_iter().next() {
            return Err(EngineError::DuplicateExistingBet {
                match_id: key.match_id,
                outcome: key.outcome,
            });
        }

        let total_stake = self.slip.checked_total_stake().ok_or_else(|| {
            EngineError::InvalidStake("total stake is too large".to_string())
        })?;
        if total_stake <= Decimal::ZERO {
            return Err(EngineError::InvalidStake(
                "total stake must be greater than zero".to_string(),
            ));
        }

        let settled_at = Utc::now();
        let mut settlements = Vec::with_capacity(self.slip.len());
        for selection in self.slip.selections() {
            let stake = match selection.parsed_stake() {
                Some(stake) if stake > Decimal::ZERO => stake,
                _ => {
                    return Err(EngineError::InvalidStake(format!(
                        "stake {:?} for {} ({}) is not a positive amount",
                        selection.stake, selection.match_id, selection.outcome
                    )))
                }
            };

            let wager = BettingCalculator::calculate_with_odds(stake, selection.odds)?;
            settlements.push(Settlement {
                key: selection.key(),
                stake,
                potential_return: wager.total_return,
                profit: wager.profit,
                decimal_odds_used: wager.decimal_odds,
                settled_at,
            });
        }

        if total_stake > ctx.available_funds {
            return Err(EngineError::InsufficientFunds {
                required: total_stake,
                available: ctx.available_funds,
            });
        }

        Ok(Confirmation {
            settlements,
            total_stake,
        })
    }

    /// Confirm the slip
    ///
    /// Local checks run first and leave everything untouched on failure. Then
    /// the total is deducted through `gateway`; if that fails the slip is kept
    /// as is, no settlements are returned and the phase becomes `Cancelled`.
    /// Only after a successful deduction is the slip cleared.
    #[instrument(skip(self, ctx, gateway))]
    pub async fn confirm<G>(&mut self, ctx: &ConfirmationContext, gateway: &G) -> Result<Confirmation>
    where
        G: FundsGateway + ?Sized,
    {
        let confirmation = self.validate(ctx)?;
        let pending = PendingConfirmation::start(&mut self.outcome);
        debug!(
            "Deducting {} for {} selections",
            confirmation.total_stake,
            confirmation.settlements.len()
        );

        let deducted = gateway.deduct(confirmation.total_stake).await;
        drop(pending);

        if let Err(e) = deducted {
            warn!("Funds deduction failed, keeping betslip: {}", e);
            return Err(match e {
                EngineError::ExternalFailure(message) => EngineError::ExternalFailure(message),
                other => EngineError::ExternalFailure(other.to_string()),
            });
        }

        info!(
            "Confirmed betslip: {} selections, total stake {}",
            confirmation.settlements.len(),
            confirmation.total_stake
        );
        self.slip = BetSlip::new();
        self.outcome = Some(SlipPhase::Settled);
        Ok(confirmation)
    }

    fn apply(&mut self, f: impl FnOnce(BetSlip) -> BetSlip) {
        let slip = std::mem::take(&mut self.slip);
        self.slip = f(slip);
        self.outcome = None;
    }
}

/// Holds the `Confirming` phase while the deduction is pending
///
/// Dropping it leaves the phase at `Cancelled`, which also covers a confirm
/// future that is dropped before the gateway answers.
struct PendingConfirmation<'a> {
    outcome: &'a mut Option<SlipPhase>,
}

impl<'a> PendingConfirmation<'a> {
    fn start(outcome: &'a mut Option<SlipPhase>) -> Self {
        *outcome = Some(SlipPhase::Confirming);
        Self { outcome }
    }
}

impl Drop for PendingConfirmation<'_> {
    fn drop(&mut self) {
        *self.outcome = Some(SlipPhase::Cancelled);
    }
}
