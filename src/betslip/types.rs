use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::common::types::{DecimalOdds, MatchId, Outcome};

/// Identity of a selection: one outcome of one match
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionKey {
    pub match_id: MatchId,
    pub outcome: Outcome,
}

impl SelectionKey {
    pub fn new(match_id: impl Into<MatchId>, outcome: Outcome) -> Self {
        Self {
            match_id: match_id.into(),
            outcome,
        }
    }
}

/// One outcome of one match picked for wagering
///
/// `stake` is kept as the user typed it. It is only parsed when totals are
/// computed or the slip is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub match_id: MatchId,
    pub outcome: Outcome,
    pub odds: DecimalOdds,
    pub stake: String,
    pub teams: String,
    pub league: String,
}

impl Selection {
    pub fn new(match_id: impl Into<MatchId>, outcome: Outcome, odds: DecimalOdds) -> Self {
        Self {
            match_id: match_id.into(),
            outcome,
            odds,
            stake: String::new(),
            teams: String::new(),
            league: String::new(),
        }
    }

    pub fn with_stake(mut self, stake: impl Into<String>) -> Self {
        self.stake = stake.into();
        self
    }

    pub fn with_fixture(mut self, teams: impl Into<String>, league: impl Into<String>) -> Self {
        self.teams = teams.into();
        self.league = league.into();
        self
    }

    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            match_id: self.match_id.clone(),
            outcome: self.outcome,
        }
    }

    pub fn matches(&self, match_id: &MatchId, outcome: Outcome) -> bool {
        &self.match_id == match_id && self.outcome == outcome
    }

    /// Parsed stake, `None` when the text is not a number
    pub fn parsed_stake(&self) -> Option<Decimal> {
        Decimal::from_str(self.stake.trim()).ok()
    }
}

/// Outcome keys of bets the user has already placed
pub type ExistingBets = HashSet<SelectionKey>;

/// Externally supplied facts needed to confirm a slip
#[derive(Debug, Clone, Default)]
pub struct ConfirmationContext {
    pub available_funds: Decimal,
    pub existing_bets: ExistingBets,
}

impl ConfirmationContext {
    pub fn new(available_funds: Decimal) -> Self {
        Self {
            available_funds,
            existing_bets: ExistingBets::new(),
        }
    }

    pub fn with_existing_bets(mut self, existing_bets: ExistingBets) -> Self {
        self.existing_bets = existing_bets;
        self
    }
}

/// Per-selection settlement record emitted on confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub key: SelectionKey,
    pub stake: Decimal,
    pub potential_return: Decimal,
    pub profit: Decimal,
    pub decimal_odds_used: DecimalOdds,
    pub settled_at: DateTime<Utc>,
}

/// Result of a successful confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub settlements: Vec<Settlement>,
    /// Grand total deducted from available funds
    pub total_stake: Decimal,
}

/// Lifecycle of a slip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlipPhase {
    Empty,
    /// Selections present, no two on the same match
    Valid,
    /// Selections present, at least one match picked twice
    Invalid,
    /// Local checks passed, waiting on the funds deduction
    Confirming,
    /// Last confirmation succeeded and the slip was cleared
    Settled,
    /// Last confirmation failed externally or was abandoned; slip kept
    Cancelled,
}
