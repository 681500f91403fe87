use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{ExistingBets, Selection, SelectionKey};
use crate::common::types::{MatchId, Outcome};

/// Ordered set of selections, unique by `(match_id, outcome)`
///
/// Every mutation consumes the slip and returns the next value, so state
/// transitions can be tested without any surrounding session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetSlip {
    selections: Vec<Selection>,
}

impl BetSlip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a selection, or remove it if the same match/outcome is already in
    pub fn add_or_toggle(mut self, selection: Selection) -> Self {
        let existing = self
            .selections
            .iter()
            .position(|s| s.matches(&selection.match_id, selection.outcome));

        match existing {
            Some(index) => {
                self.selections.remove(index);
            }
            None => self.selections.push(selection),
        }
        self
    }

    /// Remove a selection; unknown keys are ignored
    pub fn remove_selection(mut self, match_id: &MatchId, outcome: Outcome) -> Self {
        self.selections.retain(|s| !s.matches(match_id, outcome));
        self
    }

    /// Replace the stake text of exactly one selection
    ///
    /// The text is stored as typed; it is not checked until confirmation.
    pub fn set_stake(mut self, match_id: &MatchId, outcome: Outcome, stake: impl Into<String>) -> Self {
        if let Some(selection) = self
            .selections
            .iter_mut()
            .find(|s| s.matches(match_id, outcome))
        {
            selection.stake = stake.into();
        }
        self
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn get(&self, match_id: &MatchId, outcome: Outcome) -> Option<&Selection> {
        self.selections.iter().find(|s| s.matches(match_id, outcome))
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// True iff no match appears in more than one selection
    pub fn is_valid(&self) -> bool {
        self.conflicting_matches().is_empty()
    }

    /// Matches picked more than once, in slip order
    pub fn conflicting_matches(&self) -> Vec<MatchId> {
        let mut counts: HashMap<&MatchId, usize> = HashMap::new();
        for selection in &self.selections {
            *counts.entry(&selection.match_id).or_default() += 1;
        }

        let mut conflicts: Vec<MatchId> = Vec::new();
        for selection in &self.selections {
            if counts[&selection.match_id] > 1 && !conflicts.contains(&selection.match_id) {
                conflicts.push(selection.match_id.clone());
            }
        }
        conflicts
    }

    /// Selections that repeat an already placed bet
    pub fn duplicates_against(&self, existing: &ExistingBets) -> Vec<SelectionKey> {
        self.selections
            .iter()
            .filter(|s| is_duplicate_against_existing(existing, s))
            .map(Selection::key)
            .collect()
    }

    /// Sum of all stakes; text that is not a number counts as zero
    ///
    /// Saturates at the `Decimal` bounds, see [`Self::checked_total_stake`].
    pub fn compute_total_stake(&self) -> Decimal {
        self.stakes()
            .fold(Decimal::ZERO, |acc, stake| acc.saturating_add(stake))
    }

    /// Sum of all stakes, `None` when it does not fit in a `Decimal`
    pub fn checked_total_stake(&self) -> Option<Decimal> {
        self.stakes()
            .try_fold(Decimal::ZERO, |acc, stake| acc.checked_add(stake))
    }

    fn stakes(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.selections
            .iter()
            .map(|s| s.parsed_stake().unwrap_or(Decimal::ZERO))
    }

    /// Pooled preview shown before confirmation
    ///
    /// Total stake times the product of every selection's odds. This is not
    /// what confirmation settles (that is per selection, see
    /// [`crate::betslip::BetSlipManager::confirm`]); the two figures are
    /// intentionally kept apart. Saturates at `Decimal::MAX`.
    pub fn compute_aggregate_preview_return(&self) -> Decimal {
        let combined = self
            .selections
            .iter()
            .try_fold(Decimal::ONE, |acc, s| acc.checked_mul(s.odds.value()));

        combined
            .and_then(|odds| self.compute_total_stake().checked_mul(odds))
            .unwrap_or(Decimal::MAX)
    }
}

/// Whether `selection` repeats a bet the user already placed
pub fn is_duplicate_against_existing(existing: &ExistingBets, selection: &Selection) -> bool {
    existing.contains(&selection.key())
}
