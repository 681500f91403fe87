use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::types::{DecimalOdds, MatchId, Outcome};

/// Minimum drop (in percent) for a movement to count as significant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropThreshold(Decimal);

impl DropThreshold {
    pub const TWENTY: DropThreshold = DropThreshold(dec!(20));
    pub const THIRTY: DropThreshold = DropThreshold(dec!(30));
    pub const FIFTY: DropThreshold = DropThreshold(dec!(50));

    pub fn new(percent: Decimal) -> Self {
        Self(percent)
    }

    pub fn percent(&self) -> Decimal {
        self.0
    }
}

impl Default for DropThreshold {
    fn default() -> Self {
        Self::TWENTY
    }
}

impl fmt::Display for DropThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Relative decrease from `previous` to `current`, in percent
///
/// `None` when `previous <= 0` or the ratio does not fit. A negative result means the odds lengthened;
/// use [`OddsSnapshot::is_drop`] before reporting it as movement.
pub fn compute_drop(previous: Decimal, current: Decimal) -> Option<Decimal> {
    if previous <= Decimal::ZERO {
        return None;
    }
    (previous - current)
        .checked_div(previous)?
        .checked_mul(dec!(100))
}

/// Whether a drop meets the threshold
pub fn classify(drop_percent: Decimal, threshold_percent: Decimal) -> bool {
    drop_percent >= threshold_percent
}

/// Previous/current odds for one outcome at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    pub previous: DecimalOdds,
    pub current: DecimalOdds,
    pub observed_at: DateTime<Utc>,
}

impl OddsSnapshot {
    pub fn new(previous: DecimalOdds, current: DecimalOdds) -> Self {
        Self {
            previous,
            current,
            observed_at: Utc::now(),
        }
    }

    pub fn drop_percent(&self) -> Decimal {
        // previous is always >= 1.01
        compute_drop(self.previous.value(), self.current.value()).unwrap_or(Decimal::ZERO)
    }

    /// True only when the odds actually shortened
    pub fn is_drop(&self) -> bool {
        self.current < self.previous
    }
}

/// Snapshot tagged with the match/outcome it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementObservation {
    pub match_id: MatchId,
    pub outcome: Outcome,
    pub teams: String,
    pub league: String,
    pub snapshot: OddsSnapshot,
}

/// A significant odds drop, as listed to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppingOdds {
    pub match_id: MatchId,
    pub outcome: Outcome,
    pub teams: String,
    pub league: String,
    pub previous: DecimalOdds,
    pub current: DecimalOdds,
    pub drop_percent: Decimal,
    pub observed_at: DateTime<Utc>,
}

/// Filters observations down to significant drops
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementDetector {
    threshold: DropThreshold,
}

impl MovementDetector {
    pub fn new(threshold: DropThreshold) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> DropThreshold {
        self.threshold
    }

    /// Whether a single snapshot is a significant drop
    pub fn is_significant(&self, snapshot: &OddsSnapshot) -> bool {
        snapshot.is_drop() && classify(snapshot.drop_percent(), self.threshold.percent())
    }

    /// Significant drops among `observations`, largest drop first
    pub fn detect(&self, observations: &[MovementObservation]) -> Vec<DroppingOdds> {
        let mut drops: Vec<DroppingOdds> = observations
            .iter()
            .filter(|obs| self.is_significant(&obs.snapshot))
            .map(|obs| DroppingOdds {
                match_id: obs.match_id.clone(),
                outcome: obs.outcome,
                teams: obs.teams.clone(),
                league: obs.league.clone(),
                previous: obs.snapshot.previous,
                current: obs.snapshot.current,
                drop_percent: obs.snapshot.drop_percent(),
                observed_at: obs.snapshot.observed_at,
            })
            .collect();

        drops.sort_by(|a, b| b.drop_percent.cmp(&a.drop_percent));
        drops
    }
}
