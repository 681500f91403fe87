//! Error types for the engine

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{MatchId, Outcome};

/// Result type alias using our EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Non-numeric, empty, or below-minimum odds
    #[error("Invalid odds: {0}")]
    InvalidOdds(String),

    /// Zero, negative, or unparseable stake
    #[error("Invalid stake: {0}")]
    InvalidStake(String),

    /// Market shape cannot be priced (e.g. fewer than two outcomes)
    #[error("Invalid market: {0}")]
    InvalidMarket(String),

    /// The slip holds more than one selection for the same match
    #[error("Betslip contains multiple selections for match {match_id}")]
    SlipInvalid { match_id: MatchId },

    /// The user already holds a bet on this exact match and outcome
    #[error("A bet on {outcome} for match {match_id} has already been placed")]
    DuplicateExistingBet { match_id: MatchId, outcome: Outcome },

    /// Total stake exceeds the user's available funds
    #[error("Insufficient funds: stake {required} exceeds available {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    /// Funds deduction or persistence failed after local validation passed
    #[error("{0}")]
    ExternalFailure(String),

    /// Odds source (list fetch) errors
    #[error("Odds source error: {0}")]
    Source(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl EngineError {
    /// Whether the user can recover without retrying an external call
    pub fn is_locally_recoverable(&self) -> bool {
        !matches!(self, EngineError::ExternalFailure(_) | EngineError::Source(_))
    }
}
