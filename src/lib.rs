//! OddsEngine Library
//!
//! Odds conversion, wager return math, arbitrage stake distribution,
//! dropping-odds detection and betslip validation for a sports betting front end.

pub mod betslip;
pub mod common;
pub mod config;
pub mod feed;
pub mod odds;

// Re-export commonly used types
pub use common::errors::{EngineError, Result};
pub use common::traits::{FundsGateway, OddsSource};
pub use common::types::{DecimalOdds, MatchId, OddsFormat, Outcome};
pub use config::types::EngineConfig;

// Engine components
pub use betslip::{
    BetSlip, BetSlipManager, Confirmation, ConfirmationContext, ExistingBets, Selection,
    SelectionKey, Settlement, SlipPhase,
};
pub use feed::{FetchOutcome, OddsFeed, OddsFilter, Page};
pub use odds::{
    ArbitrageOpportunity, ArbitrageStakeDistributor, BettingCalculator, DropThreshold,
    DroppingOdds, MovementDetector, OddsConverter, OddsSnapshot, RawOdds, WagerReturn,
};
