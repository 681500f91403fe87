//! Odds math
//!
//! Pure, synchronous building blocks. Nothing in here holds state, so every
//! function is safe to call from any task without locking.
//!
//! # Components
//!
//! - [`OddsConverter`]: decimal / American / fractional conversion and display
//! - [`BettingCalculator`]: stake → return/profit for a single wager
//! - [`MovementDetector`]: percentage drop between two snapshots
//! - [`ArbitrageStakeDistributor`]: equal-return stake split across outcomes
//!
//! # Example
//!
//! ```ignore
//! use odds_engine::odds::{ArbitrageStakeDistributor, OddsConverter, RawOdds};
//! use odds_engine::OddsFormat;
//! use rust_decimal_macros::dec;
//!
//! let shown = OddsConverter::format_raw(&RawOdds::from("+150"), None, OddsFormat::Decimal);
//! assert_eq!(shown, "2.50");
//!
//! let arb = ArbitrageStakeDistributor::distribute(&[dec!(2.2), dec!(3.6), dec!(4.5)], dec!(100))?;
//! if arb.is_sure_bet() {
//!     println!("guaranteed {}", arb.guaranteed_return);
//! }
//! ```

pub mod arbitrage;
pub mod calculator;
pub mod converter;
pub mod movement;

pub use arbitrage::{ArbitrageOpportunity, ArbitrageStakeDistributor, BestPrice, BookmakerOdds};
pub use calculator::{BettingCalculator, WagerReturn};
pub use converter::{Fraction, OddsConverter, RawOdds};
pub use movement::{
    classify, compute_drop, DropThreshold, DroppingOdds, MovementDetector, MovementObservation,
    OddsSnapshot,
};
