//! Trait definitions for external collaborators

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::Result;
use crate::feed::types::{OddsFilter, Page};
use crate::odds::arbitrage::ArbitrageOpportunity;
use crate::odds::movement::DroppingOdds;

/// Wallet/ledger service that moves money when a slip is confirmed
///
/// The engine validates locally first and only then calls `deduct`. A failure
/// here aborts the whole confirmation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundsGateway: Send + Sync {
    /// Deduct `amount` from the user's available funds
    async fn deduct(&self, amount: Decimal) -> Result<()>;
}

/// Remote provider of odds lists
///
/// Implementations typically wrap an HTTP API. The engine never constructs
/// these itself; see [`crate::feed::OddsFeed`] for the single-flight wrapper.
#[async_trait]
pub trait OddsSource: Send + Sync {
    /// Fetch dropping-odds rows matching the filter
    async fn fetch_dropping(&self, filter: &OddsFilter) -> Result<Page<DroppingOdds>>;

    /// Fetch pre-computed arbitrage rows matching the filter
    ///
    /// Rows must carry the same field set as locally computed
    /// [`ArbitrageOpportunity`] values.
    async fn fetch_arbitrage(&self, filter: &OddsFilter) -> Result<Page<ArbitrageOpportunity>>;
}
