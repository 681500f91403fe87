//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use odds_engine::feed::{OddsFilter, Page};
use odds_engine::odds::{ArbitrageOpportunity, DroppingOdds};
use odds_engine::{
    DecimalOdds, EngineError, FundsGateway, MatchId, OddsSource, Outcome, Result, Selection,
};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Build a selection with fixture details filled in
pub fn sample_selection(match_id: &str, outcome: Outcome, odds: Decimal, stake: &str) -> Selection {
    Selection::new(match_id, outcome, DecimalOdds::new(odds).unwrap())
        .with_stake(stake)
        .with_fixture("Arsenal vs Chelsea", "Premier League")
}

/// In-memory wallet that records deductions
#[derive(Default)]
pub struct FakeWallet {
    pub deductions: Mutex<Vec<Decimal>>,
    pub failure: Option<String>,
}

impl FakeWallet {
    pub fn failing(message: &str) -> Self {
        Self {
            deductions: Mutex::new(Vec::new()),
            failure: Some(message.to_string()),
        }
    }

    pub fn deducted(&self) -> Vec<Decimal> {
        self.deductions.lock().unwrap().clone()
    }
}

#[async_trait]
impl FundsGateway for FakeWallet {
    async fn deduct(&self, amount: Decimal) -> Result<()> {
        if let Some(message) = &self.failure {
            return Err(EngineError::ExternalFailure(message.clone()));
        }
        self.deductions.lock().unwrap().push(amount);
        Ok(())
    }
}

/// Odds source whose answers are held until `release` is notified
#[derive(Default)]
pub struct GatedSource {
    pub release: Notify,
    calls: AtomicUsize,
}

impl GatedSource {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OddsSource for GatedSource {
    async fn fetch_dropping(&self, filter: &OddsFilter) -> Result<Page<DroppingOdds>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(Page {
            items: Vec::new(),
            page: filter.page,
            size: filter.size,
            total: 0,
        })
    }

    async fn fetch_arbitrage(&self, filter: &OddsFilter) -> Result<Page<ArbitrageOpportunity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        if filter.page > 10 {
            return Err(EngineError::Source(format!("page {} out of range", filter.page)));
        }
        Ok(Page {
            items: Vec::new(),
            page: filter.page,
            size: filter.size,
            total: 0,
        })
    }
}

pub fn match_id(id: &str) -> MatchId {
    MatchId::from(id)
}
