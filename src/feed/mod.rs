//! Single-flight refresh of remote odds lists
//!
//! Dropping-odds and arbitrage lists are fetched by an external
//! [`OddsSource`]. [`OddsFeed`] makes sure only one request per list is
//! outstanding: repeating the current filter is suppressed, and changing the
//! filter cancels the outstanding request so its late answer is never shown.

pub mod single_flight;
pub mod types;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, instrument};

use crate::common::errors::Result;
use crate::common::traits::OddsSource;
use crate::odds::arbitrage::ArbitrageOpportunity;
use crate::odds::movement::DroppingOdds;

pub use single_flight::{CancelToken, FlightTicket, SingleFlight};
pub use types::{FetchOutcome, OddsFilter, Page};

type Flights = Arc<Mutex<SingleFlight<OddsFilter>>>;

/// Cloneable handle around an odds source with one flight slot per list
pub struct OddsFeed<S> {
    source: Arc<S>,
    dropping: Flights,
    arbitrage: Flights,
}

impl<S> Clone for OddsFeed<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            dropping: self.dropping.clone(),
            arbitrage: self.arbitrage.clone(),
        }
    }
}

impl<S: OddsSource> OddsFeed<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            dropping: Flights::default(),
            arbitrage: Flights::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Refresh the dropping-odds list for `filter`
    #[instrument(skip(self))]
    pub async fn refresh_dropping(&self, filter: OddsFilter) -> Result<FetchOutcome<Page<DroppingOdds>>> {
        let fetch = self.source.fetch_dropping(&filter);
        run_single_flight(&self.dropping, filter.clone(), fetch).await
    }

    /// Refresh the arbitrage list for `filter`
    #[instrument(skip(self))]
    pub async fn refresh_arbitrage(
        &self,
        filter: OddsFilter,
    ) -> Result<FetchOutcome<Page<ArbitrageOpportunity>>> {
        let fetch = self.source.fetch_arbitrage(&filter);
        run_single_flight(&self.arbitrage, filter.clone(), fetch).await
    }

    /// Cancel any outstanding list requests
    pub fn cancel_all(&self) {
        lock(&self.dropping).cancel();
        lock(&self.arbitrage).cancel();
    }
}

/// Holds a flight slot until the request completes or its future is dropped
struct FlightGuard<'a> {
    flights: &'a Mutex<SingleFlight<OddsFilter>>,
    ticket: FlightTicket<OddsFilter>,
    finished: bool,
}

impl FlightGuard<'_> {
    /// True when the result is still wanted
    fn finish(mut self) -> bool {
        self.finished = true;
        lock(self.flights).finish(&self.ticket)
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished && lock(self.flights).release(&self.ticket) {
            debug!("Abandoned request for {:?} released", self.ticket.key());
        }
    }
}

async fn run_single_flight<T, F>(
    flights: &Mutex<SingleFlight<OddsFilter>>,
    key: OddsFilter,
    fetch: F,
) -> Result<FetchOutcome<T>>
where
    F: Future<Output = Result<T>>,
{
    let ticket = lock(flights).begin(key);
    let Some(ticket) = ticket else {
        return Ok(FetchOutcome::Suppressed);
    };
    let mut guard = FlightGuard {
        flights,
        ticket,
        finished: false,
    };

    let result = tokio::select! {
        result = fetch => result,
        _ = guard.ticket.token.cancelled() => {
            debug!("Superseded request cancelled");
            return Ok(FetchOutcome::Cancelled);
        }
    };

    if !guard.finish() {
        return Ok(FetchOutcome::Discarded);
    }

    result.map(FetchOutcome::Applied)
}

fn lock<K>(flights: &Mutex<SingleFlight<K>>) -> MutexGuard<'_, SingleFlight<K>> {
    flights.lock().unwrap_or_else(PoisonError::into_inner)
}
