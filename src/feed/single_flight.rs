use tokio::sync::watch;
use tracing::debug;

/// Fires when the flight it belongs to is superseded
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancelled; never resolves for a flight that finishes normally
    pub async fn cancelled(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Handle for one started flight
#[derive(Debug)]
pub struct FlightTicket<K> {
    key: K,
    id: u64,
    pub token: CancelToken,
}

impl<K> FlightTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct InFlight<K> {
    key: K,
    id: u64,
    cancel: watch::Sender<bool>,
}

/// At most one outstanding request per channel
///
/// Starting a flight for the key that is already in flight is refused.
/// Starting one for a different key cancels the outstanding one, whose result
/// must then be discarded.
#[derive(Debug)]
pub struct SingleFlight<K> {
    current: Option<InFlight<K>>,
    next_id: u64,
}

impl<K> Default for SingleFlight<K> {
    fn default() -> Self {
        Self {
            current: None,
            next_id: 0,
        }
    }
}

impl<K: Clone + PartialEq + std::fmt::Debug> SingleFlight<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a flight for `key`, or `None` if that exact key is outstanding
    pub fn begin(&mut self, key: K) -> Option<FlightTicket<K>> {
        if let Some(current) = &self.current {
            if current.key == key {
                debug!("Suppressing duplicate request for {:?}", key);
                return None;
            }
            debug!("Cancelling request for {:?}, superseded by {:?}", current.key, key);
            let _ = current.cancel.send(true);
        }

        let (cancel, rx) = watch::channel(false);
        let id = self.next_id;
        self.next_id += 1;
        self.current = Some(InFlight {
            key: key.clone(),
            id,
            cancel,
        });

        Some(FlightTicket {
            key,
            id,
            token: CancelToken { rx },
        })
    }

    /// Close a flight; true when it was still the current one
    pub fn finish(&mut self, ticket: &FlightTicket<K>) -> bool {
        let released = self.release(ticket);
        if !released {
            debug!("Discarding stale result for {:?}", ticket.key);
        }
        released
    }

    /// Free the slot if `ticket` still owns it, without logging a stale result
    pub fn release(&mut self, ticket: &FlightTicket<K>) -> bool {
        match &self.current {
            Some(current) if current.id == ticket.id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_in_flight(&self, key: &K) -> bool {
        self.current.as_ref().is_some_and(|current| &current.key == key)
    }

    /// Cancel whatever is outstanding
    pub fn cancel(&mut self) {
        if let Some(current) = self.current.take() {
            let _ = current.cancel.send(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_key_is_suppressed() {
        let mut flights = SingleFlight::new();
        let ticket = flights.begin("page-0").unwrap();
        assert!(flights.begin("page-0").is_none());
        assert!(flights.is_in_flight(&"page-0"));

        assert!(flights.finish(&ticket));
        assert!(!flights.is_in_flight(&"page-0"));
        assert!(flights.begin("page-0").is_some());
    }

    #[test]
    fn test_new_key_cancels_and_discards_old() {
        let mut flights = SingleFlight::new();
        let first = flights.begin("drop-20").unwrap();
        let second = flights.begin("drop-30").unwrap();

        assert!(first.token.is_cancelled());
        assert!(!second.token.is_cancelled());
        assert!(!flights.finish(&first));
        assert!(flights.finish(&second));
    }

    #[test]
    fn test_explicit_cancel() {
        let mut flights = SingleFlight::new();
        let ticket = flights.begin(1u32).unwrap();
        flights.cancel();
        assert!(ticket.token.is_cancelled());
        assert!(!flights.finish(&ticket));
    }

    #[test]
    fn test_release_only_frees_own_slot() {
        let mut flights = SingleFlight::new();
        let first = flights.begin("drop-20").unwrap();
        let second = flights.begin("drop-30").unwrap();

        assert!(!flights.release(&first));
        assert!(flights.is_in_flight(&"drop-30"));
        assert!(flights.release(&second));
        assert!(!flights.is_in_flight(&"drop-30"));
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let mut flights = SingleFlight::new();
        let mut ticket = flights.begin(1u32).unwrap();
        flights.begin(2u32);
        tokio::time::timeout(std::time::Duration::from_secs(1), ticket.token.cancelled())
            .await
            .expect("token should fire");
    }
}
