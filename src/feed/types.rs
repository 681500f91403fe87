use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::odds::movement::DropThreshold;

/// Parameter set for one odds list query
///
/// Two fetches are "the same request" when their filters compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OddsFilter {
    pub min_drop: DropThreshold,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    pub page: u32,
    pub size: u32,
}

impl OddsFilter {
    pub fn new(min_drop: DropThreshold, size: u32) -> Self {
        Self {
            min_drop,
            from: None,
            to: None,
            page: 0,
            size,
        }
    }

    pub fn with_dates(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// One page of a paginated list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        (u64::from(self.page) + 1) * u64::from(self.size) >= self.total
    }
}

/// What happened to a refresh request
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    /// Result belongs to the current filter and should be shown
    Applied(T),
    /// Same filter already in flight; nothing was sent
    Suppressed,
    /// A newer filter replaced this one before the source answered
    Cancelled,
    /// The source answered after being superseded; result dropped
    Discarded,
}

impl<T> FetchOutcome<T> {
    pub fn into_applied(self) -> Option<T> {
        match self {
            FetchOutcome::Applied(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: u32, size: u32, total: u64) -> Page<()> {
        Page {
            items: Vec::new(),
            page,
            size,
            total,
        }
    }

    #[test]
    fn test_is_last() {
        assert!(!page(0, 20, 45).is_last());
        assert!(page(2, 20, 45).is_last());
        assert!(page(0, 20, 0).is_last());
        assert!(!page(u32::MAX, 20, u64::MAX).is_last());
        assert!(page(u32::MAX, 1, u64::from(u32::MAX) + 1).is_last());
    }
}
