//! In-memory rate set shared between the currency service and its callers.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use super::types::RateTable;

pub type SharedRateStore = Arc<RwLock<RateStore>>;

/// Current rate set plus the time of the last successful live fetch.
///
/// `last_updated` stays `None` until a live fetch succeeds; loading the
/// fallback table never touches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateStore {
    rates: RateTable,
    last_updated: Option<DateTime<Utc>>,
}

impl RateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedRateStore {
        Arc::new(RwLock::new(self))
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    /// Replace the whole rate set, keeping the last live timestamp.
    pub fn set(&mut self, rates: RateTable) {
        self.rates = rates;
    }

    /// Replace the whole rate set with live rates fetched at `updated_at`.
    pub fn set_live(&mut self, rates: RateTable, updated_at: DateTime<Utc>) {
        self.rates = rates;
        self.last_updated = Some(updated_at);
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::currency::types::fallback_rates;

    #[test]
    fn test_starts_empty() {
        let store = RateStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("USD"), None);
        assert_eq!(store.last_updated(), None);
    }

    #[test]
    fn test_set_keeps_timestamp() {
        let mut store = RateStore::new();
        let now = Utc::now();

        let mut live = RateTable::new();
        live.insert("USD".to_string(), 1.0);
        store.set_live(live, now);
        assert_eq!(store.last_updated(), Some(now));

        store.set(fallback_rates());
        assert_eq!(store.rates(), &fallback_rates());
        assert_eq!(store.last_updated(), Some(now));
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut store = RateStore::new();
        let mut first = RateTable::new();
        first.insert("SEK".to_string(), 10.0);
        store.set(first);

        store.set(fallback_rates());
        assert_eq!(store.get("SEK"), None);
        assert_eq!(store.get("EUR"), Some(0.92));
    }
}
