//! The list store
//!
//! Single source of truth for the active list, its display name and the
//! sample size. Every mutation is written through to the injected
//! [`Persistence`] backend before listeners are notified, so a restart
//! always sees the latest state.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::count::{parse_sample_count, CountError, SampleCount};
use crate::observe::{Listeners, Subscription};
use crate::persist::{PersistError, Persistence};

/// Record key the list store persists under
pub const LIST_STORE_KEY: &str = "list-store";

/// Persisted fields of the list store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListState {
    /// Display label; empty means none
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub items_per_select: SampleCount,
}

/// Read a record, falling back to defaults when it is missing or unreadable
///
/// Only a backend failure is an error; a malformed record is logged and
/// treated as absent.
pub(crate) fn load_record<T>(persistence: &dyn Persistence, key: &str) -> Result<T, PersistError>
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = persistence.load(key)? else {
        debug!(key, "no persisted record, using defaults");
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => {
            debug!(key, "rehydrated persisted record");
            Ok(value)
        }
        Err(e) => {
            warn!(key, error = %e, "discarding malformed persisted record");
            Ok(T::default())
        }
    }
}

/// Write a record through to the backend; failures are logged, not returned
pub(crate) fn save_record<T: Serialize>(persistence: &dyn Persistence, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(PersistError::from)
        .and_then(|raw| persistence.save(key, &raw));

    if let Err(e) = result {
        error!(key, error = %e, "failed to persist record");
    }
}

pub struct ListStore {
    state: ListState,
    persistence: Arc<dyn Persistence>,
    listeners: Listeners<ListState>,
}

impl ListStore {
    /// Open the store, rehydrating the last saved state
    ///
    /// # Example
    /// ```
    /// use list_selector::persist::MemoryStorage;
    /// use list_selector::store::ListStore;
    /// use std::sync::Arc;
    ///
    /// let store = ListStore::open(Arc::new(MemoryStorage::new())).unwrap();
    /// assert!(store.list().is_empty());
    /// assert_eq!(store.items_per_select().get(), 1);
    /// ```
    pub fn open(persistence: Arc<dyn Persistence>) -> Result<Self, PersistError> {
        let state = load_record(persistence.as_ref(), LIST_STORE_KEY)?;
        Ok(ListStore {
            state,
            persistence,
            listeners: Listeners::new(),
        })
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn filename(&self) -> &str {
        &self.state.filename
    }

    pub fn list(&self) -> &[String] {
        &self.state.list
    }

    pub fn items_per_select(&self) -> SampleCount {
        self.state.items_per_select
    }

    /// Replace the list wholesale; lines are kept exactly as given
    pub fn set_list(&mut self, lines: Vec<String>) {
        debug!(items = lines.len(), "set list");
        self.state.list = lines;
        self.commit();
    }

    pub fn set_filename(&mut self, name: impl Into<String>) {
        self.state.filename = name.into();
        debug!(filename = %self.state.filename, "set filename");
        self.commit();
    }

    pub fn set_items_per_select(&mut self, count: SampleCount) {
        debug!(%count, "set items per select");
        self.state.items_per_select = count;
        self.commit();
    }

    /// Set the sample size from raw text
    ///
    /// Invalid input leaves the previous value in place.
    pub fn set_items_per_select_input(&mut self, raw: &str) -> Result<SampleCount, CountError> {
        self.apply_count(parse_sample_count(raw), raw)
    }

    /// Set the sample size from a numeric field value, which may be NaN
    ///
    /// Invalid input leaves the previous value in place.
    pub fn set_items_per_select_number(&mut self, n: f64) -> Result<SampleCount, CountError> {
        self.apply_count(SampleCount::from_f64(n), &n.to_string())
    }

    fn apply_count(
        &mut self,
        parsed: Result<SampleCount, CountError>,
        raw: &str,
    ) -> Result<SampleCount, CountError> {
        match parsed {
            Ok(count) => {
                self.set_items_per_select(count);
                Ok(count)
            }
            Err(e) => {
                warn!(input = raw, error = %e, kept = %self.state.items_per_select, "rejected items per select");
                Err(e)
            }
        }
    }

    /// Reset filename, list and sample size to their defaults
    pub fn clear(&mut self) {
        debug!("clear list store");
        self.state = ListState::default();
        self.commit();
    }

    /// Register a listener called with the new state after every mutation
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&ListState) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    fn commit(&mut self) {
        save_record(self.persistence.as_ref(), LIST_STORE_KEY, &self.state);
        self.listeners.notify(&self.state);
    }
}

impl std::fmt::Debug for ListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStorage;
    use std::sync::Mutex;

    fn open(storage: &MemoryStorage) -> ListStore {
        ListStore::open(Arc::new(storage.clone())).unwrap()
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_without_record() {
        let store = open(&MemoryStorage::new());
        assert_eq!(store.state(), &ListState::default());
        assert_eq!(store.filename(), "");
    }

    #[test]
    fn test_set_list_keeps_blank_lines() {
        let mut store = open(&MemoryStorage::new());
        store.set_list(lines(&["a", "", "a", " b "]));
        assert_eq!(store.list(), lines(&["a", "", "a", " b "]).as_slice());
    }

    #[test]
    fn test_write_through_format() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        store.set_list(lines(&["a", "b"]));
        store.set_filename("mylist.txt");
        store.set_items_per_select(SampleCount::new(3).unwrap());

        let raw = storage.get(LIST_STORE_KEY).unwrap();
        assert_eq!(
            raw,
            r#"{"filename":"mylist.txt","list":["a","b"],"itemsPerSelect":3}"#
        );
    }

    #[test]
    fn test_invalid_count_keeps_prior_value() {
        let storage = MemoryStorage::new();
        let mut store = open(&storage);
        store.set_items_per_select_input("4").unwrap();

        assert_eq!(store.set_items_per_select_input("0"), Err(CountError::NotPositive));
        assert_eq!(store.set_items_per_select_number(f64::NAN), Err(CountError::NotANumber));
        assert_eq!(store.set_items_per_select_number(-3.0), Err(CountError::NotPositive));
        assert_eq!(store.items_per_select().get(), 4);

        let reopened = open(&storage);
        assert_eq!(reopened.items_per_select().get(), 4);
    }

    #[test]
    fn test_malformed_record_falls_back_to_defaults() {
        let storage = MemoryStorage::new();
        storage.insert(LIST_STORE_KEY, "not json");
        assert_eq!(open(&storage).state(), &ListState::default());

        storage.insert(
            LIST_STORE_KEY,
            r#"{"filename":"x.txt","list":["a"],"itemsPerSelect":0}"#,
        );
        assert_eq!(open(&storage).state(), &ListState::default());

        storage.insert(
            LIST_STORE_KEY,
            r#"{"filename":"x.txt","list":["a"],"itemsPerSelect":4294967295}"#,
        );
        assert_eq!(open(&storage).state(), &ListState::default());
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let storage = MemoryStorage::new();
        storage.insert(LIST_STORE_KEY, r#"{"list":["only"]}"#);
        let store = open(&storage);
        assert_eq!(store.list(), lines(&["only"]).as_slice());
        assert_eq!(store.filename(), "");
        assert_eq!(store.items_per_select(), SampleCount::ONE);
    }

    #[test]
    fn test_subscribers_see_each_mutation() {
        let mut store = open(&MemoryStorage::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen_clone = Arc::clone(&seen);
        let sub = store.subscribe(move |state| {
            seen_clone.lock().unwrap().push(state.list.len());
        });

        store.set_list(lines(&["a", "b"]));
        store.clear();
        drop(sub);
        store.set_list(lines(&["c"]));

        assert_eq!(*seen.lock().unwrap(), vec![2, 0]);
    }
}
