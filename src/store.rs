//! Shared, subscribable in-memory stores for backend resources.
//!
//! One `ResourceStore<T>` exists per resource (see `CoreState`), so every
//! page reading patients sees the same list. Each store carries:
//! - the ordered records, each tagged with a local version
//! - `loading` / `error` flags
//! - a generation counter bumped by every local mutation
//! - a revision counter published on a `watch` channel for subscribers
//!
//! Fetch protocol: `begin_fetch()` hands out a ticket stamped with the
//! current generation; `finish_fetch()` applies the server list only if no
//! local mutation happened since the ticket was issued. A stale result is
//! dropped instead of overwriting a newer optimistic patch. A failed fetch
//! keeps the previous records and records the error.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tokio::sync::watch;

/// Backend record with a stable identifier.
pub trait Record: Clone + Send + Sync + 'static {
    fn record_id(&self) -> u64;
}

/// Record that can be matched by the client-side search box.
pub trait Searchable {
    /// `needle` is already lowercased and non-empty.
    fn matches(&self, needle: &str) -> bool;
}

/// Case-insensitive substring test used by `Searchable` impls.
pub fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

/// Same as `contains_ci` for optional fields; `None` never matches.
pub fn opt_contains_ci(haystack: Option<&str>, lowered_needle: &str) -> bool {
    haystack.is_some_and(|h| contains_ci(h, lowered_needle))
}

#[derive(Debug, Clone)]
struct Entry<T> {
    record: T,
    version: u64,
}

#[derive(Debug)]
struct StoreState<T> {
    entries: Vec<Entry<T>>,
    in_flight: usize,
    loaded: bool,
    error: Option<String>,
    generation: u64,
    next_version: u64,
}

impl<T> StoreState<T> {
    fn bump_version(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }
}

/// Proof that a fetch started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "pass the ticket back to finish_fetch"]
pub struct FetchTicket {
    generation: u64,
}

/// What `finish_fetch` did with the server response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    /// A local mutation landed while the request was in flight.
    Stale,
    Failed,
}

/// Ordered collection of records for one resource.
#[derive(Debug)]
pub struct ResourceStore<T: Record> {
    name: &'static str,
    state: RwLock<StoreState<T>>,
    revision: watch::Sender<u64>,
}

impl<T: Record> ResourceStore<T> {
    pub fn new(name: &'static str) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            name,
            state: RwLock::new(StoreState {
                entries: Vec::new(),
                in_flight: 0,
                loaded: false,
                error: None,
                generation: 0,
                next_version: 0,
            }),
            revision,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    // ── Reads ───────────────────────────────────────────────

    pub fn items(&self) -> Vec<T> {
        self.read().entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: u64) -> Option<T> {
        self.read()
            .entries
            .iter()
            .find(|e| e.record.record_id() == id)
            .map(|e| e.record.clone())
    }

    /// Local version of a record; changes whenever the record is replaced.
    pub fn version(&self, id: u64) -> Option<u64> {
        self.read()
            .entries
            .iter()
            .find(|e| e.record.record_id() == id)
            .map(|e| e.version)
    }

    pub fn is_loading(&self) -> bool {
        self.read().in_flight > 0
    }

    /// Whether at least one fetch has been applied.
    pub fn is_loaded(&self) -> bool {
        self.read().loaded
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    // ── Fetch protocol ──────────────────────────────────────

    pub fn begin_fetch(&self) -> FetchTicket {
        let ticket = {
            let mut state = self.write();
            state.in_flight += 1;
            FetchTicket {
                generation: state.generation,
            }
        };
        self.publish();
        ticket
    }

    pub fn finish_fetch(&self, ticket: FetchTicket, result: Result<Vec<T>, String>) -> FetchOutcome {
        let outcome = {
            let mut state = self.write();
            state.in_flight = state.in_flight.saturating_sub(1);

            match result {
                Err(message) => {
                    state.error = Some(message);
                    FetchOutcome::Failed
                }
                Ok(_) if ticket.generation != state.generation => FetchOutcome::Stale,
                Ok(records) => {
                    let mut entries = Vec::with_capacity(records.len());
                    for record in records {
                        let version = state.bump_version();
                        entries.push(Entry { record, version });
                    }
                    state.entries = entries;
                    state.loaded = true;
                    state.error = None;
                    FetchOutcome::Applied
                }
            }
        };

        match outcome {
            FetchOutcome::Stale => {
                tracing::debug!(store = self.name, "Dropped stale fetch result")
            }
            FetchOutcome::Failed => tracing::warn!(store = self.name, "Fetch failed"),
            FetchOutcome::Applied => {}
        }
        self.publish();
        outcome
    }

    // ── Local mutations (optimistic patches) ───────────────

    /// Append a record, or replace it in place if the id is already held.
    pub fn upsert(&self, record: T) {
        {
            let mut state = self.write();
            let version = state.bump_version();
            state.generation += 1;
            let id = record.record_id();
            match state.entries.iter_mut().find(|e| e.record.record_id() == id) {
                Some(entry) => *entry = Entry { record, version },
                None => state.entries.push(Entry { record, version }),
            }
            state.error = None;
        }
        self.publish();
    }

    /// Apply `f` to the record with `id`. Returns false when absent.
    pub fn update_with(&self, id: u64, f: impl FnOnce(&mut T)) -> bool {
        let found = {
            let mut state = self.write();
            let version = state.bump_version();
            match state.entries.iter_mut().find(|e| e.record.record_id() == id) {
                Some(entry) => {
                    f(&mut entry.record);
                    entry.version = version;
                    state.generation += 1;
                    state.error = None;
                    true
                }
                None => false,
            }
        };
        if found {
            self.publish();
        }
        found
    }

    /// Remove the record with `id`. Returns false when absent.
    pub fn remove(&self, id: u64) -> bool {
        let removed = {
            let mut state = self.write();
            let before = state.entries.len();
            state.entries.retain(|e| e.record.record_id() != id);
            let removed = state.entries.len() != before;
            if removed {
                state.generation += 1;
                state.error = None;
            }
            removed
        };
        if removed {
            self.publish();
        }
        removed
    }

    pub fn set_error(&self, message: Option<String>) {
        self.write().error = message;
        self.publish();
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState<T>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl<T: Record + Searchable> ResourceStore<T> {
    /// Pure client-side filter over held records.
    ///
    /// Blank terms return everything; no network access.
    pub fn search(&self, term: &str) -> Vec<T> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self.items();
        }
        self.read()
            .entries
            .iter()
            .filter(|e| e.record.matches(&needle))
            .map(|e| e.record.clone())
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════
// Slot — single-value variant (dashboard, own profile)
// ═══════════════════════════════════════════════════════════

#[derive(Debug)]
struct SlotState<T> {
    value: Option<T>,
    in_flight: usize,
    error: Option<String>,
}

/// Single shared value with the same loading/error semantics as a store.
#[derive(Debug)]
pub struct Slot<T: Clone + Send + Sync + 'static> {
    name: &'static str,
    state: RwLock<SlotState<T>>,
    revision: watch::Sender<u64>,
}

impl<T: Clone + Send + Sync + 'static> Slot<T> {
    pub fn new(name: &'static str) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            name,
            state: RwLock::new(SlotState {
                value: None,
                in_flight: 0,
                error: None,
            }),
            revision,
        }
    }

    pub fn get(&self) -> Option<T> {
        self.read().value.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read().in_flight > 0
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn begin(&self) {
        {
            let mut state = self.write();
            state.in_flight += 1;
            state.error = None;
        }
        self.publish();
    }

    /// End a request. `Ok(Some)` replaces the value, `Ok(None)` keeps it,
    /// `Err` keeps it and records the message.
    pub fn finish(&self, result: Result<Option<T>, String>) {
        {
            let mut state = self.write();
            state.in_flight = state.in_flight.saturating_sub(1);
            match result {
                Ok(Some(value)) => {
                    state.value = Some(value);
                    state.error = None;
                }
                Ok(None) => {}
                Err(message) => {
                    tracing::warn!(slot = self.name, error = %message, "Request failed");
                    state.error = Some(message);
                }
            }
        }
        self.publish();
    }

    pub fn set(&self, value: T) {
        self.write().value = Some(value);
        self.publish();
    }

    /// Apply `f` to the held value, if any. Returns false when empty.
    pub fn update_with(&self, f: impl FnOnce(&mut T)) -> bool {
        let updated = match self.write().value.as_mut() {
            Some(value) => {
                f(value);
                true
            }
            None => false,
        };
        if updated {
            self.publish();
        }
        updated
    }

    pub fn set_error(&self, message: Option<String>) {
        self.write().error = message;
        self.publish();
    }

    fn read(&self) -> RwLockReadGuard<'_, SlotState<T>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SlotState<T>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u64,
        label: String,
    }

    impl Item {
        fn new(id: u64, label: &str) -> Self {
            Self {
                id,
                label: label.into(),
            }
        }
    }

    impl Record for Item {
        fn record_id(&self) -> u64 {
            self.id
        }
    }

    impl Searchable for Item {
        fn matches(&self, needle: &str) -> bool {
            contains_ci(&self.label, needle)
        }
    }

    fn loaded_store() -> ResourceStore<Item> {
        let store = ResourceStore::new("items");
        let ticket = store.begin_fetch();
        store.finish_fetch(
            ticket,
            Ok(vec![Item::new(1, "Dupont"), Item::new(2, "Martin"), Item::new(3, "Durand")]),
        );
        store
    }

    #[test]
    fn empty_search_returns_everything() {
        let store = loaded_store();
        assert_eq!(store.search(""), store.items());
        assert_eq!(store.search("   ").len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let store = loaded_store();
        let found = store.search("DU");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|i| i.label.starts_with("Du")));
    }

    #[test]
    fn failed_fetch_keeps_previous_records() {
        let store = loaded_store();
        let before = store.items();

        let ticket = store.begin_fetch();
        assert!(store.is_loading());
        let outcome = store.finish_fetch(ticket, Err("Une erreur est survenue".into()));

        assert_eq!(outcome, FetchOutcome::Failed);
        assert_eq!(store.items(), before);
        assert_eq!(store.error().as_deref(), Some("Une erreur est survenue"));
        assert!(!store.is_loading());
    }

    #[test]
    fn successful_fetch_clears_error() {
        let store = loaded_store();
        store.set_error(Some("boom".into()));
        let ticket = store.begin_fetch();
        store.finish_fetch(ticket, Ok(vec![Item::new(9, "Nouveau")]));
        assert!(store.error().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn fetch_started_before_mutation_is_stale() {
        let store = loaded_store();
        let ticket = store.begin_fetch();
        store.upsert(Item::new(4, "Bernard"));

        let outcome = store.finish_fetch(ticket, Ok(vec![Item::new(1, "Dupont")]));
        assert_eq!(outcome, FetchOutcome::Stale);
        assert_eq!(store.len(), 4);
        assert!(!store.is_loading());
    }

    #[test]
    fn overlapping_fetches_last_applied_wins() {
        let store = ResourceStore::new("items");
        let first = store.begin_fetch();
        let second = store.begin_fetch();

        store.finish_fetch(second, Ok(vec![Item::new(2, "second")]));
        assert!(store.is_loading());
        store.finish_fetch(first, Ok(vec![Item::new(1, "first")]));

        assert_eq!(store.items(), vec![Item::new(1, "first")]);
        assert!(!store.is_loading());
    }

    #[test]
    fn upsert_replaces_and_bumps_version() {
        let store = loaded_store();
        let v1 = store.version(2).unwrap();
        store.upsert(Item::new(2, "Martin-Leroy"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(2).unwrap().label, "Martin-Leroy");
        assert!(store.version(2).unwrap() > v1);
    }

    #[test]
    fn update_with_and_remove() {
        let store = loaded_store();
        assert!(store.update_with(3, |i| i.label = "Durand-Petit".into()));
        assert!(!store.update_with(42, |_| {}));
        assert_eq!(store.get(3).unwrap().label, "Durand-Petit");

        assert!(store.remove(1));
        assert!(!store.remove(1));
        let ids: Vec<_> = store.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn subscribers_see_revisions() {
        let store = loaded_store();
        let mut rx = store.subscribe();
        let seen = *rx.borrow_and_update();
        store.upsert(Item::new(5, "Petit"));
        assert!(rx.has_changed().unwrap());
        assert!(*rx.borrow() > seen);
    }

    #[test]
    fn slot_keeps_value_on_error() {
        let slot: Slot<String> = Slot::new("profil");
        slot.begin();
        slot.finish(Ok(Some("v1".into())));
        slot.begin();
        assert!(slot.is_loading());
        slot.finish(Err("échec".into()));

        assert_eq!(slot.get().as_deref(), Some("v1"));
        assert_eq!(slot.error().as_deref(), Some("échec"));
        assert!(!slot.is_loading());
    }

    #[test]
    fn opt_contains_handles_none() {
        assert!(!opt_contains_ci(None, "a"));
        assert!(opt_contains_ci(Some("Abc"), "bc"));
    }
}
