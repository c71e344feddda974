use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Window after which an unconsumed confirmation stops validating.
pub const DEFAULT_CONFIRMATION_TTL: Duration = Duration::from_secs(10 * 60);

/// One pending (or consumed) confirmation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationEntry<P> {
    pub(super) token: String,
    pub(super) parameters: P,
    pub(super) created_at: Instant,
    pub(super) issued_at: DateTime<Utc>,
    pub(super) consumed: bool,
}

impl<P> ConfirmationEntry<P> {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Snapshot of the parameters taken at proposal time.
    pub fn parameters(&self) -> &P {
        &self.parameters
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Wall-clock issue time, for display only. Expiry uses [`Self::created_at`].
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Wall-clock time after which the entry no longer validates.
    pub fn expires_at(&self, ttl: Duration) -> DateTime<Utc> {
        chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.issued_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// In-memory registry of confirmations for a single action kind.
///
/// Every action kind owns its own store, so a token issued for one kind is
/// unknown to every other. Entries are only reachable by token; nothing lists
/// them back to a caller.
pub struct ConfirmationStore<P> {
    kind: &'static str,
    ttl: Duration,
    entries: Mutex<HashMap<String, ConfirmationEntry<P>>>,
}

impl<P: Clone> ConfirmationStore<P> {
    pub fn new(kind: &'static str) -> Self {
        Self::with_ttl(kind, DEFAULT_CONFIRMATION_TTL)
    }

    pub fn with_ttl(kind: &'static str, ttl: Duration) -> Self {
        Self {
            kind,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Human-readable action kind this store protects.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Insert a fresh pending entry for `parameters` and return a copy of it.
    pub fn create(&self, parameters: P) -> ConfirmationEntry<P> {
        self.create_at(parameters, Instant::now())
    }

    /// [`Self::create`] with an explicit monotonic timestamp.
    ///
    /// Entries past their window, consumed or not, are dropped first.
    pub fn create_at(&self, parameters: P, now: Instant) -> ConfirmationEntry<P> {
        let ttl = self.ttl;
        let mut entries = self.lock();
        entries.retain(|_, entry| now.saturating_duration_since(entry.created_at) <= ttl);
        let mut token = Uuid::new_v4().to_string();
        while entries.contains_key(&token) {
            token = Uuid::new_v4().to_string();
        }
        let entry = ConfirmationEntry {
            token: token.clone(),
            parameters,
            created_at: now,
            issued_at: Utc::now(),
            consumed: false,
        };
        entries.insert(token, entry.clone());
        entry
    }

    pub fn get(&self, token: &str) -> Option<ConfirmationEntry<P>> {
        self.lock().get(token).cloned()
    }

    pub fn remove(&self, token: &str) -> Option<ConfirmationEntry<P>> {
        self.lock().remove(token)
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, HashMap<String, ConfirmationEntry<P>>> {
        // Entries stay consistent even if a holder panicked: every mutation is a
        // single insert, remove or flag write.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P> std::fmt::Debug for ConfirmationStore<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationStore")
            .field("kind", &self.kind)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_issues_unique_pending_entries() {
        let store = ConfirmationStore::new("test");
        let first = store.create(1_u32);
        let second = store.create(1_u32);

        assert_ne!(first.token(), second.token());
        assert!(!first.is_consumed());
        assert_eq!(store.get(first.token()).map(|entry| *entry.parameters()), Some(1));
    }

    #[test]
    fn tokens_are_uuid_v4() {
        let store = ConfirmationStore::new("test");
        let entry = store.create("x".to_string());
        let parsed = Uuid::parse_str(entry.token()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn remove_deletes_the_entry() {
        let store = ConfirmationStore::new("test");
        let entry = store.create(());
        assert!(store.remove(entry.token()).is_some());
        assert!(store.get(entry.token()).is_none());
        assert!(store.remove(entry.token()).is_none());
    }

    #[test]
    fn creating_an_entry_sweeps_expired_ones() {
        let ttl = Duration::from_secs(60);
        let store = ConfirmationStore::with_ttl("test", ttl);
        let start = Instant::now();
        let stale = store.create_at(1_u32, start);
        let fresh = store.create_at(2_u32, start + ttl + Duration::from_secs(1));

        assert!(store.get(stale.token()).is_none());
        assert!(store.get(fresh.token()).is_some());
    }

    #[test]
    fn expires_at_adds_the_window_to_the_issue_time() {
        let store = ConfirmationStore::new("test");
        let entry = store.create(());
        let window = entry.expires_at(DEFAULT_CONFIRMATION_TTL) - entry.issued_at();
        assert_eq!(window, chrono::Duration::minutes(10));
    }
}
