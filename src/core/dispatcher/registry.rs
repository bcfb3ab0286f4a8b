//! Timestamped key registry shared by all three dispatcher tables.
//!
//! A [`Registry`] maps a key to the instant it was recorded and knows its own
//! retention horizon. An entry younger than the horizon is *live* and blocks
//! admission; an entry older than the horizon is removed by [`Registry::sweep`].
//! An entry exactly at the horizon is no longer live but survives the sweep.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Key → timestamp map with a fixed retention horizon.
#[derive(Debug)]
pub struct Registry<K> {
    entries: HashMap<K, Instant>,
    horizon: Duration,
}

impl<K: Eq + Hash> Registry<K> {
    /// Creates an empty registry whose entries live for `horizon`.
    #[must_use]
    pub fn new(horizon: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            horizon,
        }
    }

    /// Returns the recorded instant for `key` if it is still live at `now`.
    pub fn live_since<Q>(&self, key: &Q, now: Instant) -> Option<Instant>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries
            .get(key)
            .copied()
            .filter(|at| now.saturating_duration_since(*at) < self.horizon)
    }

    /// Records `key` at `at`, replacing any previous timestamp.
    pub fn record(&mut self, key: K, at: Instant) {
        self.entries.insert(key, at);
    }

    /// Removes `key` unconditionally.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<Instant>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Removes `key` only if it is still the entry recorded at `at`.
    ///
    /// Returns `true` when an entry was removed.
    pub fn remove_if_recorded_at<Q>(&mut self, key: &Q, at: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        if self.entries.get(key) == Some(&at) {
            self.entries.remove(key);
            true
        } else {
            false
        }
    }

    /// Evicts every entry older than the horizon. Returns the number evicted.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let horizon = self.horizon;
        self.entries
            .retain(|_, at| now.saturating_duration_since(*at) <= horizon);
        before - self.entries.len()
    }

    /// Number of entries currently held, live or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HORIZON: Duration = Duration::from_secs(30);

    #[test]
    fn test_live_since_respects_horizon() {
        let start = Instant::now();
        let mut registry: Registry<String> = Registry::new(HORIZON);
        registry.record("msg-1".to_string(), start);

        assert_eq!(registry.live_since("msg-1", start), Some(start));
        assert_eq!(
            registry.live_since("msg-1", start + Duration::from_secs(29)),
            Some(start)
        );
        assert_eq!(registry.live_since("msg-1", start + HORIZON), None);
        assert_eq!(registry.live_since("missing", start), None);
    }

    #[test]
    fn test_sweep_evicts_only_expired_entries() {
        let start = Instant::now();
        let mut registry: Registry<&'static str> = Registry::new(HORIZON);
        registry.record("old", start);
        registry.record("edge", start + Duration::from_secs(10));
        registry.record("fresh", start + Duration::from_secs(35));

        let evicted = registry.sweep(start + Duration::from_secs(40));
        assert_eq!(evicted, 1);
        assert_eq!(registry.len(), 2);
        assert!(registry.live_since("old", start + Duration::from_secs(40)).is_none());

        // Sweeping again at the same instant changes nothing
        assert_eq!(registry.sweep(start + Duration::from_secs(40)), 0);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_if_recorded_at_ignores_newer_entry() {
        let start = Instant::now();
        let later = start + Duration::from_secs(31);
        let mut registry: Registry<&'static str> = Registry::new(HORIZON);
        registry.record("key", start);
        registry.record("key", later);

        assert!(!registry.remove_if_recorded_at("key", start));
        assert_eq!(registry.len(), 1);
        assert!(registry.remove_if_recorded_at("key", later));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_missing_key_is_noop() {
        let mut registry: Registry<String> = Registry::new(HORIZON);
        assert_eq!(registry.remove("nothing"), None);
        assert!(registry.is_empty());
    }
}
