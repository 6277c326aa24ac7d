use std::collections::HashMap;
use std::hash::Hash;
use std::time::Instant;

/// One-shot timers keyed by the entity they belong to.
///
/// Nothing runs on its own: the owner calls `drain_due` from its tick and
/// acts on the returned keys. Dropping the queue drops every pending timer,
/// so no timer can fire for an owner that has been torn down.
#[derive(Debug)]
pub struct TimerQueue<K> {
    deadlines: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> TimerQueue<K> {
    pub fn new() -> Self {
        Self {
            deadlines: HashMap::new(),
        }
    }

    /// Arms a timer for `key`, replacing any timer already armed for it.
    pub fn schedule(&mut self, key: K, deadline: Instant) {
        self.deadlines.insert(key, deadline);
    }

    /// Returns true if a pending timer was cancelled.
    pub fn cancel(&mut self, key: &K) -> bool {
        self.deadlines.remove(key).is_some()
    }

    pub fn cancel_all(&mut self) {
        self.deadlines.clear();
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.deadlines.contains_key(key)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Removes and returns every key whose deadline is at or before `now`,
    /// earliest first.
    pub fn drain_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, key.clone()))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);

        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    pub fn len(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deadlines.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for TimerQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}
