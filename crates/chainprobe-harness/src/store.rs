//! Latest-outcome store, keyed by scenario id.

use crate::outcome::Outcome;
use std::collections::HashMap;
use std::sync::Mutex;

/// Holds the most recent [`Outcome`] per scenario id.
///
/// Re-recording a scenario replaces its entry and leaves the others
/// untouched; no history is kept beyond the latest outcome. An absent
/// entry is the "not yet run" sentinel, distinct from any recorded
/// status. All operations hold the same mutex, so a reader never
/// observes a half-cleared store.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Mutex<HashMap<String, Outcome>>,
}

impl ResultStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for a scenario, overwriting any previous one.
    pub fn record(&self, id: &str, outcome: Outcome) {
        self.entries.lock().unwrap().insert(id.to_string(), outcome);
    }

    /// Returns the stored outcome, or `None` when the scenario has not
    /// run since the last reset.
    pub fn get(&self, id: &str) -> Option<Outcome> {
        self.entries.lock().unwrap().get(id).cloned()
    }

    /// Resets every entry to "not yet run".
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Returns a point-in-time copy of all entries, for aggregation.
    pub fn snapshot(&self) -> HashMap<String, Outcome> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of recorded outcomes.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
