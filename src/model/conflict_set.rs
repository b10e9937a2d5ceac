//! Ordered working set of assignments currently involved in a conflict.
//!
//! The set is traversed by the local search while the model keeps
//! invalidating entries reachable later in the same traversal. Entries are
//! therefore removed lazily: invalidation only *marks* an entry stale, and
//! the stale entry is physically dropped the next time a traversal reaches
//! it. A stale entry is never yielded as live.

use std::collections::BTreeMap;
use std::ops::Bound;

use super::decision::Decision;

/// Duplicate-free set of [`Decision`] entries in (week, group, player)
/// order, with lazy deletion.
#[derive(Debug, Clone, Default)]
pub struct ActiveConflictSet {
    // Value is the stale ("erased") flag.
    entries: BTreeMap<Decision, bool>,
}

impl ActiveConflictSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, or revives it if it is present but stale.
    pub fn insert(&mut self, decision: Decision) {
        self.entries.insert(decision, false);
    }

    /// Marks an entry stale if present. The entry stays in storage until a
    /// traversal visits it.
    pub fn mark_stale(&mut self, decision: &Decision) {
        if let Some(stale) = self.entries.get_mut(decision) {
            *stale = true;
        }
    }

    /// Returns the first live entry strictly after `cursor` (or from the
    /// start when `cursor` is `None`), physically dropping every stale
    /// entry encountered on the way.
    pub fn next_live_after(&mut self, cursor: Option<Decision>) -> Option<Decision> {
        let mut cursor = cursor;
        loop {
            let next = match cursor {
                None => self.entries.iter().next().map(|(d, &s)| (*d, s)),
                Some(c) => self
                    .entries
                    .range((Bound::Excluded(c), Bound::Unbounded))
                    .next()
                    .map(|(d, &s)| (*d, s)),
            };
            match next {
                None => return None,
                Some((decision, true)) => {
                    self.entries.remove(&decision);
                    cursor = Some(decision);
                }
                Some((decision, false)) => return Some(decision),
            }
        }
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of live entries.
    pub fn live_len(&self) -> usize {
        self.entries.values().filter(|&&stale| !stale).count()
    }

    /// True if the entry is present and not stale.
    pub fn is_live(&self, decision: &Decision) -> bool {
        matches!(self.entries.get(decision), Some(false))
    }

    /// True if the entry is present but marked stale.
    pub fn is_stale(&self, decision: &Decision) -> bool {
        matches!(self.entries.get(decision), Some(true))
    }

    /// Live entries in traversal order.
    pub fn iter_live(&self) -> impl Iterator<Item = &Decision> {
        self.entries
            .iter()
            .filter(|(_, &stale)| !stale)
            .map(|(d, _)| d)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
