//! Job store: the record list of one batch run, keyed by [`JobId`].
//!
//! The orchestrator owns a store instead of process-wide state, so separate
//! runs (and tests) never share job status.

use std::collections::BTreeMap;

use crate::job::{JobId, JobRecord};

/// Ordered record storage. Iteration order is insertion order.
pub trait JobStore {
    /// Append a record and return its id.
    fn insert(&mut self, record: JobRecord) -> JobId;

    fn get(&self, id: JobId) -> Option<&JobRecord>;

    fn get_mut(&mut self, id: JobId) -> Option<&mut JobRecord>;

    /// All ids in insertion order.
    fn ids(&self) -> Vec<JobId>;

    /// All records in insertion order.
    fn records(&self) -> Vec<&JobRecord>;

    /// Drop every record (ids are not reused).
    fn clear(&mut self);

    fn len(&self) -> usize {
        self.ids().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory [`JobStore`].
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    next_id: JobId,
    records: BTreeMap<JobId, JobRecord>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for MemoryJobStore {
    fn insert(&mut self, record: JobRecord) -> JobId {
        let id = self.next_id;
        self.next_id += 1;
        self.records.insert(id, record);
        id
    }

    fn get(&self, id: JobId) -> Option<&JobRecord> {
        self.records.get(&id)
    }

    fn get_mut(&mut self, id: JobId) -> Option<&mut JobRecord> {
        self.records.get_mut(&id)
    }

    fn ids(&self) -> Vec<JobId> {
        self.records.keys().copied().collect()
    }

    fn records(&self) -> Vec<&JobRecord> {
        self.records.values().collect()
    }

    fn clear(&mut self) {
        self.records.clear();
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut store = MemoryJobStore::new();
        let a = store.insert(JobRecord::pending("http://a", 4));
        let b = store.insert(JobRecord::pending("http://b", 2));
        assert_eq!(store.ids(), vec![a, b]);
        let locators: Vec<_> = store.records().iter().map(|r| r.locator()).collect();
        assert_eq!(locators, ["http://a", "http://b"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut store = MemoryJobStore::new();
        let a = store.insert(JobRecord::pending("http://a", 1));
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(a).is_none());
        let b = store.insert(JobRecord::pending("http://b", 1));
        assert_ne!(a, b);
    }
}
