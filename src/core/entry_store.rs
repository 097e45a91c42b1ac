//! Ordered list of registered entries, newest first

use std::collections::HashSet;

use super::types::{Entry, EntryId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    entries: Vec<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Id for an entry created at `now_millis`
    ///
    /// Ids increase strictly: if the clock has not moved past the largest id
    /// in the store, the next id is `max + 1`. When `max` is already
    /// `i64::MAX` the first unused id at or below the clock is taken instead.
    pub fn next_id(&self, now_millis: i64) -> EntryId {
        match self.entries.iter().map(|entry| entry.id.0).max() {
            Some(max) if now_millis <= max => match max.checked_add(1) {
                Some(next) => EntryId(next),
                None => self.free_id_at_or_below(now_millis),
            },
            _ => EntryId(now_millis),
        }
    }

    fn free_id_at_or_below(&self, start: i64) -> EntryId {
        let used: HashSet<i64> = self.entries.iter().map(|entry| entry.id.0).collect();
        let mut candidate = start;
        while used.contains(&candidate) {
            candidate = candidate.wrapping_sub(1);
        }
        EntryId(candidate)
    }

    /// Insert at the head
    pub fn prepend(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
    }

    /// Remove by id, preserving the order of the rest
    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        let pos = self.entries.iter().position(|entry| entry.id == id)?;
        Some(self.entries.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Gender;

    fn entry(id: i64) -> Entry {
        Entry {
            id: EntryId(id),
            full_name: format!("Candidate {}", id),
            email: format!("c{}@x.com", id),
            phone: "1234567890".to_string(),
            gender: Gender::Male,
            skills: Default::default(),
            profile_pic: None,
            preview: None,
        }
    }

    #[test]
    fn test_next_id_uses_clock_when_ahead() {
        let store = EntryStore::from_entries(vec![entry(100)]);
        assert_eq!(store.next_id(250), EntryId(250));
        assert_eq!(EntryStore::new().next_id(5), EntryId(5));
    }

    #[test]
    fn test_next_id_never_collides() {
        let store = EntryStore::from_entries(vec![entry(300), entry(100)]);
        assert_eq!(store.next_id(300), EntryId(301));
        // Clock went backwards
        assert_eq!(store.next_id(50), EntryId(301));
    }

    #[test]
    fn test_next_id_at_i64_max_picks_unused_id() {
        let store = EntryStore::from_entries(vec![entry(i64::MAX)]);
        assert_eq!(store.next_id(1_000), EntryId(1_000));

        let store = EntryStore::from_entries(vec![entry(i64::MAX), entry(1_000), entry(999)]);
        assert_eq!(store.next_id(1_000), EntryId(998));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = EntryStore::from_entries(vec![entry(3), entry(2), entry(1)]);
        let removed = store.remove(EntryId(2)).unwrap();
        assert_eq!(removed.id, EntryId(2));
        let ids: Vec<_> = store.entries().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![3, 1]);

        assert!(store.remove(EntryId(42)).is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_prepend_puts_newest_first() {
        let mut store = EntryStore::new();
        store.prepend(entry(1));
        store.prepend(entry(2));
        assert_eq!(store.entries()[0].id, EntryId(2));
        assert_eq!(store.get(EntryId(1)).map(|e| e.id), Some(EntryId(1)));
    }
}
