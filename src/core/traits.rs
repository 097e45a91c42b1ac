//! Core traits for the domain layer
//!
//! These traits define the interfaces that domain components depend on,
//! allowing infrastructure to be injected and tests to use fakes.

use super::errors::StorageError;
use super::types::Entry;

/// Key-value persistence for the entry list
///
/// One slot holds the whole ordered sequence; every save replaces it.
pub trait EntryPersistence {
    /// Load the stored entries, newest first. Empty when nothing was stored.
    fn load(&self) -> Result<Vec<Entry>, StorageError>;

    /// Replace the stored entries
    fn save(&self, entries: &[Entry]) -> Result<(), StorageError>;
}

impl<P: EntryPersistence + ?Sized> EntryPersistence for Box<P> {
    fn load(&self) -> Result<Vec<Entry>, StorageError> {
        (**self).load()
    }

    fn save(&self, entries: &[Entry]) -> Result<(), StorageError> {
        (**self).save(entries)
    }
}
