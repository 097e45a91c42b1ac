//! Registry - form and entry lifecycle
//!
//! Handles:
//! - Loading stored entries at startup
//! - Routing form events to the form state
//! - Submission (validate, snapshot, prepend, reset)
//! - Deletion by id
//! - Write-through persistence after every entry change

use chrono::Utc;

use super::entry_store::EntryStore;
use super::form::{Effect, FormEvent, FormState};
use super::traits::EntryPersistence;
use super::types::{Entry, EntryId};
use super::validation::{validate, ValidationErrors};

/// Owns all session state: the form, the entries and the persistence backend
pub struct Registry<P: EntryPersistence> {
    form: FormState,
    store: EntryStore,
    persistence: P,
}

impl<P: EntryPersistence> Registry<P> {
    /// Load stored entries; unreadable storage starts an empty session
    pub fn open(persistence: P) -> Self {
        let entries = match persistence.load() {
            Ok(entries) => {
                tracing::debug!("Loaded {} stored entries", entries.len());
                entries
            }
            Err(err) => {
                tracing::warn!("Failed to load stored entries: {}", err);
                Vec::new()
            }
        };

        Self {
            form: FormState::new(),
            store: EntryStore::from_entries(entries),
            persistence,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn entries(&self) -> &[Entry] {
        self.store.entries()
    }

    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.store.get(id)
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Apply a form event; the caller runs the returned effect
    pub fn dispatch(&mut self, event: FormEvent) -> Option<Effect> {
        self.form.apply(event)
    }

    /// Recompute and store validation errors without submitting
    pub fn validate(&mut self) -> ValidationErrors {
        self.form.validate().clone()
    }

    /// Submit the current draft
    ///
    /// On success the entry is prepended, the form is reset and the store is
    /// written. On failure only the form's errors change.
    pub fn submit(&mut self) -> Result<EntryId, ValidationErrors> {
        self.submit_at(Utc::now().timestamp_millis())
    }

    /// Submit with an explicit clock reading (Unix milliseconds)
    pub fn submit_at(&mut self, now_millis: i64) -> Result<EntryId, ValidationErrors> {
        let draft = self.form.draft();
        let errors = validate(draft);
        let gender = match draft.gender {
            Some(gender) if errors.is_empty() => gender,
            _ => {
                tracing::debug!("Submission rejected: {}", errors);
                self.form.set_errors(errors.clone());
                return Err(errors);
            }
        };

        let id = self.store.next_id(now_millis);
        let entry = Entry::from_draft(id, draft, gender, self.form.preview().cloned());
        self.store.prepend(entry);
        self.form.reset();
        tracing::info!("Registered entry {}", id);

        self.persist();
        Ok(id)
    }

    /// Delete an entry; returns whether it existed
    pub fn delete(&mut self, id: EntryId) -> bool {
        match self.store.remove(id) {
            Some(_) => {
                tracing::info!("Deleted entry {}", id);
                self.persist();
                true
            }
            None => {
                tracing::debug!("Delete of unknown entry {} ignored", id);
                false
            }
        }
    }

    /// Best-effort write; in-memory state stays authoritative
    fn persist(&self) {
        match self.persistence.save(self.store.entries()) {
            Ok(()) => tracing::debug!("Saved {} entries", self.store.len()),
            Err(err) => tracing::warn!("Failed to save entries: {}", err),
        }
    }
}
