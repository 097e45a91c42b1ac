//! candidate-registry: candidate registration form with local persistence
//!
//! This library provides:
//! - Validation rules for candidate drafts
//! - A form state controller driven by typed events
//! - An entry store with write-through persistence to a JSON slot
//! - Background profile picture previews
//! - A command line and a terminal UI over the same core

pub mod config;
pub mod core;
pub mod storage;
pub mod transport;
pub mod tui;

pub use config::Config;
pub use core::{Entry, EntryId, EntryPersistence, FormEvent, Registry, ValidationErrors};
pub use storage::{JsonSlotStore, MemoryStore};
