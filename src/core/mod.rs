//! Core domain modules
//!
//! Validation, form state, entry lifecycle and the persistence seam. Nothing
//! here knows about terminals or files.

pub mod entry_store;
pub mod errors;
pub mod form;
pub mod preview;
pub mod registry;
pub mod traits;
pub mod types;
pub mod validation;

pub use entry_store::EntryStore;
pub use errors::{FieldError, PreviewError, StorageError};
pub use form::{Effect, FormEvent, FormState};
pub use preview::{PreviewLoader, PreviewReady};
pub use registry::Registry;
pub use traits::EntryPersistence;
pub use types::{
    Entry, EntryId, FieldKind, FieldName, FormDraft, Gender, Preview, ProfilePic, SelectionId,
    Skill, SkillSet, TextField, SKILL_OPTIONS,
};
pub use validation::{validate, ValidationErrors};
