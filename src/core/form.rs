//! Form state controller
//!
//! Owns the draft, the image preview and the last validation result.
//! Every change arrives as a [`FormEvent`]; [`FormState::apply`] applies it
//! and returns the side effect the driver must run, if any. Preview reads are
//! keyed by [`SelectionId`] so a completion for a superseded file is dropped.

use std::path::PathBuf;

use super::errors::{FieldError, PreviewError};
use super::types::{
    FieldKind, FieldName, FormDraft, Gender, Preview, ProfilePic, SelectionId, Skill, TextField,
};
use super::validation::{validate, ValidationErrors};

/// Events consumed by the form
#[derive(Debug)]
pub enum FormEvent {
    /// Replace a text field verbatim
    Text { field: TextField, value: String },
    /// Select a gender
    Gender(Gender),
    /// Add the skill if absent, remove it if present
    ToggleSkill(Skill),
    /// A file was chosen, or the file input was cleared (`None`)
    FileSelected(Option<PathBuf>),
    /// A preview read finished
    PreviewLoaded {
        selection: SelectionId,
        result: Result<Preview, PreviewError>,
    },
    /// Return to the empty form
    Reset,
}

impl FormEvent {
    /// Translate a generic field-change event from the view layer
    pub fn from_field_change(
        name: &str,
        value: impl Into<String>,
        kind: FieldKind,
    ) -> Result<Self, FieldError> {
        let field: FieldName = name.parse()?;
        if field.kind() != kind {
            return Err(FieldError::KindMismatch { field, kind });
        }

        let value = value.into();
        let event = match field {
            FieldName::FullName => FormEvent::Text {
                field: TextField::FullName,
                value,
            },
            FieldName::Email => FormEvent::Text {
                field: TextField::Email,
                value,
            },
            FieldName::Phone => FormEvent::Text {
                field: TextField::Phone,
                value,
            },
            FieldName::Gender => FormEvent::Gender(value.parse()?),
            FieldName::Skills => FormEvent::ToggleSkill(value.parse()?),
            FieldName::ProfilePic => {
                if value.is_empty() {
                    FormEvent::FileSelected(None)
                } else {
                    FormEvent::FileSelected(Some(PathBuf::from(value)))
                }
            }
        };
        Ok(event)
    }
}

/// Side effects requested by a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start reading this picture into a preview (superseding any in-flight read)
    LoadPreview(ProfilePic),
    /// Abort any in-flight preview read
    CancelPreview,
}

/// Current draft, preview and errors
#[derive(Debug, Clone, Default)]
pub struct FormState {
    draft: FormDraft,
    preview: Option<Preview>,
    errors: ValidationErrors,
    /// Last selection id handed out; never reset so ids stay unique
    last_selection: u64,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Whether a picture is selected but its preview has not arrived
    pub fn preview_pending(&self) -> bool {
        self.draft.profile_pic.is_some() && self.preview.is_none()
    }

    /// Apply one event
    pub fn apply(&mut self, event: FormEvent) -> Option<Effect> {
        match event {
            FormEvent::Text { field, value } => {
                *self.draft.text_mut(field) = value;
                None
            }
            FormEvent::Gender(gender) => {
                self.draft.gender = Some(gender);
                None
            }
            FormEvent::ToggleSkill(skill) => {
                self.draft.skills.toggle(skill);
                None
            }
            FormEvent::FileSelected(Some(path)) => {
                self.last_selection += 1;
                let pic = ProfilePic {
                    path,
                    selection: SelectionId(self.last_selection),
                };
                // The previous preview belongs to a different file
                self.preview = None;
                self.draft.profile_pic = Some(pic.clone());
                Some(Effect::LoadPreview(pic))
            }
            FormEvent::FileSelected(None) => {
                self.draft.profile_pic = None;
                self.preview = None;
                Some(Effect::CancelPreview)
            }
            FormEvent::PreviewLoaded { selection, result } => {
                self.apply_preview(selection, result);
                None
            }
            FormEvent::Reset => {
                let had_pic = self.draft.profile_pic.is_some();
                self.reset();
                had_pic.then_some(Effect::CancelPreview)
            }
        }
    }

    fn apply_preview(&mut self, selection: SelectionId, result: Result<Preview, PreviewError>) {
        let current = self.draft.profile_pic.as_ref().map(|pic| pic.selection);
        if current != Some(selection) {
            tracing::debug!(
                "Dropping preview for superseded selection {} (current: {:?})",
                selection,
                current
            );
            return;
        }

        match result {
            Ok(preview) => self.preview = Some(preview),
            Err(err) => {
                tracing::warn!("No preview available for selection {}: {}", selection, err);
                self.preview = None;
            }
        }
    }

    /// Recompute validation errors, replacing the previous ones
    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = validate(&self.draft);
        &self.errors
    }

    pub(crate) fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }

    /// Empty draft, no preview, no errors
    pub fn reset(&mut self) {
        self.draft = FormDraft::default();
        self.preview = None;
        self.errors.clear();
    }
}
