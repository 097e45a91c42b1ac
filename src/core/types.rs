//! Canonical domain types for candidate registration
//!
//! The draft being edited, the entries it turns into, and the small enums
//! that name fields, genders and skills. Wire names match the persisted
//! slot format (`fullName`, `profilePic`, `"JavaScript"`, ...).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::errors::FieldError;

// ========== Field metadata ==========

/// Form fields, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FullName,
    Email,
    Phone,
    Gender,
    Skills,
    ProfilePic,
}

impl FieldName {
    pub const ALL: [FieldName; 6] = [
        FieldName::FullName,
        FieldName::Email,
        FieldName::Phone,
        FieldName::Gender,
        FieldName::Skills,
        FieldName::ProfilePic,
    ];

    /// Wire name used by field-change events and persisted errors
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::FullName => "fullName",
            FieldName::Email => "email",
            FieldName::Phone => "phone",
            FieldName::Gender => "gender",
            FieldName::Skills => "skills",
            FieldName::ProfilePic => "profilePic",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FieldName::FullName => "Full Name",
            FieldName::Email => "Email",
            FieldName::Phone => "Phone",
            FieldName::Gender => "Gender",
            FieldName::Skills => "Skills",
            FieldName::ProfilePic => "Profile Picture",
        }
    }

    /// The input kind this field accepts
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldName::FullName | FieldName::Email | FieldName::Phone => FieldKind::Text,
            FieldName::Gender => FieldKind::Radio,
            FieldName::Skills => FieldKind::Checkbox,
            FieldName::ProfilePic => FieldKind::File,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Kind of input control that produced a field-change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Radio,
    Checkbox,
    File,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Text => "text",
            FieldKind::Radio => "radio",
            FieldKind::Checkbox => "checkbox",
            FieldKind::File => "file",
        })
    }
}

impl FromStr for FieldKind {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(FieldKind::Text),
            "radio" => Ok(FieldKind::Radio),
            "checkbox" => Ok(FieldKind::Checkbox),
            "file" => Ok(FieldKind::File),
            other => Err(FieldError::UnknownKind(other.to_string())),
        }
    }
}

/// Free-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FullName,
    Email,
    Phone,
}

impl From<TextField> for FieldName {
    fn from(field: TextField) -> Self {
        match field {
            TextField::FullName => FieldName::FullName,
            TextField::Email => FieldName::Email,
            TextField::Phone => FieldName::Phone,
        }
    }
}

// ========== Choices ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::UnknownGender(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "CSS")]
    Css,
    JavaScript,
    React,
}

/// The fixed option list offered by the form
pub const SKILL_OPTIONS: [Skill; 4] = [Skill::Html, Skill::Css, Skill::JavaScript, Skill::React];

impl Skill {
    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Html => "HTML",
            Skill::Css => "CSS",
            Skill::JavaScript => "JavaScript",
            Skill::React => "React",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SKILL_OPTIONS
            .into_iter()
            .find(|skill| skill.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FieldError::UnknownSkill(s.to_string()))
    }
}

/// Selected skills
///
/// Keeps selection order for display; equality ignores order. Duplicates are
/// impossible through [`SkillSet::toggle`] and are dropped when deserializing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Skill>", into = "Vec<Skill>")]
pub struct SkillSet(Vec<Skill>);

impl SkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the skill if selected, otherwise add it
    pub fn toggle(&mut self, skill: Skill) {
        if let Some(pos) = self.0.iter().position(|s| *s == skill) {
            self.0.remove(pos);
        } else {
            self.0.push(skill);
        }
    }

    pub fn contains(&self, skill: Skill) -> bool {
        self.0.contains(&skill)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Skill> + '_ {
        self.0.iter().copied()
    }

    /// Comma-separated list, in selection order
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(Skill::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl PartialEq for SkillSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|skill| other.contains(skill))
    }
}

impl Eq for SkillSet {}

impl From<Vec<Skill>> for SkillSet {
    fn from(skills: Vec<Skill>) -> Self {
        let mut set = SkillSet::new();
        for skill in skills {
            if !set.contains(skill) {
                set.0.push(skill);
            }
        }
        set
    }
}

impl From<SkillSet> for Vec<Skill> {
    fn from(set: SkillSet) -> Self {
        set.0
    }
}

impl FromIterator<Skill> for SkillSet {
    fn from_iter<I: IntoIterator<Item = Skill>>(iter: I) -> Self {
        SkillSet::from(iter.into_iter().collect::<Vec<_>>())
    }
}

// ========== Draft ==========

/// Counter stamped on every file selection; keys preview reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionId(pub u64);

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Reference to the selected profile picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePic {
    pub path: PathBuf,
    pub selection: SelectionId,
}

impl ProfilePic {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as stored on the entry
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// In-progress form data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDraft {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: Option<Gender>,
    pub skills: SkillSet,
    pub profile_pic: Option<ProfilePic>,
}

impl FormDraft {
    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FullName => &self.full_name,
            TextField::Email => &self.email,
            TextField::Phone => &self.phone,
        }
    }

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::FullName => &mut self.full_name,
            TextField::Email => &mut self.email,
            TextField::Phone => &mut self.phone,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == FormDraft::default()
    }
}

// ========== Preview ==========

/// Renderable image preview as a `data:<mime>;base64,<payload>` URI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preview(String);

impl Preview {
    pub fn from_parts(mime_type: &str, base64_payload: &str) -> Self {
        Preview(format!("data:{};base64,{}", mime_type, base64_payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MIME type declared by the data URI, if well-formed
    pub fn mime_type(&self) -> Option<&str> {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
    }

    /// Approximate decoded size in bytes
    pub fn decoded_len(&self) -> usize {
        let payload = self
            .0
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or("");
        let padding = payload.chars().rev().take_while(|c| *c == '=').count();
        (payload.len() / 4 * 3).saturating_sub(padding)
    }
}

impl From<String> for Preview {
    fn from(uri: String) -> Self {
        Preview(uri)
    }
}

// ========== Entries ==========

/// Unique entry identifier: creation time in Unix milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl EntryId {
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Creation time encoded in the id
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(EntryId)
    }
}

/// Immutable record of one completed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: Gender,
    pub skills: SkillSet,
    /// Browser exports store the file object as `{}`; only names survive
    #[serde(default, deserialize_with = "file_name_or_none")]
    pub profile_pic: Option<String>,
    #[serde(default)]
    pub preview: Option<Preview>,
}

fn file_name_or_none<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(de)? {
        Some(serde_json::Value::String(name)) => Ok(Some(name)),
        _ => Ok(None),
    }
}

impl Entry {
    /// Snapshot a draft; the caller has already validated it
    pub fn from_draft(
        id: EntryId,
        draft: &FormDraft,
        gender: Gender,
        preview: Option<Preview>,
    ) -> Self {
        Self {
            id,
            full_name: draft.full_name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            gender,
            skills: draft.skills.clone(),
            profile_pic: draft.profile_pic.as_ref().map(ProfilePic::file_name),
            preview,
        }
    }
}
