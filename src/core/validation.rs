//! Validation engine
//!
//! Maps a draft to per-field error messages. Every rule runs on every call;
//! an empty result means the draft may be submitted.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::types::{FieldName, FormDraft};

/// Minimal structural check: `local@domain.tld`, no whitespace, one `@`
///
/// Whitespace here is the browser set: Unicode White_Space minus U+0085,
/// plus U+FEFF.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    let part = r"[^@\x{FEFF}[\s--\x{85}]]+";
    Regex::new(&format!(r"^{part}@{part}\.{part}$")).expect("valid email regex")
});

/// Exactly ten ASCII digits
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Minimum number of skills a candidate must select
pub const MIN_SKILLS: usize = 2;

pub const FULL_NAME_REQUIRED: &str = "Full Name is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_INVALID: &str = "Invalid email format";
pub const PHONE_REQUIRED: &str = "Phone is required";
pub const PHONE_INVALID: &str = "Phone must be 10 digits";
pub const GENDER_REQUIRED: &str = "Gender is required";
pub const SKILLS_TOO_FEW: &str = "Select at least two skills";
pub const PROFILE_PIC_REQUIRED: &str = "Profile picture is required";

/// Field name -> message; a missing key means the field is valid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<FieldName, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors in form order
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{}: {}", field, msg))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Whitespace as browsers trim it
fn is_form_whitespace(c: char) -> bool {
    c == '\u{FEFF}' || (c.is_whitespace() && c != '\u{85}')
}

fn is_blank(value: &str) -> bool {
    value.chars().all(is_form_whitespace)
}

/// Validate a draft
pub fn validate(draft: &FormDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if is_blank(&draft.full_name) {
        errors.insert(FieldName::FullName, FULL_NAME_REQUIRED);
    }

    // Format checks apply to the raw value; only the emptiness check trims
    if is_blank(&draft.email) {
        errors.insert(FieldName::Email, EMAIL_REQUIRED);
    } else if !EMAIL_RE.is_match(&draft.email) {
        errors.insert(FieldName::Email, EMAIL_INVALID);
    }

    if is_blank(&draft.phone) {
        errors.insert(FieldName::Phone, PHONE_REQUIRED);
    } else if !PHONE_RE.is_match(&draft.phone) {
        errors.insert(FieldName::Phone, PHONE_INVALID);
    }

    if draft.gender.is_none() {
        errors.insert(FieldName::Gender, GENDER_REQUIRED);
    }

    if draft.skills.len() < MIN_SKILLS {
        errors.insert(FieldName::Skills, SKILLS_TOO_FEW);
    }

    if draft.profile_pic.is_none() {
        errors.insert(FieldName::ProfilePic, PROFILE_PIC_REQUIRED);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Gender, ProfilePic, SelectionId, Skill, SkillSet};
    use proptest::prelude::*;
    use std::path::PathBuf;

    fn valid_draft() -> FormDraft {
        FormDraft {
            full_name: "Jane Doe".to_string(),
            email: "jane@x.com".to_string(),
            phone: "1234567890".to_string(),
            gender: Some(Gender::Female),
            skills: vec![Skill::Html, Skill::Css].into(),
            profile_pic: Some(ProfilePic {
                path: PathBuf::from("jane.png"),
                selection: SelectionId(1),
            }),
        }
    }

    #[test]
    fn test_valid_draft_has_no_errors() {
        assert!(validate(&valid_draft()).is_empty());
    }

    #[test]
    fn test_empty_draft_reports_every_field() {
        let errors = validate(&FormDraft::default());
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(FieldName::FullName), Some(FULL_NAME_REQUIRED));
        assert_eq!(errors.get(FieldName::Email), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get(FieldName::Phone), Some(PHONE_REQUIRED));
        assert_eq!(errors.get(FieldName::Gender), Some(GENDER_REQUIRED));
        assert_eq!(errors.get(FieldName::Skills), Some(SKILLS_TOO_FEW));
        assert_eq!(
            errors.get(FieldName::ProfilePic),
            Some(PROFILE_PIC_REQUIRED)
        );
    }

    #[test]
    fn test_whitespace_name_is_missing() {
        let draft = FormDraft {
            full_name: "   \t".to_string(),
            ..valid_draft()
        };
        let errors = validate(&draft);
        assert_eq!(errors.get(FieldName::FullName), Some(FULL_NAME_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_blank_uses_browser_whitespace() {
        let draft = FormDraft {
            full_name: "\u{FEFF}\u{3000}".to_string(),
            ..valid_draft()
        };
        assert_eq!(validate(&draft).get(FieldName::FullName), Some(FULL_NAME_REQUIRED));

        // U+0085 is not trimmed by browsers
        let draft = FormDraft {
            full_name: "\u{85}".to_string(),
            ..valid_draft()
        };
        assert!(validate(&draft).is_empty());

        let draft = FormDraft {
            email: "a\u{FEFF}@b.c".to_string(),
            ..valid_draft()
        };
        assert_eq!(validate(&draft).get(FieldName::Email), Some(EMAIL_INVALID));

        let draft = FormDraft {
            email: "a\u{85}@b.c".to_string(),
            ..valid_draft()
        };
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn test_email_format() {
        for bad in ["jane", "jane@x", "jane@@x.com", "ja ne@x.com", "@x.com", " jane@x.com"] {
            let draft = FormDraft {
                email: bad.to_string(),
                ..valid_draft()
            };
            assert_eq!(
                validate(&draft).get(FieldName::Email),
                Some(EMAIL_INVALID),
                "{bad:?} should be rejected"
            );
        }

        for good in ["a@b.c", "first.last@sub.example.org"] {
            let draft = FormDraft {
                email: good.to_string(),
                ..valid_draft()
            };
            assert!(validate(&draft).is_empty(), "{good:?} should be accepted");
        }
    }

    #[test]
    fn test_phone_rules() {
        for bad in ["12345", "12345678901", "12345abcde", "123 456 7890", "١٢٣٤٥٦٧٨٩٠"] {
            let draft = FormDraft {
                phone: bad.to_string(),
                ..valid_draft()
            };
            assert_eq!(validate(&draft).get(FieldName::Phone), Some(PHONE_INVALID));
        }

        let draft = FormDraft {
            phone: String::new(),
            ..valid_draft()
        };
        assert_eq!(validate(&draft).get(FieldName::Phone), Some(PHONE_REQUIRED));
    }

    #[test]
    fn test_errors_display_in_form_order() {
        let draft = FormDraft {
            full_name: String::new(),
            phone: "1".to_string(),
            ..valid_draft()
        };
        assert_eq!(
            validate(&draft).to_string(),
            "fullName: Full Name is required; phone: Phone must be 10 digits"
        );
    }

    proptest! {
        #[test]
        fn prop_ten_digit_phones_pass(phone in "[0-9]{10}") {
            let draft = FormDraft { phone, ..valid_draft() };
            prop_assert!(validate(&draft).is_empty());
        }

        #[test]
        fn prop_other_digit_counts_fail(phone in "[0-9]{1,9}|[0-9]{11,15}") {
            let draft = FormDraft { phone, ..valid_draft() };
            let errors = validate(&draft);
            prop_assert_eq!(errors.get(FieldName::Phone), Some(PHONE_INVALID));
        }

        #[test]
        fn prop_skill_threshold(mask in 0u8..16) {
            let skills: SkillSet = crate::core::types::SKILL_OPTIONS
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, skill)| skill)
                .collect();
            let count = skills.len();
            let draft = FormDraft { skills, ..valid_draft() };
            prop_assert_eq!(validate(&draft).contains(FieldName::Skills), count < MIN_SKILLS);
        }
    }
}
