//! Missing-reference report records.

use std::fmt;

use crate::types::{DocumentationTarget, IdentityName};

/// Fixed notes attached to report records.
pub mod notes {
    pub const BASE_MEMBER_NOT_YET_SUPPORTED: &str =
        "Base member <inheritdoc> substition not yet supported.";
    pub const INFINITE_SUBSTITUTION_DETECTED: &str = "Infinite <inheritdoc> substitution detected.";
    pub const SELF_REFERENTIAL_WITH_NO_PATH: &str = "Self-referential but with no path.";
    pub const INVALID_SELECTOR_PATH: &str = "Invalid <inheritdoc> selector path";
}

/// Why a placeholder could not be fully resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingReferenceKind {
    /// The placeholder names no cross reference (base-member inheritance).
    UnsupportedBaseMemberReference,
    /// The cross reference names no known member.
    UnresolvedReference,
    /// The placeholder references its own member without a selector path.
    SelfReferentialWithoutPath,
    /// The placeholder was reached again within one traversal, or a
    /// replacement candidate contained the placeholder itself.
    CyclicSubstitution,
    /// The selector path attribute could not be parsed.
    InvalidSelectorPath,
}

/// One unresolved or erroneous inheritdoc reference.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MissingDocumentationReference {
    pub documentation_target: DocumentationTarget,
    /// The member whose documentation holds the placeholder
    pub referencing_name: IdentityName,
    /// The unresolved cross reference, or one of the sentinel names
    pub missing_name: IdentityName,
    pub note: Option<String>,
    pub kind: MissingReferenceKind,
}

impl MissingDocumentationReference {
    pub fn unsupported_base_member(target: &DocumentationTarget, referencing: &IdentityName) -> Self {
        Self {
            documentation_target: target.clone(),
            referencing_name: referencing.clone(),
            missing_name: IdentityName::base_member(),
            note: Some(notes::BASE_MEMBER_NOT_YET_SUPPORTED.to_string()),
            kind: MissingReferenceKind::UnsupportedBaseMemberReference,
        }
    }

    pub fn unresolved(
        target: &DocumentationTarget,
        referencing: &IdentityName,
        missing: &IdentityName,
    ) -> Self {
        Self {
            documentation_target: target.clone(),
            referencing_name: referencing.clone(),
            missing_name: missing.clone(),
            note: None,
            kind: MissingReferenceKind::UnresolvedReference,
        }
    }

    pub fn self_referential_without_path(target: &DocumentationTarget, referencing: &IdentityName) -> Self {
        Self {
            documentation_target: target.clone(),
            referencing_name: referencing.clone(),
            missing_name: IdentityName::self_referential_error(),
            note: Some(notes::SELF_REFERENTIAL_WITH_NO_PATH.to_string()),
            kind: MissingReferenceKind::SelfReferentialWithoutPath,
        }
    }

    pub fn cyclic_substitution(
        target: &DocumentationTarget,
        referencing: &IdentityName,
        cross_reference: &IdentityName,
    ) -> Self {
        Self {
            documentation_target: target.clone(),
            referencing_name: referencing.clone(),
            missing_name: cross_reference.clone(),
            note: Some(notes::INFINITE_SUBSTITUTION_DETECTED.to_string()),
            kind: MissingReferenceKind::CyclicSubstitution,
        }
    }

    pub fn invalid_selector_path(
        target: &DocumentationTarget,
        referencing: &IdentityName,
        cross_reference: &IdentityName,
        detail: impl fmt::Display,
    ) -> Self {
        Self {
            documentation_target: target.clone(),
            referencing_name: referencing.clone(),
            missing_name: cross_reference.clone(),
            note: Some(format!("{}: {}", notes::INVALID_SELECTOR_PATH, detail)),
            kind: MissingReferenceKind::InvalidSelectorPath,
        }
    }
}

impl fmt::Display for MissingDocumentationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: '{}' references missing '{}'",
            self.documentation_target, self.referencing_name, self.missing_name
        )?;
        if let Some(note) = &self.note {
            write!(f, " ({})", note)?;
        }
        Ok(())
    }
}
