//! Identity names, documentation targets, and member documentation.

use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::tree::DocTree;

/// Opaque key identifying one documentable member, such as
/// `M:Namespace.Type.Method(System.String)`.
///
/// Compared by exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentityName(pub String);

impl IdentityName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reported as the missing name when a placeholder inherits from the
    /// member's base implementation.
    pub fn base_member() -> Self {
        Self::new("<Base Member>")
    }

    /// Reported as the missing name when a placeholder references its own
    /// member without a selector path.
    pub fn self_referential_error() -> Self {
        Self::new("<Error-Self Referential>")
    }
}

impl fmt::Display for IdentityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for IdentityName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for IdentityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Where a member's documentation came from. Used for diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DocumentationTarget {
    /// A project, identified by its project file path.
    Project(PathBuf),
    /// Any other source label.
    Named(String),
}

impl Default for DocumentationTarget {
    fn default() -> Self {
        DocumentationTarget::Named(String::new())
    }
}

impl fmt::Display for DocumentationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentationTarget::Project(path) => write!(f, "{}", path.display()),
            DocumentationTarget::Named(label) => f.write_str(label),
        }
    }
}

/// The documentation of one member.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberDocumentation {
    pub identity_name: IdentityName,
    /// The `<member>` element and everything below it
    pub member_element: DocTree,
    pub documentation_target: DocumentationTarget,
}

impl MemberDocumentation {
    pub fn new(
        identity_name: impl Into<IdentityName>,
        member_element: DocTree,
        documentation_target: DocumentationTarget,
    ) -> Self {
        Self {
            identity_name: identity_name.into(),
            member_element,
            documentation_target,
        }
    }
}

/// Member documentation keyed by identity name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDocumentationMap {
    members: IndexMap<IdentityName, MemberDocumentation>,
}

impl MemberDocumentationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member under its identity name.
    ///
    /// Returns false and keeps the existing entry if the name is already present.
    pub fn insert(&mut self, member: MemberDocumentation) -> bool {
        if self.members.contains_key(&member.identity_name) {
            return false;
        }
        self.members.insert(member.identity_name.clone(), member);
        true
    }

    pub fn get(&self, name: &str) -> Option<&MemberDocumentation> {
        self.members.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &IdentityName> {
        self.members.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&IdentityName, &MemberDocumentation)> {
        self.members.iter()
    }

    pub fn values(&self) -> impl Iterator<Item = &MemberDocumentation> {
        self.members.values()
    }

    pub fn into_values(self) -> impl Iterator<Item = MemberDocumentation> {
        self.members.into_values()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl FromIterator<MemberDocumentation> for MemberDocumentationMap {
    fn from_iter<I: IntoIterator<Item = MemberDocumentation>>(iter: I) -> Self {
        let mut map = Self::new();
        for member in iter {
            map.insert(member);
        }
        map
    }
}

impl Extend<MemberDocumentation> for MemberDocumentationMap {
    fn extend<I: IntoIterator<Item = MemberDocumentation>>(&mut self, iter: I) {
        for member in iter {
            self.insert(member);
        }
    }
}

/// Cycle-guard key for one placeholder: its cross reference and selector path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceKey {
    pub cross_reference: Option<IdentityName>,
    pub path: Option<String>,
}

impl ReferenceKey {
    pub fn new(cross_reference: Option<IdentityName>, path: Option<String>) -> Self {
        Self {
            cross_reference,
            path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_member(name: &str) -> MemberDocumentation {
        MemberDocumentation::new(name, DocTree::new("member"), DocumentationTarget::default())
    }

    #[test]
    fn test_special_identity_names() {
        assert_eq!(IdentityName::base_member().as_str(), "<Base Member>");
        assert_eq!(
            IdentityName::self_referential_error().as_str(),
            "<Error-Self Referential>"
        );
    }

    #[test]
    fn test_map_keeps_first_duplicate() {
        let mut map = MemberDocumentationMap::new();
        assert!(map.insert(make_member("M:A")));

        let mut other = make_member("M:A");
        other.documentation_target = DocumentationTarget::Named("second".to_string());
        assert!(!map.insert(other));

        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("M:A").unwrap().documentation_target,
            DocumentationTarget::default()
        );
    }

    #[test]
    fn test_map_preserves_insertion_order() {
        let map: MemberDocumentationMap = ["T:C", "T:A", "T:B"].into_iter().map(make_member).collect();
        let names: Vec<&str> = map.names().map(IdentityName::as_str).collect();
        assert_eq!(names, vec!["T:C", "T:A", "T:B"]);
    }

    #[test]
    fn test_reference_key_equality() {
        let a = ReferenceKey::new(Some("M:A".into()), Some("/summary".to_string()));
        let b = ReferenceKey::new(Some("M:A".into()), Some("/summary".to_string()));
        let c = ReferenceKey::new(Some("M:A".into()), None);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_documentation_target_display() {
        let target = DocumentationTarget::Project(PathBuf::from("src/Lib/Lib.csproj"));
        assert_eq!(target.to_string(), "src/Lib/Lib.csproj");
    }
}
