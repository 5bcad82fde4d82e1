//! Raw member documentation lookup.

use std::collections::HashMap;

use inheritdoc_core::{IdentityName, MemberDocumentation, MemberDocumentationMap};

/// Supplies raw, unexpanded member documentation by identity name.
///
/// The expander only reads from a store; it clones whatever it edits.
pub trait DocumentationStore {
    fn get_raw(&self, name: &str) -> Option<&MemberDocumentation>;
}

impl DocumentationStore for MemberDocumentationMap {
    fn get_raw(&self, name: &str) -> Option<&MemberDocumentation> {
        self.get(name)
    }
}

impl DocumentationStore for HashMap<IdentityName, MemberDocumentation> {
    fn get_raw(&self, name: &str) -> Option<&MemberDocumentation> {
        self.get(name)
    }
}

impl<S: DocumentationStore + ?Sized> DocumentationStore for &S {
    fn get_raw(&self, name: &str) -> Option<&MemberDocumentation> {
        (**self).get_raw(name)
    }
}
