//! Recursive placeholder expansion.
//!
//! Each member is expanded on a clone of its raw documentation. A
//! placeholder is resolved by:
//! 1. Reporting it if it names no cross reference
//! 2. Checking its `{cross reference, path}` key against the cycle guard
//!    and against the self-references that imported it
//! 3. Substituting from the member's own raw snapshot when it is
//!    self-referential
//! 4. Otherwise expanding a fresh clone of the referenced member's raw
//!    documentation, with its key on the guard, and substituting from it
//!
//! The loop repeats until the member holds no placeholders.

use std::collections::{HashMap, HashSet};

use inheritdoc_core::{
    DocTree, ExpandError, IdentityName, MemberDocumentation, MemberDocumentationMap,
    MissingDocumentationReference, NodeId, ReferenceKey, SelectorPath, TreeError,
};
use tracing::Level;

use crate::locator::{find_all_placeholders, find_first_placeholder};
use crate::options::ExpandOptions;
use crate::reference::PlaceholderReference;
use crate::store::DocumentationStore;
use crate::substitute::{apply_replacement, compute_replacement};

/// Expanded members and the references that could not be resolved.
#[derive(Debug, Clone, Default)]
pub struct ExpandOutput {
    pub members: MemberDocumentationMap,
    pub missing: Vec<MissingDocumentationReference>,
}

/// One expanded member and the references that could not be resolved.
#[derive(Debug, Clone)]
pub struct ExpandedMember {
    pub member: MemberDocumentation,
    pub missing: Vec<MissingDocumentationReference>,
}

/// Keys of the cross references currently being expanded, from the
/// top-level member down to the innermost recursion.
#[derive(Debug, Default)]
pub struct CycleGuard {
    active: HashSet<ReferenceKey>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `key` onto the active path. Returns false if it is already on it.
    pub fn enter(&mut self, key: ReferenceKey) -> bool {
        self.active.insert(key)
    }

    /// Pop `key` once its expansion has returned.
    pub fn leave(&mut self, key: &ReferenceKey) {
        self.active.remove(key);
    }

    pub fn contains(&self, key: &ReferenceKey) -> bool {
        self.active.contains(key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

/// For placeholders copied in by a self-referential substitution, the keys
/// of the self-references that copied them, outermost first.
#[derive(Debug, Default)]
struct ImportChains {
    chains: HashMap<NodeId, Vec<ReferenceKey>>,
}

impl ImportChains {
    fn chain(&self, placeholder: NodeId) -> &[ReferenceKey] {
        self.chains.get(&placeholder).map(Vec::as_slice).unwrap_or(&[])
    }

    fn mark(&mut self, tree: &DocTree, tag: &str, imported: &[NodeId], chain: &[ReferenceKey]) {
        for &root in imported {
            let nodes = std::iter::once(root).chain(tree.descendants(root));
            for id in nodes.filter(|&id| tree.element_name(id) == Some(tag)) {
                self.chains.insert(id, chain.to_vec());
            }
        }
    }
}

/// Expands placeholders against a store of raw member documentation.
pub struct InheritdocExpander<'a, S: DocumentationStore + ?Sized> {
    store: &'a S,
    options: &'a ExpandOptions,
    missing: Vec<MissingDocumentationReference>,
}

impl<'a, S: DocumentationStore + ?Sized> InheritdocExpander<'a, S> {
    pub fn new(store: &'a S, options: &'a ExpandOptions) -> Self {
        Self {
            store,
            options,
            missing: Vec::new(),
        }
    }

    /// Expand one member with a fresh cycle guard.
    ///
    /// `raw` is never modified; self-references resolve against it and
    /// cross references resolve through the store.
    pub fn expand_member(&mut self, raw: &MemberDocumentation) -> Result<MemberDocumentation, ExpandError> {
        let mut guard = CycleGuard::new();
        let mut expanded = self.expand_raw(raw, &mut guard)?;
        expanded.member_element = expanded.member_element.compacted();
        Ok(expanded)
    }

    /// References recorded so far.
    pub fn missing(&self) -> &[MissingDocumentationReference] {
        &self.missing
    }

    pub fn into_missing(self) -> Vec<MissingDocumentationReference> {
        self.missing
    }

    fn expand_raw(
        &mut self,
        raw: &MemberDocumentation,
        guard: &mut CycleGuard,
    ) -> Result<MemberDocumentation, ExpandError> {
        self.validate(raw)?;

        let options = self.options;
        if tracing::enabled!(Level::DEBUG) {
            tracing::debug!(
                member = %raw.identity_name,
                placeholders = find_all_placeholders(&raw.member_element, &options.syntax).len(),
                "expanding member"
            );
        }

        let mut working = raw.clone();
        let mut chains = ImportChains::default();
        while let Some(placeholder) = find_first_placeholder(&working.member_element, &options.syntax) {
            self.resolve_placeholder(&mut working, &raw.member_element, placeholder, guard, &mut chains)?;
        }

        tracing::debug!(member = %raw.identity_name, "member expanded");
        Ok(working)
    }

    fn validate(&self, member: &MemberDocumentation) -> Result<(), ExpandError> {
        if member.identity_name.is_empty() {
            return Err(ExpandError::EmptyIdentityName);
        }
        let tree = &member.member_element;
        if tree.element_name(tree.root()) == Some(self.options.syntax.tag.as_str()) {
            return Err(ExpandError::DetachedPlaceholder {
                name: member.identity_name.to_string(),
            });
        }
        Ok(())
    }

    fn resolve_placeholder(
        &mut self,
        working: &mut MemberDocumentation,
        snapshot: &DocTree,
        placeholder: NodeId,
        guard: &mut CycleGuard,
        chains: &mut ImportChains,
    ) -> Result<(), ExpandError> {
        let reference = PlaceholderReference::read(&working.member_element, placeholder, &self.options.syntax);
        tracing::trace!(
            member = %working.identity_name,
            cref = ?reference.cross_reference,
            path = ?reference.path,
            "resolving placeholder"
        );

        let Some(cross_reference) = reference.cross_reference.clone() else {
            self.record(MissingDocumentationReference::unsupported_base_member(
                &working.documentation_target,
                &working.identity_name,
            ));
            return remove(working, placeholder);
        };

        let key = reference.key();
        let mut chain = chains.chain(placeholder).to_vec();
        if guard.contains(&key) || chain.contains(&key) {
            self.record(MissingDocumentationReference::cyclic_substitution(
                &working.documentation_target,
                &working.identity_name,
                &cross_reference,
            ));
            return remove(working, placeholder);
        }

        let path = match reference.path.as_deref().map(SelectorPath::parse).transpose() {
            Ok(path) => path,
            Err(e) => {
                self.record(MissingDocumentationReference::invalid_selector_path(
                    &working.documentation_target,
                    &working.identity_name,
                    &cross_reference,
                    e,
                ));
                return remove(working, placeholder);
            }
        };

        if cross_reference == working.identity_name {
            let Some(path) = path else {
                self.record(MissingDocumentationReference::self_referential_without_path(
                    &working.documentation_target,
                    &working.identity_name,
                ));
                return remove(working, placeholder);
            };

            let replacement = compute_replacement(
                snapshot,
                Some(&path),
                Some(placeholder),
                self.options.trim_edge_whitespace,
            );
            for _ in 0..replacement.excluded {
                self.record(MissingDocumentationReference::cyclic_substitution(
                    &working.documentation_target,
                    &working.identity_name,
                    &cross_reference,
                ));
            }
            let imported = apply(working, placeholder, snapshot, &replacement.nodes)?;
            chain.push(key);
            chains.mark(&working.member_element, &self.options.syntax.tag, &imported, &chain);
            return Ok(());
        }

        let store = self.store;
        let Some(target) = store.get_raw(cross_reference.as_str()) else {
            self.record(MissingDocumentationReference::unresolved(
                &working.documentation_target,
                &working.identity_name,
                &cross_reference,
            ));
            return remove(working, placeholder);
        };
        if target.identity_name != cross_reference {
            return Err(ExpandError::IdentityMismatch {
                key: cross_reference.to_string(),
                name: target.identity_name.to_string(),
            });
        }

        guard.enter(key.clone());
        let resolved = self.expand_raw(target, guard);
        guard.leave(&key);
        let resolved = resolved?;

        let replacement = compute_replacement(
            &resolved.member_element,
            path.as_ref(),
            None,
            self.options.trim_edge_whitespace,
        );
        apply(working, placeholder, &resolved.member_element, &replacement.nodes)?;
        Ok(())
    }

    fn record(&mut self, reference: MissingDocumentationReference) {
        tracing::debug!(
            referencing = %reference.referencing_name,
            missing = %reference.missing_name,
            kind = ?reference.kind,
            "missing documentation reference"
        );
        self.missing.push(reference);
    }
}

fn remove(working: &mut MemberDocumentation, placeholder: NodeId) -> Result<(), ExpandError> {
    let result = working.member_element.detach(placeholder);
    tree_result(&working.identity_name, result)
}

fn apply(
    working: &mut MemberDocumentation,
    placeholder: NodeId,
    source: &DocTree,
    nodes: &[NodeId],
) -> Result<Vec<NodeId>, ExpandError> {
    let result = apply_replacement(&mut working.member_element, placeholder, source, nodes);
    tree_result(&working.identity_name, result)
}

fn tree_result<T>(name: &IdentityName, result: Result<T, TreeError>) -> Result<T, ExpandError> {
    result.map_err(|source| ExpandError::Tree {
        name: name.to_string(),
        source,
    })
}

/// Expand every member of `members`, each against the raw map.
///
/// Every top-level member gets its own clone and cycle guard, so the
/// result for a member does not depend on the map's order.
pub fn expand_all_with(members: &MemberDocumentationMap, options: &ExpandOptions) -> Result<ExpandOutput, ExpandError> {
    let mut expander = InheritdocExpander::new(members, options);
    let mut output = ExpandOutput::default();

    for (name, raw) in members.iter() {
        if output.members.contains(name.as_str()) {
            continue;
        }
        let expanded = expander.expand_member(raw)?;
        output.members.insert(expanded);
    }

    output.missing = expander.into_missing();
    tracing::debug!(
        members = output.members.len(),
        missing = output.missing.len(),
        "expanded member documentation"
    );
    Ok(output)
}

/// Expand a single member, resolving cross references through `store`.
pub fn expand_one_with<S: DocumentationStore + ?Sized>(
    member: &MemberDocumentation,
    store: &S,
    options: &ExpandOptions,
) -> Result<ExpandedMember, ExpandError> {
    let mut expander = InheritdocExpander::new(store, options);
    let member = expander.expand_member(member)?;
    Ok(ExpandedMember {
        member,
        missing: expander.into_missing(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use inheritdoc_core::{DocumentationTarget, MissingReferenceKind};

    use crate::locator::has_placeholders;
    use crate::options::PlaceholderSyntax;

    /// A member whose root holds `summary` with the given text, followed by
    /// placeholders given as `(cref, path)` pairs.
    fn make_member(name: &str, summary: Option<&str>, placeholders: &[(Option<&str>, Option<&str>)]) -> MemberDocumentation {
        let mut tree = DocTree::new("member");
        let root = tree.root();
        tree.set_attribute(root, "name", name);
        if let Some(text) = summary {
            let element = tree.append_element(root, "summary");
            tree.append_text(element, text);
        }
        for (cref, path) in placeholders {
            let placeholder = tree.append_element(root, "inheritdoc");
            if let Some(cref) = cref {
                tree.set_attribute(placeholder, "cref", *cref);
            }
            if let Some(path) = path {
                tree.set_attribute(placeholder, "path", *path);
            }
        }
        MemberDocumentation::new(name, tree, DocumentationTarget::Named("Lib".to_string()))
    }

    fn make_map(members: Vec<MemberDocumentation>) -> MemberDocumentationMap {
        members.into_iter().collect()
    }

    fn expand(members: &MemberDocumentationMap) -> ExpandOutput {
        expand_all_with(members, &ExpandOptions::default()).unwrap()
    }

    fn kinds(missing: &[MissingDocumentationReference]) -> Vec<MissingReferenceKind> {
        missing.iter().map(|m| m.kind).collect()
    }

    #[test]
    fn test_simple_chain() {
        let members = make_map(vec![
            make_member("A", None, &[(Some("B"), None)]),
            make_member("B", Some("text-B"), &[]),
        ]);

        let result = expand_one_with(members.get("A").unwrap(), &members, &ExpandOptions::default()).unwrap();
        let tree = &result.member.member_element;

        assert!(result.missing.is_empty());
        assert!(!has_placeholders(tree, &PlaceholderSyntax::default()));
        let summary = tree.find_first_element("summary").unwrap();
        assert_eq!(tree.inner_text(summary), "text-B");
    }

    #[test]
    fn test_raw_input_is_not_mutated() {
        let members = make_map(vec![
            make_member("A", None, &[(Some("B"), None)]),
            make_member("B", Some("text-B"), &[]),
        ]);
        let before = members.clone();

        expand(&members);
        assert_eq!(members, before);
    }

    #[test]
    fn test_missing_reference() {
        let members = make_map(vec![make_member("A", Some("a"), &[(Some("Nowhere"), None)])]);
        let output = expand(&members);

        assert_eq!(output.missing.len(), 1);
        let missing = &output.missing[0];
        assert_eq!(missing.kind, MissingReferenceKind::UnresolvedReference);
        assert_eq!(missing.missing_name.as_str(), "Nowhere");
        assert_eq!(missing.referencing_name.as_str(), "A");
        assert_eq!(missing.note, None);
        assert_eq!(missing.documentation_target, DocumentationTarget::Named("Lib".to_string()));

        let tree = &output.members.get("A").unwrap().member_element;
        assert!(!has_placeholders(tree, &PlaceholderSyntax::default()));
        assert_eq!(tree.inner_text(tree.root()), "a");
    }

    #[test]
    fn test_base_member_placeholder() {
        let members = make_map(vec![make_member("A", Some("a"), &[(None, None)])]);
        let output = expand(&members);

        assert_eq!(kinds(&output.missing), vec![MissingReferenceKind::UnsupportedBaseMemberReference]);
        assert_eq!(output.missing[0].missing_name, IdentityName::base_member());
        assert_eq!(
            output.missing[0].note.as_deref(),
            Some("Base member <inheritdoc> substition not yet supported.")
        );
    }

    #[test]
    fn test_self_reference_without_path() {
        let members = make_map(vec![make_member("A", Some("a"), &[(Some("A"), None)])]);
        let output = expand(&members);

        assert_eq!(kinds(&output.missing), vec![MissingReferenceKind::SelfReferentialWithoutPath]);
        assert_eq!(output.missing[0].missing_name, IdentityName::self_referential_error());
        let tree = &output.members.get("A").unwrap().member_element;
        assert!(tree.find_first_element("inheritdoc").is_none());
        assert_eq!(tree.inner_text(tree.root()), "a");
    }

    #[test]
    fn test_self_reference_with_path() {
        let mut tree = DocTree::new("member");
        let root = tree.root();
        let summary = tree.append_element(root, "summary");
        let placeholder = tree.append_element(summary, "inheritdoc");
        tree.set_attribute(placeholder, "cref", "A");
        tree.set_attribute(placeholder, "path", "/remarks");
        let remarks = tree.append_element(root, "remarks");
        tree.append_text(remarks, "shared");
        let members = make_map(vec![MemberDocumentation::new("A", tree, DocumentationTarget::default())]);

        let output = expand(&members);
        assert!(output.missing.is_empty());

        let tree = &output.members.get("A").unwrap().member_element;
        let summary = tree.find_first_element("summary").unwrap();
        let remarks = tree.find_first_element("remarks").unwrap();
        assert_eq!(tree.inner_text(summary), "shared");
        assert_eq!(tree.inner_text(remarks), "shared");
    }

    #[test]
    fn test_self_reference_containing_itself() {
        // <member><remarks>R<para><inheritdoc cref="A" path="/remarks"/></para></remarks></member>
        let mut tree = DocTree::new("member");
        let root = tree.root();
        let remarks = tree.append_element(root, "remarks");
        tree.append_text(remarks, "R");
        let para = tree.append_element(remarks, "para");
        let placeholder = tree.append_element(para, "inheritdoc");
        tree.set_attribute(placeholder, "cref", "A");
        tree.set_attribute(placeholder, "path", "/remarks");
        let members = make_map(vec![MemberDocumentation::new("A", tree, DocumentationTarget::default())]);

        let output = expand(&members);
        assert_eq!(kinds(&output.missing), vec![MissingReferenceKind::CyclicSubstitution]);
        assert_eq!(
            output.missing[0].note.as_deref(),
            Some("Infinite <inheritdoc> substitution detected.")
        );

        let tree = &output.members.get("A").unwrap().member_element;
        assert!(tree.find_first_element("inheritdoc").is_none());
        let para = tree.find_first_element("para").unwrap();
        assert_eq!(tree.inner_text(para), "R");
    }

    #[test]
    fn test_two_cycle() {
        let members = make_map(vec![
            make_member("A", Some("a"), &[(Some("B"), None)]),
            make_member("B", Some("b"), &[(Some("A"), None)]),
        ]);

        let result = expand_one_with(members.get("A").unwrap(), &members, &ExpandOptions::default()).unwrap();
        assert_eq!(kinds(&result.missing), vec![MissingReferenceKind::CyclicSubstitution]);
        assert_eq!(result.missing[0].missing_name.as_str(), "B");
        assert!(!has_placeholders(&result.member.member_element, &PlaceholderSyntax::default()));
    }

    #[test]
    fn test_order_independence() {
        let a = make_member("A", Some("a"), &[(Some("B"), None), (Some("C"), Some("/summary"))]);
        let b = make_member("B", Some("b"), &[(Some("C"), None)]);
        let c = make_member("C", Some("c"), &[(Some("A"), None)]);

        let forward = expand(&make_map(vec![a.clone(), b.clone(), c.clone()]));
        let reverse = expand(&make_map(vec![c, b, a]));

        for name in ["A", "B", "C"] {
            assert_eq!(forward.members.get(name), reverse.members.get(name), "member {name}");
        }
    }

    #[test]
    fn test_idempotence() {
        let members = make_map(vec![
            make_member("A", None, &[(Some("B"), None)]),
            make_member("B", Some("text-B"), &[(Some("Missing"), None)]),
        ]);
        let once = expand(&members);
        let twice = expand(&once.members);

        assert_eq!(once.members, twice.members);
        assert!(twice.missing.is_empty());
    }

    #[test]
    fn test_invalid_selector_path() {
        let members = make_map(vec![
            make_member("A", Some("a"), &[(Some("B"), Some("/remarks["))]),
            make_member("B", Some("b"), &[]),
        ]);
        let output = expand(&members);

        assert_eq!(kinds(&output.missing), vec![MissingReferenceKind::InvalidSelectorPath]);
        assert_eq!(output.missing[0].missing_name.as_str(), "B");
        let tree = &output.members.get("A").unwrap().member_element;
        assert_eq!(tree.inner_text(tree.root()), "a");
    }

    #[test]
    fn test_repeated_key_in_one_member() {
        let members = make_map(vec![
            make_member("A", None, &[(Some("B"), None), (Some("B"), None)]),
            make_member("B", Some("b"), &[]),
        ]);
        let output = expand(&members);

        assert!(output.missing.is_empty());
        let tree = &output.members.get("A").unwrap().member_element;
        assert_eq!(tree.find_elements("summary").len(), 2);
        assert_eq!(tree.inner_text(tree.root()), "bb");
    }

    #[test]
    fn test_shared_target_through_two_paths() {
        // A -> B -> D and A -> C -> D
        let members = make_map(vec![
            make_member("A", None, &[(Some("B"), None), (Some("C"), None)]),
            make_member("B", Some("b"), &[(Some("D"), None)]),
            make_member("C", Some("c"), &[(Some("D"), None)]),
            make_member("D", Some("d"), &[]),
        ]);
        let output = expand(&members);

        assert!(output.missing.is_empty());
        let a = &output.members.get("A").unwrap().member_element;
        assert_eq!(a.inner_text(a.root()), "bdcd");
        let c = &output.members.get("C").unwrap().member_element;
        assert_eq!(c.inner_text(c.root()), "cd");
    }

    /// `<summary><inheritdoc cref="A" path="/remarks"/></summary>`
    /// `<remarks>R<inheritdoc cref="A" path="{remarks_path}"/></remarks>`
    /// `<example>E</example>`
    fn make_chained_self_references(remarks_path: &str) -> MemberDocumentationMap {
        let mut tree = DocTree::new("member");
        let root = tree.root();
        let summary = tree.append_element(root, "summary");
        let placeholder = tree.append_element(summary, "inheritdoc");
        tree.set_attribute(placeholder, "cref", "A");
        tree.set_attribute(placeholder, "path", "/remarks");
        let remarks = tree.append_element(root, "remarks");
        tree.append_text(remarks, "R");
        let placeholder = tree.append_element(remarks, "inheritdoc");
        tree.set_attribute(placeholder, "cref", "A");
        tree.set_attribute(placeholder, "path", remarks_path);
        let example = tree.append_element(root, "example");
        tree.append_text(example, "E");
        make_map(vec![MemberDocumentation::new("A", tree, DocumentationTarget::default())])
    }

    #[test]
    fn test_chained_self_references() {
        let output = expand(&make_chained_self_references("/example"));
        assert!(output.missing.is_empty());

        let tree = &output.members.get("A").unwrap().member_element;
        assert!(!has_placeholders(tree, &PlaceholderSyntax::default()));
        let summary = tree.find_first_element("summary").unwrap();
        let remarks = tree.find_first_element("remarks").unwrap();
        assert_eq!(tree.inner_text(summary), "RE");
        assert_eq!(tree.inner_text(remarks), "RE");
    }

    #[test]
    fn test_mutual_self_references() {
        let output = expand(&make_chained_self_references("/summary"));
        assert_eq!(
            kinds(&output.missing),
            vec![MissingReferenceKind::CyclicSubstitution, MissingReferenceKind::CyclicSubstitution]
        );

        let tree = &output.members.get("A").unwrap().member_element;
        assert!(!has_placeholders(tree, &PlaceholderSyntax::default()));
        let summary = tree.find_first_element("summary").unwrap();
        let remarks = tree.find_first_element("remarks").unwrap();
        assert_eq!(tree.inner_text(summary), "R");
        assert_eq!(tree.inner_text(remarks), "RR");
    }

    #[test]
    fn test_empty_identity_name_fails() {
        let members = make_map(vec![make_member("", Some("a"), &[])]);
        assert!(matches!(
            expand_all_with(&members, &ExpandOptions::default()),
            Err(ExpandError::EmptyIdentityName)
        ));
    }

    #[test]
    fn test_placeholder_root_fails() {
        let member = MemberDocumentation::new("A", DocTree::new("inheritdoc"), DocumentationTarget::default());
        let members = make_map(vec![member]);
        assert!(matches!(
            expand_all_with(&members, &ExpandOptions::default()),
            Err(ExpandError::DetachedPlaceholder { .. })
        ));
    }

    #[test]
    fn test_store_identity_mismatch_fails() {
        use std::collections::HashMap;

        let mut store = HashMap::new();
        store.insert(IdentityName::from("B"), make_member("Other", Some("b"), &[]));
        let a = make_member("A", None, &[(Some("B"), None)]);

        assert!(matches!(
            expand_one_with(&a, &store, &ExpandOptions::default()),
            Err(ExpandError::IdentityMismatch { .. })
        ));
    }

    #[test]
    fn test_cycle_guard() {
        let a = ReferenceKey::new(Some("A".into()), None);
        let a_remarks = ReferenceKey::new(Some("A".into()), Some("/remarks".to_string()));

        let mut guard = CycleGuard::new();
        assert!(guard.is_empty());
        assert!(guard.enter(a.clone()));
        assert!(!guard.enter(a.clone()));
        assert!(guard.enter(a_remarks.clone()));
        assert_eq!(guard.len(), 2);

        guard.leave(&a_remarks);
        assert!(guard.contains(&a));
        assert!(!guard.contains(&a_remarks));
        guard.leave(&a);
        assert!(guard.is_empty());
    }
}
