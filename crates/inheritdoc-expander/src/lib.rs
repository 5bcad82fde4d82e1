//! Inheritdoc placeholder expansion.
//!
//! This crate handles:
//! - Locating `<inheritdoc>` placeholders
//! - Reading their cross reference and selector path
//! - Recursive substitution from raw member documentation
//! - Cycle and self-reference detection
//! - Reporting references that could not be resolved

mod expander;
mod locator;
mod options;
mod reference;
mod store;
mod substitute;

#[cfg(feature = "parallel")]
mod parallel;

pub use expander::{expand_all_with, expand_one_with, CycleGuard, ExpandOutput, ExpandedMember, InheritdocExpander};
pub use locator::{find_all_placeholders, find_first_placeholder, has_placeholders};
pub use options::{ExpandOptions, PlaceholderSyntax};
pub use reference::{cross_reference, selector_path, PlaceholderReference};
pub use store::DocumentationStore;
pub use substitute::{apply_replacement, compute_replacement, Replacement};

#[cfg(feature = "parallel")]
pub use parallel::{expand_all_parallel, expand_all_parallel_with};

use inheritdoc_core::{
    DocumentationTarget, ExpandError, InheritdocError, MemberDocumentation, MemberDocumentationMap,
};

/// Expand every member of a raw map with default options.
pub fn expand_all(members: &MemberDocumentationMap) -> Result<ExpandOutput, ExpandError> {
    expand_all_with(members, &ExpandOptions::default())
}

/// Expand one member with default options, resolving cross references
/// through `store`.
pub fn expand_one<S: DocumentationStore + ?Sized>(
    member: &MemberDocumentation,
    store: &S,
) -> Result<ExpandedMember, ExpandError> {
    expand_one_with(member, store, &ExpandOptions::default())
}

/// Expand a sequence of members against each other.
///
/// A repeated identity name keeps its first member. The output keeps input
/// order.
pub fn expand_members<I>(members: I) -> Result<ExpandOutput, ExpandError>
where
    I: IntoIterator<Item = MemberDocumentation>,
{
    let members: MemberDocumentationMap = members.into_iter().collect();
    expand_all(&members)
}

/// Read a documentation file's text and expand every member in it.
///
/// # Example
///
/// ```ignore
/// use inheritdoc_expander::expand_documentation;
///
/// let xml = r#"<doc><members>
///   <member name="M:Lib.A"><summary>Does A.</summary></member>
///   <member name="M:Lib.B"><inheritdoc cref="M:Lib.A"/></member>
/// </members></doc>"#;
///
/// let output = expand_documentation(xml, &DocumentationTarget::default())?;
/// assert!(output.missing.is_empty());
/// ```
pub fn expand_documentation(xml: &str, target: &DocumentationTarget) -> Result<ExpandOutput, InheritdocError> {
    let members = inheritdoc_xml::parse_documentation(xml, target)?;
    Ok(expand_all(&members)?)
}
