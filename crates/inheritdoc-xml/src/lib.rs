//! Compiler documentation XML for inheritdoc expansion.
//!
//! This crate turns documentation files (`<doc><members><member name="...">`)
//! into raw [`MemberDocumentationMap`]s and writes documentation trees back
//! out. Built on `quick-xml`.

mod load;
mod read;
mod write;

pub use load::{load_documentation_file, load_documentation_files, LoadedDocumentation};
pub use read::{add_member_documentations, parse_member_element, parse_tree, read_documentation, ReadOptions};
pub use write::{write_children, write_documentation, write_node, write_tree};

use inheritdoc_core::{DocumentationTarget, MemberDocumentationMap, ParseError};

/// Read every member of a documentation file's text.
///
/// # Example
///
/// ```ignore
/// use inheritdoc_xml::parse_documentation;
///
/// let xml = r#"<doc><members>
///   <member name="M:Lib.A"><summary>Does A.</summary></member>
/// </members></doc>"#;
///
/// let members = parse_documentation(xml, &DocumentationTarget::default())?;
/// ```
pub fn parse_documentation(
    xml: &str,
    target: &DocumentationTarget,
) -> Result<MemberDocumentationMap, ParseError> {
    read_documentation(xml, target, &ReadOptions::default())
}
