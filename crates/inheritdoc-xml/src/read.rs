//! Documentation XML reading.

use std::borrow::Cow;
use std::fmt;

use inheritdoc_core::{
    DocTree, DocumentationTarget, ElementData, MemberDocumentation, MemberDocumentationMap, NodeId,
    ParseError,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Names used to find members in a documentation file.
#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Tag of each member element
    pub member_tag: String,
    /// Attribute holding the member's identity name
    pub name_attribute: String,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            member_tag: "member".to_string(),
            name_attribute: "name".to_string(),
        }
    }
}

/// Read all members of a documentation file into a new map.
pub fn read_documentation(
    xml: &str,
    target: &DocumentationTarget,
    options: &ReadOptions,
) -> Result<MemberDocumentationMap, ParseError> {
    let mut members = MemberDocumentationMap::new();
    add_member_documentations(xml, &mut members, target, options)?;
    Ok(members)
}

/// Read all members of a documentation file into an existing map.
///
/// Members whose identity name is already present keep their first entry.
/// Returns the number of members added.
pub fn add_member_documentations(
    xml: &str,
    members: &mut MemberDocumentationMap,
    target: &DocumentationTarget,
    options: &ReadOptions,
) -> Result<usize, ParseError> {
    let document = parse_tree(xml)?;
    let mut added = 0;

    for member in document.find_elements(&options.member_tag) {
        let Some(name) = document.attribute(member, &options.name_attribute) else {
            tracing::warn!(
                target_name = %target,
                attribute = %options.name_attribute,
                "skipping member element without identity name"
            );
            continue;
        };
        let Some(member_element) = document.extract(member) else {
            continue;
        };

        let documentation = MemberDocumentation::new(name, member_element, target.clone());
        if members.insert(documentation) {
            added += 1;
        } else {
            tracing::warn!(member = %name, target_name = %target, "duplicate member documentation ignored");
        }
    }

    tracing::debug!(target_name = %target, added, "read member documentations");
    Ok(added)
}

/// Parse a single member element, e.g. `<member name="M:A">...</member>`.
pub fn parse_member_element(xml: &str) -> Result<DocTree, ParseError> {
    parse_tree(xml)
}

/// Parse an XML document into a tree rooted at its document element.
///
/// Text, CDATA and entity escapes are kept; comments, processing
/// instructions and declarations are dropped.
pub fn parse_tree(xml: &str) -> Result<DocTree, ParseError> {
    let mut reader = Reader::from_str(xml);
    let mut tree: Option<DocTree> = None;
    let mut open: Vec<NodeId> = Vec::new();

    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let data = element_data(&start, position)?;
                let id = open_element(&mut tree, &open, data, position)?;
                open.push(id);
            }
            Ok(Event::Empty(start)) => {
                let data = element_data(&start, position)?;
                open_element(&mut tree, &open, data, position)?;
            }
            Ok(Event::End(_)) => {
                open.pop();
            }
            Ok(Event::Text(text)) => {
                let value = text.unescape().map_err(|e| xml_error(position, e))?;
                append_text(&mut tree, &open, value, position)?;
            }
            Ok(Event::CData(cdata)) => {
                let bytes = cdata.into_inner();
                let value = std::str::from_utf8(&bytes).map_err(|e| xml_error(position, e))?;
                append_text(&mut tree, &open, Cow::Borrowed(value), position)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(xml_error(position, e)),
        }
    }

    if let (Some(tree), Some(&id)) = (&tree, open.last()) {
        return Err(ParseError::UnexpectedEof {
            open: tree.element_name(id).unwrap_or_default().to_string(),
        });
    }
    tree.ok_or(ParseError::NoRootElement)
}

fn open_element(
    tree: &mut Option<DocTree>,
    open: &[NodeId],
    data: ElementData,
    position: u64,
) -> Result<NodeId, ParseError> {
    match tree {
        None => {
            let root = DocTree::with_root(data);
            let id = root.root();
            *tree = Some(root);
            Ok(id)
        }
        Some(tree) => match open.last() {
            Some(&parent) => Ok(tree.append_element_data(parent, data)),
            None => Err(ParseError::TrailingContent { position }),
        },
    }
}

fn append_text(
    tree: &mut Option<DocTree>,
    open: &[NodeId],
    value: Cow<'_, str>,
    position: u64,
) -> Result<(), ParseError> {
    match (tree.as_mut(), open.last()) {
        (Some(tree), Some(&parent)) => {
            tree.append_text(parent, value.into_owned());
            Ok(())
        }
        // Whitespace around the document element
        _ if value.trim().is_empty() => Ok(()),
        (Some(_), None) => Err(ParseError::TrailingContent { position }),
        (None, _) => Err(xml_error(position, "text before the root element")),
    }
}

fn element_data(start: &BytesStart<'_>, position: u64) -> Result<ElementData, ParseError> {
    let name = utf8(start.name().as_ref(), position)?;
    let mut data = ElementData::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| xml_error(position, e))?;
        let key = utf8(attribute.key.as_ref(), position)?;
        let value = attribute.unescape_value().map_err(|e| xml_error(position, e))?;
        data.attributes.insert(key, value.into_owned());
    }
    Ok(data)
}

fn utf8(bytes: &[u8], position: u64) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| xml_error(position, e))
}

fn xml_error(position: u64, reason: impl fmt::Display) -> ParseError {
    ParseError::Xml {
        position,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<doc>
    <assembly>
        <name>Lib</name>
    </assembly>
    <members>
        <member name="T:Lib.Widget">
            <summary>A widget &amp; its parts.</summary>
        </member>
        <member name="M:Lib.Widget.Draw">
            <inheritdoc cref="T:Lib.Widget"/>
            <remarks><![CDATA[Uses <canvas>.]]></remarks>
        </member>
        <!-- generated -->
    </members>
</doc>
"#;

    #[test]
    fn test_read_members() {
        let members = read_documentation(SAMPLE, &DocumentationTarget::default(), &ReadOptions::default()).unwrap();
        assert_eq!(members.len(), 2);

        let names: Vec<&str> = members.names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["T:Lib.Widget", "M:Lib.Widget.Draw"]);
    }

    #[test]
    fn test_read_unescapes_text() {
        let members = read_documentation(SAMPLE, &DocumentationTarget::default(), &ReadOptions::default()).unwrap();
        let widget = &members.get("T:Lib.Widget").unwrap().member_element;
        let summary = widget.find_first_element("summary").unwrap();
        assert_eq!(widget.inner_text(summary), "A widget & its parts.");
    }

    #[test]
    fn test_read_keeps_placeholder_and_cdata() {
        let members = read_documentation(SAMPLE, &DocumentationTarget::default(), &ReadOptions::default()).unwrap();
        let draw = &members.get("M:Lib.Widget.Draw").unwrap().member_element;

        let placeholder = draw.find_first_element("inheritdoc").unwrap();
        assert_eq!(draw.attribute(placeholder, "cref"), Some("T:Lib.Widget"));
        assert!(draw.children(placeholder).is_empty());

        let remarks = draw.find_first_element("remarks").unwrap();
        assert_eq!(draw.inner_text(remarks), "Uses <canvas>.");
    }

    #[test]
    fn test_member_root_carries_name() {
        let members = read_documentation(SAMPLE, &DocumentationTarget::default(), &ReadOptions::default()).unwrap();
        let widget = &members.get("T:Lib.Widget").unwrap().member_element;
        assert_eq!(widget.element_name(widget.root()), Some("member"));
        assert_eq!(widget.attribute(widget.root(), "name"), Some("T:Lib.Widget"));
    }

    #[test]
    fn test_add_keeps_first_duplicate() {
        let mut members = MemberDocumentationMap::new();
        let first = DocumentationTarget::Named("first".to_string());
        let second = DocumentationTarget::Named("second".to_string());

        assert_eq!(add_member_documentations(SAMPLE, &mut members, &first, &ReadOptions::default()).unwrap(), 2);
        assert_eq!(add_member_documentations(SAMPLE, &mut members, &second, &ReadOptions::default()).unwrap(), 0);
        assert_eq!(members.get("T:Lib.Widget").unwrap().documentation_target, first);
    }

    #[test]
    fn test_member_without_name_is_skipped() {
        let xml = r#"<doc><members><member><summary/></member><member name="M:A"/></members></doc>"#;
        let members = read_documentation(xml, &DocumentationTarget::default(), &ReadOptions::default()).unwrap();
        assert_eq!(members.len(), 1);
        assert!(members.contains("M:A"));
    }

    #[test]
    fn test_parse_member_element() {
        let tree = parse_member_element(r#"<member name="M:A"><summary>Hi</summary></member>"#).unwrap();
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.inner_text(tree.root()), "Hi");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_tree(""), Err(ParseError::NoRootElement)));
        assert!(matches!(
            parse_tree("<member><summary>"),
            Err(ParseError::UnexpectedEof { .. } | ParseError::Xml { .. })
        ));
        assert!(matches!(
            parse_tree("<a/><b/>"),
            Err(ParseError::TrailingContent { .. })
        ));
        assert!(matches!(parse_tree("<a></b>"), Err(ParseError::Xml { .. })));
    }
}
