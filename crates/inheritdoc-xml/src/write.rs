//! Documentation XML writing.

use std::fmt::Write;

use inheritdoc_core::{DocTree, MemberDocumentationMap, NodeId, NodeKind};
use quick_xml::escape::{escape, partial_escape};

/// Serialize a whole tree, root element included.
pub fn write_tree(tree: &DocTree) -> String {
    write_node(tree, tree.root())
}

/// Serialize one node and everything below it.
pub fn write_node(tree: &DocTree, id: NodeId) -> String {
    let mut output = String::new();
    write_into(tree, id, &mut output);
    output
}

/// Serialize the children of a node (its inner XML).
pub fn write_children(tree: &DocTree, id: NodeId) -> String {
    let mut output = String::new();
    for &child in tree.children(id) {
        write_into(tree, child, &mut output);
    }
    output
}

/// Serialize members as a compiler documentation file.
pub fn write_documentation(members: &MemberDocumentationMap, assembly: &str) -> String {
    let mut output = String::from("<?xml version=\"1.0\"?>\n<doc>\n");
    let _ = writeln!(
        output,
        "    <assembly>\n        <name>{}</name>\n    </assembly>",
        partial_escape(assembly)
    );
    output.push_str("    <members>\n");
    for member in members.values() {
        output.push_str("        ");
        write_into(&member.member_element, member.member_element.root(), &mut output);
        output.push('\n');
    }
    output.push_str("    </members>\n</doc>\n");
    output
}

fn write_into(tree: &DocTree, id: NodeId, output: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.kind {
        NodeKind::Text(text) => output.push_str(&partial_escape(text.as_str())),
        NodeKind::Element(data) => {
            output.push('<');
            output.push_str(&data.name);
            for (name, value) in &data.attributes {
                let _ = write!(output, " {}=\"{}\"", name, escape(value.as_str()));
            }

            if node.children.is_empty() {
                output.push_str(" />");
                return;
            }

            output.push('>');
            for &child in &node.children {
                write_into(tree, child, output);
            }
            output.push_str("</");
            output.push_str(&data.name);
            output.push('>');
        }
    }
}
