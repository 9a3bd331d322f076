//! HTML serialization of the document tree.
//!
//! Tags are written as-is: a node of level `n` opens with its start tag
//! repeated `n` times and closes with its end tag repeated `n` times, which is
//! how nested blockquotes are expressed. Text and attribute values are not
//! escaped; inline markup has already been substituted into the text.

use crate::tree::{Attributes, Child, NodeId, NodeKind, Tree};

/// Start tag, repeated `level` times.
pub(crate) fn open_tag(tag: &str, attributes: &Attributes, level: usize) -> String {
    let mut single = String::with_capacity(tag.len() + 2);
    single.push('<');
    single.push_str(tag);
    push_attributes(&mut single, attributes);
    single.push('>');
    single.repeat(level)
}

/// End tag, repeated `level` times.
pub(crate) fn close_tag(tag: &str, level: usize) -> String {
    format!("</{tag}>").repeat(level)
}

/// Self-closing tag.
pub(crate) fn self_closing_tag(tag: &str, attributes: &Attributes) -> String {
    let mut out = String::with_capacity(tag.len() + 3);
    out.push('<');
    out.push_str(tag);
    push_attributes(&mut out, attributes);
    out.push_str("/>");
    out
}

/// Complete element wrapping literal content.
pub(crate) fn element(tag: &str, attributes: &Attributes, content: &str) -> String {
    let mut out = open_tag(tag, attributes, 1);
    out.push_str(content);
    out.push_str(&close_tag(tag, 1));
    out
}

fn push_attributes(out: &mut String, attributes: &Attributes) {
    for (name, value) in attributes.iter() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
}

impl Tree {
    /// Render the subtree rooted at `id` as HTML.
    #[must_use]
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::with_capacity(256);
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);

        if node.is_self_closing() {
            out.push_str(&self_closing_tag(node.tag(), node.attributes()));
            return;
        }

        let wrapped = node.kind() != NodeKind::Text;
        if wrapped {
            out.push_str(&open_tag(node.tag(), node.attributes(), node.level()));
        }
        for child in node.children() {
            match child {
                Child::Node(child) => self.write_html(*child, out),
                Child::Text(text) => out.push_str(text),
            }
        }
        if wrapped {
            out.push_str(&close_tag(node.tag(), node.level()));
        }
    }
}
