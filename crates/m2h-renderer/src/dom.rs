//! Structural (JSON-compatible) view of the document tree.

use serde::Serialize;

use crate::tree::{Attributes, Child, NodeId, Tree};

/// Owned snapshot of a node and its descendants.
///
/// Serializes as `{"tag": .., "attributes": {..}, "children": [..]}`.
/// Self-closing nodes carry no `children` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomNode {
    pub tag: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DomChild>>,
}

/// Child entry of a [`DomNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DomChild {
    Text(String),
    Node(DomNode),
}

impl Tree {
    /// Snapshot the subtree rooted at `id`.
    #[must_use]
    pub fn to_dom(&self, id: NodeId) -> DomNode {
        let node = self.node(id);
        let children = (!node.is_self_closing()).then(|| {
            node.children()
                .iter()
                .map(|child| match child {
                    Child::Node(child) => DomChild::Node(self.to_dom(*child)),
                    Child::Text(text) => DomChild::Text(text.clone()),
                })
                .collect()
        });

        DomNode {
            tag: node.tag().to_owned(),
            attributes: node.attributes().clone(),
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use m2h_config::Config;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn test_dom_of_nested_tree() {
        let mut tree = Tree::new(&Config::default());
        let root = tree.root();
        let heading = tree.create_node(NodeKind::Heading(2), "h2", Attributes::new());
        tree.append_child(root, heading);
        tree.append_text(heading, "Title");
        let br = tree.create_node(NodeKind::LineBreak, "br", Attributes::new());
        tree.append_child(root, br);

        let value = serde_json::to_value(tree.to_dom(root)).unwrap();
        assert_eq!(
            value,
            json!({
                "tag": "div",
                "attributes": {"class": "markdown-body"},
                "children": [
                    {
                        "tag": "h2",
                        "attributes": {},
                        "children": [
                            {"tag": "__string__", "attributes": {}, "children": ["Title"]}
                        ]
                    },
                    {"tag": "br", "attributes": {}}
                ]
            })
        );
    }

    #[test]
    fn test_dom_self_closing_has_no_children() {
        let mut tree = Tree::new(&Config::default());
        let hr = tree.create_node(NodeKind::Rule, "hr", Attributes::new());
        let dom = tree.to_dom(hr);
        assert_eq!(dom.children, None);
        assert_eq!(dom.tag, "hr");
    }

    #[test]
    fn test_dom_attribute_order_preserved_in_json() {
        let mut tree = Tree::new(&Config::default());
        let mut attributes = Attributes::new();
        attributes.set("class", "codehilite");
        attributes.set("language", "python");
        let block = tree.create_node(NodeKind::CodeBlock, "pre", attributes);

        let text = serde_json::to_string(&tree.to_dom(block)).unwrap();
        assert_eq!(
            text,
            r#"{"tag":"pre","attributes":{"class":"codehilite","language":"python"},"children":[]}"#
        );
    }
}
