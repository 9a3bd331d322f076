//! Arena-backed document tree.
//!
//! Every element of a converted document lives in a single [`Tree`] and is
//! addressed by [`NodeId`]. Children are owned through the parent's child list;
//! the parent link is a plain index used only to climb back out of nested
//! containers while parsing.

use m2h_config::{AttrMap, Config};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Tag reported for raw text leaves. Never emitted as markup.
pub const TEXT_TAG: &str = "__string__";

/// Tag of inline code elements. Not configurable.
pub const INLINE_CODE_TAG: &str = "code";

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Closed set of element kinds the converter produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Generic block: the document root and every indented sub-block.
    Container,
    /// Heading with level 1-6.
    Heading(usize),
    UnorderedList,
    OrderedList,
    ListItem,
    /// Blockquote; its nesting depth is the node level.
    Comment,
    CodeBlock,
    FormulaBlock,
    InlineCode,
    Table,
    TableRow,
    HeaderCell,
    DataCell,
    /// Horizontal rule.
    Rule,
    LineBreak,
    /// Raw text leaf, rendered without a wrapping tag.
    Text,
}

impl NodeKind {
    /// Tag of kinds that do not depend on configuration.
    ///
    /// Returns `None` for configurable kinds (container, blockquote, code and
    /// formula blocks), whose tag comes from [`Config`].
    #[must_use]
    pub fn fixed_tag(self) -> Option<&'static str> {
        let tag = match self {
            Self::Heading(level) => HEADING_TAGS[level.clamp(1, 6) - 1],
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::ListItem => "li",
            Self::InlineCode => INLINE_CODE_TAG,
            Self::Table => "table",
            Self::TableRow => "tr",
            Self::HeaderCell => "th",
            Self::DataCell => "td",
            Self::Rule => "hr",
            Self::LineBreak => "br",
            Self::Text => TEXT_TAG,
            Self::Container | Self::Comment | Self::CodeBlock | Self::FormulaBlock => return None,
        };
        Some(tag)
    }

    /// Whether nodes of this kind render as a single self-closing tag.
    #[must_use]
    pub fn is_void(self) -> bool {
        matches!(self, Self::Rule | Self::LineBreak)
    }
}

/// Insertion-ordered attribute map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Create an empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an attribute value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = value,
            None => self.0.push((name, value)),
        }
    }

    /// Iterate attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&AttrMap> for Attributes {
    fn from(map: &AttrMap) -> Self {
        Self(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Child of a node: another node or a literal string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Child {
    Node(NodeId),
    Text(String),
}

/// Tree element.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    tag: String,
    attributes: Attributes,
    children: Vec<Child>,
    parent: Option<NodeId>,
    level: usize,
    self_close: bool,
    /// Inside an unterminated code or formula fence.
    pub(crate) block_open: bool,
    /// Consuming data rows of a recognized table.
    pub(crate) table_open: bool,
    /// Column count of the open table.
    pub(crate) col_num: usize,
}

impl Node {
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[must_use]
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Repetition count of the open and close tags.
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.self_close
    }
}

/// Document tree built by a single conversion.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    code_class: Option<String>,
}

impl Tree {
    /// Create a tree holding only the root container.
    ///
    /// The root takes the configured container tag and attributes; the
    /// configured code class drives [`append_text`](Self::append_text).
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            code_class: config.code_class().map(str::to_owned),
        };
        tree.create_node(
            NodeKind::Container,
            config.container_tag.clone(),
            Attributes::from(&config.container_attr),
        );
        tree
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes allocated, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Allocate a detached node.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        tag: impl Into<String>,
        attributes: Attributes,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            tag: tag.into(),
            attributes,
            children: Vec::new(),
            parent: None,
            level: 1,
            self_close: kind.is_void(),
            block_open: false,
            table_open: false,
            col_num: 0,
        });
        id
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(Child::Node(child));
    }

    /// Append a text fragment to `parent`.
    ///
    /// The fragment is wrapped in a raw text leaf, unless `parent` carries the
    /// configured code class: then it becomes an inline code element, so each
    /// line of a fenced code block renders as its own `<code>`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let in_code = matches!(
            (self.node(parent).attributes.get("class"), self.code_class.as_deref()),
            (Some(class), Some(code_class)) if class == code_class
        );
        let kind = if in_code {
            NodeKind::InlineCode
        } else {
            NodeKind::Text
        };
        let tag = kind.fixed_tag().unwrap_or(TEXT_TAG);
        let leaf = self.create_node(kind, tag, Attributes::new());
        self.nodes[leaf.0].children.push(Child::Text(text.to_owned()));
        self.append_child(parent, leaf);
    }

    /// Last child node of `id`, if any.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id).children.last() {
            Some(Child::Node(child)) => Some(*child),
            Some(Child::Text(_)) | None => None,
        }
    }

    /// Kind of the last child node of `id`, if any.
    #[must_use]
    pub fn last_child_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.last_child(id).map(|child| self.node(child).kind)
    }

    /// Detach and return the last child of `id`.
    pub fn remove_last(&mut self, id: NodeId) -> Option<Child> {
        let removed = self.nodes[id.0].children.pop();
        if let Some(Child::Node(child)) = removed {
            self.nodes[child.0].parent = None;
        }
        removed
    }

    pub fn set_attribute(&mut self, id: NodeId, name: impl Into<String>, value: impl Into<String>) {
        self.nodes[id.0].attributes.set(name, value);
    }

    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attributes.get(name)
    }

    pub(crate) fn set_level(&mut self, id: NodeId, level: usize) {
        self.nodes[id.0].level = level;
    }

    /// Parent of `id`; `None` for the root and detached nodes.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Tree {
        Tree::new(&Config::default())
    }

    #[test]
    fn test_root_from_config() {
        let tree = tree();
        let root = tree.node(tree.root());
        assert_eq!(root.kind(), NodeKind::Container);
        assert_eq!(root.tag(), "div");
        assert_eq!(root.attributes().get("class"), Some("markdown-body"));
        assert!(root.parent().is_none());
        assert_eq!(root.level(), 1);
    }

    #[test]
    fn test_append_child_sets_parent() {
        let mut tree = tree();
        let root = tree.root();
        let list = tree.create_node(NodeKind::UnorderedList, "ul", Attributes::new());
        tree.append_child(root, list);

        assert_eq!(tree.parent(list), Some(root));
        assert_eq!(tree.node(root).children(), &[Child::Node(list)]);
    }

    #[test]
    fn test_last_child_empty() {
        let tree = tree();
        assert_eq!(tree.last_child(tree.root()), None);
        assert_eq!(tree.last_child_kind(tree.root()), None);
    }

    #[test]
    fn test_last_child_kind() {
        let mut tree = tree();
        let root = tree.root();
        let hr = tree.create_node(NodeKind::Rule, "hr", Attributes::new());
        tree.append_child(root, hr);
        assert_eq!(tree.last_child(root), Some(hr));
        assert_eq!(tree.last_child_kind(root), Some(NodeKind::Rule));
        assert!(tree.node(hr).is_self_closing());
    }

    #[test]
    fn test_append_text_wraps_raw_text() {
        let mut tree = tree();
        let root = tree.root();
        tree.append_text(root, "hello");

        let leaf = tree.last_child(root).unwrap();
        assert_eq!(tree.node(leaf).kind(), NodeKind::Text);
        assert_eq!(tree.node(leaf).tag(), TEXT_TAG);
        assert_eq!(tree.node(leaf).children(), &[Child::Text("hello".to_owned())]);
    }

    #[test]
    fn test_append_text_inside_code_class_wraps_inline_code() {
        let config = Config::default();
        let mut tree = Tree::new(&config);
        let root = tree.root();
        let block = tree.create_node(
            NodeKind::CodeBlock,
            "pre",
            Attributes::from(&config.code_attr),
        );
        tree.append_child(root, block);
        tree.append_text(block, "let x = 1;\n");

        let leaf = tree.last_child(block).unwrap();
        assert_eq!(tree.node(leaf).kind(), NodeKind::InlineCode);
        assert_eq!(tree.node(leaf).tag(), "code");
        assert!(tree.node(leaf).attributes().is_empty());
    }

    #[test]
    fn test_append_text_without_code_class_configured() {
        let config = Config {
            code_attr: AttrMap::new(),
            ..Config::default()
        };
        let mut tree = Tree::new(&config);
        let root = tree.root();
        let block = tree.create_node(NodeKind::CodeBlock, "pre", Attributes::new());
        tree.append_child(root, block);
        tree.append_text(block, "x\n");

        let leaf = tree.last_child(block).unwrap();
        assert_eq!(tree.node(leaf).kind(), NodeKind::Text);
    }

    #[test]
    fn test_remove_last_detaches() {
        let mut tree = tree();
        let root = tree.root();
        tree.append_text(root, "a");
        let leaf = tree.last_child(root).unwrap();

        assert_eq!(tree.remove_last(root), Some(Child::Node(leaf)));
        assert!(tree.node(root).children().is_empty());
        assert_eq!(tree.parent(leaf), None);
        assert_eq!(tree.remove_last(root), None);
    }

    #[test]
    fn test_attributes_keep_insertion_order() {
        let mut attrs = Attributes::new();
        attrs.set("class", "codehilite");
        attrs.set("language", "rust");
        attrs.set("class", "plain");

        let pairs: Vec<_> = attrs.iter().collect();
        assert_eq!(pairs, vec![("class", "plain"), ("language", "rust")]);
    }

    #[test]
    fn test_set_and_get_attribute() {
        let mut tree = tree();
        let root = tree.root();
        tree.set_attribute(root, "id", "doc");
        assert_eq!(tree.attribute(root, "id"), Some("doc"));
        assert_eq!(tree.attribute(root, "missing"), None);
    }

    #[test]
    fn test_fixed_tags() {
        assert_eq!(NodeKind::Heading(1).fixed_tag(), Some("h1"));
        assert_eq!(NodeKind::Heading(6).fixed_tag(), Some("h6"));
        assert_eq!(NodeKind::OrderedList.fixed_tag(), Some("ol"));
        assert_eq!(NodeKind::Comment.fixed_tag(), None);
        assert_eq!(NodeKind::CodeBlock.fixed_tag(), None);
    }
}
