//! Indentation-driven line parser.
//!
//! A [`Parser`] is a single conversion session: it borrows the configuration,
//! owns a fresh [`Tree`], and walks the input line by line. Every four leading
//! spaces are one indentation unit. Going one unit deeper opens a nested
//! container, going more than one unit deeper continues the current container
//! with inline text, and going shallower climbs back to the matching ancestor.
//! Lines inside an open fence or table skip indentation handling entirely.

use m2h_config::Config;

use crate::inline;
use crate::rules::LINE_RULES;
use crate::tree::{Attributes, NodeId, NodeKind, Tree};

/// Spaces per indentation unit.
const INDENT_WIDTH: usize = 4;

/// A line handed to the rules, with the raw line before it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    /// Used to recover table headers one line late.
    pub previous: &'a str,
}

/// Conversion session.
pub struct Parser<'c> {
    config: &'c Config,
    pub(crate) tree: Tree,
}

impl<'c> Parser<'c> {
    /// Create a session with an empty tree rooted at the configured container.
    #[must_use]
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            tree: Tree::new(config),
        }
    }

    /// Parse `markdown` and return the finished tree.
    #[must_use]
    pub fn parse(mut self, markdown: &str) -> Tree {
        let root = self.tree.root();
        let mut current = root;
        let mut current_level = 0;
        let mut previous = "";
        let mut line_count = 0usize;

        for raw in markdown.split('\n') {
            line_count += 1;
            let state = self.tree.node(current);
            let (block_open, table_open) = (state.block_open, state.table_open);

            if block_open {
                let text = format!("{}\n", strip_indent(raw, current_level * INDENT_WIDTH));
                self.append_line(current, Line { text: &text, previous }, true);
            } else if table_open {
                let text = strip_indent(raw, current_level * INDENT_WIDTH);
                self.append_line(current, Line { text, previous }, true);
            } else {
                let text = raw.trim_start_matches(' ');
                let indent = raw.len() - text.len();

                if indent == 0 {
                    current = self.ascend(current, current_level, 0);
                    current_level = 0;
                    self.append_line(current, Line { text: raw, previous }, true);
                } else {
                    let level = indent / INDENT_WIDTH;
                    let line = Line { text, previous };
                    if level == current_level {
                        self.append_line(current, line, true);
                    } else if level == current_level + 1 {
                        let container = self.create(NodeKind::Container);
                        self.tree.append_child(current, container);
                        current = container;
                        current_level = level;
                        self.append_line(current, line, true);
                    } else if level > current_level {
                        self.append_line(current, line, false);
                    } else {
                        current = self.ascend(current, current_level, level);
                        current_level = level;
                        self.append_line(current, line, true);
                    }
                }
            }
            previous = raw;
        }

        if self.tree.node(current).block_open {
            tracing::debug!("Fenced block left open at end of input");
        }
        tracing::debug!(
            lines = line_count,
            nodes = self.tree.len(),
            "Parsed markdown"
        );
        self.tree
    }

    /// Hand the tree back without parsing anything further.
    #[must_use]
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Climb `from` (at `from_level`) up to the ancestor at `to_level`.
    fn ascend(&self, from: NodeId, from_level: usize, to_level: usize) -> NodeId {
        let mut node = from;
        for _ in to_level..from_level {
            node = self.tree.parent(node).unwrap_or_else(|| self.tree.root());
        }
        node
    }

    /// Dispatch one line into `node`.
    ///
    /// At a line start the structural rules get the first chance to consume
    /// the line; otherwise, or when none matches, the line is run through the
    /// inline pipeline and appended to `node` as text.
    pub(crate) fn append_line(&mut self, node: NodeId, line: Line<'_>, line_start: bool) {
        if line_start {
            for rule in &LINE_RULES {
                if (rule.apply)(self, node, line) {
                    tracing::trace!(rule = rule.name, "Line consumed");
                    return;
                }
            }
        }
        let html = inline::render(line.text, self.config);
        self.tree.append_text(node, &html);
    }

    /// Append inline-only text to `node`.
    pub(crate) fn append_inline(&mut self, node: NodeId, text: &str) {
        self.append_line(
            node,
            Line {
                text,
                previous: "",
            },
            false,
        );
    }

    /// Allocate a node of `kind` with its configured tag and attributes.
    pub(crate) fn create(&mut self, kind: NodeKind) -> NodeId {
        let config = self.config;
        let (tag, attributes) = match kind {
            NodeKind::Container => (config.container_tag.as_str(), Attributes::new()),
            NodeKind::Comment => (config.comment_tag.as_str(), Attributes::new()),
            NodeKind::CodeBlock => (config.code_tag.as_str(), Attributes::from(&config.code_attr)),
            NodeKind::FormulaBlock => (
                config.formula_tag.as_str(),
                Attributes::from(&config.formula_attr),
            ),
            other => (other.fixed_tag().unwrap_or_default(), Attributes::new()),
        };
        self.tree.create_node(kind, tag, attributes)
    }
}

/// Remove at most `width` leading spaces.
fn strip_indent(line: &str, width: usize) -> &str {
    let spaces = line.bytes().take(width).take_while(|&b| b == b' ').count();
    &line[spaces..]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::tree::Child;

    fn parse(markdown: &str) -> Tree {
        Parser::new(&Config::default()).parse(markdown)
    }

    fn body(markdown: &str) -> String {
        let tree = parse(markdown);
        let html = tree.to_html(tree.root());
        html.strip_prefix(r#"<div class="markdown-body">"#)
            .and_then(|rest| rest.strip_suffix("</div>"))
            .unwrap_or(&html)
            .to_owned()
    }

    #[test]
    fn test_strip_indent() {
        assert_eq!(strip_indent("      x", 4), "  x");
        assert_eq!(strip_indent("  x", 4), "x");
        assert_eq!(strip_indent("x", 4), "x");
        assert_eq!(strip_indent("    x", 0), "    x");
    }

    #[test]
    fn test_empty_input_is_one_blank_line() {
        assert_eq!(body(""), "<br/>");
    }

    #[test]
    fn test_paragraph_lines() {
        assert_eq!(body("one\ntwo"), "onetwo");
    }

    #[test]
    fn test_one_unit_deeper_nests_container() {
        let tree = parse("top\n    nested");
        let root = tree.root();
        let container = tree.last_child(root).unwrap();
        assert_eq!(tree.node(container).kind(), NodeKind::Container);
        assert!(tree.node(container).attributes().is_empty());
        assert_eq!(tree.parent(container), Some(root));
        assert_eq!(tree.to_html(container), "<div>nested</div>");
    }

    #[test]
    fn test_more_than_one_unit_deeper_continues_inline() {
        assert_eq!(body("- item\n        # not a heading"), "<ul><li>item</li></ul># not a heading");
    }

    #[test]
    fn test_shallower_ascends_to_matching_level() {
        assert_eq!(
            body("a\n    b\n        c\n    d\ne"),
            "a<div>b<div>c</div>d</div>e"
        );
    }

    #[test]
    fn test_partial_indent_counts_as_same_level() {
        // Two spaces is zero units: stays at the root, de-indented
        assert_eq!(body("a\n  - b"), "a<ul><li>b</li></ul>");
    }

    #[test]
    fn test_structure_inside_nested_container() {
        assert_eq!(
            body("- a\n    - b\n    - c"),
            "<ul><li>a</li></ul><div><ul><li>b</li><li>c</li></ul></div>"
        );
    }

    #[test]
    fn test_fenced_block_bypasses_indentation() {
        assert_eq!(
            body("```\n    indented\n\n```"),
            "<pre class=\"codehilite\"><code>    indented\n</code><code>\n</code></pre>"
        );
    }

    #[test]
    fn test_fenced_block_in_nested_container() {
        assert_eq!(
            body("x\n    ```\n        code\n    ```\n    after"),
            "x<div><pre class=\"codehilite\"><code>    code\n</code></pre>after</div>"
        );
    }

    #[test]
    fn test_unterminated_fence_absorbs_rest() {
        let tree = parse("```\n# a\n- b");
        let root = tree.root();
        assert!(tree.node(root).block_open);
        let block = tree.last_child(root).unwrap();
        assert_eq!(tree.node(block).children().len(), 2);
        assert_eq!(tree.node(root).children().len(), 1);
    }

    #[test]
    fn test_table_rows_bypass_indentation() {
        let tree = parse("a | b\n--|--\n        1 | 2");
        let root = tree.root();
        let table = tree.last_child(root).unwrap();
        assert_eq!(tree.node(table).kind(), NodeKind::Table);
        assert_eq!(tree.node(table).children().len(), 2);
    }

    #[test]
    fn test_trailing_newline_adds_break() {
        let tree = parse("text\n");
        assert_eq!(tree.last_child_kind(tree.root()), Some(NodeKind::LineBreak));
    }

    #[test]
    fn test_root_children_are_nodes() {
        let tree = parse("# h\nplain\n- l");
        assert!(
            tree.node(tree.root())
                .children()
                .iter()
                .all(|child| matches!(child, Child::Node(_)))
        );
    }

    #[test]
    fn test_custom_container_tag_used_for_nesting() {
        let config = Config {
            container_tag: "section".to_owned(),
            ..Config::default()
        };
        let tree = Parser::new(&config).parse("a\n    b");
        assert_eq!(
            tree.to_html(tree.root()),
            r#"<section class="markdown-body">a<section>b</section></section>"#
        );
    }
}
