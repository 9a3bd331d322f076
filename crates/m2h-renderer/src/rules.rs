//! Line-start rules.
//!
//! Each rule inspects one line against the container it belongs to and either
//! consumes it (mutating the tree) or declines. [`LINE_RULES`] is tried in
//! order and the first rule to consume a line wins; a line no rule consumes
//! becomes inline text of the container.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::{Line, Parser};
use crate::tree::{NodeId, NodeKind};

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```(.*)").unwrap());
static FORMULA_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$\$(.*)").unwrap());
static TABLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ *\|?(?:[\-: ]+\|)+[\-: ]+\|? *$").unwrap());
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6}) (.*)").unwrap());
static UNORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([+-]) (.*)").unwrap());
static ORDERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+\.) (.*)").unwrap());
static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(>+)(.*)").unwrap());
static RULE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[ -]*-{3,}[ -]*$").unwrap());

/// A named line-start rule.
pub(crate) struct LineRule {
    pub name: &'static str,
    pub apply: fn(&mut Parser<'_>, NodeId, Line<'_>) -> bool,
}

/// Line-start rules in priority order.
pub(crate) const LINE_RULES: [LineRule; 9] = [
    LineRule {
        name: "blank_line",
        apply: blank_line,
    },
    LineRule {
        name: "code_fence",
        apply: code_fence,
    },
    LineRule {
        name: "formula_fence",
        apply: formula_fence,
    },
    LineRule {
        name: "table",
        apply: table,
    },
    LineRule {
        name: "open_block",
        apply: open_block,
    },
    LineRule {
        name: "heading",
        apply: heading,
    },
    LineRule {
        name: "list_item",
        apply: list_item,
    },
    LineRule {
        name: "blockquote",
        apply: blockquote,
    },
    LineRule {
        name: "horizontal_rule",
        apply: horizontal_rule,
    },
];

/// Empty line: ends an open table and emits a line break.
fn blank_line(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    if !line.text.is_empty() {
        return false;
    }
    parser.tree.node_mut(node).table_open = false;
    let br = parser.create(NodeKind::LineBreak);
    parser.tree.append_child(node, br);
    true
}

/// Close the open fenced block of `node`, if there is one.
fn close_block(parser: &mut Parser<'_>, node: NodeId) -> bool {
    let state = parser.tree.node_mut(node);
    if state.block_open {
        state.block_open = false;
        return true;
    }
    false
}

/// Open a fenced block of `kind` under `node`.
fn open_fenced(parser: &mut Parser<'_>, node: NodeId, kind: NodeKind) -> NodeId {
    let block = parser.create(kind);
    parser.tree.node_mut(node).block_open = true;
    parser.tree.append_child(node, block);
    block
}

/// ```` ``` ```` toggles a code block; text after an opening fence is its language.
fn code_fence(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    let Some(caps) = CODE_FENCE_RE.captures(line.text) else {
        return false;
    };
    if close_block(parser, node) {
        return true;
    }
    let block = open_fenced(parser, node, NodeKind::CodeBlock);
    let language = caps[1].trim();
    if !language.is_empty() {
        parser.tree.set_attribute(block, "language", language);
    }
    true
}

/// `$$` toggles a formula block. Text after the fence is dropped.
fn formula_fence(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    if !FORMULA_FENCE_RE.is_match(line.text) {
        return false;
    }
    if !close_block(parser, node) {
        open_fenced(parser, node, NodeKind::FormulaBlock);
    }
    true
}

/// Split a table line on unescaped pipes.
///
/// Surrounding spaces and outer pipes are stripped first. A fragment ending in
/// a backslash was cut at an escaped pipe, so it is joined back to the
/// fragment that follows it.
fn split_cells(text: &str) -> Vec<String> {
    let inner = text.trim_matches(' ').trim_matches('|');
    let mut cells: Vec<String> = Vec::new();
    for fragment in inner.split('|') {
        match cells.last_mut() {
            Some(previous) if previous.ends_with('\\') => {
                previous.push('|');
                previous.push_str(fragment);
            }
            _ => cells.push(fragment.to_owned()),
        }
    }
    cells
}

/// Emit a row of `cell_kind` cells, padded or truncated to `col_num` columns.
fn table_row(parser: &mut Parser<'_>, cells: &[String], cell_kind: NodeKind, col_num: usize) -> NodeId {
    let row = parser.create(NodeKind::TableRow);
    for index in 0..col_num {
        let cell = parser.create(cell_kind);
        if let Some(text) = cells.get(index) {
            parser.append_inline(cell, text.trim());
        }
        parser.tree.append_child(row, cell);
    }
    row
}

/// Table header recognition and data rows.
///
/// A separator line turns the previous line into a header row when both have
/// the same number of columns; the paragraph already emitted for the previous
/// line is retracted. While a table is open every line is a data row.
fn table(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    if parser.tree.node(node).table_open {
        let Some(table) = parser
            .tree
            .last_child(node)
            .filter(|&id| parser.tree.node(id).kind() == NodeKind::Table)
        else {
            // Something other than a row was emitted since the header
            parser.tree.node_mut(node).table_open = false;
            return false;
        };
        let col_num = parser.tree.node(node).col_num;
        let row = table_row(parser, &split_cells(line.text), NodeKind::DataCell, col_num);
        parser.tree.append_child(table, row);
        return true;
    }

    if !TABLE_SEPARATOR_RE.is_match(line.text) {
        return false;
    }
    let col_num = split_cells(line.text).len();
    let headers = split_cells(line.previous);
    if headers.len() != col_num {
        return false;
    }

    parser.tree.remove_last(node);
    let table = parser.create(NodeKind::Table);
    let row = table_row(parser, &headers, NodeKind::HeaderCell, col_num);
    parser.tree.append_child(table, row);
    parser.tree.append_child(node, table);

    let state = parser.tree.node_mut(node);
    state.table_open = true;
    state.col_num = col_num;
    true
}

/// Inside a fenced block every line is appended verbatim to the block.
fn open_block(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    if !parser.tree.node(node).block_open {
        return false;
    }
    let Some(block) = parser.tree.last_child(node) else {
        return false;
    };
    parser.tree.append_text(block, line.text);
    true
}

/// `#` to `######` followed by a space.
fn heading(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    let Some(caps) = HEADING_RE.captures(line.text) else {
        return false;
    };
    let level = caps[1].len();
    let heading = parser.create(NodeKind::Heading(level));
    parser.tree.append_child(node, heading);
    parser.append_inline(heading, caps.get(2).map_or("", |m| m.as_str()));
    true
}

/// `+`/`-` or `<number>.` items, merged into a preceding list of the same kind.
fn list_item(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    let (kind, caps) = if let Some(caps) = UNORDERED_RE.captures(line.text) {
        (NodeKind::UnorderedList, caps)
    } else if let Some(caps) = ORDERED_RE.captures(line.text) {
        (NodeKind::OrderedList, caps)
    } else {
        return false;
    };

    let item = parser.create(NodeKind::ListItem);
    match parser.tree.last_child(node) {
        Some(list) if parser.tree.node(list).kind() == kind => {
            parser.tree.append_child(list, item);
        }
        _ => {
            let list = parser.create(kind);
            parser.tree.append_child(list, item);
            parser.tree.append_child(node, list);
        }
    }
    parser.append_inline(item, caps.get(2).map_or("", |m| m.as_str()));
    true
}

/// One or more `>`; the count is the quote depth.
///
/// A preceding blockquote at least as deep is reused. The content is parsed as
/// a fresh line inside the blockquote, so it may itself be a list, heading or
/// deeper quote.
fn blockquote(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    let Some(caps) = BLOCKQUOTE_RE.captures(line.text) else {
        return false;
    };
    let depth = caps[1].len();
    let content = caps
        .get(2)
        .map_or("", |m| m.as_str())
        .trim_start_matches(' ');

    let quote = match parser.tree.last_child(node) {
        Some(last)
            if parser.tree.node(last).kind() == NodeKind::Comment
                && parser.tree.node(last).level() >= depth =>
        {
            last
        }
        _ => {
            let quote = parser.create(NodeKind::Comment);
            parser.tree.set_level(quote, depth);
            parser.tree.append_child(node, quote);
            quote
        }
    };
    parser.append_line(
        quote,
        Line {
            text: content,
            previous: "",
        },
        true,
    );
    true
}

/// Spaces and dashes only, with at least three consecutive dashes.
fn horizontal_rule(parser: &mut Parser<'_>, node: NodeId, line: Line<'_>) -> bool {
    if !RULE_RE.is_match(line.text) {
        return false;
    }
    let rule = parser.create(NodeKind::Rule);
    parser.tree.append_child(node, rule);
    true
}
