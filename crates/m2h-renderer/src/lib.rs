//! Line-oriented markdown to HTML converter.
//!
//! This crate turns a restricted markdown dialect into an HTML element tree
//! and serializes it either as HTML text or as a JSON-compatible structure.
//!
//! # Architecture
//!
//! - [`Parser`]: splits the input into lines and tracks indentation, nesting
//!   containers one level per four spaces
//! - line rules: an ordered list of pattern rules (blank lines, code and
//!   formula fences, tables, headings, lists, blockquotes, rules) that turn a
//!   line into tree nodes
//! - inline pipeline: regex substitution of images, links, emphasis, code and
//!   formulas inside leaf text
//! - [`Tree`]: arena of [`Node`]s, rendered with [`Tree::to_html`] or
//!   [`Tree::to_dom`]
//!
//! Tag names and attributes of configurable elements come from
//! [`Config`], passed explicitly into every conversion.
//!
//! # Example
//!
//! ```
//! use m2h_renderer::{Config, Markdown};
//!
//! let mut md = Markdown::new(Config::default());
//! let html = md.convert("# Hello **World**");
//! assert_eq!(html, r#"<div class="markdown-body"><h1>Hello <b>World</b></h1></div>"#);
//! ```

mod dom;
mod html;
mod inline;
mod markdown;
mod parser;
mod rules;
mod tree;


pub use dom::{DomChild, DomNode};
pub use m2h_config::Config;
pub use markdown::{Markdown, to_html};
pub use parser::Parser;
pub use tree::{Attributes, Child, Node, NodeId, NodeKind, TEXT_TAG, Tree};
