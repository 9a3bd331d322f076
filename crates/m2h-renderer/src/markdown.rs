//! Stateful converter keeping the last result.

use m2h_config::Config;

use crate::dom::DomNode;
use crate::parser::Parser;

/// Markdown converter.
///
/// Holds a configuration and the outcome of the most recent
/// [`convert`](Self::convert) call. Every call parses into a fresh tree, so
/// converters are independent of each other.
#[derive(Debug, Clone, Default)]
pub struct Markdown {
    config: Config,
    html: Option<String>,
    dom: Option<DomNode>,
}

impl Markdown {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            html: None,
            dom: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replace the configuration. The previous result is discarded.
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
        self.clear();
    }

    /// Convert `markdown` to HTML, keeping both the HTML and the tree.
    pub fn convert(&mut self, markdown: &str) -> &str {
        self.clear();

        let tree = Parser::new(&self.config).parse(markdown);
        let root = tree.root();
        self.dom = Some(tree.to_dom(root));
        self.html.insert(tree.to_html(root))
    }

    /// HTML of the last conversion, empty if nothing was converted yet.
    #[must_use]
    pub fn html(&self) -> &str {
        self.html.as_deref().unwrap_or_default()
    }

    /// Structural tree of the last conversion.
    #[must_use]
    pub fn dom_tree(&self) -> Option<&DomNode> {
        self.dom.as_ref()
    }

    fn clear(&mut self) {
        self.html = None;
        self.dom = None;
    }
}

/// Convert `markdown` to HTML in one call.
#[must_use]
pub fn to_html(markdown: &str, config: &Config) -> String {
    let tree = Parser::new(config).parse(markdown);
    tree.to_html(tree.root())
}
