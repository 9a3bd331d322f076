//! Inline markup substitution.
//!
//! Leaf text goes through a fixed sequence of regex substitutions: images,
//! links, bold, italic, inline code, inline formulas. Each stage rewrites every
//! match in the output of the previous stage, so markup produced by an earlier
//! stage is visible to later ones. Nothing is escaped and overlapping or nested
//! constructs are not disambiguated: `[a](x_y_z)` ends up with `<i>` inside the
//! `href`, and emphasis markers inside backticks are converted before the code
//! span is.

use std::borrow::Cow;
use std::sync::LazyLock;

use m2h_config::Config;
use regex::{Captures, Regex};

use crate::html::element;
use crate::tree::{Attributes, INLINE_CODE_TAG};

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\[]*)\]\(([^(]*)\)").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[]*)\]\(([^(]*)\)").unwrap());
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*([^*]*)\*\*|__([^_]*)__").unwrap());
static ITALIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*]*)\*|_([^_]*)_").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]*)`").unwrap());
static FORMULA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$([^$]*)\$").unwrap());

/// Content of whichever alternative of an `a|b` pattern matched.
fn either<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Run the inline pipeline over one fragment of text.
pub(crate) fn render(text: &str, config: &Config) -> String {
    let text = IMAGE_RE.replace_all(text, |caps: &Captures| {
        format!(r#"<img src="{}" alt="{}"/>"#, &caps[2], &caps[1])
    });
    let text = LINK_RE.replace_all(&text, |caps: &Captures| {
        format!(r#"<a href="{}">{}</a>"#, &caps[2], &caps[1])
    });
    let text = BOLD_RE.replace_all(&text, |caps: &Captures| format!("<b>{}</b>", either(caps)));
    let text = ITALIC_RE.replace_all(&text, |caps: &Captures| format!("<i>{}</i>", either(caps)));

    let code_attributes = Attributes::from(&config.code_attr);
    let text = CODE_RE.replace_all(&text, |caps: &Captures| {
        element(INLINE_CODE_TAG, &code_attributes, &caps[1])
    });

    let formula_attributes = Attributes::from(&config.formula_attr);
    let text: Cow<'_, str> = FORMULA_RE.replace_all(&text, |caps: &Captures| {
        element(&config.formula_tag, &formula_attributes, &caps[1])
    });

    text.into_owned()
}
