//! Description cleanup applied to every parsed doc string.

use bridgen_schema::names;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Prefix for site-relative links found in upstream docs.
pub const DEFAULT_DOCS_BASE_URL: &str = "https://www.terraform.io";

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^[ \t]*```[^\n]*$.*?^[ \t]*```[^\n]*$").unwrap());
static FOOTER_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[[a-zA-Z?.! ]+\])\[([0-9]+)\]").unwrap());
static FOOTER_DEFINITION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\[[0-9]+\]:\s*)(/docs/\S*)$").unwrap());
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());
static TRAILING_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SNAKE_CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([0-9a-z]+(?:_[0-9a-z]+)+)`").unwrap());

/// Rewrites upstream Markdown into the form used in generated docs.
///
/// Outside fenced code blocks this turns callouts (`-> `, `~> `) into quotes, resolves footer
/// references (`[text][1]`), absolutizes site-relative links and drops anchor or relative ones,
/// renames snake_case code spans to property names and normalizes whitespace.
#[derive(Debug, Clone)]
pub struct Reformatter {
    base_url: String,
    footer_links: BTreeMap<String, String>,
}

impl Default for Reformatter {
    fn default() -> Self {
        Self::new(DEFAULT_DOCS_BASE_URL)
    }
}

impl Reformatter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            footer_links: BTreeMap::new(),
        }
    }

    /// Footer link targets keyed by their number, as collected by
    /// [`footer_links`](crate::footer_links).
    pub fn with_footer_links(mut self, links: BTreeMap<String, String>) -> Self {
        self.footer_links = links;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn reformat(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for fence in CODE_FENCE.find_iter(text) {
            out.push_str(&self.reformat_prose(&text[last..fence.start()]));
            out.push_str(fence.as_str());
            last = fence.end();
        }
        out.push_str(&self.reformat_prose(&text[last..]));
        out.trim().to_string()
    }

    fn reformat_prose(&self, text: &str) -> String {
        let text = text.replace("-> ", "> ").replace("~> ", "> ");

        let text = FOOTER_REFERENCE.replace_all(&text, |caps: &Captures| {
            match self.footer_links.get(&caps[2]) {
                Some(url) => format!("{}({})", &caps[1], url),
                None => caps[0].to_string(),
            }
        });

        let text = FOOTER_DEFINITION.replace_all(&text, |caps: &Captures| {
            format!("{}{}{}", &caps[1], self.base_url, &caps[2])
        });

        let text = MARKDOWN_LINK.replace_all(&text, |caps: &Captures| {
            let (label, url) = (&caps[1], &caps[2]);
            if url.starts_with("http") {
                caps[0].to_string()
            } else if url.starts_with('/') {
                format!("[{label}]({}{url})", self.base_url)
            } else {
                label.to_string()
            }
        });

        let text = SNAKE_CODE_SPAN.replace_all(&text, |caps: &Captures| {
            format!("`{}`", names::property_name(&caps[1], None))
        });

        collapse_blank_lines(&text)
    }
}

/// Strips trailing whitespace from every line and squeezes runs of blank lines down to one.
fn collapse_blank_lines(text: &str) -> String {
    let text = TRAILING_SPACE.replace_all(text, "");
    BLANK_RUN.replace_all(&text, "\n\n").into_owned()
}
