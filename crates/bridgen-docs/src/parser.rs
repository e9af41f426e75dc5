//! Markdown page to [`EntityDocs`].
//!
//! Pages are split at `## ` headers, then each section at `### ` headers. Argument, attribute and
//! import sections are parsed line by line; everything else is folded into the description.

use crate::entity::{ArgumentDoc, EntityDocs};
use crate::reformat::{DEFAULT_DOCS_BASE_URL, Reformatter};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

const GENERATED_COMMENT: &str = "<!-- schema generated by tfplugindocs -->\n";

static ARGUMENT_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*[*+-]\s+`([a-zA-Z0-9_]*)`\s*(\([a-zA-Z]*\)\s*)?[–:-]?(?:\s+|$)(\([^)]*\)\s*)?(.*)$",
    )
    .unwrap()
});
static ATTRIBUTE_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[*+-]\s+`([a-zA-Z0-9_]*)`\s*[–:-]?\s+(.*)$").unwrap()
});
static FOOTER_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\[([0-9]+)\]:\s*(\S+)\s*$").unwrap());

/// Lines announcing that the following bullets belong to a nested block.
static NESTED_BLOCK_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"`([a-z_]+)`.*following",
        r"(?i)## ([a-z][a-z\d_]+).* argument reference",
        r"`([a-z_]+)`.*block supports:",
        r"`([a-z_.]+)`.*(?:sublist|subblock) supports:",
        r"`([a-z_.]+)`.*block.*supports:",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Knobs for [`parse_with`].
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Upstream entity name, used in log fields and import examples.
    pub raw_name: String,
    /// Target token substituted into rewritten import commands.
    pub import_token: Option<String>,
    /// Replaces the parsed import section entirely when set.
    pub import_details: Option<String>,
    /// Command prefix of rewritten import examples.
    pub import_command: String,
    pub base_url: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            raw_name: String::new(),
            import_token: None,
            import_details: None,
            import_command: "pulumi import".to_string(),
            base_url: DEFAULT_DOCS_BASE_URL.to_string(),
        }
    }
}

/// Parses a documentation page with default options.
pub fn parse(markdown: &[u8]) -> EntityDocs {
    parse_with(markdown, &ParseOptions::default())
}

/// Parses a documentation page.
///
/// Never fails: unrecognized structure ends up in the description, and malformed bullets are
/// skipped. Every recorded description is passed through a [`Reformatter`] configured with
/// `options.base_url` and the page's footer links.
pub fn parse_with(markdown: &[u8], options: &ParseOptions) -> EntityDocs {
    let text = String::from_utf8_lossy(markdown)
        .replace("\r\n", "\n")
        .replace(GENERATED_COMMENT, "");

    let mut parser = PageParser {
        options,
        docs: EntityDocs::default(),
        import_parts: Vec::new(),
    };
    let mut sections = group_lines(text.split('\n'), "## ").into_iter();
    if let Some(preamble) = sections.next() {
        parser.parse_preamble(&preamble);
    }
    for section in sections {
        parser.parse_section(&section);
    }
    let mut docs = parser.finish();

    let reformatter =
        Reformatter::new(options.base_url.clone()).with_footer_links(footer_links(&text));
    cleanup(&mut docs, &reformatter);
    tracing::debug!(
        entity = %options.raw_name,
        arguments = docs.arguments.len(),
        attributes = docs.attributes.len(),
        "parsed docs"
    );
    docs
}

/// Collects `[n]: url` footer link definitions keyed by `n`.
pub fn footer_links(text: &str) -> BTreeMap<String, String> {
    FOOTER_LINK
        .captures_iter(text)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Arguments,
    Attributes,
    Import,
    Ignored,
    Other,
}

impl SectionKind {
    fn of(header: &str) -> Self {
        match header {
            "Arguments Reference" | "Argument Reference" | "Argument reference" | "Nested Blocks"
            | "Nested blocks" => SectionKind::Arguments,
            "Attributes Reference" | "Attribute Reference" | "Attribute reference" => {
                SectionKind::Attributes
            }
            "Import" | "Imports" => SectionKind::Import,
            "Timeout" | "Timeouts" | "User Project Override" | "User Project Overrides" => {
                SectionKind::Ignored
            }
            _ => SectionKind::Other,
        }
    }
}

struct PageParser<'a> {
    options: &'a ParseOptions,
    docs: EntityDocs,
    import_parts: Vec<String>,
}

impl PageParser<'_> {
    fn parse_preamble(&mut self, lines: &[&str]) {
        let mut lines = lines;
        if lines.first().is_some_and(|l| l.trim() == "---") {
            match lines[1..].iter().position(|l| l.trim() == "---") {
                Some(end) => lines = &lines[end + 2..],
                None => {
                    tracing::warn!(entity = %self.options.raw_name, "unterminated front matter");
                    return;
                }
            }
        }

        let mut last_blank = true;
        for line in lines {
            if line.starts_with("# ") {
                continue;
            }
            if is_blank(line) {
                if !last_blank {
                    self.docs.description.push('\n');
                }
                last_blank = true;
            } else {
                self.docs.description.push_str(line);
                self.docs.description.push('\n');
                last_blank = false;
            }
        }
    }

    fn parse_section(&mut self, lines: &[&str]) {
        let Some((first, body)) = lines.split_first() else {
            return;
        };
        let header = first.trim_start_matches("## ").trim();
        let kind = SectionKind::of(header);
        if kind == SectionKind::Ignored {
            tracing::debug!(entity = %self.options.raw_name, header, "skipping section");
            return;
        }

        // A free-form section named after an argument documents that argument's block.
        let block = match kind {
            SectionKind::Other => self.argument_named(header),
            _ => None,
        };

        let mut wrote_header = false;
        for sub in group_lines(body.iter().copied(), "### ") {
            if sub.is_empty() || sub[0].trim() == "### Timeouts" {
                continue;
            }
            match kind {
                SectionKind::Arguments => self.parse_arguments(&sub, None),
                SectionKind::Attributes => self.parse_attributes(&sub),
                SectionKind::Import => self.parse_import(&sub),
                SectionKind::Ignored => {}
                SectionKind::Other => {
                    if block.is_some() {
                        self.parse_arguments(&sub, block.clone());
                    }
                    if sub.iter().all(|l| is_blank(l)) {
                        continue;
                    }
                    if !wrote_header {
                        self.docs.description.push_str("## ");
                        self.docs.description.push_str(header);
                        self.docs.description.push('\n');
                        wrote_header = true;
                        if !is_blank(sub[0]) {
                            self.docs.description.push('\n');
                        }
                    }
                    self.docs.description.push_str(&sub.join("\n"));
                    self.docs.description.push('\n');
                }
            }
        }
    }

    /// Maps a section title such as `` `website` Configuration Block `` to a known argument.
    fn argument_named(&self, header: &str) -> Option<String> {
        let name = header
            .trim_end_matches(" Configuration Block")
            .trim_end_matches(" Configuration block")
            .trim_matches('`')
            .trim();
        if name.is_empty() {
            return None;
        }
        if self.docs.arguments.contains_key(name) {
            return Some(name.to_string());
        }
        let mut parents = self
            .docs
            .arguments
            .iter()
            .filter(|(_, arg)| arg.nested_arguments.contains_key(name))
            .map(|(parent, _)| format!("{parent}.{name}"));
        match (parents.next(), parents.next()) {
            (Some(path), None) => Some(path),
            _ => None,
        }
    }

    fn parse_arguments(&mut self, lines: &[&str], parent: Option<String>) {
        let mut block = parent;
        let mut last: Option<String> = None;

        for line in lines {
            let is_marker = line.trim_end().ends_with("supports the following:");
            let bullet = if is_marker {
                None
            } else {
                ARGUMENT_BULLET.captures(line)
            };

            if let Some(caps) = bullet {
                let name = caps[1].to_string();
                let description = caps.get(4).map_or("", |m| m.as_str()).trim().to_string();
                match &block {
                    Some(block) => self.record_nested(block, &name, description),
                    None => self.record_argument(&name, description),
                }
                last = Some(name);
            } else if !is_blank(line) && !is_marker && last.is_some() {
                if let Some(name) = &last {
                    self.continue_argument(block.as_deref(), name, line.trim());
                }
            } else {
                if let Some(name) = self.nested_block_name(line) {
                    self.docs.arguments.entry(name.clone()).or_default();
                    block = Some(name);
                }
                last = None;
            }
        }
    }

    fn record_argument(&mut self, name: &str, description: String) {
        let entry = self.docs.arguments.entry(name.to_string()).or_default();
        entry.description = description;
        entry.is_nested = false;
    }

    /// Nested bullets are kept under their block and also flat, so a leaf can be found without
    /// knowing where its block sits.
    fn record_nested(&mut self, block: &str, name: &str, description: String) {
        self.docs
            .arguments
            .entry(block.to_string())
            .or_default()
            .nested_arguments
            .insert(name.to_string(), description.clone());
        let flat = self.docs.arguments.entry(name.to_string()).or_default();
        flat.description = description;
        flat.is_nested = true;
    }

    fn continue_argument(&mut self, block: Option<&str>, name: &str, text: &str) {
        if let Some(nested) = block
            .and_then(|b| self.docs.arguments.get_mut(b))
            .and_then(|arg| arg.nested_arguments.get_mut(name))
        {
            nested.push('\n');
            nested.push_str(text);
        }
        if let Some(arg) = self.docs.arguments.get_mut(name) {
            arg.description.push('\n');
            arg.description.push_str(text);
        }
    }

    fn nested_block_name(&self, line: &str) -> Option<String> {
        if let Some(header) = line.strip_prefix("### ") {
            if let Some(name) = self.argument_named(header.trim()) {
                return Some(name);
            }
        }
        let name = NESTED_BLOCK_MARKERS
            .iter()
            .find_map(|re| re.captures(line))
            .map(|caps| caps[1].to_lowercase())?;
        if !name.contains('.') && !self.docs.arguments.contains_key(&name) {
            tracing::debug!(
                entity = %self.options.raw_name,
                block = %name,
                "nested block without a previous mention"
            );
        }
        Some(name)
    }

    fn parse_attributes(&mut self, lines: &[&str]) {
        let mut last: Option<String> = None;
        for line in lines {
            if let Some(caps) = ATTRIBUTE_BULLET.captures(line) {
                let name = caps[1].to_string();
                self.docs
                    .attributes
                    .insert(name.clone(), caps[2].trim().to_string());
                last = Some(name);
            } else if !is_blank(line) {
                if let Some(text) = last.as_ref().and_then(|n| self.docs.attributes.get_mut(n)) {
                    text.push('\n');
                    text.push_str(line.trim());
                }
            } else {
                last = None;
            }
        }
    }

    fn parse_import(&mut self, lines: &[&str]) {
        if self.options.import_details.is_some() {
            return;
        }
        for line in lines {
            if line.starts_with("### ")
                || line.contains("**NOTE:")
                || line.contains("**Please Note:")
                || line.contains("**Note:**")
                || line.contains("Import is supported using the following syntax")
            {
                continue;
            }
            let line = line
                .replace("```shell", "")
                .replace("```sh", "")
                .replace("```", "");
            if line.contains("terraform import") {
                self.import_parts.push(self.rewrite_import(&line));
            } else if !is_blank(&line) {
                self.import_parts.push(line.trim_end().to_string());
            }
        }
    }

    /// `$ terraform import aws_s3_bucket.bucket bucket-name` becomes a fenced example of the
    /// target command keyed by the entity's token.
    fn rewrite_import(&self, line: &str) -> String {
        let command = line.replace("$ ", "").replace("terraform import ", "");
        let mut words = command.split_whitespace();
        let name = words
            .next()
            .map(|address| address.rsplit('.').next().unwrap_or(address))
            .unwrap_or_default();
        let rest: Vec<&str> = words.collect();
        let token = self.options.import_token.as_deref().unwrap_or("MISSING_TOK");
        let mut out = format!("```sh\n$ {} {token} {name}", self.options.import_command);
        for word in rest {
            out.push(' ');
            out.push_str(word);
        }
        out.push_str("\n```");
        out
    }

    fn finish(mut self) -> EntityDocs {
        if let Some(details) = &self.options.import_details {
            self.docs.import_instructions = format!("## Import\n\n{details}");
        } else if !self.import_parts.is_empty() {
            self.docs.import_instructions =
                format!("## Import\n\n{}", self.import_parts.join("\n\n"));
        }
        self.docs
    }
}

fn cleanup(docs: &mut EntityDocs, reformatter: &Reformatter) {
    docs.description = reformatter.reformat(&docs.description);
    docs.import_instructions = reformatter.reformat(&docs.import_instructions);
    for arg in docs.arguments.values_mut() {
        clean_argument(arg, reformatter);
    }
    for text in docs.attributes.values_mut() {
        *text = reformatter.reformat(text);
    }
}

fn clean_argument(arg: &mut ArgumentDoc, reformatter: &Reformatter) {
    arg.description = reformatter.reformat(&arg.description);
    for text in arg.nested_arguments.values_mut() {
        *text = reformatter.reformat(text);
    }
}

/// Splits `lines` into groups starting at lines with `prefix`. The first group holds whatever
/// precedes the first such line and may be empty.
fn group_lines<'a>(lines: impl IntoIterator<Item = &'a str>, prefix: &str) -> Vec<Vec<&'a str>> {
    let mut groups = vec![Vec::new()];
    for line in lines {
        if line.starts_with(prefix) {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push(line);
        }
    }
    groups
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NESTED_INPUT: &str = "## Argument Reference

The following arguments are supported:

* `bucket` - (Optional, Forces new resource) The name of the bucket.
* `website` - (Optional) A website object (documented below).
* `index_document` - (Required, unless using `redirect_all_requests_to`) Amazon S3 returns this index document.

The `website` object supports the following:

* `routing_rules` - (Optional) A json array containing routing rules
describing redirect behavior.
";

    #[test]
    fn top_level_arguments() {
        let docs = parse(NESTED_INPUT.as_bytes());
        assert_eq!(docs.arguments["bucket"].description, "The name of the bucket.");
        assert_eq!(
            docs.arguments["website"].description,
            "A website object (documented below)."
        );
        assert!(!docs.arguments["bucket"].is_nested);
    }

    #[test]
    fn annotation_with_code_span_is_stripped() {
        let docs = parse(NESTED_INPUT.as_bytes());
        assert_eq!(
            docs.arguments["index_document"].description,
            "Amazon S3 returns this index document."
        );
    }

    #[test]
    fn marker_nests_following_bullets() {
        let docs = parse(NESTED_INPUT.as_bytes());
        let website = &docs.arguments["website"];
        assert_eq!(
            website.nested_arguments["routing_rules"],
            "A json array containing routing rules\ndescribing redirect behavior."
        );
        let flat = &docs.arguments["routing_rules"];
        assert!(flat.is_nested);
        assert_eq!(flat.description, website.nested_arguments["routing_rules"]);
    }

    #[test]
    fn supports_bullet_is_a_marker() {
        let input = "## Argument Reference

* `retention_policy` - (Required) The retention policy.

---

* `retention_policy` supports the following:

* `days` - (Required) Number of days.
";
        let docs = parse(input.as_bytes());
        assert_eq!(
            docs.arguments["retention_policy"].description,
            "The retention policy."
        );
        assert_eq!(
            docs.arguments["retention_policy"].nested_arguments["days"],
            "Number of days."
        );
    }

    #[test]
    fn last_bullet_wins() {
        let input = "## Argument Reference\n\n* `name` - first\n* `name` - second\n";
        let docs = parse(input.as_bytes());
        assert_eq!(docs.arguments["name"].description, "second");
    }

    #[test]
    fn indented_bullets_stay_top_level() {
        let input = "## Argument Reference

* `settings` - (Required) Settings.
    * `tier` - (Required) Machine tier.
";
        let docs = parse(input.as_bytes());
        assert_eq!(docs.arguments["tier"].description, "Machine tier.");
        assert!(!docs.arguments["tier"].is_nested);
        assert!(docs.arguments["settings"].nested_arguments.is_empty());
    }

    #[test]
    fn empty_description_recorded() {
        let docs = parse(b"## Argument Reference\n\n* `flag` - (Optional)\n");
        assert_eq!(docs.arguments["flag"].description, "");
    }

    #[test]
    fn colon_separator() {
        let docs = parse(b"## Arguments Reference\n\n* `name`: (Required) The name.\n");
        assert_eq!(docs.arguments["name"].description, "The name.");
    }

    #[test]
    fn attributes_section() {
        let input = "## Attributes Reference

In addition to all arguments above, the following attributes are exported:

* `id` - The name of the bucket.
* `arn` - The ARN of the bucket. Will be of format
  `arn:aws:s3:::bucketname`.
";
        let docs = parse(input.as_bytes());
        assert_eq!(docs.attributes["id"], "The name of the bucket.");
        assert_eq!(
            docs.attributes["arn"],
            "The ARN of the bucket. Will be of format\n`arn:aws:s3:::bucketname`."
        );
    }

    #[test]
    fn front_matter_and_title_dropped() {
        let input = "---
layout: \"aws\"
page_title: \"AWS: aws_s3_bucket\"
---

# Resource: aws_s3_bucket

Provides a S3 bucket resource.

## Example Usage

```hcl
resource \"aws_s3_bucket\" \"b\" {}
```
";
        let docs = parse(input.as_bytes());
        insta::assert_snapshot!(docs.description, @r#"
        Provides a S3 bucket resource.

        ## Example Usage

        ```hcl
        resource "aws_s3_bucket" "b" {}
        ```
        "#);
    }

    #[test]
    fn ignored_sections() {
        let input = "Intro.\n\n## Timeouts\n\n* `create` - (Default `10m`) Create.\n";
        let docs = parse(input.as_bytes());
        assert_eq!(docs.description, "Intro.");
        assert!(docs.arguments.is_empty());
    }

    #[test]
    fn section_named_after_argument() {
        let input = "## Argument Reference

* `website` - (Optional) Website.

## website Configuration Block

* `index_document` - (Required) Index.
";
        let docs = parse(input.as_bytes());
        assert_eq!(docs.arguments["website"].nested_arguments["index_document"], "Index.");
        assert!(docs.description.contains("## website Configuration Block"));
    }

    #[test]
    fn import_rewritten() {
        let input = "## Import

S3 bucket can be imported using the `bucket`, e.g.

```
$ terraform import aws_s3_bucket.bucket bucket-name
```
";
        let options = ParseOptions {
            import_token: Some("aws:s3/bucket:Bucket".to_string()),
            ..ParseOptions::default()
        };
        let docs = parse_with(input.as_bytes(), &options);
        assert_eq!(
            docs.import_instructions,
            "## Import\n\nS3 bucket can be imported using the `bucket`, e.g.\n\n```sh\n$ pulumi import aws:s3/bucket:Bucket bucket bucket-name\n```"
        );
    }

    #[test]
    fn import_prose_is_reformatted() {
        let input = "## Import

Import by `bucket_name`, see [the guide][1].

```
$ terraform import aws_s3_bucket.bucket bucket_name
```

[1]: /docs/import.html
";
        let docs = parse(input.as_bytes());
        insta::assert_snapshot!(docs.import_instructions, @r"
        ## Import

        Import by `bucketName`, see [the guide](https://www.terraform.io/docs/import.html).

        ```sh
        $ pulumi import MISSING_TOK bucket bucket_name
        ```

        [1]: https://www.terraform.io/docs/import.html
        ");
    }

    #[test]
    fn import_details_override() {
        let options = ParseOptions {
            import_details: Some("Use the console.".to_string()),
            ..ParseOptions::default()
        };
        let docs = parse_with(b"## Import\n\n$ terraform import a.b c\n", &options);
        assert_eq!(docs.import_instructions, "## Import\n\nUse the console.");
    }

    #[test]
    fn crlf_and_generated_comment() {
        let input = "Desc.\r\n<!-- schema generated by tfplugindocs -->\r\n## Argument Reference\r\n\r\n* `a` - (Optional) A.\r\n";
        let docs = parse(input.as_bytes());
        assert_eq!(docs.description, "Desc.");
        assert_eq!(docs.arguments["a"].description, "A.");
    }

    #[test]
    fn group_lines_keeps_preamble() {
        let groups = group_lines("## a\nx\n## b".split('\n'), "## ");
        assert_eq!(groups, vec![vec![], vec!["## a", "x"], vec!["## b"]]);
    }
}
