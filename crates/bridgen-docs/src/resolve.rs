use crate::entity::EntityDocs;
use crate::reformat::Reformatter;

/// Outcome of [`resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    /// The description came from the attributes listing rather than the arguments.
    pub from_attributes: bool,
}

impl Resolved {
    fn argument(text: &str) -> Self {
        Self {
            text: text.to_string(),
            from_attributes: false,
        }
    }
}

/// Picks the description for the property at `path` (source keys, outermost first).
///
/// Lookup order, first non-empty hit wins:
///
/// 1. arguments, trying the full dotted path and then dropping leading segments; at each step
///    both the flat key and the parent's nested listing are consulted
/// 2. attributes, with the same stripping
/// 3. the schema's own description, reformatted
/// 4. the unique argument whose last path segment equals the leaf key
///
/// Returns an empty text when nothing matches or the leaf is ambiguous.
pub fn resolve(
    docs: &EntityDocs,
    path: &[String],
    raw_description: &str,
    reformatter: &Reformatter,
) -> Resolved {
    let Some(leaf) = path.last() else {
        return Resolved::default();
    };

    for start in 0..path.len() {
        let candidate = &path[start..];
        if let Some(arg) = docs.arguments.get(&candidate.join(".")) {
            if !arg.description.is_empty() {
                return Resolved::argument(&arg.description);
            }
        }
        if let Some((last, parent)) = candidate.split_last() {
            if parent.is_empty() {
                continue;
            }
            let nested = docs
                .arguments
                .get(&parent.join("."))
                .and_then(|arg| arg.nested_arguments.get(last));
            if let Some(text) = nested.filter(|t| !t.is_empty()) {
                return Resolved::argument(text);
            }
        }
    }

    for start in 0..path.len() {
        if let Some(text) = docs
            .attributes
            .get(&path[start..].join("."))
            .filter(|t| !t.is_empty())
        {
            return Resolved {
                text: text.clone(),
                from_attributes: true,
            };
        }
    }

    if !raw_description.is_empty() {
        let text = reformatter.reformat(raw_description);
        if !text.is_empty() {
            return Resolved {
                text,
                from_attributes: false,
            };
        }
    }

    let mut matches = docs
        .arguments
        .iter()
        .filter(|(key, _)| key.rsplit('.').next() == Some(leaf.as_str()));
    match (matches.next(), matches.next()) {
        (Some((_, arg)), None) => Resolved::argument(&arg.description),
        _ => Resolved::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ArgumentDoc;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    fn docs() -> EntityDocs {
        let mut docs = EntityDocs::default();
        docs.arguments.insert(
            "website".to_string(),
            ArgumentDoc {
                description: "Website config.".to_string(),
                nested_arguments: [("index_document".to_string(), "Index page.".to_string())]
                    .into_iter()
                    .collect(),
                is_nested: false,
            },
        );
        docs.arguments.insert(
            "settings.tier".to_string(),
            ArgumentDoc {
                description: "Machine tier.".to_string(),
                ..ArgumentDoc::default()
            },
        );
        docs.attributes
            .insert("arn".to_string(), "The ARN.".to_string());
        docs
    }

    #[test]
    fn nested_listing_of_parent() {
        let r = resolve(&docs(), &path(&["website", "index_document"]), "", &Reformatter::default());
        assert_eq!(r.text, "Index page.");
        assert!(!r.from_attributes);
    }

    #[test]
    fn leading_segments_stripped() {
        let r = resolve(
            &docs(),
            &path(&["outer", "website", "index_document"]),
            "",
            &Reformatter::default(),
        );
        assert_eq!(r.text, "Index page.");
    }

    #[test]
    fn attributes_flagged() {
        let r = resolve(&docs(), &path(&["arn"]), "schema text", &Reformatter::default());
        assert_eq!(r.text, "The ARN.");
        assert!(r.from_attributes);
    }

    #[test]
    fn schema_description_fallback() {
        let r = resolve(
            &docs(),
            &path(&["unknown"]),
            "Uses `some_field`.  ",
            &Reformatter::default(),
        );
        assert_eq!(r.text, "Uses `someField`.");
    }

    #[test]
    fn full_path_beats_shortened_path() {
        let mut d = docs();
        d.arguments.insert(
            "tier".to_string(),
            ArgumentDoc {
                description: "Top-level tier.".to_string(),
                ..ArgumentDoc::default()
            },
        );
        d.arguments
            .get_mut("website")
            .unwrap()
            .nested_arguments
            .insert("tier".to_string(), "Site tier.".to_string());

        let r = resolve(&d, &path(&["settings", "tier"]), "", &Reformatter::default());
        assert_eq!(r.text, "Machine tier.");
        let r = resolve(&d, &path(&["website", "tier"]), "", &Reformatter::default());
        assert_eq!(r.text, "Site tier.");
        let r = resolve(&d, &path(&["pool", "tier"]), "", &Reformatter::default());
        assert_eq!(r.text, "Top-level tier.");
    }

    #[test]
    fn unique_leaf_fallback() {
        let r = resolve(&docs(), &path(&["other", "tier"]), "", &Reformatter::default());
        assert_eq!(r.text, "Machine tier.");
    }

    #[test]
    fn ambiguous_leaf_is_empty() {
        let mut d = docs();
        d.arguments.insert(
            "pool.tier".to_string(),
            ArgumentDoc {
                description: "Pool tier.".to_string(),
                ..ArgumentDoc::default()
            },
        );
        let r = resolve(&d, &path(&["other", "tier"]), "", &Reformatter::default());
        assert_eq!(r, Resolved::default());
    }

    #[test]
    fn empty_argument_text_falls_through() {
        let mut d = docs();
        d.arguments.insert("arn".to_string(), ArgumentDoc::default());
        let r = resolve(&d, &path(&["arn"]), "", &Reformatter::default());
        assert_eq!(r.text, "The ARN.");
    }
}
