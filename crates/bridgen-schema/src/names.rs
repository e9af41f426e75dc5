//! Source-key to target-identifier transformation.
//!
//! Source keys are snake_case (`instance_type`); targets are lower camel case for properties
//! (`instanceType`) and upper camel case for types and resources (`InstanceType`).

use crate::overrides::OverrideInfo;

/// Transform a source key into a target identifier.
///
/// An explicit, non-empty rename in `info` is returned verbatim. Otherwise one trailing `:` is
/// stripped (some upstream schemas ship keys like `output_key:`) and the key is converted to
/// camel case, upper camel when `to_type_case` is set.
///
/// An empty result means the property has no usable name and should be dropped.
pub fn transform(key: &str, info: Option<&OverrideInfo>, to_type_case: bool) -> String {
    if let Some(name) = info.and_then(OverrideInfo::rename) {
        return name.to_string();
    }
    let key = key.strip_suffix(':').unwrap_or(key);
    camel_case(key, to_type_case)
}

/// Lower-camel property name for `key`.
pub fn property_name(key: &str, info: Option<&OverrideInfo>) -> String {
    transform(key, info, false)
}

/// Upper-camel type or resource name for `key`.
pub fn type_name(key: &str) -> String {
    transform(key, None, true)
}

fn camel_case(key: &str, upper: bool) -> String {
    let mut result = String::with_capacity(key.len());
    let mut next_cap = false;
    // Leading underscores are kept as-is.
    let mut casing_activated = false;

    for (i, c) in key.chars().enumerate() {
        if c == '_' && casing_activated {
            next_cap = true;
        } else {
            if c != '_' {
                casing_activated = true;
            }
            if ((i == 0 && upper) || next_cap) && c.is_ascii_lowercase() {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
            next_cap = false;
        }
    }

    // A pending capitalization that never happened keeps a single underscore.
    if next_cap {
        result.push('_');
    }
    result
}

/// Reverse transformation: camel or Pascal case back to snake_case.
pub fn source_name(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i != 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Upper-case the first character.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
