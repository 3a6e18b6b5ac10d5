//! Route namespace derivation from capability type names.
//!
//! A capability's namespace is a pure function of its declared type
//! name: the final path segment, split into words on CamelCase
//! boundaries, lowercased, and joined with underscores. Routing layers
//! use it to group a capability's functions under one stable prefix.

/// Derive the canonical namespace for a capability type name.
///
/// Only the final `::`-separated segment of a namespaced identifier is
/// considered. Acronym runs split before their last capital
/// (`HTTPServer` becomes `http_server`), digits stay attached to their
/// word, and existing underscores are kept as word boundaries. The
/// result contains only `[a-z0-9_]`, with no leading, trailing, or
/// doubled underscores, which makes the function idempotent.
///
/// A single-word type name yields that word lowercased. An empty input
/// yields the empty string.
#[must_use]
pub fn derive(type_name: &str) -> String {
    let tail = type_name.rsplit("::").next().unwrap_or(type_name);
    let chars: Vec<char> = tail.chars().collect();
    let mut out = String::with_capacity(tail.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_alphanumeric() {
            // Runs of separators collapse to a single boundary.
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|j| chars[j]);
            let next = chars.get(i + 1);
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                // Last capital of an acronym run starts the next word.
                Some(p) if p.is_ascii_uppercase() => {
                    next.is_some_and(|n| n.is_ascii_lowercase())
                }
                _ => false,
            };
            if boundary && !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.push(c.to_ascii_lowercase());
    }

    out.trim_matches('_').to_string()
}
