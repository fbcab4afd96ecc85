//! Depth-first search for base64 key material inside an untyped JSON body.

use serde_json::Value;

/// Recursion bound used by [`locate`].
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Minimum length of a string considered as key material.
const MIN_CANDIDATE_LEN: usize = 8;

/// A string found by [`locate`], together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedField {
    /// Object key the value sat under, or `[i]` for a bare array element.
    pub field_name: String,
    /// The candidate string exactly as it appeared in the body.
    pub raw_value: String,
    /// Dotted/bracketed locator, e.g. `wrapped.items[0].data`.
    pub path: String,
}

impl LocatedField {
    fn leaf(field_name: impl Into<String>, raw_value: &str) -> Self {
        let field_name = field_name.into();
        Self {
            path: field_name.clone(),
            field_name,
            raw_value: raw_value.to_owned(),
        }
    }

    fn under(mut self, prefix: &str) -> Self {
        self.path = if self.path.starts_with('[') {
            format!("{prefix}{}", self.path)
        } else {
            format!("{prefix}.{}", self.path)
        };
        self
    }
}

/// Tuning for [`locate_with`].
#[derive(Debug, Clone, Copy)]
pub struct LocateOptions {
    /// Fall back to a structural search when no preferred name matches.
    pub recursive: bool,
    /// Nesting levels below the root that may still be inspected.
    pub max_depth: usize,
}

impl Default for LocateOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Heuristic base64 check.
///
/// Accepts the standard and URL-safe alphabets, even mixed within one string,
/// followed by at most two `=`. Not a validator: decoding can still fail.
pub fn looks_like_base64(s: &str) -> bool {
    if s.len() < MIN_CANDIDATE_LEN {
        return false;
    }
    let body = s.trim_end_matches('=');
    if s.len() - body.len() > 2 || body.is_empty() {
        return false;
    }
    body.bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'_' | b'-'))
}

/// Find key material in `body`, trying `preferred` names before anything else.
pub fn locate(body: &Value, preferred: &[&str]) -> Option<LocatedField> {
    locate_with(body, preferred, LocateOptions::default())
}

/// [`locate`] with explicit options.
pub fn locate_with(body: &Value, preferred: &[&str], opts: LocateOptions) -> Option<LocatedField> {
    search(body, preferred, opts, 0)
}

fn search(body: &Value, preferred: &[&str], opts: LocateOptions, depth: usize) -> Option<LocatedField> {
    if let Some(hit) = preferred_pass(body, preferred, opts, depth) {
        return Some(hit);
    }
    if !opts.recursive {
        return None;
    }
    structural_pass(body, preferred, opts, depth)
}

fn preferred_pass(
    body: &Value,
    preferred: &[&str],
    opts: LocateOptions,
    depth: usize,
) -> Option<LocatedField> {
    let map = body.as_object()?;
    for name in preferred {
        match map.get(*name) {
            Some(Value::String(s)) if looks_like_base64(s) => {
                return Some(LocatedField::leaf(*name, s));
            }
            Some(child @ Value::Object(_)) if depth < opts.max_depth => {
                if let Some(hit) = search(child, preferred, opts, depth + 1) {
                    return Some(hit.under(name));
                }
            }
            _ => {}
        }
    }
    None
}

fn structural_pass(
    body: &Value,
    preferred: &[&str],
    opts: LocateOptions,
    depth: usize,
) -> Option<LocatedField> {
    match body {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| visit(&format!("[{i}]"), item, preferred, opts, depth)),
        // Objects under a preferred name were already searched, at this same
        // depth, by the preferred pass.
        Value::Object(map) => map
            .iter()
            .filter(|(key, item)| !(item.is_object() && preferred.contains(&key.as_str())))
            .find_map(|(key, item)| visit(key, item, preferred, opts, depth)),
        _ => None,
    }
}

fn visit(
    label: &str,
    item: &Value,
    preferred: &[&str],
    opts: LocateOptions,
    depth: usize,
) -> Option<LocatedField> {
    match item {
        Value::String(s) if looks_like_base64(s) => Some(LocatedField::leaf(label, s)),
        Value::Array(_) | Value::Object(_) if depth < opts.max_depth => {
            search(item, preferred, opts, depth + 1).map(|hit| hit.under(label))
        }
        _ => None,
    }
}
