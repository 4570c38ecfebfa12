use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\$|\{([A-Za-z_][A-Za-z0-9_]*)\}|([A-Za-z_][A-Za-z0-9_]*))").unwrap()
});

/// Substitute `$name` / `${name}` placeholders from `values`.
///
/// Non-strict: a placeholder with no mapping key is left verbatim, as is
/// any `$` that does not form a placeholder. `$$` escapes to a literal
/// `$`. Partial templates therefore pass through unchanged where no key
/// matches.
pub fn substitute(template: &str, values: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            if &caps[0] == "$$" {
                return "$".to_string();
            }
            let key = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or("");
            match values.get(key) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

// ── Tests ──
