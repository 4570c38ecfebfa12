use tracing::warn;

use super::{INLINE_LIST_CLASS, TEXT_ITEM_CLASS};
use crate::dataset::PluginRecord;

/// Interpreter window applied when a specifier leaves a bound open.
#[derive(Debug, Clone)]
pub struct VersionBounds {
    pub default_min: String,
    pub max_supported: String,
}

impl Default for VersionBounds {
    fn default() -> Self {
        Self {
            default_min: "3.6".to_string(),
            max_supported: "3.11".to_string(),
        }
    }
}

/// Expand `requires_python` into linked minor versions, lowest first.
/// Unparseable specifiers log a warning and yield nothing.
pub fn extract(record: &PluginRecord, bounds: &VersionBounds) -> String {
    let Some(specifier) = record.requires_python.as_deref() else {
        return String::new();
    };
    let Some(versions) = supported_versions(specifier, bounds) else {
        warn!("Invalid Python version specifier: {}", specifier);
        return String::new();
    };

    let mut html = format!("<ul class=\"{INLINE_LIST_CLASS}\">");
    for version in versions {
        html.push_str(&format!(
            "<li class=\"{TEXT_ITEM_CLASS}\"><a class=\"{TEXT_ITEM_CLASS} underline\" \
             href=\"../index.html?python={version}\">{version}</a></li>"
        ));
    }
    html.push_str("</ul>");
    html
}

/// Resolve the comma-separated clauses into an inclusive minor-version
/// sequence. `>=X.Y` sets the lower bound (last occurrence wins),
/// `<=X.Y` the upper bound, `<X.Y` the upper bound at minor Y-1; clause
/// shapes like `==` or `~=` are ignored. `None` means the specifier
/// could not be parsed (non-numeric or missing minor, inverted range,
/// or an exclusive bound below the whole series).
fn supported_versions(specifier: &str, bounds: &VersionBounds) -> Option<Vec<String>> {
    let mut min = minor_of(&bounds.default_min)?;
    let mut max: Option<u32> = None;

    for clause in specifier.split(',') {
        let clause = clause.trim();
        if let Some((_, version)) = clause.split_once(">=") {
            min = minor_of(version)?;
        } else if let Some((_, version)) = clause.split_once("<=") {
            max = Some(minor_of(version)?);
        } else if let Some((_, version)) = clause.split_once('<') {
            // Integer decrement: `<3.10` admits 3.9 at most.
            max = Some(minor_of(version)?.checked_sub(1)?);
        }
    }

    let max = match max {
        Some(minor) => minor,
        None => minor_of(&bounds.max_supported)?,
    };
    if min > max {
        return None;
    }
    Some((min..=max).map(|minor| format!("3.{minor}")).collect())
}

fn minor_of(version: &str) -> Option<u32> {
    version.trim().split('.').nth(1)?.trim().parse().ok()
}

// ── Tests ──
