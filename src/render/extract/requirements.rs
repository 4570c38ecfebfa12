use super::{BLOCK_LIST_CLASS, TEXT_ITEM_CLASS};
use crate::dataset::PluginRecord;

/// Declared distribution requirements as plain list items, no links.
pub fn extract(record: &PluginRecord) -> String {
    let Some(requirements) = &record.requires_dist else {
        return String::new();
    };
    if requirements.is_empty() {
        return String::new();
    }

    let mut html = format!("<ul class=\"{BLOCK_LIST_CLASS}\">");
    for requirement in requirements {
        html.push_str(&format!(
            "<li class=\"{TEXT_ITEM_CLASS}\">{requirement}</li>"
        ));
    }
    html.push_str("</ul>");
    html
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_requirements_yield_empty_fragment() {
        assert_eq!(extract(&PluginRecord::default()), "");
    }

    #[test]
    fn requirements_render_as_plain_items() {
        let record = PluginRecord {
            requires_dist: Some(vec![
                "numpy>=1.21".to_string(),
                "magicgui".to_string(),
            ]),
            ..Default::default()
        };
        let html = extract(&record);
        assert_eq!(html.matches("<li").count(), 2);
        assert!(html.contains("numpy>=1.21"));
        assert!(!html.contains("<a "));
    }
}
