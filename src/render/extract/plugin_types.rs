use super::{INLINE_LIST_CLASS, TEXT_ITEM_CLASS};
use crate::dataset::PluginRecord;

/// List the capabilities a plugin declares, each linking to the filtered
/// index view. A plugin with no contribution indicators yields nothing.
pub fn extract(record: &PluginRecord) -> String {
    let mut kinds: Vec<&str> = Vec::new();
    if record.reader_command.is_some() {
        kinds.push("reader");
    }
    if record.writer_command.is_some() {
        kinds.push("writer");
    }
    if record.widget_command.is_some() {
        kinds.push("widget");
    }
    if record.sample_data_command.is_some() {
        kinds.push("sample_data");
    }

    if kinds.is_empty() {
        return String::new();
    }

    let mut html = format!("<ul class=\"{INLINE_LIST_CLASS}\">");
    for kind in kinds {
        html.push_str(&format!(
            "<li class=\"{TEXT_ITEM_CLASS}\"><a class=\"{TEXT_ITEM_CLASS} underline\" \
             href=\"../index.html?pluginType={kind}\">{}</a></li>",
            capitalize(kind)
        ));
    }
    html.push_str("</ul>");
    html
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ── Tests ──
