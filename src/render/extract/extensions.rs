use super::{INLINE_LIST_CLASS, TEXT_ITEM_CLASS};
use crate::dataset::PluginRecord;

/// File patterns the plugin's reader accepts, linked to the filtered
/// index view. Undecodable or empty pattern lists yield nothing.
pub fn extract_open(record: &PluginRecord) -> String {
    let Some(patterns) = &record.reader_patterns else {
        return String::new();
    };
    linked_list(patterns.iter(), "readerFileExtensions")
}

/// Extensions the plugin's writers emit: both writer columns flattened
/// in column order, duplicates preserved.
pub fn extract_save(record: &PluginRecord) -> String {
    let extensions = record
        .writer_extensions_0
        .iter()
        .flatten()
        .chain(record.writer_extensions_1.iter().flatten());
    linked_list(extensions, "writerFileExtensions")
}

fn linked_list<'a>(items: impl Iterator<Item = &'a String>, query_key: &str) -> String {
    let mut body = String::new();
    for item in items {
        body.push_str(&format!(
            "<li class=\"{TEXT_ITEM_CLASS}\"><a class=\"{TEXT_ITEM_CLASS} underline\" \
             href=\"../index.html?{query_key}={item}\">{item}</a></li>"
        ));
    }
    if body.is_empty() {
        return String::new();
    }
    format!("<ul class=\"{INLINE_LIST_CLASS}\">{body}</ul>")
}

// ── Tests ──
