use super::BLOCK_LIST_CLASS;
use crate::dataset::PluginRecord;

/// Platform support is not collected upstream yet, so every page gets
/// the same placeholder fragment regardless of the record's classifiers.
pub fn extract(_record: &PluginRecord) -> String {
    format!(
        "<ul class=\"{BLOCK_LIST_CLASS}\">\
         <li class=\"flex justify-between items-center\">\
         <span class=\"text-napari-gray font-normal lowercase\">Information not submitted</span>\
         </li></ul>"
    )
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_the_same_placeholder() {
        let empty = PluginRecord::default();
        let full = PluginRecord {
            reader_command: Some("demo.get_reader".to_string()),
            ..Default::default()
        };
        assert_eq!(extract(&empty), extract(&full));
        assert!(extract(&empty).contains("Information not submitted"));
    }
}
