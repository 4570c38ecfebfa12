pub mod extensions;
pub mod homepage;
pub mod os_support;
pub mod plugin_types;
pub mod python_versions;
pub mod requirements;

use crate::dataset::PluginRecord;
use python_versions::VersionBounds;

// Class strings the hub stylesheet targets; shared across the list-shaped
// fragments.
pub(crate) const INLINE_LIST_CLASS: &str =
    "MetadataList_list__3DlqI list-none text-sm leading-normal inline space-y-sds-s MetadataList_inline__jHQLo";
pub(crate) const BLOCK_LIST_CLASS: &str = "MetadataList_list__3DlqI list-none text-sm leading-normal";
pub(crate) const TEXT_ITEM_CLASS: &str = "MetadataList_textItem__KKmMN";

/// The named HTML fragments of one detail page.
pub struct Fragments {
    pub plugin_types: String,
    pub open_extension: String,
    pub save_extension: String,
    pub requirements: String,
    pub python_versions: String,
    pub os: String,
    pub home_link: String,
}

/// Run every extractor over one record. Extractors are pure; a record
/// rendered twice produces identical fragments.
pub fn extract_all(record: &PluginRecord, bounds: &VersionBounds) -> Fragments {
    Fragments {
        plugin_types: plugin_types::extract(record),
        open_extension: extensions::extract_open(record),
        save_extension: extensions::extract_save(record),
        requirements: requirements::extract(record),
        python_versions: python_versions::extract(record, bounds),
        os: os_support::extract(record),
        home_link: homepage::extract(record),
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragments_are_deterministic() {
        let record = PluginRecord {
            reader_command: Some("demo.get_reader".to_string()),
            reader_patterns: Some(vec!["*.tif".to_string()]),
            requires_python: Some(">=3.8".to_string()),
            home_pypi: Some("https://pypi.org/project/demo".to_string()),
            ..Default::default()
        };
        let bounds = VersionBounds::default();
        let first = extract_all(&record, &bounds);
        let second = extract_all(&record, &bounds);
        assert_eq!(first.plugin_types, second.plugin_types);
        assert_eq!(first.open_extension, second.open_extension);
        assert_eq!(first.python_versions, second.python_versions);
        assert_eq!(first.home_link, second.home_link);
    }
}
