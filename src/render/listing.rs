use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::dataset::PluginRecord;

const LISTING_MISSING: &str = "N/A";

/// Write the aggregate listing page for the whole dataset.
pub fn build(records: &[PluginRecord], output_path: &Path) -> Result<()> {
    let html = render_listing(records);
    fs::write(output_path, html)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    Ok(())
}

/// One anchor-wrapped card per record, in caller order.
pub fn render_listing(records: &[PluginRecord]) -> String {
    let mut html = String::from("<html>\n<body>\n");
    for record in records {
        html.push_str(&render_card(record));
    }
    html.push_str("</body>\n</html>");
    html
}

fn render_card(record: &PluginRecord) -> String {
    let or_na =
        |value: &Option<String>| value.clone().unwrap_or_else(|| LISTING_MISSING.to_string());

    let display_name = record
        .display_name
        .as_deref()
        .or(record.name.as_deref())
        .or((!record.normalized_name.is_empty()).then_some(record.normalized_name.as_str()))
        .unwrap_or("unknown");
    let name = record.name.as_deref().unwrap_or("unknown");
    let summary = or_na(&record.summary);
    let author = or_na(&record.author);
    let release_date = or_na(&record.created_at);
    let last_updated = or_na(&record.modified_at);
    let plugin_type = plugin_type_summary(record);
    let plugin_id = record.plugin_id;
    let html_filename = &record.html_filename;

    format!(
        r#"
<a class="col-span-2 screen-1425:col-span-3 searchResult py-sds-xl border-black border-t-2 last:border-b-2 hover:bg-hub-gray-100"
   data-testid="pluginSearchResult" href="./plugins/{html_filename}" data-plugin-id="{plugin_id}">
    <article class="grid gap-x-sds-xl screen-495:gap-x-12 screen-600:grid-cols-2 screen-1425:grid-cols-napari-3" data-testid="searchResult">
        <div class="col-span-2 screen-495:col-span-1 screen-1425:col-span-2 flex flex-col justify-between">
            <div>
                <h3 class="font-bold text-lg" data-testid="searchResultDisplayName">{display_name}</h3>
                <span class="mt-sds-m screen-495:mt-3 text-[0.6875rem]" data-testid="searchResultName">{name}</span>
                <p class="mt-3" data-testid="searchResultSummary">{summary}</p>
            </div>
            <ul class="mt-3 text-xs">
                <li class="my-sds-s font-bold PluginSearchResult_linkItem__Vvs7H" data-testid="searchResultAuthor">{author}</li>
            </ul>
        </div>
        <ul class="mt-sds-l screen-600:m-0 space-y-1 text-sm col-span-2 screen-495:col-span-1">
            <li class="grid grid-cols-[auto,1fr]" data-label="First released" data-testid="searchResultMetadata" data-value="{release_date}">
                <h4 class="inline whitespace-nowrap">First released<!-- -->: </h4>
                <span class="ml-sds-xxs font-bold">{release_date}</span>
            </li>
            <li class="grid grid-cols-[auto,1fr]" data-label="Last updated" data-testid="searchResultMetadata" data-value="{last_updated}">
                <h4 class="inline whitespace-nowrap">Last updated<!-- -->: </h4>
                <span class="ml-sds-xxs font-bold">{last_updated}</span>
            </li>
            <li class="grid grid-cols-[auto,1fr]" data-label="Plugin type" data-testid="searchResultMetadata" data-value="{plugin_type}">
                <h4 class="inline whitespace-nowrap">Plugin type<!-- -->: </h4>
                <span class="ml-sds-xxs font-bold">{plugin_type}</span>
            </li>
        </ul>
        <div class="mt-sds-xl text-xs flex flex-col gap-sds-s col-span-2 screen-1425:col-span-3"></div>
    </article>
</a>
"#
    )
}

/// Comma-joined singular kind names of the declared contributions.
fn plugin_type_summary(record: &PluginRecord) -> String {
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
        LISTING_MISSING.to_string()
    } else {
        kinds.join(", ")
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn record(normalized_name: &str, plugin_id: i64) -> PluginRecord {
        PluginRecord {
            plugin_id,
            html_filename: format!("{normalized_name}.html"),
            normalized_name: normalized_name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn cards_keep_caller_order_and_ids() {
        let records = vec![record("beta", 0), record("alpha", 1)];
        let html = render_listing(&records);
        let beta = html.find("./plugins/beta.html").unwrap();
        let alpha = html.find("./plugins/alpha.html").unwrap();
        assert!(beta < alpha);
        assert!(html.contains("data-plugin-id=\"0\""));
        assert!(html.contains("data-plugin-id=\"1\""));
        assert!(html.starts_with("<html>\n<body>\n"));
        assert!(html.ends_with("</body>\n</html>"));
    }

    #[test]
    fn missing_values_render_as_na() {
        let html = render_listing(&[record("demo", 0)]);
        assert!(html.contains("data-value=\"N/A\""));
        assert!(!html.to_lowercase().contains("nan"));
    }

    #[test]
    fn display_name_falls_back_to_name_then_normalized() {
        let mut r = record("demo-plugin", 0);
        r.name = Some("demo".to_string());
        let html = render_listing(&[r]);
        assert!(html.contains("searchResultDisplayName\">demo</h3>"));

        let html = render_listing(&[record("demo-plugin", 0)]);
        assert!(html.contains("searchResultDisplayName\">demo-plugin</h3>"));
    }

    #[test]
    fn plugin_type_summary_singularizes_kinds() {
        let mut r = record("demo", 0);
        r.reader_command = Some("cmd".to_string());
        r.sample_data_command = Some("cmd".to_string());
        assert_eq!(plugin_type_summary(&r), "reader, sample_data");
        assert_eq!(plugin_type_summary(&record("x", 0)), "N/A");
    }

    #[test]
    fn build_writes_the_listing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins_list.html");
        build(&[record("demo", 0)], &path).unwrap();
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains("./plugins/demo.html"));
    }
}
