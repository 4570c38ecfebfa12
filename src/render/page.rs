use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::extract;
use super::extract::python_versions::VersionBounds;
use super::markdown::MarkdownRenderer;
use super::template;
use crate::dataset::{PluginRecord, MISSING_PLACEHOLDER};

/// Fills the per-plugin page template from one record.
///
/// The substitution map is every raw column (missing cells replaced by
/// the placeholder) overlaid by the extractor fragments and the rendered
/// description; unknown template placeholders pass through untouched.
pub struct PageFiller<'a> {
    renderer: &'a MarkdownRenderer,
    bounds: VersionBounds,
}

impl<'a> PageFiller<'a> {
    pub fn new(renderer: &'a MarkdownRenderer, bounds: VersionBounds) -> Self {
        Self { renderer, bounds }
    }

    /// Render and write one detail page under `plugin_dir`, creating the
    /// directory if needed.
    pub fn fill(&self, record: &PluginRecord, template: &str, plugin_dir: &Path) -> Result<()> {
        let html = self.render_page(record, template);
        fs::create_dir_all(plugin_dir)
            .with_context(|| format!("Failed to create {}", plugin_dir.display()))?;
        let path = plugin_dir.join(&record.html_filename);
        fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn render_page(&self, record: &PluginRecord, template: &str) -> String {
        let mut values = record.substitution_values();
        let fragments = extract::extract_all(record, &self.bounds);
        values.insert("plugin_types".to_string(), fragments.plugin_types);
        values.insert("open_extension".to_string(), fragments.open_extension);
        values.insert("save_extension".to_string(), fragments.save_extension);
        values.insert("requirements".to_string(), fragments.requirements);
        values.insert("python_versions".to_string(), fragments.python_versions);
        values.insert("os".to_string(), fragments.os);
        values.insert("home_link".to_string(), fragments.home_link);
        values.insert(
            "package_metadata_description".to_string(),
            self.render_description(record.description.as_deref()),
        );
        template::substitute(template, &values)
    }

    /// The template supplies the page heading, so a leading markdown
    /// heading line is dropped before rendering.
    fn render_description(&self, description: Option<&str>) -> String {
        let Some(text) = description else {
            return MISSING_PLACEHOLDER.to_string();
        };
        self.renderer.render(strip_leading_heading(text))
    }
}

fn strip_leading_heading(text: &str) -> &str {
    match text.split_once('\n') {
        Some((first_line, rest)) if first_line.starts_with('#') => rest,
        None if text.starts_with('#') => "",
        _ => text,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn filler_record(description: Option<&str>) -> PluginRecord {
        PluginRecord {
            plugin_id: 3,
            html_filename: "demo.html".to_string(),
            normalized_name: "demo".to_string(),
            description: description.map(|s| s.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn leading_heading_is_stripped_before_rendering() {
        let renderer = MarkdownRenderer::new();
        let filler = PageFiller::new(&renderer, VersionBounds::default());
        let record = filler_record(Some("# Demo Plugin\n\nDoes things."));

        let html = filler.render_page(&record, "$package_metadata_description");
        assert!(!html.contains("<h1>Demo Plugin</h1>"));
        assert!(html.contains("Does things."));
    }

    #[test]
    fn heading_only_description_renders_empty() {
        let renderer = MarkdownRenderer::new();
        let filler = PageFiller::new(&renderer, VersionBounds::default());
        let record = filler_record(Some("# Demo Plugin"));

        let html = filler.render_page(&record, "[$package_metadata_description]");
        assert_eq!(html, "[]");
    }

    #[test]
    fn missing_description_uses_placeholder() {
        let renderer = MarkdownRenderer::new();
        let filler = PageFiller::new(&renderer, VersionBounds::default());
        let record = filler_record(None);

        let html = filler.render_page(&record, "$package_metadata_description");
        assert_eq!(html, MISSING_PLACEHOLDER);
    }

    #[test]
    fn unknown_placeholders_survive_filling() {
        let renderer = MarkdownRenderer::new();
        let filler = PageFiller::new(&renderer, VersionBounds::default());
        let record = filler_record(None);

        let html = filler.render_page(&record, "$plugin_id / $not_a_known_key");
        assert_eq!(html, "3 / $not_a_known_key");
    }

    #[test]
    fn filling_twice_is_byte_identical() {
        let renderer = MarkdownRenderer::new();
        let filler = PageFiller::new(&renderer, VersionBounds::default());
        let mut record = filler_record(Some("# T\n\nBody with `code`."));
        record.requires_python = Some(">=3.8".to_string());
        record.reader_command = Some("demo.get_reader".to_string());

        let template = "$plugin_types|$python_versions|$package_metadata_description";
        assert_eq!(
            filler.render_page(&record, template),
            filler.render_page(&record, template)
        );
    }

    #[test]
    fn fill_creates_directory_and_file() {
        let renderer = MarkdownRenderer::new();
        let filler = PageFiller::new(&renderer, VersionBounds::default());
        let record = filler_record(None);

        let dir = tempfile::tempdir().unwrap();
        let plugin_dir = dir.path().join("plugins");
        filler.fill(&record, "<p>$html_filename</p>", &plugin_dir).unwrap();

        let written = std::fs::read_to_string(plugin_dir.join("demo.html")).unwrap();
        assert_eq!(written, "<p>demo.html</p>");
    }
}
