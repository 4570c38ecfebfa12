use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::dataset::{self, PluginRecord};
use crate::render::extract::python_versions::VersionBounds;
use crate::render::listing;
use crate::render::markdown::MarkdownRenderer;
use crate::render::page::PageFiller;

const PAGE_CHUNK: usize = 100;

/// Directory layout under the build directory.
pub struct SitePaths {
    pub build_dir: PathBuf,
    pub data_dir: PathBuf,
    pub plugin_dir: PathBuf,
    pub template_dir: PathBuf,
}

impl SitePaths {
    pub fn new(build_dir: &Path) -> Self {
        Self {
            build_dir: build_dir.to_path_buf(),
            data_dir: build_dir.join("data"),
            plugin_dir: build_dir.join("plugins"),
            template_dir: build_dir.join("templates"),
        }
    }

    pub fn database(&self) -> PathBuf {
        self.data_dir.join("plugins.sqlite")
    }

    pub fn template(&self) -> PathBuf {
        self.template_dir.join("each_plugin_template.html")
    }

    pub fn listing(&self) -> PathBuf {
        self.build_dir.join("plugins_list.html")
    }

    pub fn manifest(&self) -> PathBuf {
        self.build_dir.join("plugins_manifest.json")
    }
}

#[derive(Serialize)]
struct ManifestEntry {
    plugin_id: i64,
    html_filename: String,
}

pub struct BuildSummary {
    pub pages: usize,
}

/// Generate the whole artifact set: listing page, one detail page per
/// record, and the manifest. Reruns are idempotent since every write is
/// a full-file overwrite keyed by a deterministic filename.
pub fn build_site(build_dir: &Path) -> Result<BuildSummary> {
    let paths = SitePaths::new(build_dir);
    let records = load_sorted(&paths)?;
    info!("Loaded {} plugin records", records.len());

    let template = fs::read_to_string(paths.template())
        .with_context(|| format!("Failed to read template {}", paths.template().display()))?;

    listing::build(&records, &paths.listing())?;

    let renderer = MarkdownRenderer::new();
    let filler = PageFiller::new(&renderer, VersionBounds::default());

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Page rendering is pure and writes target disjoint files, so chunks
    // run in parallel.
    for chunk in records.chunks(PAGE_CHUNK) {
        chunk
            .par_iter()
            .try_for_each(|record| filler.fill(record, &template, &paths.plugin_dir))?;
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    write_manifest(&records, &paths.manifest())?;

    Ok(BuildSummary {
        pages: records.len(),
    })
}

/// Load the dataset in its generation order (newest first, ids assigned).
pub fn load_sorted(paths: &SitePaths) -> Result<Vec<PluginRecord>> {
    let conn = dataset::connect(&paths.database())?;
    dataset::load_plugins(&conn)
}

fn write_manifest(records: &[PluginRecord], path: &Path) -> Result<()> {
    let entries: Vec<ManifestEntry> = records
        .iter()
        .map(|record| ManifestEntry {
            plugin_id: record.plugin_id,
            html_filename: record.html_filename.clone(),
        })
        .collect();
    let json = serde_json::to_string_pretty(&entries)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ── Tests ──
