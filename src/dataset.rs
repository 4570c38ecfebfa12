use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::Value;
use rusqlite::Connection;
use tracing::warn;

/// Placeholder substituted for missing cells on detail pages.
pub const MISSING_PLACEHOLDER: &str = "Not available";

pub fn connect(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open plugin dataset {}", path.display()))?;
    Ok(conn)
}

/// One plugin's row of metadata, typed at ingestion.
///
/// List-valued columns arrive as textual list literals and are decoded
/// here once; extractors only ever see `Option<Vec<String>>`. The full
/// raw column map is kept alongside for template substitution.
#[derive(Debug, Clone, Default)]
pub struct PluginRecord {
    pub plugin_id: i64,
    pub html_filename: String,
    pub normalized_name: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub summary: Option<String>,
    pub author: Option<String>,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub modified_at_ts: Option<NaiveDateTime>,
    pub description: Option<String>,
    pub requires_python: Option<String>,
    pub requires_dist: Option<Vec<String>>,
    pub reader_command: Option<String>,
    pub writer_command: Option<String>,
    pub widget_command: Option<String>,
    pub sample_data_command: Option<String>,
    pub reader_patterns: Option<Vec<String>>,
    pub writer_extensions_0: Option<Vec<String>>,
    pub writer_extensions_1: Option<Vec<String>>,
    pub home_pypi: Option<String>,
    pub home_github: Option<String>,
    pub home_other: Option<String>,
    pub columns: BTreeMap<String, Option<String>>,
}

impl PluginRecord {
    fn from_columns(columns: BTreeMap<String, Option<String>>) -> Self {
        let get = |name: &str| -> Option<String> { columns.get(name).cloned().flatten() };
        let modified_at = get("modified_at");
        let modified_at_ts = modified_at.as_deref().and_then(parse_timestamp);

        Self {
            plugin_id: 0,
            html_filename: String::new(),
            normalized_name: get("normalized_name").unwrap_or_default(),
            name: get("name"),
            display_name: get("display_name"),
            summary: get("summary"),
            author: get("author"),
            created_at: get("created_at"),
            modified_at,
            modified_at_ts,
            description: get("package_metadata_description"),
            requires_python: get("package_metadata_requires_python"),
            requires_dist: decode_list(&columns, "package_metadata_requires_dist"),
            reader_command: get("contributions_readers_0_command"),
            writer_command: get("contributions_writers_0_command"),
            widget_command: get("contributions_widgets_0_command"),
            sample_data_command: get("contributions_sample_data_0_command"),
            reader_patterns: decode_list(&columns, "contributions_readers_0_filename_patterns"),
            writer_extensions_0: decode_list(
                &columns,
                "contributions_writers_0_filename_extensions",
            ),
            writer_extensions_1: decode_list(
                &columns,
                "contributions_writers_1_filename_extensions",
            ),
            home_pypi: get("home_pypi"),
            home_github: get("home_github"),
            home_other: get("home_other"),
            columns,
        }
    }

    /// Flat column -> string map for template substitution: every raw
    /// column stringified with missing cells replaced, plus the derived
    /// id and filename.
    pub fn substitution_values(&self) -> BTreeMap<String, String> {
        let mut values: BTreeMap<String, String> = self
            .columns
            .iter()
            .map(|(name, value)| {
                let text = value.clone().unwrap_or_else(|| MISSING_PLACEHOLDER.to_string());
                (name.clone(), text)
            })
            .collect();
        values.insert("plugin_id".to_string(), self.plugin_id.to_string());
        values.insert("html_filename".to_string(), self.html_filename.clone());
        values
    }
}

/// Load the plugin table, sort newest-first, and assign ids + filenames.
///
/// Records without a parseable `modified_at` sink to the end; ids are
/// 0-based positions in the sorted order, so they depend on the sort.
pub fn load_plugins(conn: &Connection) -> Result<Vec<PluginRecord>> {
    let mut stmt = conn
        .prepare("SELECT * FROM plugins")
        .context("Failed to query plugins table")?;
    let column_names: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let rows = stmt.query_map([], |row| {
        let mut columns = BTreeMap::new();
        for (i, name) in column_names.iter().enumerate() {
            let value: Value = row.get(i)?;
            columns.insert(name.clone(), value_to_string(value));
        }
        Ok(columns)
    })?;

    let mut records = Vec::new();
    for row in rows {
        records.push(PluginRecord::from_columns(row?));
    }

    records.sort_by(|a, b| b.modified_at_ts.cmp(&a.modified_at_ts));

    let mut seen = HashSet::new();
    for (i, record) in records.iter_mut().enumerate() {
        record.plugin_id = i as i64;
        record.html_filename = derive_filename(&record.normalized_name)?;
        if !seen.insert(record.html_filename.clone()) {
            bail!("Duplicate output filename: {}", record.html_filename);
        }
    }

    Ok(records)
}

/// Dataset counters for the `stats` subcommand.
pub struct DatasetStats {
    pub total: usize,
    pub with_description: usize,
    pub readers: usize,
    pub writers: usize,
    pub widgets: usize,
    pub sample_data: usize,
}

pub fn stats(records: &[PluginRecord]) -> DatasetStats {
    DatasetStats {
        total: records.len(),
        with_description: records.iter().filter(|r| r.description.is_some()).count(),
        readers: records.iter().filter(|r| r.reader_command.is_some()).count(),
        writers: records.iter().filter(|r| r.writer_command.is_some()).count(),
        widgets: records.iter().filter(|r| r.widget_command.is_some()).count(),
        sample_data: records
            .iter()
            .filter(|r| r.sample_data_command.is_some())
            .count(),
    }
}

fn derive_filename(normalized_name: &str) -> Result<String> {
    if normalized_name.is_empty() {
        bail!("Record has an empty normalized_name");
    }
    let safe = normalized_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !safe {
        bail!("normalized_name {:?} is not filesystem-safe", normalized_name);
    }
    Ok(format!("{normalized_name}.html"))
}

/// NULL, empty, and the literal "nan" all denote a missing cell upstream.
fn value_to_string(value: Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::Text(s) => s,
        Value::Integer(n) => n.to_string(),
        Value::Real(f) => f.to_string(),
        Value::Blob(_) => return None,
    };
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        None
    } else {
        Some(text)
    }
}

fn decode_list(columns: &BTreeMap<String, Option<String>>, column: &str) -> Option<Vec<String>> {
    let raw = columns.get(column)?.as_deref()?;
    match parse_list_literal(raw) {
        Some(items) => Some(items),
        None => {
            warn!("Invalid list format in {}: {}", column, raw);
            None
        }
    }
}

/// Decode a textual list literal like `['*.tif', "*.png"]` into items.
///
/// Items must be single- or double-quoted strings; backslash escapes and
/// a trailing comma are accepted. Anything else is malformed and yields
/// `None` (the caller treats the field as absent).
pub fn parse_list_literal(raw: &str) -> Option<Vec<String>> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => break,
            Some(c @ ('\'' | '"')) => c,
            Some(_) => return None,
        };

        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => {
                    let escaped = chars.next()?;
                    item.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                }
                c if c == quote => break,
                c => item.push(c),
            }
        }
        items.push(item);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(_) => return None,
        }
    }

    Some(items)
}

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

// ── Tests ──
