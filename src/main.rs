mod dataset;
mod render;
mod site;

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "plugin_sitegen", about = "Static HTML generator for the plugin hub")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate detail pages, the listing page, and the manifest
    Build {
        /// Build directory containing data/ and templates/
        #[arg(default_value = "./_build")]
        build_dir: PathBuf,
    },
    /// Show dataset statistics
    Stats {
        /// Build directory containing data/
        #[arg(default_value = "./_build")]
        build_dir: PathBuf,
    },
    /// Plugins overview table
    Overview {
        /// Build directory containing data/
        #[arg(default_value = "./_build")]
        build_dir: PathBuf,
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build { build_dir } => {
            let summary = site::build_site(&build_dir)?;
            println!(
                "Generated {} plugin pages, the listing page, and the manifest under {}",
                summary.pages,
                build_dir.display()
            );
            Ok(())
        }
        Commands::Stats { build_dir } => {
            let paths = site::SitePaths::new(&build_dir);
            let records = site::load_sorted(&paths)?;
            let s = dataset::stats(&records);
            println!("Plugins:          {}", s.total);
            println!("With description: {}", s.with_description);
            println!("Readers:          {}", s.readers);
            println!("Writers:          {}", s.writers);
            println!("Widgets:          {}", s.widgets);
            println!("Sample data:      {}", s.sample_data);
            Ok(())
        }
        Commands::Overview { build_dir, limit } => {
            let paths = site::SitePaths::new(&build_dir);
            let records = site::load_sorted(&paths)?;
            if records.is_empty() {
                println!("No plugins found.");
                return Ok(());
            }

            // Compact, readable table
            println!(
                "{:>4} | {:<28} | {:<20} | {:<30} | {:<16}",
                "#", "Plugin", "Updated", "Types", "Python"
            );
            println!("{}", "-".repeat(108));

            for record in records.iter().take(limit) {
                let name = truncate(
                    record
                        .display_name
                        .as_deref()
                        .unwrap_or(&record.normalized_name),
                    28,
                );
                let updated = truncate(record.modified_at.as_deref().unwrap_or("-"), 20);
                let types = truncate(&plugin_kinds(record), 30);
                let python = truncate(record.requires_python.as_deref().unwrap_or("-"), 16);

                println!(
                    "{:>4} | {:<28} | {:<20} | {:<30} | {:<16}",
                    record.plugin_id, name, updated, types, python
                );
            }

            println!(
                "\n{} plugins | pages: plugins/<normalized_name>.html",
                records.len()
            );
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn plugin_kinds(record: &dataset::PluginRecord) -> String {
    let mut kinds = Vec::new();
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
        "-".to_string()
    } else {
        kinds.join(", ")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
