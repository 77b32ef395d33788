//! Command-line interface for inspecting and rewriting feed files.

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use console::style;
use serde::Serialize;

use crate::entry::{default_registry, Entry};
use crate::error::Result;
use crate::feed::Feed;
use crate::parser::FeedParser;
use crate::types::Link;
use crate::writer::to_xml_string;

/// Feedmodel - Inspect, compare and rewrite Atom feed documents.
#[derive(Parser)]
#[command(name = "feedmodel")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a feed file and print a summary.
    Inspect {
        /// Feed document to read
        file: PathBuf,

        /// Service version selecting the namespace dialect (e.g., 2.0)
        #[arg(short, long)]
        service_version: Option<String>,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a feed and write it back out.
    Roundtrip {
        /// Feed document to read
        file: PathBuf,

        /// Service version selecting the namespace dialect (e.g., 2.0)
        #[arg(short, long)]
        service_version: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare two feed files field by field.
    Diff {
        left: PathBuf,
        right: PathBuf,

        /// Service version selecting the namespace dialect (e.g., 2.0)
        #[arg(short, long)]
        service_version: Option<String>,
    },

    /// List the entry kinds known to the default registry.
    Kinds,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect {
            file,
            service_version,
            json,
        } => inspect_command(&file, service_version.as_deref(), json),
        Commands::Roundtrip {
            file,
            service_version,
            output,
        } => roundtrip_command(&file, service_version.as_deref(), output.as_deref()),
        Commands::Diff {
            left,
            right,
            service_version,
        } => diff_command(&left, &right, service_version.as_deref()),
        Commands::Kinds => kinds_command(),
    }
}

fn load_feed(path: &Path, service_version: Option<&str>) -> Result<Feed> {
    let bytes = std::fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read feed file");
    FeedParser::default().parse(&bytes, service_version)
}

/// Serializable overview of a feed.
#[derive(Debug, Serialize)]
pub struct FeedSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_results: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_per_page: Option<u64>,
    pub can_post: bool,
    pub links: &'a [Link],
    pub extensions: usize,
    pub entries: Vec<EntrySummary<'a>>,
}

/// Serializable overview of one entry.
#[derive(Debug, Serialize)]
pub struct EntrySummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'a str>,
    pub variant: &'static str,
    pub extensions: usize,
}

impl<'a> EntrySummary<'a> {
    fn new(entry: &'a Entry) -> Self {
        Self {
            identifier: entry.identifier.as_deref(),
            title: entry.title.as_ref().map(|t| t.text.as_str()),
            kind: entry.kind_term(),
            variant: entry.variant.name(),
            extensions: entry.extensions.len(),
        }
    }
}

impl<'a> FeedSummary<'a> {
    #[must_use]
    pub fn new(feed: &'a Feed) -> Self {
        Self {
            identifier: feed.identifier(),
            title: feed.title().map(|t| t.text.as_str()),
            updated: feed.updated(),
            total_results: feed.total_results(),
            start_index: feed.start_index(),
            items_per_page: feed.items_per_page(),
            can_post: feed.can_post(),
            links: feed.links(),
            extensions: feed.extensions().len(),
            entries: feed.entries().iter().map(EntrySummary::new).collect(),
        }
    }
}

/// Execute the inspect command.
fn inspect_command(file: &Path, service_version: Option<&str>, json: bool) -> Result<()> {
    let feed = load_feed(file, service_version)?;
    let summary = FeedSummary::new(&feed);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!(
        "{} {}",
        style("Feed").bold(),
        style(summary.identifier.unwrap_or("(no id)")).cyan()
    );
    if let Some(title) = summary.title {
        println!("  Title: {}", style(title).green());
    }
    if let Some(updated) = summary.updated {
        println!("  Updated: {}", updated.to_rfc3339());
    }
    if let Some(total) = summary.total_results {
        println!("  Total results: {total}");
    }
    println!("  Links: {}", summary.links.len());
    println!("  Accepts posts: {}", if summary.can_post { "yes" } else { "no" });
    if summary.extensions > 0 {
        println!("  Extensions: {}", style(summary.extensions).yellow());
    }
    println!("  Entries: {}", summary.entries.len());

    for entry in &summary.entries {
        println!(
            "    - {} [{}] {}",
            style(entry.identifier.unwrap_or("(no id)")).cyan(),
            entry.variant,
            entry.title.unwrap_or_default()
        );
    }

    Ok(())
}

/// Execute the roundtrip command.
fn roundtrip_command(
    file: &Path,
    service_version: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let feed = load_feed(file, service_version)?;
    let xml = to_xml_string(&feed)?;

    let reparsed = FeedParser::default().parse(xml.as_bytes(), service_version)?;
    let changed = feed.diff(&reparsed);
    if !changed.is_empty() {
        tracing::warn!(fields = ?changed, "Round trip changed the feed");
    }

    match output {
        Some(path) => {
            std::fs::write(path, &xml)?;
            eprintln!(
                "{} {}",
                style("Saved to:").green().bold(),
                path.display()
            );
        }
        None => println!("{xml}"),
    }

    Ok(())
}

/// Execute the diff command.
fn diff_command(left: &Path, right: &Path, service_version: Option<&str>) -> Result<()> {
    let left_feed = load_feed(left, service_version)?;
    let right_feed = load_feed(right, service_version)?;
    let changed = left_feed.diff(&right_feed);

    if changed.is_empty() {
        println!("{}", style("Feeds are equal").green());
    } else {
        println!("{}", style("Feeds differ in:").yellow().bold());
        for field in changed {
            println!("  {field}");
        }
    }

    Ok(())
}

/// Execute the kinds command.
fn kinds_command() -> Result<()> {
    for kind in default_registry().registered_kinds() {
        println!("{kind}");
    }
    Ok(())
}
