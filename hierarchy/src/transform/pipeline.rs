//! High-level pipeline: CSV → hierarchy → JSON document.
//!
//! Every step runs in memory first; the output is only written once the
//! whole document exists, so a failed run never leaves a partial file.
//!
//! # Example
//!
//! ```rust,ignore
//! use hierarchy::{run, BuildOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = run(
//!         Path::new("data/DearTechPeople-Data.csv"),
//!         Some(Path::new("json/data_hierarchy.json")),
//!         &BuildOptions::default(),
//!     )?;
//!
//!     println!("{} companies", report.stats.companies);
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::builder::build_hierarchy;
use super::config::{EntryStyle, HierarchyConfig};
use crate::error::{PipelineResult, ValidationError};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{HierarchyTree, TreeStats};
use crate::parser::{format_delimiter, parse_bytes, ParseResult};
use crate::validation::validate_hierarchy;

/// Indentation of the emitted document.
const DOCUMENT_INDENT: &[u8] = b"    ";

/// Options for the build pipeline
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Delimiter to use instead of auto-detection
    pub delimiter: Option<char>,

    /// Builder configuration
    pub config: HierarchyConfig,

    /// Skip the schema check of the emitted document
    pub skip_validation: bool,
}

/// CSV file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The tree that was built
    pub tree: HierarchyTree,

    /// Node counts of the tree
    pub stats: TreeStats,

    /// CSV parsing metadata
    pub csv_info: CsvInfo,

    /// Serialized document (UTF-8 JSON, 4-space indentation)
    pub document: Vec<u8>,
}

/// Build the hierarchy for a CSV file and write it to `output` (stdout if `None`).
pub fn run(input: &Path, output: Option<&Path>, options: &BuildOptions) -> PipelineResult<BuildReport> {
    let report = build_from_csv(input, options)?;
    write_document(&report.document, output)?;

    match output {
        Some(path) => log_success(format!("Hierarchy written to {}", path.display())),
        None => log_success("Hierarchy written to stdout"),
    }
    Ok(report)
}

/// Build the hierarchy for a CSV file without writing anything.
pub fn build_from_csv(path: &Path, options: &BuildOptions) -> PipelineResult<BuildReport> {
    log_info(format!("📖 Reading {}", path.display()));
    let bytes = fs::read(path)?;
    build_from_bytes(&bytes, options)
}

/// Build the hierarchy for raw CSV bytes.
pub fn build_from_bytes(bytes: &[u8], options: &BuildOptions) -> PipelineResult<BuildReport> {
    let parse_result = parse_bytes(bytes, options.delimiter)?;
    build_parsed(parse_result, options)
}

fn build_parsed(parse_result: ParseResult, options: &BuildOptions) -> PipelineResult<BuildReport> {
    log_success(format!("Detected encoding: {}", parse_result.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(parse_result.delimiter)));
    log_success(format!("Read {} rows", parse_result.records.len()));

    let csv_info = CsvInfo {
        encoding: parse_result.encoding.clone(),
        delimiter: parse_result.delimiter,
        headers: parse_result.headers.clone(),
        row_count: parse_result.records.len(),
    };

    let missing: Vec<&str> = options
        .config
        .required_columns()
        .into_iter()
        .filter(|column| !parse_result.has_column(column))
        .collect();
    if !missing.is_empty() {
        log_warning(format!("Header lacks column(s): {}", missing.join(", ")));
    }

    if parse_result.records.is_empty() {
        log_warning("No data rows, the hierarchy will be empty");
    }

    log_info(format!(
        "📦 Grouping by sector and customer base ({} entries, {})",
        options.config.entries,
        options.config.root
    ));
    if options.config.entries == EntryStyle::Gender {
        log_info_indent(format!("zero-count policy: {}", options.config.zero_counts), 1);
    }

    let tree = build_hierarchy(&parse_result.records, &options.config)?;
    let stats = tree.stats();
    log_success(format!(
        "{} sectors, {} customer bases, {} companies",
        stats.sectors, stats.customer_bases, stats.companies
    ));

    if !options.skip_validation {
        log_info("✔️  Validating hierarchy document...");
        let value = serde_json::to_value(&tree)?;
        validate_hierarchy(&value).map_err(|errors| ValidationError::Schema { errors })?;
        log_success("Document matches the hierarchy schema");
    }

    let document = render_document(&tree)?;

    Ok(BuildReport {
        tree,
        stats,
        csv_info,
        document,
    })
}

/// Serialize a value as JSON indented with 4 spaces.
pub fn render_document<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(DOCUMENT_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write a document to `path`, creating parent directories, or to stdout if `None`.
pub fn write_document(document: &[u8], path: Option<&Path>) -> std::io::Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, document)
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(document)?;
            handle.write_all(b"\n")?;
            handle.flush()
        }
    }
}
