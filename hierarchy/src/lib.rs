//! # Hierarchy - company dataset to sunburst/treemap tree
//!
//! Reads the flat DearTechPeople company table (one row per company) and
//! folds it into a nested `name` / `children` tree grouped by sector, then
//! customer base, optionally annotated with each company's gender split.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Builder   │────▶│  JSON tree  │
//! │  (ISO/UTF8) │     │  (auto-enc) │     │ (group+pct) │     │ (validated) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hierarchy::{build_from_csv, BuildOptions};
//! use std::path::Path;
//!
//! let report = build_from_csv(Path::new("data/DearTechPeople-Data.csv"), &BuildOptions::default()).unwrap();
//! println!("{} companies in {} sectors", report.stats.companies, report.stats.sectors);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types
//! - [`models`] - Output tree (HierarchyNode, HierarchyTree, TreeStats)
//! - [`parser`] - CSV parsing with auto-detection
//! - [`transform`] - Builder configuration, grouping, and pipeline
//! - [`validation`] - Hierarchy schema validation
//! - [`logs`] - Run log

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Validation
pub mod validation;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{HierarchyError, HierarchyResult, PipelineError, PipelineResult, ValidationError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{HierarchyNode, HierarchyTree, TreeStats, PERCENT_FEMALE, PERCENT_MALE};

// =============================================================================
// Re-exports - CSV Parsing
// =============================================================================

pub use parser::{
    csv_to_json,
    parse_csv,
    parse_csv_file_auto,
    parse_bytes,
    parse_bytes_auto,
    detect_encoding,
    detect_delimiter,
    decode_content,
    format_delimiter,
    CsvError,
    ParseResult,
};

// =============================================================================
// Re-exports - Builder
// =============================================================================

pub use transform::{
    build_hierarchy,
    gender_split,
    EntryStyle,
    HierarchyBuilder,
    HierarchyConfig,
    RootStyle,
    ZeroCountPolicy,
    DEFAULT_ROOT_NAME,
    NO_SECTOR,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    build_from_bytes,
    build_from_csv,
    render_document,
    run,
    write_document,
    BuildOptions,
    BuildReport,
    CsvInfo,
};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{is_valid, is_valid_hierarchy, validate, validate_hierarchy};
