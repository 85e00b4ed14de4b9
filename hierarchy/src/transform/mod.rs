//! Transformation module.
//!
//! This module turns parsed company rows into the output tree:
//! - Config: entry style, root style, zero-count policy
//! - Builder: rows to the sector / customer base / company tree
//! - Pipeline: parse, build, validate, render, write

pub mod builder;
pub mod config;
pub mod pipeline;

pub use builder::{build_hierarchy, gender_split, HierarchyBuilder, NO_SECTOR};
pub use config::{EntryStyle, HierarchyConfig, RootStyle, ZeroCountPolicy, DEFAULT_ROOT_NAME};
pub use pipeline::*;
