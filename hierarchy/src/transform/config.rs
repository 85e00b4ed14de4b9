//! Builder configuration.
//!
//! One builder covers both dataset shapes: plain company names or companies
//! annotated with their gender split, wrapped in a named root or not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::builder::{COMPANY_COLUMN, CUSTOMER_BASE_COLUMN, FEMALE_COLUMN, MALE_COLUMN, SECTOR_COLUMN};

/// Root name used when none is configured.
pub const DEFAULT_ROOT_NAME: &str = "deartechpeople";

/// How each company is represented in the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStyle {
    /// Bare company name.
    Plain,
    /// Company node with `percent_male` / `percent_female` leaves.
    #[default]
    Gender,
}

/// Whether the sector nodes are wrapped in a named root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootStyle {
    Named(String),
    Unrooted,
}

impl Default for RootStyle {
    fn default() -> Self {
        Self::Named(DEFAULT_ROOT_NAME.to_string())
    }
}

/// What to do with a company reporting zero male and zero female employees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroCountPolicy {
    /// Abort with [`crate::error::HierarchyError::DegenerateRatio`].
    #[default]
    Reject,
    /// Emit 0 % / 0 %.
    Zero,
    /// Emit 50 % / 50 %.
    Even,
}

impl ZeroCountPolicy {
    /// Percentages to emit for a zero/zero company, or `None` to reject it.
    pub fn fallback(self) -> Option<(f64, f64)> {
        match self {
            Self::Reject => None,
            Self::Zero => Some((0.0, 0.0)),
            Self::Even => Some((50.0, 50.0)),
        }
    }
}

/// Configuration of a [`super::builder::HierarchyBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    pub entries: EntryStyle,
    pub root: RootStyle,
    pub zero_counts: ZeroCountPolicy,
}

impl HierarchyConfig {
    /// Bare company names under a named root.
    pub fn plain() -> Self {
        Self {
            entries: EntryStyle::Plain,
            ..Self::default()
        }
    }

    pub fn with_entries(mut self, entries: EntryStyle) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root = RootStyle::Named(name.into());
        self
    }

    pub fn unrooted(mut self) -> Self {
        self.root = RootStyle::Unrooted;
        self
    }

    pub fn with_zero_counts(mut self, policy: ZeroCountPolicy) -> Self {
        self.zero_counts = policy;
        self
    }

    /// Columns every row must carry under this configuration.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut columns = vec![SECTOR_COLUMN, CUSTOMER_BASE_COLUMN, COMPANY_COLUMN];
        if self.entries == EntryStyle::Gender {
            columns.push(MALE_COLUMN);
            columns.push(FEMALE_COLUMN);
        }
        columns
    }
}

// =============================================================================
// String conversions (CLI flags / environment variables)
// =============================================================================

impl FromStr for EntryStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plain" | "simple" | "names" => Ok(Self::Plain),
            "gender" | "percent" | "percentages" => Ok(Self::Gender),
            other => Err(format!("unknown entry style '{}' (expected plain or gender)", other)),
        }
    }
}

impl fmt::Display for EntryStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Gender => write!(f, "gender"),
        }
    }
}

impl FromStr for ZeroCountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" | "error" => Ok(Self::Reject),
            "zero" => Ok(Self::Zero),
            "even" | "half" => Ok(Self::Even),
            other => Err(format!("unknown zero-count policy '{}' (expected reject, zero or even)", other)),
        }
    }
}

impl fmt::Display for ZeroCountPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Zero => write!(f, "zero"),
            Self::Even => write!(f, "even"),
        }
    }
}

impl fmt::Display for RootStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "root '{}'", name),
            Self::Unrooted => write!(f, "unrooted"),
        }
    }
}
