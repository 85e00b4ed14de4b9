//! Fold flat company rows into a sector → customer base → company tree.
//!
//! # Architecture
//!
//! ```text
//! CSV Input (flat rows)                  →  Output tree
//! ┌──────────────────────────────────┐      ┌──────────────────────────┐
//! │ sector: ai, base: b2b, co: Acme  │      │ ai                       │
//! │ sector: ai, base: b2b, co: Bolt  │  →   │ └─ b2b: [Acme, Bolt]     │
//! │ sector: "", base: b2c, co: Zeta  │      │ no sector                │
//! └──────────────────────────────────┘      │ └─ b2c: [Zeta]           │
//!                                           └──────────────────────────┘
//! ```
//!
//! Sectors, customer bases and companies keep their first-seen order, so the
//! same rows always produce the same document.

use indexmap::IndexMap;
use serde_json::Value;

use super::config::{EntryStyle, HierarchyConfig, RootStyle};
use crate::error::{HierarchyError, HierarchyResult};
use crate::models::{HierarchyNode, HierarchyTree};

pub const SECTOR_COLUMN: &str = "sector_1";
pub const CUSTOMER_BASE_COLUMN: &str = "customer_base_1";
pub const COMPANY_COLUMN: &str = "company_name";
pub const MALE_COLUMN: &str = "total_male";
pub const FEMALE_COLUMN: &str = "total_female";

/// Sector name used for rows with an empty sector.
pub const NO_SECTOR: &str = "no sector";

/// Build the tree for a full set of rows.
///
/// The first failing row aborts the build; no partial tree is returned.
pub fn build_hierarchy(rows: &[Value], config: &HierarchyConfig) -> HierarchyResult<HierarchyTree> {
    let mut builder = HierarchyBuilder::new(config.clone());
    for row in rows {
        builder.push_row(row)?;
    }
    Ok(builder.finish())
}

/// Share of each gender in percent, or `None` when both counts are zero.
pub fn gender_split(male: u64, female: u64) -> Option<(f64, f64)> {
    let male = male as f64;
    let female = female as f64;
    let total = male + female;

    if total == 0.0 {
        return None;
    }

    Some((100.0 * male / total, 100.0 * female / total))
}

/// Companies grouped by customer base, in first-seen order.
type CustomerBases = IndexMap<String, Vec<HierarchyNode>>;

/// Accumulates rows into the ordered grouping map.
pub struct HierarchyBuilder {
    config: HierarchyConfig,
    sectors: IndexMap<String, CustomerBases>,
    rows: usize,
}

impl HierarchyBuilder {
    pub fn new(config: HierarchyConfig) -> Self {
        Self {
            config,
            sectors: IndexMap::new(),
            rows: 0,
        }
    }

    /// Add one row.
    ///
    /// On error the builder is left as it was before the call.
    pub fn push_row(&mut self, row: &Value) -> HierarchyResult<()> {
        let row_number = self.rows + 1;

        let sector = text_field(row, SECTOR_COLUMN, row_number)?;
        let customer_base = text_field(row, CUSTOMER_BASE_COLUMN, row_number)?;
        let company = text_field(row, COMPANY_COLUMN, row_number)?;

        let entry = match self.config.entries {
            EntryStyle::Plain => HierarchyNode::Company(company),
            EntryStyle::Gender => self.company_with_split(row, row_number, company)?,
        };

        let sector = if sector.is_empty() {
            NO_SECTOR.to_string()
        } else {
            sector
        };

        self.sectors
            .entry(sector)
            .or_default()
            .entry(customer_base)
            .or_default()
            .push(entry);
        self.rows += 1;
        Ok(())
    }

    /// Flatten the grouping map into the output tree.
    pub fn finish(self) -> HierarchyTree {
        let sectors: Vec<HierarchyNode> = self
            .sectors
            .into_iter()
            .map(|(sector, customer_bases)| {
                let children = customer_bases
                    .into_iter()
                    .map(|(customer_base, companies)| HierarchyNode::branch(customer_base, companies))
                    .collect();
                HierarchyNode::branch(sector, children)
            })
            .collect();

        match self.config.root {
            RootStyle::Named(name) => HierarchyTree::Rooted(HierarchyNode::branch(name, sectors)),
            RootStyle::Unrooted => HierarchyTree::Unrooted(sectors),
        }
    }

    fn company_with_split(&self, row: &Value, row_number: usize, company: String) -> HierarchyResult<HierarchyNode> {
        let male = count_field(row, MALE_COLUMN, row_number)?;
        let female = count_field(row, FEMALE_COLUMN, row_number)?;

        let (percent_male, percent_female) = gender_split(male, female)
            .or_else(|| self.config.zero_counts.fallback())
            .ok_or_else(|| HierarchyError::DegenerateRatio {
                row: row_number,
                company: company.clone(),
            })?;

        Ok(HierarchyNode::company_with_split(company, percent_male, percent_female))
    }
}

// =============================================================================
// Field extraction
// =============================================================================

fn text_field(row: &Value, field: &str, row_number: usize) -> HierarchyResult<String> {
    match row.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        None | Some(Value::Null) => Err(HierarchyError::MissingField {
            row: row_number,
            field: field.to_string(),
        }),
        Some(other) => Err(HierarchyError::MalformedInput {
            row: row_number,
            field: field.to_string(),
            value: other.to_string(),
        }),
    }
}

fn count_field(row: &Value, field: &str, row_number: usize) -> HierarchyResult<u64> {
    let malformed = |value: String| HierarchyError::MalformedInput {
        row: row_number,
        field: field.to_string(),
        value,
    };

    match row.get(field) {
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| malformed(s.clone())),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(|| malformed(n.to_string())),
        None | Some(Value::Null) => Err(HierarchyError::MissingField {
            row: row_number,
            field: field.to_string(),
        }),
        Some(other) => Err(malformed(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PERCENT_FEMALE, PERCENT_MALE};
    use crate::transform::config::ZeroCountPolicy;
    use serde_json::json;

    fn company(sector: &str, base: &str, name: &str) -> Value {
        json!({
            "sector_1": sector,
            "customer_base_1": base,
            "company_name": name
        })
    }

    fn counted(sector: &str, base: &str, name: &str, male: &str, female: &str) -> Value {
        json!({
            "sector_1": sector,
            "customer_base_1": base,
            "company_name": name,
            "total_male": male,
            "total_female": female
        })
    }

    #[test]
    fn test_two_sector_scenario() {
        let rows = vec![company("ai", "b2b", "Acme"), company("", "b2c", "Zeta")];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        let sectors = tree.sectors();
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].name(), "ai");
        assert_eq!(sectors[1].name(), "no sector");

        for (sector, base, name) in [(&sectors[0], "b2b", "Acme"), (&sectors[1], "b2c", "Zeta")] {
            assert_eq!(sector.children().len(), 1);
            let customer_base = &sector.children()[0];
            assert_eq!(customer_base.name(), base);
            assert_eq!(customer_base.children(), &[HierarchyNode::Company(name.into())]);
        }
    }

    #[test]
    fn test_every_row_becomes_one_entry() {
        let rows = vec![
            company("ai", "b2b", "Acme"),
            company("fintech", "b2c", "Bolt"),
            company("ai", "b2c", "Cora"),
            company("", "b2b", "Dune"),
            company("ai", "b2b", "Acme"),
        ];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        assert_eq!(tree.stats().companies, rows.len());
        let mut names = tree.company_names();
        names.sort_unstable();
        assert_eq!(names, vec!["Acme", "Acme", "Bolt", "Cora", "Dune"]);
    }

    #[test]
    fn test_shared_bucket_keeps_row_order() {
        let rows = vec![
            company("ai", "b2b", "Zulu"),
            company("ai", "b2c", "Mike"),
            company("ai", "b2b", "Alpha"),
            company("ai", "b2b", "Kilo"),
        ];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        let ai = tree.sector("ai").unwrap();
        let names: Vec<&str> = ai.child("b2b").unwrap().children().iter().map(HierarchyNode::name).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Kilo"]);
        assert_eq!(ai.children()[0].name(), "b2b");
        assert_eq!(ai.children()[1].name(), "b2c");
    }

    #[test]
    fn test_sector_order_is_first_seen() {
        let rows = vec![
            company("zeta", "b2b", "A"),
            company("", "b2b", "B"),
            company("alpha", "b2b", "C"),
            company("zeta", "b2c", "D"),
        ];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        let order: Vec<&str> = tree.sectors().iter().map(HierarchyNode::name).collect();
        assert_eq!(order, vec!["zeta", "no sector", "alpha"]);
    }

    #[test]
    fn test_interleaved_customer_bases_keep_first_seen_order() {
        let rows = vec![
            company("ai", "b2c", "A"),
            company("ai", "b2b", "B"),
            company("ai", "b2c", "C"),
            company("ai", "gov", "D"),
            company("ai", "b2b", "E"),
        ];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        let bases: Vec<&str> = tree.sectors()[0].children().iter().map(HierarchyNode::name).collect();
        assert_eq!(bases, vec!["b2c", "b2b", "gov"]);
        assert_eq!(tree.company_names(), vec!["A", "C", "B", "E", "D"]);
    }

    #[test]
    fn test_empty_sector_and_literal_no_sector_share_node() {
        let rows = vec![company("", "b2b", "A"), company("no sector", "b2b", "B")];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        assert_eq!(tree.sectors().len(), 1);
        assert_eq!(tree.sectors()[0].children()[0].children().len(), 2);
    }

    #[test]
    fn test_gender_percentages() {
        let rows = vec![counted("ai", "b2b", "Acme", "3", "1")];
        let tree = build_hierarchy(&rows, &HierarchyConfig::default()).unwrap();

        let acme = tree.companies().next().unwrap();
        assert_eq!(
            acme.children(),
            &[
                HierarchyNode::leaf(PERCENT_MALE, 75.0),
                HierarchyNode::leaf(PERCENT_FEMALE, 25.0),
            ]
        );
    }

    #[test]
    fn test_gender_counts_tolerate_whitespace_and_numbers() {
        let rows = vec![
            counted("ai", "b2b", "Acme", " 1 ", "1"),
            json!({
                "sector_1": "ai",
                "customer_base_1": "b2b",
                "company_name": "Bolt",
                "total_male": 0,
                "total_female": 4
            }),
        ];
        let tree = build_hierarchy(&rows, &HierarchyConfig::default()).unwrap();

        let sizes: Vec<Option<f64>> = tree
            .companies()
            .flat_map(|c| c.children())
            .map(HierarchyNode::size)
            .collect();
        assert_eq!(sizes, vec![Some(50.0), Some(50.0), Some(0.0), Some(100.0)]);
    }

    #[test]
    fn test_zero_counts_rejected_by_default() {
        let rows = vec![counted("ai", "b2b", "Acme", "2", "2"), counted("ai", "b2b", "Ghost", "0", "0")];
        let err = build_hierarchy(&rows, &HierarchyConfig::default()).unwrap_err();

        assert_eq!(
            err,
            HierarchyError::DegenerateRatio {
                row: 2,
                company: "Ghost".into()
            }
        );
    }

    #[test]
    fn test_zero_counts_fallback_policies() {
        let rows = vec![counted("ai", "b2b", "Ghost", "0", "0")];

        for (policy, expected) in [(ZeroCountPolicy::Zero, 0.0), (ZeroCountPolicy::Even, 50.0)] {
            let config = HierarchyConfig::default().with_zero_counts(policy);
            let tree = build_hierarchy(&rows, &config).unwrap();
            let ghost = tree.companies().next().unwrap();

            assert_eq!(ghost.child(PERCENT_MALE).and_then(HierarchyNode::size), Some(expected));
            assert_eq!(ghost.child(PERCENT_FEMALE).and_then(HierarchyNode::size), Some(expected));
        }
    }

    #[test]
    fn test_malformed_count() {
        let rows = vec![counted("ai", "b2b", "Acme", "three", "1")];
        let err = build_hierarchy(&rows, &HierarchyConfig::default()).unwrap_err();

        assert_eq!(
            err,
            HierarchyError::MalformedInput {
                row: 1,
                field: "total_male".into(),
                value: "three".into()
            }
        );
    }

    #[test]
    fn test_negative_and_empty_counts_are_malformed() {
        for bad in ["-1", "", "2.5"] {
            let rows = vec![counted("ai", "b2b", "Acme", "1", bad)];
            let err = build_hierarchy(&rows, &HierarchyConfig::default()).unwrap_err();
            assert!(matches!(err, HierarchyError::MalformedInput { ref field, .. } if field == "total_female"));
        }
    }

    #[test]
    fn test_missing_field() {
        let rows = vec![
            company("ai", "b2b", "Acme"),
            json!({ "sector_1": "ai", "company_name": "Bolt" }),
        ];
        let err = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap_err();

        assert_eq!(
            err,
            HierarchyError::MissingField {
                row: 2,
                field: "customer_base_1".into()
            }
        );
    }

    #[test]
    fn test_gender_variant_requires_counts() {
        let rows = vec![company("ai", "b2b", "Acme")];
        let err = build_hierarchy(&rows, &HierarchyConfig::default()).unwrap_err();

        assert!(matches!(err, HierarchyError::MissingField { ref field, .. } if field == "total_male"));
    }

    #[test]
    fn test_plain_variant_ignores_counts() {
        let rows = vec![counted("ai", "b2b", "Acme", "zero", "0")];
        let tree = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();

        assert_eq!(tree.company_names(), vec!["Acme"]);
    }

    #[test]
    fn test_failed_row_leaves_builder_untouched() {
        let mut builder = HierarchyBuilder::new(HierarchyConfig::default());
        builder.push_row(&counted("ai", "b2b", "Acme", "1", "1")).unwrap();
        let err = builder.push_row(&counted("ai", "b2b", "Bad", "x", "1")).unwrap_err();
        assert_eq!(err.row(), 2);

        builder.push_row(&counted("ai", "b2c", "Cora", "1", "3")).unwrap();
        let tree = builder.finish();
        assert_eq!(tree.company_names(), vec!["Acme", "Cora"]);
    }

    #[test]
    fn test_root_styles() {
        let rows = vec![company("ai", "b2b", "Acme")];

        let rooted = build_hierarchy(&rows, &HierarchyConfig::plain()).unwrap();
        assert_eq!(rooted.root_name(), Some("deartechpeople"));

        let renamed = build_hierarchy(&rows, &HierarchyConfig::plain().with_root_name("companies")).unwrap();
        assert_eq!(renamed.root_name(), Some("companies"));

        let unrooted = build_hierarchy(&rows, &HierarchyConfig::plain().unrooted()).unwrap();
        assert!(matches!(unrooted, HierarchyTree::Unrooted(ref sectors) if sectors.len() == 1));
    }

    #[test]
    fn test_no_rows() {
        let tree = build_hierarchy(&[], &HierarchyConfig::default()).unwrap();
        assert!(tree.sectors().is_empty());
        assert_eq!(tree.root_name(), Some("deartechpeople"));
    }

    #[test]
    fn test_gender_split() {
        assert_eq!(gender_split(3, 1), Some((75.0, 25.0)));
        assert_eq!(gender_split(0, 5), Some((0.0, 100.0)));
        assert_eq!(gender_split(0, 0), None);
    }
}
