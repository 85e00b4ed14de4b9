//! Output tree for hierarchical charts.
//!
//! The serialized shape is the `name` / `children` / `size` convention used
//! by sunburst and treemap layouts:
//!
//! ```text
//! root ─┬─ sector ─┬─ customer base ─┬─ "Acme"                       (plain)
//!       │          │                 └─ { name, children: [          (gender split)
//!       │          │                        { name: percent_male,   size },
//!       │          │                        { name: percent_female, size } ] }
//!       │          └─ ...
//!       └─ ...
//! ```
//!
//! - [`HierarchyNode`] - one node of the tree (branch, sized leaf, or bare company name)
//! - [`HierarchyTree`] - a named root node or an anonymous list of sector nodes
//! - [`TreeStats`] - sector / customer base / company counts

use serde::{Deserialize, Serialize};

/// Name of the leaf carrying the male share of a company.
pub const PERCENT_MALE: &str = "percent_male";

/// Name of the leaf carrying the female share of a company.
pub const PERCENT_FEMALE: &str = "percent_female";

// =============================================================================
// Nodes
// =============================================================================

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HierarchyNode {
    /// Named node with children (root, sector, customer base, or annotated company).
    Branch {
        name: String,
        children: Vec<HierarchyNode>,
    },
    /// Sized leaf (percentage of a company).
    Leaf { name: String, size: f64 },
    /// Bare company name.
    Company(String),
}

impl HierarchyNode {
    pub fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        Self::Branch {
            name: name.into(),
            children,
        }
    }

    pub fn leaf(name: impl Into<String>, size: f64) -> Self {
        Self::Leaf {
            name: name.into(),
            size,
        }
    }

    /// Company annotated with its gender split.
    pub fn company_with_split(name: impl Into<String>, percent_male: f64, percent_female: f64) -> Self {
        Self::branch(
            name,
            vec![
                Self::leaf(PERCENT_MALE, percent_male),
                Self::leaf(PERCENT_FEMALE, percent_female),
            ],
        )
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Branch { name, .. } | Self::Leaf { name, .. } => name,
            Self::Company(name) => name,
        }
    }

    /// Children of a branch; empty for leaves and bare names.
    pub fn children(&self) -> &[HierarchyNode] {
        match self {
            Self::Branch { children, .. } => children,
            _ => &[],
        }
    }

    pub fn size(&self) -> Option<f64> {
        match self {
            Self::Leaf { size, .. } => Some(*size),
            _ => None,
        }
    }

    /// Looks up a direct child by name.
    pub fn child(&self, name: &str) -> Option<&HierarchyNode> {
        self.children().iter().find(|c| c.name() == name)
    }
}

// =============================================================================
// Tree
// =============================================================================

/// The whole output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HierarchyTree {
    /// Single named root whose children are sectors.
    Rooted(HierarchyNode),
    /// Sector nodes without a root.
    Unrooted(Vec<HierarchyNode>),
}

impl HierarchyTree {
    /// Sector nodes, in output order.
    pub fn sectors(&self) -> &[HierarchyNode] {
        match self {
            Self::Rooted(root) => root.children(),
            Self::Unrooted(sectors) => sectors,
        }
    }

    /// Root name, if the tree has one.
    pub fn root_name(&self) -> Option<&str> {
        match self {
            Self::Rooted(root) => Some(root.name()),
            Self::Unrooted(_) => None,
        }
    }

    pub fn sector(&self, name: &str) -> Option<&HierarchyNode> {
        self.sectors().iter().find(|s| s.name() == name)
    }

    /// Company entries, walking sectors and customer bases in order.
    pub fn companies(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.sectors()
            .iter()
            .flat_map(|sector| sector.children())
            .flat_map(|customer_base| customer_base.children())
    }

    /// Company names in output order, duplicates included.
    pub fn company_names(&self) -> Vec<&str> {
        self.companies().map(HierarchyNode::name).collect()
    }

    pub fn stats(&self) -> TreeStats {
        let sectors = self.sectors();
        TreeStats {
            sectors: sectors.len(),
            customer_bases: sectors.iter().map(|s| s.children().len()).sum(),
            companies: self.companies().count(),
        }
    }
}

/// Node counts per level of a [`HierarchyTree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeStats {
    pub sectors: usize,
    pub customer_bases: usize,
    pub companies: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tree() -> HierarchyTree {
        HierarchyTree::Rooted(HierarchyNode::branch(
            "deartechpeople",
            vec![
                HierarchyNode::branch(
                    "ai",
                    vec![HierarchyNode::branch(
                        "b2b",
                        vec![
                            HierarchyNode::company_with_split("Acme", 75.0, 25.0),
                            HierarchyNode::Company("Bolt".into()),
                        ],
                    )],
                ),
                HierarchyNode::branch(
                    "no sector",
                    vec![HierarchyNode::branch("b2c", vec![HierarchyNode::Company("Zeta".into())])],
                ),
            ],
        ))
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(sample_tree()).unwrap();

        assert_eq!(value["name"], "deartechpeople");
        let acme = &value["children"][0]["children"][0]["children"][0];
        assert_eq!(
            acme,
            &json!({
                "name": "Acme",
                "children": [
                    { "name": "percent_male", "size": 75.0 },
                    { "name": "percent_female", "size": 25.0 }
                ]
            })
        );
        assert_eq!(value["children"][0]["children"][0]["children"][1], "Bolt");
    }

    #[test]
    fn test_deserialize_back() {
        let tree = sample_tree();
        let text = serde_json::to_string(&tree).unwrap();
        let parsed: HierarchyTree = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, tree);
    }

    #[test]
    fn test_unrooted_deserializes_as_list() {
        let parsed: HierarchyTree = serde_json::from_value(json!([
            { "name": "ai", "children": [{ "name": "b2b", "children": ["Acme"] }] }
        ]))
        .unwrap();

        assert!(parsed.root_name().is_none());
        assert_eq!(parsed.company_names(), vec!["Acme"]);
    }

    #[test]
    fn test_stats_and_names() {
        let tree = sample_tree();

        assert_eq!(
            tree.stats(),
            TreeStats {
                sectors: 2,
                customer_bases: 2,
                companies: 3
            }
        );
        assert_eq!(tree.company_names(), vec!["Acme", "Bolt", "Zeta"]);
        assert_eq!(tree.root_name(), Some("deartechpeople"));
    }

    #[test]
    fn test_child_lookup() {
        let tree = sample_tree();
        let acme = tree.sector("ai").and_then(|s| s.child("b2b")).and_then(|c| c.child("Acme")).unwrap();

        assert_eq!(acme.child(PERCENT_MALE).and_then(HierarchyNode::size), Some(75.0));
        assert_eq!(acme.child(PERCENT_FEMALE).and_then(HierarchyNode::size), Some(25.0));
        assert!(HierarchyNode::Company("Bolt".into()).children().is_empty());
    }
}
