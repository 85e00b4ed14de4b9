//! JSON Schema validation for hierarchy documents.
//!
//! The document layout is described by `schemas/company-hierarchy.json`
//! (JSON Schema Draft 7), embedded at compile time. It accepts both output
//! shapes:
//!
//! - a named root whose children are sectors
//! - a bare array of sectors
//!
//! Below the sectors, customer bases hold companies, and a company is either
//! a bare name or a node with exactly two percentage leaves.
//!
//! # Example
//!
//! ```rust,ignore
//! use serde_json::json;
//! use hierarchy::is_valid_hierarchy;
//!
//! let doc = json!({
//!     "name": "deartechpeople",
//!     "children": [{ "name": "ai", "children": [{ "name": "b2b", "children": ["Acme"] }] }]
//! });
//! assert!(is_valid_hierarchy(&doc));
//! ```

use once_cell::sync::Lazy;
use serde_json::Value;

static HIERARCHY_SCHEMA: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../schemas/company-hierarchy.json"))
        .expect("Invalid embedded schema")
});

/// Validate a JSON value against a JSON schema.
///
/// Returns every violation as a message.
pub fn validate(schema: &Value, data: &Value) -> Result<(), Vec<String>> {
    let validator = jsonschema::draft7::new(schema)
        .map_err(|e| vec![format!("Invalid schema: {}", e)])?;

    let errors: Vec<String> = validator
        .iter_errors(data)
        .map(|e| e.to_string())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Quick true/false check against a JSON schema.
pub fn is_valid(schema: &Value, data: &Value) -> bool {
    jsonschema::draft7::is_valid(schema, data)
}

/// Validate against the embedded hierarchy schema.
pub fn validate_hierarchy(data: &Value) -> Result<(), Vec<String>> {
    validate(&HIERARCHY_SCHEMA, data)
}

/// Quick check against the embedded hierarchy schema.
pub fn is_valid_hierarchy(data: &Value) -> bool {
    is_valid(&HIERARCHY_SCHEMA, data)
}
