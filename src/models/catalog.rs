//! Catalog snapshot model.

use serde::{Deserialize, Serialize};

use super::Gift;

/// Full catalog snapshot, the authoritative state clients reconcile against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub schema_version: i32,
    pub generated_at: String,
    pub revision_id: i64,
    pub gifts: Vec<Gift>,
}

/// Revision information for change detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionInfo {
    pub revision_id: i64,
    pub generated_at: String,
}
