//! Type definitions for patent record processing

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw record as returned by the search API or loaded from a file
///
/// Arbitrary and missing fields are expected; the normalizer is the only
/// component that interprets the shape.
pub type RawRecord = serde_json::Value;

/// Canonical patent record
///
/// Owned by the normalizer, consumed read-only downstream. Every field has a
/// deterministic default so a record built from partial source data is still
/// fully well-typed. Serialized field names match the downstream report
/// bindings (camelCase).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatentRecord {
    /// Patent number; may be empty when the source omits it (no uniqueness
    /// enforced)
    pub patent_number: String,

    /// Patent title
    pub title: String,

    /// Patent abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,

    /// Inventor names as "first last", trimmed, in source order
    pub inventors: Vec<String>,

    /// First assignee's organization name
    pub assignee: String,

    /// Grant date in YYYY-MM-DD form, or empty
    pub patent_date: String,

    /// Year segment of the grant date
    pub patent_year: i32,

    /// Patent type (e.g. "utility")
    pub patent_type: String,

    /// CPC subgroup identifiers, parallel to `cpc_titles` (lengths need not
    /// match)
    pub cpc_codes: Vec<String>,

    /// CPC subgroup titles
    pub cpc_titles: Vec<String>,

    /// Number of US patents cited by this patent
    pub citation_count: u64,

    /// Number of times this patent is cited by US patents
    pub cited_by_count: u64,
}

/// Per-run normalization counters
///
/// Scoped to a single normalization pass; logged as a summary and returned to
/// the caller, never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NormalizationStats {
    /// Number of raw records presented to the normalizer
    pub total: usize,

    /// Records that passed the shape check
    pub success: usize,

    /// Records skipped
    pub skipped: usize,

    /// Skip-reason category -> occurrence count
    pub skip_reasons: BTreeMap<String, usize>,
}

impl NormalizationStats {
    /// Create counters for a batch of the given size
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Record a single skipped record under the given reason
    pub fn record_skip(&mut self, reason: &str) {
        self.skipped += 1;
        *self.skip_reasons.entry(reason.to_string()).or_insert(0) += 1;
    }
}
