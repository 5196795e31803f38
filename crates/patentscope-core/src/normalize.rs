//! Raw record normalization
//!
//! Maps heterogeneous raw JSON records into the canonical [`PatentRecord`]
//! shape. Field-level defaults cover absent or empty source data; a record is
//! accepted if and only if it type-checks against the canonical shape after
//! defaulting. Per-record failures become categorized skips, so a single
//! malformed record never aborts the batch.

use chrono::{Datelike, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::types::{NormalizationStats, PatentRecord, RawRecord};

/// Title substituted when the source omits one
pub const DEFAULT_TITLE: &str = "Untitled";

/// Abstract substituted when the source omits one
pub const DEFAULT_ABSTRACT: &str = "No abstract available";

/// Assignee sentinel for records without a usable organization name
pub const UNKNOWN_ASSIGNEE: &str = "Unknown Assignee";

/// Per-record normalization failure
///
/// Converted into a skip entry with a stable reason category; never
/// propagated across record boundaries.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The raw element is not a JSON object at all
    #[error("record is not a JSON object")]
    NotAnObject,

    /// A field is present with a shape the canonical record cannot absorb
    #[error("field '{field}' failed the shape check: expected {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

impl NormalizeError {
    /// Stable category string used as the skip-reason key
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotAnObject => "not_an_object",
            Self::InvalidField { .. } => "validation_failed",
        }
    }
}

/// Normalizer for raw search results
///
/// Stateless apart from the fallback year used when a record carries no
/// parseable grant date. The default fallback is the current calendar year;
/// tests pin it for determinism.
#[derive(Debug, Clone)]
pub struct Normalizer {
    fallback_year: i32,
}

impl Normalizer {
    /// Create a normalizer that falls back to the current calendar year
    pub fn new() -> Self {
        Self {
            fallback_year: Utc::now().year(),
        }
    }

    /// Create a normalizer with a pinned fallback year
    pub fn with_fallback_year(fallback_year: i32) -> Self {
        Self { fallback_year }
    }

    /// Normalize a batch of raw records
    ///
    /// Returns the accepted records in input order together with the run's
    /// counters. Output length + skipped count always equals the input
    /// length.
    pub fn normalize(&self, raw: &[RawRecord]) -> (Vec<PatentRecord>, NormalizationStats) {
        let mut stats = NormalizationStats::new(raw.len());
        let mut records = Vec::with_capacity(raw.len());

        for item in raw {
            match self.normalize_record(item) {
                Ok(record) => {
                    records.push(record);
                    stats.success += 1;
                }
                Err(err) => {
                    debug!(
                        event_type = "record_skipped",
                        reason = err.reason(),
                        error = %err,
                        "Skipping raw record"
                    );
                    stats.record_skip(err.reason());
                }
            }
        }

        info!(
            event_type = "normalization_summary",
            total = stats.total,
            success = stats.success,
            skipped = stats.skipped,
            "Normalized raw records"
        );
        for (reason, count) in &stats.skip_reasons {
            warn!(
                event_type = "normalization_skips",
                reason = %reason,
                count,
                "Records skipped during normalization"
            );
        }

        (records, stats)
    }

    /// Normalize a single raw record
    pub fn normalize_record(&self, raw: &Value) -> Result<PatentRecord, NormalizeError> {
        let obj = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

        let patent_date = string_field(obj, "patent_date")?.unwrap_or_default();

        Ok(PatentRecord {
            patent_number: string_field(obj, "patent_number")?.unwrap_or_default(),
            title: defaulted_string(obj, "patent_title", DEFAULT_TITLE)?,
            abstract_text: defaulted_string(obj, "patent_abstract", DEFAULT_ABSTRACT)?,
            inventors: extract_inventors(obj),
            assignee: extract_assignee(obj),
            patent_year: self.derive_year(&patent_date),
            patent_date,
            patent_type: string_field(obj, "patent_type")?.unwrap_or_default(),
            cpc_codes: string_array_field(obj, "cpc_subgroup_id")?,
            cpc_titles: string_array_field(obj, "cpc_subgroup_title")?,
            citation_count: count_field(obj, "cited_patent_count")?,
            cited_by_count: count_field(obj, "citedby_patent_count")?,
        })
    }

    /// Year segment before the first '-', or the fallback year
    ///
    /// An empty date and an unparseable year segment take the same fallback
    /// path.
    fn derive_year(&self, patent_date: &str) -> i32 {
        patent_date
            .split('-')
            .next()
            .and_then(|segment| segment.trim().parse::<i32>().ok())
            .unwrap_or(self.fallback_year)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract an optional string field
///
/// Missing and null map to `None`; any other non-string shape fails the
/// record.
fn string_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, NormalizeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(NormalizeError::InvalidField {
            field,
            expected: "string",
        }),
    }
}

/// Extract a string field, substituting the default for absent or empty input
fn defaulted_string(
    obj: &Map<String, Value>,
    field: &'static str,
    default: &str,
) -> Result<String, NormalizeError> {
    Ok(string_field(obj, field)?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string()))
}

/// Extract a non-negative integer count
///
/// Missing and null map to 0; non-integer numbers and non-number shapes fail
/// the record.
fn count_field(obj: &Map<String, Value>, field: &'static str) -> Result<u64, NormalizeError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(0),
        Some(value) => value.as_u64().ok_or(NormalizeError::InvalidField {
            field,
            expected: "non-negative integer",
        }),
    }
}

/// Copy an array of strings verbatim
///
/// Anything that is not an array (including a missing field) yields an empty
/// list; a non-string element fails the record.
fn string_array_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<Vec<String>, NormalizeError> {
    match obj.get(field).and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(NormalizeError::InvalidField {
                        field,
                        expected: "array of strings",
                    })
            })
            .collect(),
        None => Ok(Vec::new()),
    }
}

/// Derive "first last" inventor names, trimmed
///
/// Tolerant by design: a non-array `inventors` field yields an empty list,
/// and missing or non-string name parts contribute empty strings, so an
/// element with no usable names still produces an (empty) entry.
fn extract_inventors(obj: &Map<String, Value>) -> Vec<String> {
    match obj.get("inventors").and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .map(|inv| {
                let first = inv
                    .get("inventor_first_name")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                let last = inv
                    .get("inventor_last_name")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                format!("{first} {last}").trim().to_string()
            })
            .collect(),
        None => Vec::new(),
    }
}

/// First assignee's organization name, or the sentinel
fn extract_assignee(obj: &Map<String, Value>) -> String {
    obj.get("assignees")
        .and_then(Value::as_array)
        .and_then(|assignees| assignees.first())
        .and_then(|first| first.get("assignee_organization"))
        .and_then(Value::as_str)
        .filter(|org| !org.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_ASSIGNEE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::with_fallback_year(2024)
    }

    #[test]
    fn test_full_record_normalization() {
        let raw = json!({
            "patent_title": "A",
            "inventors": [
                {"inventor_first_name": "Jane", "inventor_last_name": "Doe"}
            ],
            "assignees": [{"assignee_organization": "Acme"}],
            "patent_date": "2020-05-01",
            "cited_patent_count": 3
        });

        let record = normalizer().normalize_record(&raw).unwrap();
        assert_eq!(record.title, "A");
        assert_eq!(record.inventors, vec!["Jane Doe"]);
        assert_eq!(record.assignee, "Acme");
        assert_eq!(record.patent_date, "2020-05-01");
        assert_eq!(record.patent_year, 2020);
        assert_eq!(record.citation_count, 3);
        assert_eq!(record.cited_by_count, 0);
        assert_eq!(record.patent_number, "");
        assert_eq!(record.abstract_text, DEFAULT_ABSTRACT);
        assert_eq!(record.patent_type, "");
        assert!(record.cpc_codes.is_empty());
        assert!(record.cpc_titles.is_empty());
    }

    #[test]
    fn test_empty_object_gets_all_defaults() {
        let record = normalizer().normalize_record(&json!({})).unwrap();
        assert_eq!(record.patent_number, "");
        assert_eq!(record.title, DEFAULT_TITLE);
        assert_eq!(record.abstract_text, DEFAULT_ABSTRACT);
        assert!(record.inventors.is_empty());
        assert_eq!(record.assignee, UNKNOWN_ASSIGNEE);
        assert_eq!(record.patent_date, "");
        assert_eq!(record.patent_year, 2024);
        assert_eq!(record.citation_count, 0);
    }

    #[test]
    fn test_missing_assignees_uses_sentinel() {
        let record = normalizer()
            .normalize_record(&json!({"patent_title": "X"}))
            .unwrap();
        assert_eq!(record.assignee, UNKNOWN_ASSIGNEE);
    }

    #[test]
    fn test_empty_assignee_organization_uses_sentinel() {
        let raw = json!({"assignees": [{"assignee_organization": ""}]});
        let record = normalizer().normalize_record(&raw).unwrap();
        assert_eq!(record.assignee, UNKNOWN_ASSIGNEE);
    }

    #[test]
    fn test_inventor_name_parts_are_tolerant() {
        let raw = json!({
            "inventors": [
                {"inventor_first_name": "Jane"},
                {"inventor_last_name": "Roe"},
                {},
                "not an object"
            ]
        });

        let record = normalizer().normalize_record(&raw).unwrap();
        assert_eq!(record.inventors, vec!["Jane", "Roe", "", ""]);
    }

    #[test]
    fn test_non_array_inventors_yields_empty_list() {
        let raw = json!({"inventors": "Jane Doe"});
        let record = normalizer().normalize_record(&raw).unwrap();
        assert!(record.inventors.is_empty());
    }

    #[test]
    fn test_empty_title_takes_default() {
        let raw = json!({"patent_title": ""});
        let record = normalizer().normalize_record(&raw).unwrap();
        assert_eq!(record.title, DEFAULT_TITLE);
    }

    #[test]
    fn test_unparseable_year_segment_falls_back() {
        let raw = json!({"patent_date": "unknown"});
        let record = normalizer().normalize_record(&raw).unwrap();
        assert_eq!(record.patent_year, 2024);
        assert_eq!(record.patent_date, "unknown");
    }

    #[test]
    fn test_wrong_typed_title_is_skipped() {
        let err = normalizer()
            .normalize_record(&json!({"patent_title": 42}))
            .unwrap_err();
        assert_eq!(err.reason(), "validation_failed");
    }

    #[test]
    fn test_wrong_typed_count_is_skipped() {
        let err = normalizer()
            .normalize_record(&json!({"cited_patent_count": "3"}))
            .unwrap_err();
        assert_eq!(err.reason(), "validation_failed");
    }

    #[test]
    fn test_non_string_cpc_element_is_skipped() {
        let err = normalizer()
            .normalize_record(&json!({"cpc_subgroup_id": ["G06F", 7]}))
            .unwrap_err();
        assert_eq!(err.reason(), "validation_failed");
    }

    #[test]
    fn test_non_object_record_is_skipped() {
        let err = normalizer().normalize_record(&json!("plain")).unwrap_err();
        assert_eq!(err.reason(), "not_an_object");
    }

    #[test]
    fn test_batch_accounting_is_total() {
        let raw = vec![
            json!({"patent_title": "ok"}),
            json!(null),
            json!({"patent_title": 42}),
            json!({"patent_title": "also ok"}),
        ];

        let (records, stats) = normalizer().normalize(&raw);
        assert_eq!(records.len() + stats.skipped, raw.len());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.skipped, 2);
        assert_eq!(stats.skip_reasons["not_an_object"], 1);
        assert_eq!(stats.skip_reasons["validation_failed"], 1);
    }

    #[test]
    fn test_empty_batch() {
        let (records, stats) = normalizer().normalize(&[]);
        assert!(records.is_empty());
        assert_eq!(
            stats,
            NormalizationStats {
                total: 0,
                success: 0,
                skipped: 0,
                skip_reasons: Default::default(),
            }
        );
    }
}
