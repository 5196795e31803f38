//! Boolean query construction for the search endpoint
//!
//! Turns the loose input bag into the API's query expression: AND-ed
//! conditions for the date range, the fixed utility-patent restriction, and a
//! phrase match on the title. Total function: every well-formed input bag
//! produces a valid query.

use serde_json::{json, Value};

/// Search criteria accepted by the provider
///
/// Dates are `YYYY-MM-DD` strings, validated by the host before the provider
/// runs.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Phrase matched against the patent title
    pub keyword: Option<String>,

    /// Inclusive lower bound on the grant date
    pub start_date: Option<String>,

    /// Inclusive upper bound on the grant date
    pub end_date: Option<String>,
}

/// Build the boolean query expression
///
/// A single resulting condition is returned unwrapped; two or more are
/// wrapped in a conjunction.
pub fn build_query(criteria: &SearchCriteria) -> Value {
    let mut conditions: Vec<Value> = Vec::new();

    // Date range filters
    if let Some(start) = &criteria.start_date {
        conditions.push(json!({"_gte": {"patent_date": start}}));
    }
    if let Some(end) = &criteria.end_date {
        conditions.push(json!({"_lte": {"patent_date": end}}));
    }

    // Fixed domain restriction
    conditions.push(json!({"patent_type": "utility"}));

    // Keyword filter using text phrase matching
    if let Some(keyword) = criteria.keyword.as_deref().map(str::trim) {
        if !keyword.is_empty() {
            conditions.push(json!({"_text_phrase": {"patent_title": keyword}}));
        }
    }

    if conditions.len() == 1 {
        conditions.remove(0)
    } else {
        json!({"_and": conditions})
    }
}
