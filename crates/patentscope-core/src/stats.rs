//! Aggregate statistics over normalized patent records
//!
//! Six independent read-only reductions: filing trends, assignee rankings,
//! inventor rankings, technology classification frequency, and citation
//! metrics. All are deterministic for a given input order; every ranking uses
//! a stable sort so equal counts keep first-seen order, and the citation
//! ranking sorts a copy so the shared record slice is never reordered.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::PatentRecord;

/// Number of top assignees reported
const TOP_ASSIGNEES: usize = 15;

/// Number of top inventors reported
const TOP_INVENTORS: usize = 20;

/// Number of top CPC codes reported
const TOP_CPC_CODES: usize = 20;

/// Number of most-cited patents reported
const TOP_CITED: usize = 10;

/// Derived statistics snapshot, computed once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentStatistics {
    pub total_patents: usize,
    pub filing_trends: FilingTrends,
    pub assignee_stats: AssigneeStats,
    pub inventor_stats: InventorStats,
    pub technology_stats: TechnologyStats,
    pub citation_stats: CitationStats,
}

/// Patent counts grouped by grant year
///
/// `total_years` is the span `latest - earliest + 1`; years without records
/// are not synthesized into `by_year`, so sparse data reads as a continuous
/// span. Kept for compatibility with the downstream report bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingTrends {
    pub earliest_year: i32,
    pub latest_year: i32,
    pub total_years: i32,
    pub by_year: Vec<YearCount>,
    pub peak_year: i32,
    pub peak_count: usize,
    pub avg_per_year: f64,
}

/// Patent count for a single year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// Assignee frequency ranking
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssigneeStats {
    pub total_unique_assignees: usize,
    pub top_assignees: Vec<AssigneeCount>,
}

/// Occurrence count for one assignee
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssigneeCount {
    pub assignee: String,
    pub count: usize,
}

/// Inventor participation statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorStats {
    pub total_unique_inventors: usize,
    pub avg_inventors_per_patent: f64,
    pub max_inventors_per_patent: usize,
    pub multi_inventor_patents: usize,
    pub top_inventors: Vec<InventorCount>,
}

/// Occurrence count for one inventor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventorCount {
    pub name: String,
    pub count: usize,
}

/// CPC classification frequency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnologyStats {
    #[serde(rename = "totalUniqueCPCCodes")]
    pub total_unique_cpc_codes: usize,

    #[serde(rename = "topCPCCodes")]
    pub top_cpc_codes: Vec<CpcCount>,
}

/// Occurrence count for one CPC subgroup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CpcCount {
    pub code: String,
    pub count: usize,
}

/// Citation metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationStats {
    pub total_citations: u64,
    pub avg_citations_per_patent: f64,
    pub max_citations: u64,
    pub most_cited_patents: Vec<CitedPatent>,
}

/// Ranked entry in the most-cited list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CitedPatent {
    pub patent_number: String,
    pub title: String,
    pub citation_count: u64,
}

/// Statistics engine over a normalized record set
///
/// The fallback year anchors the filing-trends span when the record set is
/// empty; tests pin it for determinism.
#[derive(Debug, Clone)]
pub struct StatisticsEngine {
    fallback_year: i32,
}

impl StatisticsEngine {
    /// Create an engine anchored to the current calendar year
    pub fn new() -> Self {
        Self {
            fallback_year: Utc::now().year(),
        }
    }

    /// Create an engine with a pinned fallback year
    pub fn with_fallback_year(fallback_year: i32) -> Self {
        Self { fallback_year }
    }

    /// Compute the full statistics snapshot
    pub fn compute(&self, records: &[PatentRecord]) -> PatentStatistics {
        PatentStatistics {
            total_patents: records.len(),
            filing_trends: self.filing_trends(records),
            assignee_stats: assignee_stats(records),
            inventor_stats: inventor_stats(records),
            technology_stats: technology_stats(records),
            citation_stats: citation_stats(records),
        }
    }

    fn filing_trends(&self, records: &[PatentRecord]) -> FilingTrends {
        let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
        for record in records {
            *counts.entry(record.patent_year).or_insert(0) += 1;
        }

        let earliest = counts.keys().next().copied().unwrap_or(self.fallback_year);
        let latest = counts.keys().last().copied().unwrap_or(self.fallback_year);
        let span = latest - earliest + 1;

        let by_year: Vec<YearCount> = counts
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect();

        // Stable sort keeps ascending-year order among equal counts, so the
        // earliest year wins a tie for the peak.
        let mut by_count = by_year.clone();
        by_count.sort_by(|a, b| b.count.cmp(&a.count));
        let peak = by_count.first();

        FilingTrends {
            earliest_year: earliest,
            latest_year: latest,
            total_years: span,
            peak_year: peak.map(|p| p.year).unwrap_or(latest),
            peak_count: peak.map(|p| p.count).unwrap_or(0),
            avg_per_year: records.len() as f64 / span.max(1) as f64,
            by_year,
        }
    }
}

impl Default for StatisticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn assignee_stats(records: &[PatentRecord]) -> AssigneeStats {
    let tally = Tally::collect(records.iter().map(|r| r.assignee.as_str()));

    AssigneeStats {
        total_unique_assignees: tally.unique(),
        top_assignees: tally
            .top(TOP_ASSIGNEES)
            .map(|(assignee, count)| AssigneeCount { assignee, count })
            .collect(),
    }
}

fn inventor_stats(records: &[PatentRecord]) -> InventorStats {
    let tally = Tally::collect(
        records
            .iter()
            .flat_map(|r| r.inventors.iter().map(String::as_str)),
    );
    let inventor_total: usize = records.iter().map(|r| r.inventors.len()).sum();

    InventorStats {
        total_unique_inventors: tally.unique(),
        avg_inventors_per_patent: average(inventor_total as f64, records.len()),
        max_inventors_per_patent: records.iter().map(|r| r.inventors.len()).max().unwrap_or(0),
        multi_inventor_patents: records.iter().filter(|r| r.inventors.len() > 1).count(),
        top_inventors: tally
            .top(TOP_INVENTORS)
            .map(|(name, count)| InventorCount { name, count })
            .collect(),
    }
}

fn technology_stats(records: &[PatentRecord]) -> TechnologyStats {
    let tally = Tally::collect(
        records
            .iter()
            .flat_map(|r| r.cpc_codes.iter().map(String::as_str)),
    );

    TechnologyStats {
        total_unique_cpc_codes: tally.unique(),
        top_cpc_codes: tally
            .top(TOP_CPC_CODES)
            .map(|(code, count)| CpcCount { code, count })
            .collect(),
    }
}

fn citation_stats(records: &[PatentRecord]) -> CitationStats {
    let total_citations: u64 = records.iter().map(|r| r.citation_count).sum();
    let max_citations = records.iter().map(|r| r.citation_count).max().unwrap_or(0);

    // Descending stable sort on a copy; ties keep encounter order and the
    // shared record slice stays untouched for the other reductions.
    let mut ranked: Vec<&PatentRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.citation_count.cmp(&a.citation_count));

    CitationStats {
        total_citations,
        avg_citations_per_patent: average(total_citations as f64, records.len()),
        max_citations,
        most_cited_patents: ranked
            .into_iter()
            .take(TOP_CITED)
            .map(|r| CitedPatent {
                patent_number: r.patent_number.clone(),
                title: r.title.clone(),
                citation_count: r.citation_count,
            })
            .collect(),
    }
}

/// Mean with a zero-length guard
fn average(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Frequency table preserving first-seen order among equal counts
struct Tally {
    ranked: Vec<(String, usize)>,
}

impl Tally {
    fn collect<'a>(items: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for item in items {
            let entry = counts.entry(item).or_insert(0);
            if *entry == 0 {
                first_seen.push(item);
            }
            *entry += 1;
        }

        // Stable sort over first-seen order: equal counts keep it.
        let mut ranked: Vec<(String, usize)> = first_seen
            .into_iter()
            .map(|item| (item.to_string(), counts[item]))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        Self { ranked }
    }

    fn unique(&self) -> usize {
        self.ranked.len()
    }

    fn top(&self, n: usize) -> impl Iterator<Item = (String, usize)> + '_ {
        self.ranked.iter().take(n).cloned()
    }
}
