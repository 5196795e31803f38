//! Report engine
//!
//! One engine instance per configuration; each run is independent and
//! stateless between invocations. Flow: validate inputs, load raw records
//! (file or API), normalize, cap to the report size, compute statistics,
//! assemble the bundle.

use chrono::{Months, Utc};
use patentscope_config::Settings;
use patentscope_core::{
    Normalizer, PatentRecord, PatentStatistics, RawRecord, StatisticsEngine,
};
use patentscope_io::{load_records, LoadError};
use patentscope_providers::{PatentsViewClient, SearchCriteria};
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Dataset name carried in every bundle
pub const DATASET_NAME: &str = "patent-research";

/// Data source descriptor used for API-backed runs
const API_SOURCE: &str = "PatentsView API Search";

/// Validated input bag supplied by the host
///
/// Exactly one of `file_path` / `keyword` must be set; the date fields must
/// be real calendar dates in `YYYY-MM-DD` form. [`ReportInputs::validate`]
/// enforces both.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    /// Path to a CSV or JSON file containing patent data
    pub file_path: Option<String>,

    /// Search terms matched against patent titles
    pub keyword: Option<String>,

    /// Grant-date range start (defaults to the configured lookback)
    pub start_date: Option<String>,

    /// Grant-date range end (defaults to today)
    pub end_date: Option<String>,

    /// Maximum number of patents to fetch
    pub max_results: Option<usize>,
}

impl ReportInputs {
    /// Validate the input bag, collecting every violation
    pub fn validate(&self) -> Result<(), PipelineError> {
        let mut errors = Vec::new();

        let has_file = self.file_path().is_some();
        let has_keyword = self.keyword().is_some();

        if !has_file && !has_keyword {
            errors.push("must provide either 'file_path' or 'keyword'".to_string());
        }
        if has_file && has_keyword {
            errors.push(
                "cannot combine a file upload with an API search; \
                 use either 'file_path' or 'keyword'"
                    .to_string(),
            );
        }

        if let Some(start) = &self.start_date {
            if !is_valid_date(start) {
                errors.push("start_date must be a real date in YYYY-MM-DD format".to_string());
            }
        }
        if let Some(end) = &self.end_date {
            if !is_valid_date(end) {
                errors.push("end_date must be a real date in YYYY-MM-DD format".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::InvalidInputs(errors))
        }
    }

    /// File path, trimmed; empty means absent
    pub fn file_path(&self) -> Option<&str> {
        self.file_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    /// Keyword, trimmed; empty means absent
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
    }
}

/// Structural and calendar validity of a YYYY-MM-DD date string
fn is_valid_date(value: &str) -> bool {
    let structural = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });

    structural && chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Pipeline failure surfaced to the host
///
/// Fetch failures never appear here: the provider degrades to partial or
/// empty results by contract. Only a rejected input bag or an unreadable
/// local file stops a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input bag was rejected
    #[error("invalid inputs: {}", .0.join("; "))]
    InvalidInputs(Vec<String>),

    /// A local data file could not be loaded
    #[error("failed to load data file: {0}")]
    Load(#[from] LoadError),
}

/// Search parameters echoed into the bundle metadata (API mode only)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub date_range: DateRange,
    pub max_results: usize,
}

/// Resolved grant-date range
#[derive(Debug, Clone, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// Record samples grouped by binding name
#[derive(Debug, Serialize)]
pub struct Samples {
    pub main: Vec<PatentRecord>,
}

/// Run metadata for the output sink
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    pub total_records: usize,
    pub ingested_at: String,
    pub source: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_params: Option<SearchParams>,
}

/// Everything the host's output sink consumes for one run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub dataset_name: String,
    pub samples: Samples,
    pub stats: PatentStatistics,
    pub metadata: BundleMetadata,
}

/// Report engine
///
/// Owns the provider client and the normalization/statistics components.
/// `run` is the single public entry point.
pub struct ReportEngine {
    settings: Settings,
    client: PatentsViewClient,
    normalizer: Normalizer,
    stats: StatisticsEngine,
}

impl ReportEngine {
    /// Create an engine backed by the production HTTP transport
    pub fn new(settings: Settings) -> Self {
        let client = PatentsViewClient::new(settings.api.clone());
        Self::with_client(settings, client)
    }

    /// Create an engine with an injected search client
    pub fn with_client(settings: Settings, client: PatentsViewClient) -> Self {
        Self {
            settings,
            client,
            normalizer: Normalizer::new(),
            stats: StatisticsEngine::new(),
        }
    }

    /// Run the full pipeline for one input bag
    pub async fn run(&self, inputs: &ReportInputs) -> Result<Bundle, PipelineError> {
        inputs.validate()?;

        let (raw, source, search_params) = self.load_data(inputs).await?;
        let (mut records, norm_stats) = self.normalizer.normalize(&raw);

        // Fixed cap on report size; a pipeline concern, not the normalizer's.
        records.truncate(self.settings.report.max_records);

        let stats = self.stats.compute(&records);

        info!(
            event_type = "pipeline_complete",
            source = %source,
            raw_count = raw.len(),
            record_count = records.len(),
            skipped = norm_stats.skipped,
            "Report pipeline finished"
        );

        Ok(Bundle {
            dataset_name: DATASET_NAME.to_string(),
            metadata: BundleMetadata {
                total_records: records.len(),
                ingested_at: Utc::now().to_rfc3339(),
                source,
                search_params,
            },
            samples: Samples { main: records },
            stats,
        })
    }

    /// Load raw records from the file or the search API
    async fn load_data(
        &self,
        inputs: &ReportInputs,
    ) -> Result<(Vec<RawRecord>, String, Option<SearchParams>), PipelineError> {
        if let Some(path) = inputs.file_path() {
            let records = load_records(Path::new(path))?;
            return Ok((records, path.to_string(), None));
        }

        let criteria = self.resolve_criteria(inputs);
        let max_results = inputs
            .max_results
            .unwrap_or(self.settings.report.default_max_results);

        info!(
            event_type = "date_range",
            start = criteria.start_date.as_deref().unwrap_or(""),
            end = criteria.end_date.as_deref().unwrap_or(""),
            "Resolved search date range"
        );

        let records = self.client.fetch(&criteria, max_results).await;

        let search_params = SearchParams {
            keyword: criteria.keyword.clone(),
            date_range: DateRange {
                start: criteria.start_date.clone().unwrap_or_default(),
                end: criteria.end_date.clone().unwrap_or_default(),
            },
            max_results,
        };

        Ok((records, API_SOURCE.to_string(), Some(search_params)))
    }

    /// Apply the default date range (configured lookback through today)
    fn resolve_criteria(&self, inputs: &ReportInputs) -> SearchCriteria {
        let today = Utc::now().date_naive();
        let lookback_months = Months::new(12 * self.settings.report.default_lookback_years as u32);
        let lookback_start = today
            .checked_sub_months(lookback_months)
            .unwrap_or(today);

        SearchCriteria {
            keyword: inputs.keyword().map(str::to_string),
            start_date: Some(
                inputs
                    .start_date
                    .clone()
                    .unwrap_or_else(|| lookback_start.format("%Y-%m-%d").to_string()),
            ),
            end_date: Some(
                inputs
                    .end_date
                    .clone()
                    .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
            ),
        }
    }
}
