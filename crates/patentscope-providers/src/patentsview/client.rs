//! Cursor-paginated search client
//!
//! Executes the boolean query repeatedly with a moving cursor, pacing every
//! request through the rate limiter and retrying transient transport
//! failures. The public entry point never fails: every stop condition
//! degrades to returning whatever was accumulated so far.

use patentscope_config::ApiConfig;
use patentscope_core::RawRecord;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::query::{build_query, SearchCriteria};
use super::rate_limit::RateLimiter;
use super::transport::{HttpResponse, HttpTransport, SearchTransport, TransportError};

/// Field projection requested for every search
const PATENT_FIELDS: &[&str] = &[
    "patent_id",
    "patent_title",
    "patent_abstract",
    "patent_date",
    "patent_year",
    "patent_type",
    "patent_num_us_patents_cited",
    "patent_num_times_cited_by_us_patents",
    "assignees",
    "inventors",
    "cpc_current",
];

/// Response payload of the search endpoint
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Records in this page
    #[serde(default)]
    pub patents: Vec<RawRecord>,

    /// Total result count reported by the API (approximate)
    #[serde(default)]
    pub total_hits: u64,

    /// Semantic error payload; present on some success-status responses
    #[serde(default)]
    pub error: Option<Value>,
}

impl SearchResponse {
    /// The error payload, if the API reported one
    fn error_payload(&self) -> Option<&Value> {
        self.error
            .as_ref()
            .filter(|value| !matches!(value, Value::Null | Value::Bool(false)))
    }
}

/// Pagination cursor: `(patent_date, patent_id)` of the last row returned
///
/// Opaque to the client; the values are passed back to the API verbatim.
#[derive(Debug, Clone)]
struct Cursor {
    patent_date: Value,
    patent_id: Value,
}

impl Cursor {
    fn from_record(record: &RawRecord) -> Self {
        Self {
            patent_date: record.get("patent_date").cloned().unwrap_or(Value::Null),
            patent_id: record.get("patent_id").cloned().unwrap_or(Value::Null),
        }
    }

    fn to_value(&self) -> Value {
        json!([self.patent_date, self.patent_id])
    }
}

/// PatentsView search client
///
/// Owns the pacing and retry policy; the transport is injectable so the
/// pagination protocol is testable without a network.
pub struct PatentsViewClient {
    config: ApiConfig,
    limiter: RateLimiter,
    transport: Arc<dyn SearchTransport>,
}

impl PatentsViewClient {
    /// Create a client backed by the production HTTP transport
    pub fn new(config: ApiConfig) -> Self {
        let transport = Arc::new(HttpTransport::from_config(&config));
        Self::with_transport(config, transport)
    }

    /// Create a client with an injected transport
    pub fn with_transport(config: ApiConfig, transport: Arc<dyn SearchTransport>) -> Self {
        let limiter = RateLimiter::from_millis(config.request_delay_ms);
        Self {
            config,
            limiter,
            transport,
        }
    }

    /// Fetch up to `max_results` raw records matching the criteria
    ///
    /// Never fails: a missing API key short-circuits to an empty result, and
    /// any mid-pagination failure returns the pages accumulated so far.
    pub async fn fetch(&self, criteria: &SearchCriteria, max_results: usize) -> Vec<RawRecord> {
        info!(
            event_type = "search_start",
            keyword = criteria.keyword.as_deref().unwrap_or("(none)"),
            start_date = criteria.start_date.as_deref().unwrap_or(""),
            end_date = criteria.end_date.as_deref().unwrap_or(""),
            max_results,
            "Searching PatentsView API"
        );

        if self.config.api_key().is_none() {
            warn!(
                event_type = "missing_api_key",
                "API key not configured; skipping search"
            );
            return Vec::new();
        }

        let patents = self.search_paginated(criteria, max_results).await;

        if patents.is_empty() {
            warn!(event_type = "search_empty", "No patents found");
        } else {
            info!(
                event_type = "search_complete",
                patent_count = patents.len(),
                "Search finished"
            );
        }

        patents
    }

    /// Run the request/wait/response loop until a stop condition fires
    ///
    /// Stop conditions, checked in order after each page: non-2xx status,
    /// API error payload, empty page, result cap or reported total reached,
    /// short page (exhaustion; the cursor is not advanced). Only a full page
    /// advances the cursor.
    async fn search_paginated(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Vec<RawRecord> {
        let query = build_query(criteria);
        let sort = json!([{"patent_date": "desc"}, {"patent_id": "asc"}]);
        let page_ceiling = max_results.min(self.config.page_size_limit);

        let mut accumulated: Vec<RawRecord> = Vec::new();
        let mut cursor: Option<Cursor> = None;

        while accumulated.len() < max_results {
            let requested = page_ceiling.min(max_results - accumulated.len());

            let mut options = json!({"size": requested});
            if let Some(cursor) = &cursor {
                options["after"] = cursor.to_value();
            }
            let body = json!({
                "q": query,
                "f": PATENT_FIELDS,
                "s": sort,
                "o": options,
            });

            debug!(
                event_type = "fetch_batch",
                requested,
                accumulated = accumulated.len(),
                "Fetching batch"
            );

            self.limiter.pause().await;

            let response = match self.execute_with_retry(&body).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(
                        event_type = "transport_exhausted",
                        error = %err,
                        "Request failed after retries; keeping partial results"
                    );
                    break;
                }
            };

            if !response.status.is_success() {
                warn!(
                    event_type = "http_error",
                    status = %response.status,
                    body = %response.body,
                    "Non-success response; keeping partial results"
                );
                break;
            }

            let page: SearchResponse = match serde_json::from_str(&response.body) {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        event_type = "response_parse_error",
                        error = %err,
                        "Unparseable response body; keeping partial results"
                    );
                    break;
                }
            };

            if let Some(payload) = page.error_payload() {
                error!(
                    event_type = "api_error",
                    error = %payload,
                    "API reported an error; keeping partial results"
                );
                break;
            }

            if page.patents.is_empty() {
                debug!(event_type = "results_exhausted", "No more results");
                break;
            }

            let page_len = page.patents.len();
            let next_cursor = page.patents.last().map(Cursor::from_record);
            accumulated.extend(page.patents);

            info!(
                event_type = "batch_complete",
                page_len,
                accumulated = accumulated.len(),
                total_hits = page.total_hits,
                "Got batch"
            );

            if accumulated.len() >= max_results || accumulated.len() as u64 >= page.total_hits {
                break;
            }

            if page_len == requested {
                cursor = next_cursor;
            } else {
                // Short page: the API has no more data; do not advance.
                break;
            }
        }

        accumulated.truncate(max_results);
        accumulated
    }

    /// Execute one request with bounded retries for transport failures
    ///
    /// Non-2xx responses are returned to the caller, not retried; only
    /// transport-level failures (connection, timeout) count against the
    /// attempt budget.
    async fn execute_with_retry(&self, body: &Value) -> Result<HttpResponse, TransportError> {
        let attempts = self.config.retry_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.transport.execute(body).await {
                Ok(response) => return Ok(response),
                Err(err) if attempt < attempts => {
                    warn!(
                        event_type = "request_retry",
                        attempt,
                        attempts,
                        error = %err,
                        "Transient transport failure; retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
