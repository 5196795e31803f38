//! PatentsView search API provider
//!
//! Fetches patent records from the PatentsView cursor-paginated search
//! endpoint.
//!
//! ## Wire Protocol
//!
//! `POST` to the configured endpoint with a JSON body:
//!
//! ```json
//! {
//!   "q": { "_and": [ ... ] },
//!   "f": ["patent_id", "patent_title", ...],
//!   "s": [{"patent_date": "desc"}, {"patent_id": "asc"}],
//!   "o": { "size": 1000, "after": ["2024-01-02", "11876543"] }
//! }
//! ```
//!
//! Auth is a fixed `X-Api-Key` header. The response carries
//! `{ patents, total_hits, error? }`.
//!
//! ## Pagination
//!
//! The sort order (`patent_date` descending, `patent_id` ascending as the
//! tie-break) makes cursor pagination deterministic: the cursor is the
//! `(patent_date, patent_id)` pair of the last row of a full page. A page
//! shorter than requested is the API's only reliable "no more data" signal,
//! so a short page always ends the loop without advancing the cursor.
//!
//! ## Error Handling
//!
//! **Policy**: Degrade to partial results, never fail.
//!
//! - **Missing API key**: warn, return empty
//! - **Transport failure**: bounded retry; exhausted retries stop the loop,
//!   accumulated pages are kept
//! - **Non-2xx response**: stop, keep partials (warn)
//! - **API error payload**: stop, keep partials (error)
//!
//! Report generation proceeds with whatever data is available rather than
//! aborting the pipeline.

pub mod client;
pub mod query;
pub mod rate_limit;
pub mod transport;

// Re-export main types for convenience
pub use client::{PatentsViewClient, SearchResponse};
pub use query::SearchCriteria;
pub use rate_limit::RateLimiter;
pub use transport::{HttpResponse, HttpTransport, SearchTransport, TransportError};
