//! Search API provider integrations
//!
//! Source-specific adapters for fetching raw patent records.
//!
//! ## Supported Providers
//!
//! - `patentsview` - PatentsView patent search API (cursor-paginated POST
//!   endpoint with a fixed rate limit)
//!
//! ## Design Principles
//!
//! 1. **Adapter pattern**: Providers produce `RawRecord` (the core's input
//!    format); interpretation belongs to the normalizer
//! 2. **Degrade, never fail**: The fetch entry point returns whatever was
//!    accumulated when a request stops the loop
//! 3. **Explicit pacing**: Rate limiting is a named component, not an inline
//!    sleep
//! 4. **Narrow transport seam**: HTTP lives behind `SearchTransport` so the
//!    pagination protocol is testable without a network

pub mod patentsview;

// Re-export main types for convenience
pub use patentsview::{
    HttpResponse, HttpTransport, PatentsViewClient, RateLimiter, SearchCriteria, SearchResponse,
    SearchTransport, TransportError,
};
