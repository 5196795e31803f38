//! Core patent record processing
//!
//! Normalization of heterogeneous raw search results into a canonical,
//! fully-defaulted record shape, and aggregate statistics over the
//! normalized set.
//!
//! ## Guarantees
//!
//! - Total accounting: normalized count + skipped count == input count
//! - Deterministic defaults: a record with partial source data is still
//!   fully well-typed after normalization
//! - Batch isolation: a single malformed record never aborts the batch
//! - Read-only statistics: every reduction operates on the shared record
//!   slice; ranking sorts work on copies

pub mod normalize;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use normalize::{NormalizeError, Normalizer};
pub use stats::{
    AssigneeStats, CitationStats, FilingTrends, InventorStats, PatentStatistics,
    StatisticsEngine, TechnologyStats,
};
pub use types::{NormalizationStats, PatentRecord, RawRecord};
