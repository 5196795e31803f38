//! Report pipeline for patent research
//!
//! Ties the pieces together: validated inputs, data loading (local file or
//! paginated API search), normalization, the report record cap, statistics,
//! and bundle assembly for the host's output sink.
//!
//! The pipeline is a standalone library with no dependency on any host
//! registration or lifecycle mechanism; the host supplies a validated input
//! bag and consumes the returned bundle.

mod engine;

pub use engine::{
    Bundle, BundleMetadata, DateRange, PipelineError, ReportEngine, ReportInputs, Samples,
    SearchParams, DATASET_NAME,
};
