//! Local file ingestion for the patentscope pipeline
//!
//! Loads patent data from disk into raw records: `.json` files must contain a
//! JSON array; everything else is read as CSV with a header row. Both paths
//! produce the same `Vec<RawRecord>` the normalizer consumes.

mod loader;

pub use loader::{load_records, LoadError};
