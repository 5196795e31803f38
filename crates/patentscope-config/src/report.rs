//! Report assembly configuration

use serde::{Deserialize, Serialize};

/// Report assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Hard cap on the number of normalized records carried into statistics
    pub max_records: usize,

    /// Default maximum results fetched when the caller does not specify one
    pub default_max_results: usize,

    /// Lookback window (in years) used when no start date is given
    pub default_lookback_years: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_records: 500,
            default_max_results: 100,
            default_lookback_years: 5,
        }
    }
}
