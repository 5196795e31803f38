//! Configuration management for patentscope
//!
//! Centralized configuration handling with support for:
//! - Default values
//! - Configuration files (TOML)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

mod api;
mod app;
mod report;

// Re-export main types
pub use api::ApiConfig;
pub use app::{AppConfig, LogLevel};
pub use report::ReportConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure containing all configuration categories
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Application-wide settings
    pub app: AppConfig,

    /// PatentsView search API configuration
    pub api: ApiConfig,

    /// Report assembly configuration
    pub report: ReportConfig,
}

impl Settings {
    /// Load configuration from multiple sources with proper precedence
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&Settings::default())?)
            // Add configuration file if it exists
            .add_source(
                config::File::with_name("patentscope")
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            // Add environment variables with PATENTSCOPE_ prefix
            .add_source(
                config::Environment::with_prefix("PATENTSCOPE")
                    .prefix_separator("_")
                    .separator("_"),
            );

        let config = builder.build()?;
        let mut settings: Settings = config.try_deserialize()?;

        // Dedicated variable for the API key: the generic env mapping splits
        // on '_' and cannot address the two-word field name.
        if let Ok(key) = std::env::var("PATENTSCOPE_API_KEY") {
            if !key.trim().is_empty() {
                settings.api.api_key = Some(key);
            }
        }

        Ok(settings)
    }

    /// Load configuration from a specific file path
    pub fn load_from_file(path: &Path) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(config::File::from(path).format(config::FileFormat::Toml));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Merge command-line arguments into the loaded configuration
    pub fn merge_cli_args(mut self, cli_args: &dyn CliConfigMerge) -> Self {
        cli_args.merge_into_config(&mut self);
        self
    }
}

/// Trait for merging CLI arguments into configuration
pub trait CliConfigMerge {
    fn merge_into_config(&self, config: &mut Settings);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        // Verify all sections are present
        assert_eq!(
            settings.api.base_url,
            "https://search.patentsview.org/api/v1/patent/"
        );
        assert_eq!(settings.api.page_size_limit, 1000);
        assert_eq!(settings.api.request_delay_ms, 1400);
        assert_eq!(settings.report.max_records, 500);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();

        // Test that settings can be serialized and deserialized
        let toml_str = toml::to_string(&settings).expect("Failed to serialize to TOML");
        let _: Settings = toml::from_str(&toml_str).expect("Failed to deserialize from TOML");
    }
}
