use serde::Deserialize;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_INSIGHT__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_input_dir")]
    pub input_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub cleaning: CleaningConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Opt-in data cleaning applied between validation and KPI derivation.
#[derive(Debug, Clone, Deserialize)]
pub struct CleaningConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_remove_duplicates")]
    pub remove_duplicates: bool,
    #[serde(default)]
    pub fill_missing: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_consolidated_file")]
    pub consolidated_file: String,
    #[serde(default = "default_summary_file")]
    pub summary_file: String,
    #[serde(default = "default_statistics_file")]
    pub statistics_file: String,
    #[serde(default)]
    pub export_json: bool,
}

// Default functions
fn default_input_dir() -> String {
    "data/input".to_string()
}
fn default_output_dir() -> String {
    "output".to_string()
}
fn default_remove_duplicates() -> bool {
    true
}
fn default_consolidated_file() -> String {
    "consolidated_report.csv".to_string()
}
fn default_summary_file() -> String {
    "platform_summary.csv".to_string()
}
fn default_statistics_file() -> String {
    "statistics_report.txt".to_string()
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            remove_duplicates: default_remove_duplicates(),
            fill_missing: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            consolidated_file: default_consolidated_file(),
            summary_file: default_summary_file(),
            statistics_file: default_statistics_file(),
            export_json: false,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            cleaning: CleaningConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_INSIGHT")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
