//! Configuration management for tablink.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `tablink.toml` file
//! 3. User config `~/.config/tablink/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

mod defaults;

pub use defaults::*;

use crate::task::TaskKind;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which task to run and where its inputs live.
    pub task: TaskConfig,

    /// Search backend configuration.
    pub search: SearchConfig,

    /// Hierarchy store configuration.
    pub hierarchy: HierarchyConfig,

    /// IDF table locations.
    pub idf: IdfConfig,

    /// Ranking weights and filters.
    pub scoring: ScoringConfig,

    /// Worker pool and sampling.
    pub run: RunConfig,

    /// Result files.
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./tablink.toml` (project local)
    /// 2. `~/.config/tablink/config.toml` (user config)
    /// 3. Falls back to defaults
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(LOCAL_CONFIG_FILE).exists() {
            return Self::from_file(LOCAL_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(task) = std::env::var("TABLINK_TASK") {
            if let Ok(kind) = task.parse() {
                self.task.kind = kind;
            }
        }

        if let Ok(url) = std::env::var("TABLINK_SEARCH_URL") {
            self.search.url = url;
        }
        if let Ok(index) = std::env::var("TABLINK_SEARCH_INDEX") {
            self.search.index = index;
        }

        if let Ok(path) = std::env::var("TABLINK_HIERARCHY_PATH") {
            self.hierarchy.path = path;
        }

        if let Ok(workers) = std::env::var("TABLINK_WORKERS") {
            if let Ok(n) = workers.parse() {
                self.run.workers = n;
            }
        }

        if let Ok(dir) = std::env::var("TABLINK_OUTPUT_DIR") {
            self.output.dir = dir;
        }
    }

    /// Check values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.workers == 0 {
            return Err(ConfigError::Invalid("run.workers must be at least 1".into()));
        }
        if self.search.candidate_size == 0 || self.search.refine_size == 0 {
            return Err(ConfigError::Invalid("search sizes must be at least 1".into()));
        }
        if self.scoring.profile_top_k == 0 {
            return Err(ConfigError::Invalid("scoring.profile_top_k must be at least 1".into()));
        }

        let weights = [
            ("category_frequency_weight", self.scoring.category_frequency_weight),
            ("category_idf_weight", self.scoring.category_idf_weight),
            ("type_frequency_weight", self.scoring.type_frequency_weight),
            ("type_idf_weight", self.scoring.type_idf_weight),
            ("type_depth_weight", self.scoring.type_depth_weight),
        ];
        for (name, value) in weights {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "scoring.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Task selection and inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskConfig {
    /// Task to run: "cea", "cta" or "cpa".
    pub kind: TaskKind,

    /// Directory containing `<table>.csv` files.
    pub tables_dir: String,

    /// Manifest listing the targets per table.
    pub manifest: String,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            kind: TaskKind::default(),
            tables_dir: DEFAULT_TABLES_DIR.to_string(),
            manifest: DEFAULT_MANIFEST_FILE.to_string(),
        }
    }
}

impl TaskConfig {
    /// Path of the CSV file for a table name.
    pub fn table_path(&self, table: &str) -> PathBuf {
        PathBuf::from(&self.tables_dir).join(format!("{}.csv", table))
    }
}

/// Search backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the Elasticsearch cluster.
    pub url: String,

    /// Index used for cells and head columns.
    pub index: String,

    /// Index used for tail columns of the column-pair task.
    pub tail_index: String,

    /// Hits requested by the first pass.
    pub candidate_size: usize,

    /// Hits requested by the refined pass.
    pub refine_size: usize,

    /// Hits requested for the table-name hint.
    pub hint_size: usize,

    /// Minimum raw score of a hit.
    pub min_score: f64,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEARCH_URL.to_string(),
            index: DEFAULT_SEARCH_INDEX.to_string(),
            tail_index: DEFAULT_TAIL_INDEX.to_string(),
            candidate_size: DEFAULT_CANDIDATE_SIZE,
            refine_size: DEFAULT_REFINE_SIZE,
            hint_size: DEFAULT_HINT_SIZE,
            min_score: DEFAULT_MIN_SCORE,
            timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
        }
    }
}

/// Hierarchy store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// Backend: "snapshot" (JSON file) or "surreal" (embedded database).
    pub backend: String,

    /// Snapshot file or database directory.
    pub path: String,

    /// SurrealDB namespace.
    pub namespace: String,

    /// SurrealDB database.
    pub database: String,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            backend: DEFAULT_HIERARCHY_BACKEND.to_string(),
            path: DEFAULT_HIERARCHY_PATH.to_string(),
            namespace: DEFAULT_HIERARCHY_NAMESPACE.to_string(),
            database: DEFAULT_HIERARCHY_DATABASE.to_string(),
        }
    }
}

/// IDF table locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdfConfig {
    /// JSON object mapping category URI to IDF.
    pub categories: String,

    /// JSON object mapping type URI to IDF.
    pub types: String,
}

impl Default for IdfConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORY_IDF_PATH.to_string(),
            types: DEFAULT_TYPE_IDF_PATH.to_string(),
        }
    }
}

/// Ranking weights and filters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Root-like class dropped from type signals and ancestor output.
    pub root_class: String,

    /// Type URIs never turned into signals.
    pub ignored_types: Vec<String>,

    /// Substrings marking type URIs never turned into signals.
    pub ignored_type_markers: Vec<String>,

    /// Categories and types kept per column profile.
    pub profile_top_k: usize,

    pub category_frequency_weight: f64,
    pub category_idf_weight: f64,
    pub type_frequency_weight: f64,
    pub type_idf_weight: f64,
    pub type_depth_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            root_class: DEFAULT_ROOT_CLASS.to_string(),
            ignored_types: DEFAULT_IGNORED_TYPES.iter().map(|s| s.to_string()).collect(),
            ignored_type_markers: DEFAULT_IGNORED_TYPE_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            profile_top_k: DEFAULT_PROFILE_TOP_K,
            category_frequency_weight: DEFAULT_CATEGORY_FREQUENCY_WEIGHT,
            category_idf_weight: DEFAULT_CATEGORY_IDF_WEIGHT,
            type_frequency_weight: DEFAULT_TYPE_FREQUENCY_WEIGHT,
            type_idf_weight: DEFAULT_TYPE_IDF_WEIGHT,
            type_depth_weight: DEFAULT_TYPE_DEPTH_WEIGHT,
        }
    }
}

impl ScoringConfig {
    /// Whether a type URI must never become a signal.
    pub fn is_ignored_type(&self, uri: &str) -> bool {
        self.ignored_types.iter().any(|t| t == uri)
            || self.ignored_type_markers.iter().any(|m| uri.contains(m.as_str()))
    }
}

/// Worker pool and sampling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Tables processed concurrently.
    pub workers: usize,

    /// Data rows sampled for the typing and relation tasks.
    pub sample_rows: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
            sample_rows: DEFAULT_SAMPLE_ROWS,
        }
    }
}

/// Result files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Base output directory.
    pub dir: String,

    /// Subdirectory with one result file per table.
    pub results_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_OUTPUT_DIR.to_string(),
            results_dir: DEFAULT_RESULTS_DIR.to_string(),
        }
    }
}

impl OutputConfig {
    /// Directory receiving one result file per table.
    pub fn results_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.results_dir)
    }

    /// File listing the tables that produced no annotation.
    pub fn errors_path(&self, task: TaskKind) -> PathBuf {
        PathBuf::from(&self.dir).join(format!("{}{}", task.short_name(), DEFAULT_ERRORS_SUFFIX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.url, DEFAULT_SEARCH_URL);
        assert_eq!(config.search.candidate_size, DEFAULT_CANDIDATE_SIZE);
        assert_eq!(config.scoring.root_class, DEFAULT_ROOT_CLASS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_to_toml() {
        let toml_str = Config::default_config_string();
        assert!(toml_str.contains("[task]"));
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[scoring]"));
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
[task]
kind = "cta"

[search]
url = "http://search:9200"
candidate_size = 10

[run]
workers = 2
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.task.kind, TaskKind::ColumnType);
        assert_eq!(config.search.url, "http://search:9200");
        assert_eq!(config.search.candidate_size, 10);
        assert_eq!(config.search.refine_size, DEFAULT_REFINE_SIZE);
        assert_eq!(config.run.workers, 2);
    }

    #[test]
    fn test_validate_rejects_bad_weights() {
        let mut config = Config::default();
        config.scoring.type_idf_weight = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.run.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ignored_types() {
        let scoring = ScoringConfig::default();
        assert!(scoring.is_ignored_type("http://dbpedia.org/ontology/Location"));
        assert!(scoring.is_ignored_type("http://example.org/changesets/123"));
        assert!(!scoring.is_ignored_type("http://dbpedia.org/ontology/City"));
    }

    #[test]
    fn test_errors_path() {
        let output = OutputConfig::default();
        assert_eq!(
            output.errors_path(TaskKind::ColumnPair),
            PathBuf::from(DEFAULT_OUTPUT_DIR).join("cpa_errors.csv")
        );
    }
}
