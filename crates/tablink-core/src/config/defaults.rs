//! Default values for tablink configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Task Defaults
// ============================================================================

/// Default directory holding the source tables.
pub const DEFAULT_TABLES_DIR: &str = "tables";

/// Default task manifest file.
pub const DEFAULT_MANIFEST_FILE: &str = "targets.csv";

// ============================================================================
// Search Defaults
// ============================================================================

/// Default Elasticsearch URL.
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:9200";

/// Default index searched for head columns and cells.
pub const DEFAULT_SEARCH_INDEX: &str = "dbpedia3";

/// Default index searched for tail columns of the column-pair task.
pub const DEFAULT_TAIL_INDEX: &str = "dbpedia2";

/// Number of hits requested by the first search pass.
pub const DEFAULT_CANDIDATE_SIZE: usize = 25;

/// Number of hits requested by the refined second pass.
pub const DEFAULT_REFINE_SIZE: usize = 5;

/// Number of hits requested for the table-name hint.
pub const DEFAULT_HINT_SIZE: usize = 1;

/// Minimum raw backend score for a hit to be returned.
pub const DEFAULT_MIN_SCORE: f64 = 1.0;

/// Request timeout in seconds.
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Hierarchy Defaults
// ============================================================================

/// Default hierarchy backend.
pub const DEFAULT_HIERARCHY_BACKEND: &str = "snapshot";

/// Default hierarchy snapshot path.
pub const DEFAULT_HIERARCHY_PATH: &str = "data/hierarchy.json";

/// Default SurrealDB directory used by `hierarchy import`.
pub const DEFAULT_HIERARCHY_DB_PATH: &str = "data/hierarchy.db";

/// Default SurrealDB namespace.
pub const DEFAULT_HIERARCHY_NAMESPACE: &str = "tablink";

/// Default SurrealDB database.
pub const DEFAULT_HIERARCHY_DATABASE: &str = "ontology";

// ============================================================================
// IDF Defaults
// ============================================================================

/// Default category IDF table.
pub const DEFAULT_CATEGORY_IDF_PATH: &str = "data/categories_idf.json";

/// Default type IDF table.
pub const DEFAULT_TYPE_IDF_PATH: &str = "data/types_idf.json";

// ============================================================================
// Scoring Defaults
// ============================================================================

/// Root-like class carrying no discriminative signal.
pub const DEFAULT_ROOT_CLASS: &str = "http://dbpedia.org/ontology/Agent";

/// Types never turned into signals.
pub const DEFAULT_IGNORED_TYPES: &[&str] = &["http://dbpedia.org/ontology/Location"];

/// Substrings marking type URIs that are never turned into signals.
pub const DEFAULT_IGNORED_TYPE_MARKERS: &[&str] = &["changesets"];

/// Number of categories and types kept per column profile.
pub const DEFAULT_PROFILE_TOP_K: usize = 3;

/// Weight of the column frequency in `category_freq`.
pub const DEFAULT_CATEGORY_FREQUENCY_WEIGHT: f64 = 0.7;

/// Weight of the IDF in `category_freq`.
pub const DEFAULT_CATEGORY_IDF_WEIGHT: f64 = 0.3;

/// Weight of the column frequency in `type_freq`.
pub const DEFAULT_TYPE_FREQUENCY_WEIGHT: f64 = 0.7;

/// Weight of the IDF in `type_freq`.
pub const DEFAULT_TYPE_IDF_WEIGHT: f64 = 0.15;

/// Weight of the relative depth in `type_freq`.
pub const DEFAULT_TYPE_DEPTH_WEIGHT: f64 = 0.15;

// ============================================================================
// Run Defaults
// ============================================================================

/// Data rows sampled per table for the typing and relation tasks.
pub const DEFAULT_SAMPLE_ROWS: usize = 50;

// ============================================================================
// Output Defaults
// ============================================================================

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Subdirectory receiving one result file per table.
pub const DEFAULT_RESULTS_DIR: &str = "split";

/// Suffix of the per-task error list file.
pub const DEFAULT_ERRORS_SUFFIX: &str = "_errors.csv";

// ============================================================================
// Config Files
// ============================================================================

/// Project-local configuration file.
pub const LOCAL_CONFIG_FILE: &str = "tablink.toml";

/// Directory under the user config dir.
pub const USER_CONFIG_DIR: &str = "tablink";

/// User configuration file name.
pub const USER_CONFIG_FILE: &str = "config.toml";
