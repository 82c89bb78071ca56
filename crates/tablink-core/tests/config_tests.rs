use tablink_core::config::{
    ConfigError, DEFAULT_CANDIDATE_SIZE, DEFAULT_HIERARCHY_BACKEND, DEFAULT_OUTPUT_DIR, DEFAULT_SEARCH_INDEX,
};
use tablink_core::{Config, TaskKind};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.task.kind, TaskKind::CellEntity);
    assert_eq!(config.search.index, DEFAULT_SEARCH_INDEX);
    assert_eq!(config.search.candidate_size, DEFAULT_CANDIDATE_SIZE);
    assert_eq!(config.hierarchy.backend, DEFAULT_HIERARCHY_BACKEND);
    assert_eq!(config.output.dir, DEFAULT_OUTPUT_DIR);
    assert!(config.run.workers >= 1);
}

#[test]
fn test_config_to_toml() {
    let toml_str = Config::default_config_string();
    for section in ["[task]", "[search]", "[hierarchy]", "[idf]", "[scoring]", "[run]", "[output]"] {
        assert!(toml_str.contains(section), "missing {}", section);
    }
}

#[test]
fn test_config_from_toml() {
    let toml_str = r#"
[task]
kind = "cta"
tables_dir = "data/tables"

[search]
url = "http://es:9200"
refine_size = 10

[scoring]
ignored_type_markers = ["changesets", "wikidata"]

[run]
workers = 3
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.task.kind, TaskKind::ColumnType);
    assert_eq!(config.task.tables_dir, "data/tables");
    assert_eq!(config.search.url, "http://es:9200");
    assert_eq!(config.search.refine_size, 10);
    assert_eq!(config.search.candidate_size, DEFAULT_CANDIDATE_SIZE);
    assert!(config.scoring.is_ignored_type("http://www.wikidata.org/entity/Q515"));
    assert_eq!(config.run.workers, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_out_of_range_weights() {
    let mut config = Config::default();
    config.scoring.type_depth_weight = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = Config::default();
    config.run.workers = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_output_paths() {
    let config = Config::default();
    assert!(config.output.results_path().ends_with("output/split"));
    assert!(config
        .output
        .errors_path(TaskKind::ColumnPair)
        .ends_with("output/cpa_errors.csv"));
}
