use crate::config::Config;
use crate::parser::DEFAULT_MAX_UPLOAD_BYTES;
use crate::query::MatchMode;
use crate::storage::{BackendLocal, StorageManager};

fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Fresh start: no file → defaults written and loaded back
#[test]
fn test_defaults_written_on_first_load() {
    let dir = temp_dir();
    let base_path = dir.path().to_str().unwrap();

    let config = Config::load_with(base_path).unwrap();

    assert!(BackendLocal::new(base_path).unwrap().exists("config.yaml"));
    assert_eq!(config.base_path(), base_path);
    assert_eq!(config.query.match_mode, MatchMode::SegmentPrefix);

    let opts = config.parse_options();
    assert_eq!(opts.allowed_schemes, vec!["http", "https"]);
    assert_eq!(opts.max_upload_bytes, Some(DEFAULT_MAX_UPLOAD_BYTES));
}

/// Partial file: missing keys fall back to defaults and the file is upgraded
#[test]
fn test_partial_config_is_filled_in() {
    let dir = temp_dir();
    let base_path = dir.path().to_str().unwrap();
    let store = BackendLocal::new(base_path).unwrap();

    let config_content = r#"
import:
  allowed_schemes: [HTTPS, ftp]
  max_upload_bytes: 0
query:
  match_mode: substring
"#;
    store.write("config.yaml", config_content.as_bytes()).unwrap();

    let config = Config::load_with(base_path).unwrap();
    let opts = config.parse_options();
    assert_eq!(opts.allowed_schemes, vec!["https", "ftp"]);
    assert_eq!(opts.max_upload_bytes, None);
    assert_eq!(opts.max_skipped_samples, 10);
    assert_eq!(config.query.match_mode, MatchMode::Substring);

    let saved = String::from_utf8(store.read("config.yaml").unwrap()).unwrap();
    assert!(saved.contains("max_skipped_samples"));
}

#[test]
fn test_invalid_scheme_is_rejected() {
    let dir = temp_dir();
    let base_path = dir.path().to_str().unwrap();
    let store = BackendLocal::new(base_path).unwrap();

    store
        .write("config.yaml", b"import:\n  allowed_schemes: ['1http']\n")
        .unwrap();
    assert!(Config::load_with(base_path).is_err());

    store
        .write("config.yaml", b"import:\n  allowed_schemes: []\n")
        .unwrap();
    assert!(Config::load_with(base_path).is_err());
}

#[test]
fn test_malformed_yaml_is_an_error() {
    let dir = temp_dir();
    let base_path = dir.path().to_str().unwrap();
    let store = BackendLocal::new(base_path).unwrap();

    store
        .write("config.yaml", b"query:\n  match_mode: fuzzy\n")
        .unwrap();
    assert!(Config::load_with(base_path).is_err());
}
