// Config loading and validation tests

use cephylas::config::AppConfig;

const VALID_CONFIG: &str = r#"
[server]
port = 7878
host = "0.0.0.0"

[log]
path = "log/log_daily"
tail_limit = 100

[charts]
downsample_count = 256
"#;

const MINIMAL_CONFIG: &str = r#"
[server]
port = 7878
host = "0.0.0.0"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.server.port, 7878);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.log.path, "log/log_daily");
    assert_eq!(config.log.tail_limit(), Some(100));
    assert_eq!(config.charts.downsample_count, 256);
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str(MINIMAL_CONFIG).expect("valid");
    assert_eq!(config.log.path, "/app/log/log_daily");
    assert_eq!(config.log.tail_limit, 8640);
    assert_eq!(config.log.tail_limit(), Some(8640));
    assert_eq!(config.charts.downsample_count, 512);
}

#[test]
fn test_config_tail_limit_zero_reads_whole_file() {
    let config = VALID_CONFIG.replace("tail_limit = 100", "tail_limit = 0");
    let config = AppConfig::load_from_str(&config).expect("valid");
    assert_eq!(config.log.tail_limit(), None);
}

#[test]
fn test_config_validation_rejects_invalid_port() {
    let bad = VALID_CONFIG.replace("port = 7878", "port = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("server.port"));
}

#[test]
fn test_config_validation_rejects_empty_log_path() {
    let bad = VALID_CONFIG.replace("path = \"log/log_daily\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("log.path"));
}

#[test]
fn test_config_validation_rejects_small_downsample_count() {
    let bad = VALID_CONFIG.replace("downsample_count = 256", "downsample_count = 2");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("downsample_count"));
}

#[test]
fn test_config_validation_rejects_missing_server() {
    assert!(AppConfig::load_from_str("[log]\npath = \"x\"\n").is_err());
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.server.port, 7878);
    assert_eq!(config.log.path, "log/log_daily");
}
