use std::fs;

use arrsweep_config::{ConfigError, KnownRequires, LogFormat, load, load_file};

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn file_and_environment_layer_into_a_validated_config() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("arrsweep.yaml");
    fs::write(
        &path,
        r"
qbittorrent:
  url: http://nas.local:8090/api/v2
  username: sweeper
  password: hunter2
sonarr:
  url: http://nas.local:8989/api/v3
  api_key: file-key
radarr:
  enabled: false
thresholds:
  min_availability: 0.5
  min_active_hours: 12
removal:
  always_remove: true
  known_requires: marked
logging:
  level: debug
  format: json
",
    )?;

    let config = load(Some(&path), |key| {
        (key == "ARRSWEEP_SONARR_API_KEY").then(|| "env-key".to_string())
    })?;

    assert_eq!(config.qbittorrent.url, "http://nas.local:8090/api/v2/");
    assert_eq!(config.qbittorrent.username, "sweeper");
    assert_eq!(config.sonarr.url, "http://nas.local:8989/api/v3/");
    assert_eq!(config.sonarr.api_key, "env-key");
    assert!(!config.radarr.enabled);
    assert!((config.thresholds.min_availability - 0.5).abs() < f64::EPSILON);
    assert!(config.removal.always_remove);
    assert_eq!(config.removal.known_requires, KnownRequires::Marked);
    assert_eq!(config.logging.format, LogFormat::Json);

    let redacted = config.redacted();
    assert_eq!(redacted.qbittorrent.password, "***");
    assert_eq!(redacted.sonarr.api_key, "***");
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.yaml");
    let err = load(Some(&path), no_env).expect_err("missing file");
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn parse_errors_carry_the_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.yaml");
    fs::write(&path, "thresholds: [not, a, map]\n").expect("write");
    match load_file(&path) {
        Err(ConfigError::Parse { path: Some(reported), .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn enabled_service_without_key_fails_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("arrsweep.yaml");
    fs::write(&path, "radarr:\n  enabled: false\n").expect("write");
    let err = load(Some(&path), no_env).expect_err("sonarr key missing");
    assert!(matches!(
        err,
        ConfigError::InvalidField {
            section: "sonarr",
            field: "api_key",
            ..
        }
    ));
}
