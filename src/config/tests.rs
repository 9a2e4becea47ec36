use super::settings::{PartialServerSettings, PartialSettings, Settings};
use super::load_config_from;
use serial_test::serial;
use std::io::Write;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.hub.max_connections, 1000);
    assert_eq!(settings.storage.path, "socialhub_db");
    assert_eq!(settings.logging.level, "info");
    assert_eq!(settings.bind_addr(), "127.0.0.1:8080");
}

#[test]
fn test_merge_keeps_defaults_for_missing_fields() {
    let partial = PartialSettings {
        server: Some(PartialServerSettings {
            host: None,
            port: Some(9100),
        }),
        ..Default::default()
    };

    let settings = Settings::merge(partial);
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 9100);
    assert_eq!(settings.hub.max_connections, 1000);
}

#[test]
#[serial]
fn test_environment_overrides() {
    temp_env::with_vars(
        [
            ("SOCIALHUB_SERVER__PORT", Some("9001")),
            ("SOCIALHUB_HUB__MAX_CONNECTIONS", Some("5")),
            ("SOCIALHUB_LOGGING__LEVEL", Some("debug")),
        ],
        || {
            let settings = load_config_from("does/not/exist").unwrap();
            assert_eq!(settings.server.port, 9001);
            assert_eq!(settings.hub.max_connections, 5);
            assert_eq!(settings.logging.level, "debug");
            assert_eq!(settings.storage.path, "socialhub_db");
        },
    );
}

#[test]
#[serial]
fn test_file_source_is_merged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hub.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "[storage]\npath = \"/tmp/notifications\"\n[server]\nhost = \"0.0.0.0\""
    )
    .unwrap();

    let stem = dir.path().join("hub");
    let settings = load_config_from(stem.to_str().unwrap()).unwrap();
    assert_eq!(settings.storage.path, "/tmp/notifications");
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8080);
}
