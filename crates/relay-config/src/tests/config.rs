use crate::Config;
use crate::tests::{EnvGuard, setup_config_dir};

use googletest::assert_that;
use googletest::prelude::{anything, eq, err, ok};
use serial_test::serial;

// =========================================================================
// Happy Path Tests
// =========================================================================

#[test]
#[serial]
fn given_no_config_file_when_load_then_ok_with_defaults() {
    // Given
    let _guard = setup_config_dir();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, ok(anything()));
    let config = result.unwrap();
    assert_that!(config.intake.port, eq(crate::DEFAULT_INTAKE_PORT));
    assert_that!(config.websocket.ping_interval_ms, eq(25_000));
    assert_that!(config.websocket.ping_timeout_ms, eq(60_000));
    assert_that!(config.directory.host.is_none(), eq(true));
}

#[test]
#[serial]
fn given_valid_toml_file_when_load_then_uses_toml_values() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        r#"
[directory]
host = "directory.example.com:443"

[intake]
port = 9000

[websocket]
ping_interval_ms = 10000
ping_timeout_ms = 30000
"#,
    )
    .unwrap();

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.directory.host.as_deref(),
        eq(Some("directory.example.com:443"))
    );
    assert_that!(config.intake.port, eq(9000));
    assert_that!(config.websocket.ping_interval_ms, eq(10_000));
    assert_that!(config.websocket.ping_timeout_ms, eq(30_000));
}

#[test]
#[serial]
fn given_env_overrides_when_load_then_env_wins_over_toml() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(
        temp.path().join("config.toml"),
        "[directory]\nhost = \"from-toml.example.com\"\n",
    )
    .unwrap();
    let _host = EnvGuard::set("RELAY_DIRECTORY_HOST", "from-env.example.com");
    let _interval = EnvGuard::set("RELAY_WS_PING_INTERVAL_MS", "5000");

    // When
    let config = Config::load().unwrap();

    // Then
    assert_that!(
        config.directory.host.as_deref(),
        eq(Some("from-env.example.com"))
    );
    assert_that!(config.websocket.ping_interval_ms, eq(5000));
}

#[test]
#[serial]
fn given_invalid_toml_when_load_then_error() {
    // Given
    let (temp, _guard) = setup_config_dir();
    std::fs::write(temp.path().join("config.toml"), "not valid toml [[[").unwrap();

    // When
    let result = Config::load();

    // Then
    assert_that!(result, err(anything()));
}

// =========================================================================
// Validation Tests
// =========================================================================

#[test]
#[serial]
fn given_missing_directory_host_when_validate_then_error() {
    // Given
    let _guard = setup_config_dir();

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, err(anything()));
}

#[test]
#[serial]
fn given_directory_host_when_validate_then_ok() {
    // Given
    let _guard = setup_config_dir();
    let _host = EnvGuard::set("RELAY_DIRECTORY_HOST", "directory.example.com");

    // When
    let config = Config::load().unwrap();
    let result = config.validate();

    // Then
    assert_that!(result, ok(anything()));
}
