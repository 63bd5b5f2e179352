use std::fs;

use edgectl::adapter::inbound::server::ResponseFormat;
use edgectl::error::{ConfigError, Error};
use edgectl::infrastructure::bootstrap;
use edgectl::infrastructure::config::settings::Config;

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[server]
bind = "127.0.0.1"
port = 9100
response_format = "text"

[tls]
self_signed = true
subject_names = ["edge.local"]

[[bots]]
name = "arb"
"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.server.bind_addr(), "127.0.0.1:9100");
    assert_eq!(config.server.response_format, ResponseFormat::Text);
    assert_eq!(config.tls.subject_names, vec!["edge.local"]);
    assert_eq!(config.bots[0].name, "arb");
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        Config::parse_toml_with_env("[server\nport = 1", |_| None),
        Err(Error::Config(ConfigError::Parse(_)))
    ));
}

#[test]
fn zero_login_attempts_is_rejected() {
    let toml = "[server]\nmax_login_attempts = 0\n[tls]\nself_signed = true\n";
    match Config::parse_toml_with_env(toml, |_| None) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_login_attempts",
            ..
        })) => {}
        other => panic!("expected invalid max_login_attempts, got {other:?}"),
    }
}

#[tokio::test]
async fn bootstrapped_server_reads_credentials_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("settings.toml");
    let hash = edgectl::application::hash_password("secret").unwrap();
    fs::write(
        &settings,
        format!("Login = \"admin\"\nPassword = \"{hash}\"\n"),
    )
    .unwrap();

    let toml = format!(
        "[server]\nbind = \"127.0.0.1\"\nport = 1\n[tls]\nself_signed = true\n[settings]\npath = \"{}\"\n[[bots]]\nname = \"arb\"\nstopped = true\n",
        settings.display()
    );
    let mut config = Config::parse_toml_with_env(&toml, |_| None).unwrap();
    // Port 0 is rejected by validation, so pick a free port after loading.
    config.server.port = 0;

    let mut server = bootstrap::build_server(&config).unwrap();
    let addr = server.start().await.unwrap();

    let mut client = edgectl::testkit::server::TestClient::connect(addr)
        .await
        .unwrap();
    client.login("admin", "secret").await;
    let response = client.command("botstatus name=arb").await;
    assert_eq!(
        response["result"],
        serde_json::json!({"name": "arb", "active": false})
    );

    client.close().await;
    server.stop().await.unwrap();
}
