use super::{apply_env_overrides, load_config, validate, ClientConfig, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_root(label: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("tab_client_config_{label}_{suffix}"));
    fs::create_dir_all(&root).expect("temp root");
    root
}

#[test]
fn default_settings_auto_close_notifications() {
    let settings = Settings::use_default();
    assert!(settings.auto_close_notif);
    assert_eq!(settings.notif_timer(), Duration::from_millis(5_000));
}

#[test]
fn file_values_override_defaults_and_keep_missing_keys() {
    let root = temp_root("file");
    let path = root.join("client.toml");
    fs::write(
        &path,
        r#"
html_dir = "./assets/html"

[settings]
notif_timer_ms = 1500
"#,
    )
    .expect("write config");

    let config = load_config(Some(&path)).expect("config");
    assert_eq!(config.html_dir, "./assets/html");
    assert_eq!(config.settings.notif_timer_ms, 1500);
    assert!(config.settings.auto_close_notif);
    assert_eq!(config.api_base_url, ClientConfig::default().api_base_url);

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let root = temp_root("missing");
    let config = load_config(Some(&root.join("absent.toml"))).expect("config");
    assert_eq!(config.html_dir, ClientConfig::default().html_dir);
    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn malformed_file_is_reported() {
    let root = temp_root("malformed");
    let path = root.join("client.toml");
    fs::write(&path, "settings = 12").expect("write config");

    let err = load_config(Some(&path)).expect_err("should fail");
    assert!(err.to_string().contains("failed to parse config file"));

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn env_overrides_apply_and_ignore_unparseable_values() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__API_BASE_URL", "https://game.example/api"),
        ("APP__AUTO_CLOSE_NOTIF", "false"),
        ("APP__NOTIF_TIMER_MS", "soon"),
    ]);

    let mut config = ClientConfig::default();
    apply_env_overrides(&mut config, |name| vars.get(name).map(|v| v.to_string()));

    assert_eq!(config.api_base_url, "https://game.example/api");
    assert!(!config.settings.auto_close_notif);
    assert_eq!(config.settings.notif_timer_ms, 5_000);
}

#[test]
fn non_http_api_base_is_rejected() {
    let config = ClientConfig {
        api_base_url: "ftp://files.example".into(),
        ..ClientConfig::default()
    };
    assert!(validate(&config).is_err());
}
