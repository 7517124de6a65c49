use super::*;

use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_listen_on_port_3000_and_serve_public() {
    let settings = Settings::default();
    assert_eq!(settings.port, 3000);
    assert_eq!(settings.static_dir, PathBuf::from("public"));
    assert_eq!(settings.animation_duration_ms, 600);
    assert_eq!(
        settings.bind_addr().expect("addr"),
        "0.0.0.0:3000".parse::<SocketAddr>().expect("addr")
    );
}

#[test]
fn port_env_var_overrides_default() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, env_of(&[("PORT", "8080")]));
    assert_eq!(settings.port, 8080);
}

#[test]
fn prefixed_port_wins_over_plain_port() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_of(&[("PORT", "8080"), ("APP__PORT", "9090")]),
    );
    assert_eq!(settings.port, 9090);
}

#[test]
fn malformed_numeric_override_keeps_previous_value() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env_of(&[("PORT", "not-a-port"), ("APP__ANIMATION_DURATION_MS", "-5")]),
    );
    assert_eq!(settings.port, 3000);
    assert_eq!(settings.animation_duration_ms, 600);
}

#[test]
fn settings_file_fields_are_applied_before_env() {
    let mut settings = Settings::default();
    apply_settings_toml(
        &mut settings,
        r#"
            host = "127.0.0.1"
            port = 4000
            views_dir = "views"
            animation_duration_ms = 450
        "#,
    )
    .expect("toml");
    apply_env_overrides(&mut settings, env_of(&[("APP__PORT", "4001")]));

    assert_eq!(settings.host, "127.0.0.1");
    assert_eq!(settings.port, 4001);
    assert_eq!(settings.views_dir, Some(PathBuf::from("views")));
    assert_eq!(settings.animation_duration_ms, 450);
}

#[test]
fn unknown_settings_keys_are_rejected() {
    let mut settings = Settings::default();
    let err = apply_settings_toml(&mut settings, "database_url = \"sqlite://x\"")
        .expect_err("unknown key");
    assert!(err.to_string().contains("malformed"));
    assert_eq!(settings, Settings::default());
}

#[test]
fn missing_settings_file_is_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut settings = Settings::default();
    apply_settings_file(&mut settings, &dir.path().join("server.toml")).expect("missing ok");
    assert_eq!(settings, Settings::default());
}
