use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::DEFAULT_ANIMATION_DURATION_MS;
use tracing::warn;

pub const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub views_dir: Option<PathBuf>,
    pub animation_duration_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            views_dir: None,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
        }
    }
}

impl Settings {
    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .with_context(|| format!("invalid bind address '{raw}'"))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    host: Option<String>,
    port: Option<u16>,
    static_dir: Option<PathBuf>,
    views_dir: Option<PathBuf>,
    animation_duration_ms: Option<u64>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Err(error) = apply_settings_file(&mut settings, Path::new(SETTINGS_FILE)) {
        warn!(%error, file = SETTINGS_FILE, "ignoring settings file");
    }
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_settings_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    apply_settings_toml(settings, &raw)
}

fn apply_settings_toml(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("malformed settings file")?;

    if let Some(v) = file_cfg.host {
        settings.host = v;
    }
    if let Some(v) = file_cfg.port {
        settings.port = v;
    }
    if let Some(v) = file_cfg.static_dir {
        settings.static_dir = v;
    }
    if let Some(v) = file_cfg.views_dir {
        settings.views_dir = Some(v);
    }
    if let Some(v) = file_cfg.animation_duration_ms {
        settings.animation_duration_ms = v;
    }

    Ok(())
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PORT") {
        set_parsed(&mut settings.port, "PORT", &v);
    }
    if let Some(v) = lookup("APP__PORT") {
        set_parsed(&mut settings.port, "APP__PORT", &v);
    }

    if let Some(v) = lookup("APP__HOST") {
        settings.host = v;
    }

    if let Some(v) = lookup("APP__STATIC_DIR") {
        settings.static_dir = PathBuf::from(v);
    }

    if let Some(v) = lookup("APP__VIEWS_DIR") {
        settings.views_dir = Some(PathBuf::from(v)).filter(|dir| !dir.as_os_str().is_empty());
    }

    if let Some(v) = lookup("APP__ANIMATION_DURATION_MS") {
        set_parsed(
            &mut settings.animation_duration_ms,
            "APP__ANIMATION_DURATION_MS",
            &v,
        );
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = raw, "ignoring malformed override"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
