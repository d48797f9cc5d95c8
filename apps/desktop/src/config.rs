use std::{fs, num::NonZeroU32, path::Path};

use client_core::query::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub page_size: NonZeroU32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5192".into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    page_size: Option<u32>,
}

/// Defaults, then `config_path` if it exists, then the environment.
pub fn load_settings(config_path: &Path) -> Settings {
    load_settings_with(config_path, |key| std::env::var(key).ok())
}

fn load_settings_with(config_path: &Path, var: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw, config_path);
    }
    apply_env(&mut settings, var);

    settings
}

fn apply_file(settings: &mut Settings, raw: &str, origin: &Path) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(path = %origin.display(), %error, "ignoring unreadable config file");
            return;
        }
    };

    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.page_size {
        match NonZeroU32::new(v) {
            Some(size) => settings.page_size = size,
            None => warn!(path = %origin.display(), "page_size must be positive; keeping {}", settings.page_size),
        }
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("FREELANCER_API_URL") {
        settings.base_url = v;
    }
    if let Some(v) = var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = var("APP__PAGE_SIZE") {
        match v.trim().parse::<NonZeroU32>() {
            Ok(size) => settings.page_size = size,
            Err(_) => warn!(value = %v, "APP__PAGE_SIZE must be a positive integer; ignoring"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
