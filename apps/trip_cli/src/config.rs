use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use shared::domain::PointType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub default_point_type: PointType,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("trip.json"),
            default_point_type: PointType::Flight,
            log_filter: "info".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new("trip.toml"), |key| std::env::var(key).ok())
}

/// Defaults, then `file` when it exists and parses, then `env`.
/// Unparseable values are ignored.
pub fn load_settings_from(file: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(file) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("data_path") {
                settings.data_path = PathBuf::from(v);
            }
            if let Some(v) = file_cfg.get("default_point_type") {
                if let Ok(parsed) = v.parse() {
                    settings.default_point_type = parsed;
                }
            }
            if let Some(v) = file_cfg.get("log_filter") {
                settings.log_filter = v.clone();
            }
        }
    }

    if let Some(v) = env("APP__DATA_PATH") {
        settings.data_path = PathBuf::from(v);
    }
    if let Some(v) = env("APP__DEFAULT_POINT_TYPE") {
        if let Ok(parsed) = v.parse() {
            settings.default_point_type = parsed;
        }
    }
    if let Some(v) = env("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    settings
}
