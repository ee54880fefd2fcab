//! Settings persistence under the platform config directory.

use shared::settings::AppSettings;
use std::fs;
use std::path::PathBuf;

fn settings_path() -> PathBuf {
    directories::ProjectDirs::from("com.local", "Intellio", "Intellio")
        .map(|p| p.config_dir().join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("./settings.json"))
}

pub fn load_settings() -> AppSettings {
    let path = settings_path();
    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(?path, %e, "settings file unreadable, using defaults");
                AppSettings::default()
            }
        },
        Err(_) => AppSettings::default(),
    }
}

pub fn save_settings(settings: &AppSettings) {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = fs::write(&path, json) {
                tracing::warn!(?path, %e, "could not write settings");
            }
        }
        Err(e) => tracing::warn!(%e, "could not serialize settings"),
    }
}
