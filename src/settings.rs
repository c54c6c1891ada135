use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_REFERENCE_FILE: &str = "reference_terms.json";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_QUIZ_QUESTIONS: usize = 5;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct AppSettings {
    pub bind: Option<String>,
    pub reference_file: Option<String>,
    pub model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: Option<String>,
    pub quiz_questions: Option<usize>,
    pub max_upload_bytes: Option<usize>,
}

impl AppSettings {
    pub fn bind(&self) -> String {
        self.bind.clone().unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn reference_file(&self) -> PathBuf {
        PathBuf::from(
            self.reference_file
                .as_deref()
                .unwrap_or(DEFAULT_REFERENCE_FILE),
        )
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn gemini_base_url(&self) -> String {
        self.gemini_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
    }

    pub fn quiz_questions(&self) -> usize {
        self.quiz_questions.unwrap_or(DEFAULT_QUIZ_QUESTIONS)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Overlay values from environment variables onto the file settings.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("DOCQUIZ_BIND") {
            self.bind = Some(v);
        }
        if let Some(v) = get("DOCQUIZ_REFERENCE_FILE") {
            self.reference_file = Some(v);
        }
        if let Some(v) = get("GEMINI_MODEL") {
            self.model = Some(v);
        }
        if let Some(v) = get("GEMINI_API_KEY") {
            self.gemini_api_key = Some(v);
        }
        if let Some(v) = get("GEMINI_BASE_URL") {
            self.gemini_base_url = Some(v);
        }
        if let Some(v) = get("DOCQUIZ_QUIZ_QUESTIONS") {
            match v.parse() {
                Ok(n) => self.quiz_questions = Some(n),
                Err(_) => log::warn!("Ignoring invalid DOCQUIZ_QUIZ_QUESTIONS: {}", v),
            }
        }
        if let Some(v) = get("DOCQUIZ_MAX_UPLOAD_BYTES") {
            match v.parse() {
                Ok(n) => self.max_upload_bytes = Some(n),
                Err(_) => log::warn!("Ignoring invalid DOCQUIZ_MAX_UPLOAD_BYTES: {}", v),
            }
        }
    }
}

pub fn get_settings_path() -> PathBuf {
    let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("docquiz").join("settings.json")
}

/// Settings file (if any) with environment overrides applied.
pub fn load_settings() -> AppSettings {
    let mut settings = load_settings_from(&get_settings_path());
    settings.apply_env();
    settings
}

pub fn load_settings_from(path: &std::path::Path) -> AppSettings {
    if path.exists() {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_else(|| {
                log::warn!("Could not parse settings at {}, using defaults", path.display());
                AppSettings::default()
            })
    } else {
        AppSettings::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_model_is_gemini() {
        assert!(DEFAULT_MODEL.contains("gemini"));
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = AppSettings::default();
        assert_eq!(settings.bind(), DEFAULT_BIND);
        assert_eq!(settings.reference_file(), PathBuf::from("reference_terms.json"));
        assert_eq!(settings.quiz_questions(), 5);
    }

    #[test]
    fn env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("DOCQUIZ_BIND", "0.0.0.0:8080"),
            ("GEMINI_MODEL", "gemini-2.0-flash"),
            ("DOCQUIZ_QUIZ_QUESTIONS", "not-a-number"),
            ("GEMINI_API_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let mut settings = AppSettings {
            model: Some("from-file".to_string()),
            quiz_questions: Some(7),
            ..Default::default()
        };
        settings.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.bind(), "0.0.0.0:8080");
        assert_eq!(settings.model(), "gemini-2.0-flash");
        assert_eq!(settings.quiz_questions(), 7);
        assert!(settings.gemini_api_key.is_none());
    }

    #[test]
    fn unparsable_settings_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        let settings = load_settings_from(&path);
        assert!(settings.model.is_none());
    }
}
