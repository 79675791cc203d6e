use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::error::{IngestError, Result};
use crate::tokenizer::Delimiter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub delimiter: Delimiter,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

fn default_top_k() -> u32 {
    3
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::default(),
            format: OutputFormat::default(),
            top_k: default_top_k(),
        }
    }
}

impl Settings {
    pub const KEYS: [&'static str; 3] = ["delimiter", "format", "top_k"];

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "delimiter" => {
                self.delimiter = Delimiter::from_str(value, true).map_err(IngestError::Settings)?;
            }
            "format" => {
                self.format = OutputFormat::from_str(value, true).map_err(IngestError::Settings)?;
            }
            "top_k" => {
                self.top_k = value
                    .parse()
                    .ok()
                    .filter(|k| *k > 0)
                    .ok_or_else(|| {
                        IngestError::Settings(format!("top_k must be a positive integer, got {value:?}"))
                    })?;
            }
            _ => {
                return Err(IngestError::Settings(format!(
                    "Unknown setting {key:?} (expected one of: {})",
                    Self::KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("statement-ingest")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_from(&settings_path())
}

pub fn load_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_to(&settings_path(), settings)
}

pub fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| IngestError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep").join("settings.json");
        let settings = Settings {
            delimiter: Delimiter::Semicolon,
            format: OutputFormat::Json,
            top_k: 5,
        };
        save_to(&path, &settings).unwrap();
        assert_eq!(load_from(&path), settings);
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"delimiter\": \"semicolon\""));
    }

    #[test]
    fn test_load_returns_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let s = load_from(&dir.path().join("nope.json"));
        assert_eq!(s, Settings::default());
        assert_eq!(s.top_k, 3);
        assert_eq!(s.delimiter, Delimiter::Auto);
    }

    #[test]
    fn test_load_returns_defaults_when_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_from(&path), Settings::default());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let s: Settings = serde_json::from_str(r#"{"top_k": 7}"#).unwrap();
        assert_eq!(s.top_k, 7);
        assert_eq!(s.format, OutputFormat::Table);
    }

    #[test]
    fn test_set_values() {
        let mut s = Settings::default();
        s.set("delimiter", "TAB").unwrap();
        s.set("format", "csv").unwrap();
        s.set("top_k", "10").unwrap();
        assert_eq!(s.delimiter, Delimiter::Tab);
        assert_eq!(s.format, OutputFormat::Csv);
        assert_eq!(s.top_k, 10);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut s = Settings::default();
        assert!(s.set("delimiter", "space").is_err());
        assert!(s.set("top_k", "0").is_err());
        assert!(s.set("top_k", "-1").is_err());
        assert!(matches!(s.set("colour", "red"), Err(IngestError::Settings(_))));
        assert_eq!(s, Settings::default());
    }
}
