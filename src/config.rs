use certyfikaty_core::ARCHIVE_NAME;
use certyfikaty_fields::{
    HexColor, Locale, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_MARKER, DEFAULT_PREVIEW_WIDTH,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    // ============ Input / output ============
    /// Template used when no `--template` is given
    pub default_template: String,
    /// Workbook used when no `--data` is given
    pub default_dataset: String,
    pub output_archive: String,

    // ============ Placement ============
    /// Preview width in pixels; field coordinates are given in this space
    pub preview_width: f64,
    pub field_marker: char,
    /// Column naming the participant, drawn bold and used for file names
    pub primary_key: String,
    pub default_font_size: f32,
    pub default_font: String,
    pub default_color: HexColor,

    // ============ Values ============
    pub locale: Locale,
    /// Columns whose plain numbers are spreadsheet date serials
    pub date_columns: Vec<String>,

    // ============ Batch ============
    pub fail_fast: bool,
    pub row_delay_ms: u64,

    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_template: "template.pdf".to_string(),
            default_dataset: "data.xlsx".to_string(),
            output_archive: ARCHIVE_NAME.to_string(),
            preview_width: DEFAULT_PREVIEW_WIDTH,
            field_marker: DEFAULT_MARKER,
            primary_key: "name".to_string(),
            default_font_size: DEFAULT_FONT_SIZE,
            default_font: DEFAULT_FONT.to_string(),
            default_color: HexColor::default(),
            locale: Locale::default(),
            date_columns: Vec::new(),
            fail_fast: false,
            row_delay_ms: 0,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config dir unavailable")]
    NoConfigDir,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(base.join("certyfikaty").join("config.json"))
}

/// Reads the config at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    let raw = serde_json::to_string_pretty(config)?;
    fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.output_archive, "certyfikaty.zip");
        assert_eq!(config.preview_width, 800.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            locale: Locale::En,
            date_columns: vec!["bday".to_string()],
            default_color: "#336699".parse().unwrap(),
            fail_fast: true,
            ..AppConfig::default()
        };
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"dateColumns\""));
        assert!(raw.contains("\"#336699\""));
    }

    #[test]
    fn test_partial_file_is_filled_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "primaryKey": "imie", "rowDelayMs": 10 }"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.primary_key, "imie");
        assert_eq!(config.row_delay_ms, 10);
        assert_eq!(config.default_dataset, "data.xlsx");
        assert_eq!(config.locale, Locale::Pl);
    }

    #[test]
    fn test_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_log_level_filter() {
        let mut config = AppConfig::default();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
        config.log_level = "debug".to_string();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
        config.log_level = "loud".to_string();
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }
}
