use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Archived snapshot of the Wikipedia page, so the table shape is stable.
const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

/// Run configuration. Every field has a default matching the reference
/// pipeline, so a bare `banks_etl run` works without any config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    pub exchange_rate_path: String,
    pub output_csv_path: String,
    pub db_path: String,
    pub table_name: String,
    pub log_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            exchange_rate_path: "exchange_rate.csv".to_string(),
            output_csv_path: "Largest_banks_data.csv".to_string(),
            db_path: "Banks.db".to_string(),
            table_name: "Largest_banks".to_string(),
            log_path: "code_log.txt".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. A missing file yields the
    /// defaults; a file that exists but fails to parse is an error.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or("config.toml");
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .map_err(|e| EtlError::Config(format!("failed to read config file '{path}': {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| EtlError::Config(format!("failed to parse config file '{path}': {e}")))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load_or_default(Some("no_such_config.toml")).unwrap();
        assert_eq!(config.table_name, "Largest_banks");
        assert_eq!(config.db_path, "Banks.db");
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "db_path = \"/tmp/other.db\"").unwrap();

        let config = Config::load_or_default(path.to_str()).unwrap();
        assert_eq!(config.db_path, "/tmp/other.db");
        assert_eq!(config.table_name, "Largest_banks");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "db_path = [not toml").unwrap();

        let err = Config::load_or_default(path.to_str()).unwrap_err();
        assert!(matches!(err, EtlError::Config(_)));
    }
}
