use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

const API_KEY_VAR: &str = "GEMINI_API_KEY";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Application configuration loaded from environment variables.
/// Fails at startup if the Gemini API key cannot be found.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Where single-resume uploads for `/process` are staged.
    pub upload_dir: PathBuf,
    /// Where batch uploads for `/match_resumes` are staged.
    pub match_upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub llm_timeout_secs: u64,
}

/// Subset of `config.yaml` the service reads.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(rename = "GEMINI_API_KEY")]
    gemini_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config_path = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        Ok(Config {
            gemini_api_key: resolve_api_key(std::env::var(API_KEY_VAR).ok(), &config_path)?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: env_path("UPLOAD_DIR", "__DATA__"),
            match_upload_dir: env_path("MATCH_UPLOAD_DIR", "uploads"),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
        })
    }
}

/// Environment first, then the YAML file. Blank values count as missing.
fn resolve_api_key(from_env: Option<String>, config_path: &Path) -> Result<String> {
    if let Some(key) = from_env.filter(|k| !k.trim().is_empty()) {
        return Ok(key);
    }

    if config_path.exists() {
        let raw = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let file: FileConfig = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        if let Some(key) = file.gemini_api_key.filter(|k| !k.trim().is_empty()) {
            return Ok(key);
        }
    }

    anyhow::bail!(
        "No Gemini API key found: set '{API_KEY_VAR}' or add it to {}",
        config_path.display()
    )
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("'{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_key_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY: from-file").unwrap();

        let key = resolve_api_key(Some("from-env".to_string()), file.path()).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_falls_back_to_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY: from-file\nOTHER: 1").unwrap();

        let key = resolve_api_key(None, file.path()).unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn test_blank_env_key_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "GEMINI_API_KEY: from-file").unwrap();

        let key = resolve_api_key(Some("   ".to_string()), file.path()).unwrap();
        assert_eq!(key, "from-file");
    }

    #[test]
    fn test_missing_everywhere_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_api_key(None, &dir.path().join("config.yaml")).unwrap_err();
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_yaml_without_key_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "SOMETHING_ELSE: value").unwrap();

        assert!(resolve_api_key(None, file.path()).is_err());
    }
}
