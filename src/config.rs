//! Configuration for scanning and fixing.
//!
//! Configuration is loaded from a YAML or JSON file keyed on extension, with
//! serde defaults standing in for any omitted section. The rest of the crate
//! treats the loaded `Config` as read-only.

use std::fs;
use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0:?} (expected .yaml, .yml, or .json)")]
    UnsupportedFormat(String),
    #[error("invalid exclude pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        source: globset::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub fixer: FixerConfig,
    pub validation: ValidationConfig,
}

/// File enumeration settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Extensions to scan, without the leading dot.
    pub file_extensions: Vec<String>,
    /// Glob patterns excluded from enumeration.
    pub exclude_patterns: Vec<String>,
    /// Files larger than this are skipped.
    pub max_file_size_mb: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            file_extensions: vec!["py".to_string()],
            exclude_patterns: vec![
                "**/venv/**".to_string(),
                "**/.venv/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/__pycache__/**".to_string(),
                "**/.git/**".to_string(),
            ],
            max_file_size_mb: 10,
        }
    }
}

/// Fix application settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FixerConfig {
    /// Apply automated fixes without an explicit opt-in flag.
    pub auto_apply_fixes: bool,
    /// Copy the original file aside before overwriting it.
    pub create_backup: bool,
    /// Suffix appended to backup file names.
    pub backup_suffix: String,
}

impl Default for FixerConfig {
    fn default() -> Self {
        Self {
            auto_apply_fixes: false,
            create_backup: true,
            backup_suffix: ".backup".to_string(),
        }
    }
}

/// External test validation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub run_tests: bool,
    pub test_command: String,
    /// Wall-clock ceiling for one test run.
    pub test_timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            run_tests: true,
            test_command: "python -m pytest".to_string(),
            test_timeout_secs: 120,
        }
    }
}

impl Config {
    /// Load configuration from a YAML or JSON file, keyed on extension.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Build the compiled exclusion matcher.
    pub fn exclude_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.scanner.exclude_patterns {
            let glob = Glob::new(pattern).map_err(|source| ConfigError::BadPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|source| ConfigError::BadPattern {
            pattern: String::new(),
            source,
        })
    }

    /// Size ceiling in bytes.
    pub fn max_file_size_bytes(&self) -> u64 {
        self.scanner.max_file_size_mb * 1024 * 1024
    }
}
