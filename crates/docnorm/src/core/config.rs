//! Configuration loading.
//!
//! Configuration comes from an optional `docnorm.toml` / `docnorm.yaml` /
//! `docnorm.json` file, then environment variables override individual fields:
//!
//! | Variable | Field |
//! |---|---|
//! | `DOCNORM_HOST` | `service.host` |
//! | `DOCNORM_PORT` | `service.port` |
//! | `DOCNORM_MAX_CONCURRENT_REQUESTS` | `service.max_concurrent_requests` |
//! | `DOCNORM_MAX_REQUEST_BODY_BYTES` | `service.max_request_body_bytes` |
//! | `DOCNORM_CORS_ORIGINS` | `service.cors_origins` (comma-separated) |

use crate::core::validation::MAX_PAYLOAD_BYTES;
use crate::extraction::LayoutConfig;
use crate::{DocnormError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest HTTP body that can carry a maximum-size payload as base64.
pub const MIN_REQUEST_BODY_BYTES: usize = MAX_PAYLOAD_BYTES.div_ceil(3) * 4;

const CONFIG_FILE_NAMES: &[&str] = &["docnorm.toml", "docnorm.yaml", "docnorm.yml", "docnorm.json"];

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocnormConfig {
    pub service: ServiceConfig,
    pub pdf: PdfConfig,
}

/// RPC front-end settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Worker pool size. Requests beyond this many wait for a free worker.
    pub max_concurrent_requests: usize,
    /// Transport buffering limit. Sized above the base64 form of the payload cap.
    pub max_request_body_bytes: usize,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50051,
            max_concurrent_requests: 10,
            max_request_body_bytes: 64 * 1024 * 1024,
            cors_origins: Vec::new(),
        }
    }
}

/// PDF extraction settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    pub detect_tables: bool,
    pub min_table_rows: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            detect_tables: true,
            min_table_rows: 2,
        }
    }
}

impl From<&PdfConfig> for LayoutConfig {
    fn from(config: &PdfConfig) -> Self {
        Self {
            detect_tables: config.detect_tables,
            min_table_rows: config.min_table_rows,
        }
    }
}

impl DocnormConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;
        toml::from_str(&content)
            .map_err(|e| DocnormError::config_with_source(format!("invalid TOML in {}", path.display()), e))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| DocnormError::config_with_source(format!("invalid YAML in {}", path.display()), e))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = read_config_file(path)?;
        serde_json::from_str(&content)
            .map_err(|e| DocnormError::config_with_source(format!("invalid JSON in {}", path.display()), e))
    }

    /// Load configuration, picking the format from the file extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("toml") => Self::from_toml_file(path),
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(DocnormError::config(format!(
                "unsupported config file format: {} (expected .toml, .yaml, .yml or .json)",
                path.display()
            ))),
        }
    }

    /// Search the current directory and its parents for a config file.
    ///
    /// The nearest directory wins; within one directory TOML is preferred over YAML
    /// over JSON.
    pub fn discover() -> Result<Option<Self>> {
        let current = std::env::current_dir()?;
        Self::discover_from(&current)
    }

    pub(crate) fn discover_from(start: &Path) -> Result<Option<Self>> {
        for directory in start.ancestors() {
            for file_name in CONFIG_FILE_NAMES {
                let candidate = directory.join(file_name);
                if candidate.is_file() {
                    tracing::debug!(path = %candidate.display(), "found config file");
                    return Self::from_file(candidate).map(Some);
                }
            }
        }

        Ok(None)
    }

    /// Apply `DOCNORM_*` environment overrides.
    ///
    /// Unparseable values are an error rather than silently ignored.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("DOCNORM_HOST") {
            self.service.host = host;
        }

        if let Some(port) = parse_env::<u16>("DOCNORM_PORT")? {
            self.service.port = port;
        }

        if let Some(workers) = parse_env::<usize>("DOCNORM_MAX_CONCURRENT_REQUESTS")? {
            self.service.max_concurrent_requests = workers;
        }

        if let Some(bytes) = parse_env::<usize>("DOCNORM_MAX_REQUEST_BODY_BYTES")? {
            self.service.max_request_body_bytes = bytes;
        }

        if let Ok(origins) = std::env::var("DOCNORM_CORS_ORIGINS") {
            self.service.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(())
    }

    /// Check invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.service.max_concurrent_requests == 0 {
            return Err(DocnormError::config("max_concurrent_requests must be at least 1"));
        }

        if self.service.max_request_body_bytes < MIN_REQUEST_BODY_BYTES {
            return Err(DocnormError::config(format!(
                "max_request_body_bytes must be at least {} bytes to carry a base64-encoded {} byte payload",
                MIN_REQUEST_BODY_BYTES, MAX_PAYLOAD_BYTES
            )));
        }

        if self.pdf.min_table_rows == 0 {
            return Err(DocnormError::config("pdf.min_table_rows must be at least 1"));
        }

        Ok(())
    }

    /// Explicit file, else discovered file, else defaults; then environment overrides.
    ///
    /// Not validated: callers layer their own overrides on top and call
    /// [`validate`](Self::validate) last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::discover()? {
                Some(config) => {
                    tracing::info!("loaded configuration from discovered file");
                    config
                }
                None => {
                    tracing::info!("no config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env_overrides()?;
        Ok(config)
    }
}

fn read_config_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| DocnormError::config_with_source(format!("failed to read config file {}", path.display()), e))
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| DocnormError::config(format!("invalid {}='{}': {}", name, value, e))),
        Err(_) => Ok(None),
    }
}
