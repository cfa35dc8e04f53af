//! Per-directory configuration.
//!
//! An optional `fits-triage.toml` in the capture directory tunes how previews
//! are encoded. Without the file every value takes its default.
//!
//! ```text
//! night-2024-09-14/
//! ├── fits-triage.toml     # optional
//! ├── M31_0001.fits
//! └── previews/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [preview]
//! quality = 90      # JPEG quality (1-100)
//! max_size = 2048   # Longest preview edge in pixels (omit to keep full size)
//! ```
//!
//! The stretch itself (percentile window, asinh curve) is fixed so previews
//! from different nights compare directly. Unknown keys are rejected to catch
//! typos early.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the capture directory.
pub const CONFIG_FILE: &str = "fits-triage.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `fits-triage.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriageConfig {
    /// Preview encoding settings.
    pub preview: PreviewConfig,
}

/// Preview encoding settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    /// JPEG quality, 1-100.
    pub quality: u32,
    /// Longest edge of the written preview. `None` keeps the capture's size.
    pub max_size: Option<u32>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            max_size: None,
        }
    }
}

impl TriageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.preview.quality) {
            return Err(ConfigError::Validation(
                "preview.quality must be 1-100".into(),
            ));
        }
        if self.preview.max_size == Some(0) {
            return Err(ConfigError::Validation(
                "preview.max_size must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Load `fits-triage.toml` from `dir`, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<TriageConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(TriageConfig::default());
    }

    let content = fs::read_to_string(&path)?;
    let config: TriageConfig = toml::from_str(&content)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

/// Returns a fully-commented stock `fits-triage.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# fits-triage configuration
# =========================
# Place this file as fits-triage.toml in the capture directory.
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

[preview]
# JPEG quality for written previews (1-100).
quality = 90

# Longest edge of a preview in pixels. Larger captures are downscaled
# (aspect ratio kept). Leave unset to write previews at full size.
# max_size = 2048
"##
}
