//! Configuration management for qamd

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shortest acknowledgment the copy control shows
pub const MIN_FEEDBACK_MS: u64 = 1200;
/// Longest acknowledgment the copy control shows
pub const MAX_FEEDBACK_MS: u64 = 2000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeVariant,
    pub format: FormatConfig,
    pub render: RenderConfig,
    pub copy: CopyConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Document template; `{title}` and `{answer}` are substituted
    pub template: String,
    /// Accepted for compatibility with older configs; answers are never truncated
    pub word_limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub highlight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyConfig {
    pub feedback_ms: u64,
    pub fallback: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            template: "# {title}\n\n{answer}".to_string(),
            word_limit: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { highlight: true }
    }
}

impl Default for CopyConfig {
    fn default() -> Self {
        Self {
            feedback_ms: 1500,
            fallback: true,
        }
    }
}

impl CopyConfig {
    /// How long the "Copied!" acknowledgment stays visible
    pub fn feedback(&self) -> Duration {
        Duration::from_millis(self.feedback_ms.clamp(MIN_FEEDBACK_MS, MAX_FEEDBACK_MS))
    }
}

impl Config {
    /// Get the platform-specific config file path
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "qamd")
            .map(|proj_dirs| proj_dirs.config_dir().join("qamd.toml"))
    }

    /// Load configuration from file, falling back to defaults if missing
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        // Check config file permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat config file: {}", path.display()))?;
            if metadata.permissions().mode() & 0o002 != 0 {
                anyhow::bail!(
                    "Config file {} is world-writable (insecure permissions)",
                    path.display()
                );
            }
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if config.format.word_limit.is_some() {
            log::debug!("format.word_limit is set but answers are never truncated");
        }

        Ok(config)
    }
}
