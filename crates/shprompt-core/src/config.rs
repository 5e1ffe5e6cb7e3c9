//! Configuration management for shprompt.
//!
//! Loads configuration from ${SHPROMPT_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::layout::DEFAULT_MIN_PATH_WIDTH;
use crate::prompt::{DEFAULT_DATE_FORMAT, RenderOptions};
use crate::style::Embedding;

/// How escapes are embedded in the exported prompt strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingMode {
    /// `%{ %}`-wrapped escapes, for zsh prompt expansion (default)
    #[default]
    Zsh,
    /// Bare escapes, for shells that do their own width accounting
    Raw,
}

impl From<EmbeddingMode> for Embedding {
    fn from(mode: EmbeddingMode) -> Self {
        match mode {
            EmbeddingMode::Zsh => Embedding::Zsh,
            EmbeddingMode::Raw => Embedding::Raw,
        }
    }
}

/// Which VCS adapters are probed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VcsConfig {
    pub git: bool,
    pub hg: bool,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self { git: true, hg: true }
    }
}

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for shprompt configuration and data files.
    //!
    //! SHPROMPT_HOME resolution order:
    //! 1. SHPROMPT_HOME environment variable (if set)
    //! 2. ~/.config/shprompt (default)

    use std::path::PathBuf;

    /// Returns the shprompt home directory.
    ///
    /// Falls back to a relative `.shprompt` when no home directory is known,
    /// so a prompt still renders in stripped-down environments.
    pub fn shprompt_home() -> PathBuf {
        if let Ok(home) = std::env::var("SHPROMPT_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".shprompt"),
            |h| h.join(".config").join("shprompt"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        shprompt_home().join("config.toml")
    }

    /// Returns the path to the cache file.
    pub fn cache_path() -> PathBuf {
        shprompt_home().join("cache.json")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// strftime format for the timestamp segment
    pub date_format: String,

    /// Text printed at the end of the prompt, where input begins
    pub prompt_symbol: String,

    /// Paths squeezed below this many columns move to their own line
    pub min_path_width: i64,

    /// Escape embedding for exported prompts
    pub embedding: EmbeddingMode,

    /// Timeout for ordinary VCS commands, in milliseconds
    pub command_timeout_ms: u64,

    /// Timeout for commands that may contact a remote, in milliseconds
    pub expensive_timeout_ms: u64,

    /// VCS adapter selection
    #[serde(default)]
    pub vcs: VcsConfig,
}

impl Config {
    const DEFAULT_PROMPT_SYMBOL: &str = "$ ";
    const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 1000;
    const DEFAULT_EXPENSIVE_TIMEOUT_MS: u64 = 10_000;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            date_format: self.date_format.clone(),
            prompt_symbol: self.prompt_symbol.clone(),
            min_path_width: self.min_path_width,
            embedding: self.embedding.into(),
        }
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn expensive_timeout(&self) -> Duration {
        Duration::from_millis(self.expensive_timeout_ms)
    }

    /// Writes config content to a file, creating parent directories as needed.
    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            prompt_symbol: Self::DEFAULT_PROMPT_SYMBOL.to_string(),
            min_path_width: DEFAULT_MIN_PATH_WIDTH,
            embedding: EmbeddingMode::default(),
            command_timeout_ms: Self::DEFAULT_COMMAND_TIMEOUT_MS,
            expensive_timeout_ms: Self::DEFAULT_EXPENSIVE_TIMEOUT_MS,
            vcs: VcsConfig::default(),
        }
    }
}
