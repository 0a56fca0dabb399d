//! Configuration file management for habit.
//!
//! Provides a TOML-based config file at `~/.config/habit/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use habit_core::{CommandModel, GenerationConfig, ModelGateway, OfflineModel};

/// Env var naming the model command.
pub const MODEL_COMMAND_ENV: &str = "HABIT_MODEL_COMMAND";

/// Env var overriding the token budget.
pub const MAX_TOKENS_ENV: &str = "HABIT_MAX_TOKENS";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub model: ModelSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ModelSection {
    /// Model binary. Absent means offline: every plan comes from fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Arguments; `{max_tokens}` and `{prompt}` are substituted per call.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the habit config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/habit` or `~/.config/habit`,
/// on macOS too.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("habit");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("habit")
}

/// Return the path to the habit config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))
}

/// Load the config file if one exists. A file that exists but does not
/// parse is still an error.
pub fn load_config_if_present() -> Result<Option<ConfigFile>> {
    if config_path().exists() {
        load_config().map(Some)
    } else {
        Ok(None)
    }
}

fn parse_config(contents: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// How to reach the model, after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    /// Program and arguments, or `None` for offline mode.
    pub command: Option<(String, Vec<String>)>,
    pub timeout: Option<Duration>,
}

/// Fully resolved configuration, ready for use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitConfig {
    pub model: ModelSettings,
    pub generation: GenerationConfig,
}

impl HabitConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Model command: `cli_command` > `HABIT_MODEL_COMMAND` > `model.command` > offline.
    ///   A command given on the CLI or in the env is split on whitespace into
    ///   program and arguments; `model.args` only applies to `model.command`.
    /// - Token budget: `cli_max_tokens` > `HABIT_MAX_TOKENS` > `model.max_tokens` > 150.
    /// - Timeout: `model.timeout_secs` > none.
    pub fn resolve(cli_command: Option<&str>, cli_max_tokens: Option<u32>) -> Result<Self> {
        let file = load_config_if_present()?.unwrap_or_default();
        Self::resolve_with(file, cli_command, cli_max_tokens)
    }

    fn resolve_with(
        file: ConfigFile,
        cli_command: Option<&str>,
        cli_max_tokens: Option<u32>,
    ) -> Result<Self> {
        let ModelSection {
            command: file_command,
            args: file_args,
            max_tokens: file_max_tokens,
            timeout_secs,
        } = file.model;

        // Model command resolution.
        let command = if let Some(cmd) = cli_command {
            split_command(cmd)
        } else if let Ok(cmd) = std::env::var(MODEL_COMMAND_ENV) {
            split_command(&cmd)
        } else if let Some(program) = file_command.filter(|p| !p.trim().is_empty()) {
            Some((program, file_args))
        } else {
            None
        };

        // Token budget resolution.
        let max_tokens = if let Some(n) = cli_max_tokens {
            n
        } else if let Ok(raw) = std::env::var(MAX_TOKENS_ENV) {
            raw.trim()
                .parse()
                .with_context(|| format!("{MAX_TOKENS_ENV} is not a valid token count: {raw:?}"))?
        } else {
            file_max_tokens.unwrap_or(GenerationConfig::DEFAULT_MAX_TOKENS)
        };
        if max_tokens == 0 {
            bail!("max_tokens must be at least 1");
        }

        Ok(Self {
            model: ModelSettings {
                command,
                timeout: timeout_secs.map(Duration::from_secs),
            },
            generation: GenerationConfig { max_tokens },
        })
    }

    /// Build the model gateway shared by every request of this process.
    pub fn gateway(&self) -> Arc<dyn ModelGateway> {
        match &self.model.command {
            Some((program, args)) => {
                info!(%program, ?args, "using model command");
                let mut model = CommandModel::new(program.clone()).args(args.clone());
                if let Some(limit) = self.model.timeout {
                    model = model.timeout(limit);
                }
                Arc::new(model)
            }
            None => {
                warn!(
                    "no model command configured; plans will come from fallback templates \
                     (run `habit init` or set {MODEL_COMMAND_ENV})"
                );
                Arc::new(OfflineModel)
            }
        }
    }
}

fn split_command(raw: &str) -> Option<(String, Vec<String>)> {
    let mut parts = raw.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
