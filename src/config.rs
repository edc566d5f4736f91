// ABOUTME: Bridge configuration parsed from TOML with environment variable overrides.
// ABOUTME: Holds the per-call execution timeout and the enabled bot log levels.
use crate::logging::{LogLevel, LogLevels};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable naming a config file for `BridgeConfig::load`
pub const CONFIG_PATH_ENV: &str = "MCC_BRIDGE_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Seconds a command may wait for its reply
    #[serde(default = "default_execution_timeout_secs")]
    pub execution_timeout_secs: u64,
    #[serde(default = "default_log_levels")]
    pub log_levels: Vec<LogLevel>,
}

fn default_execution_timeout_secs() -> u64 {
    10
}

fn default_log_levels() -> Vec<LogLevel> {
    vec![LogLevel::Info, LogLevel::Warn, LogLevel::Error]
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            execution_timeout_secs: default_execution_timeout_secs(),
            log_levels: default_log_levels(),
        }
    }
}

impl BridgeConfig {
    /// Parse TOML text; absent keys take their defaults
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse bridge config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load from `path`, else from `MCC_BRIDGE_CONFIG`, else defaults; then apply env overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let path = path.or(env_path.as_deref().map(Path::new));

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(val) = std::env::var("MCC_EXECUTION_TIMEOUT") {
            config.execution_timeout_secs = val
                .trim()
                .parse()
                .context("MCC_EXECUTION_TIMEOUT must be a whole number of seconds")?;
        }
        if let Ok(val) = std::env::var("MCC_LOG_LEVELS") {
            config.log_levels = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<LogLevel>().map_err(anyhow::Error::msg))
                .collect::<Result<Vec<_>>>()
                .context("Invalid MCC_LOG_LEVELS")?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.execution_timeout_secs == 0 {
            anyhow::bail!("execution_timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn execution_timeout(&self) -> Duration {
        Duration::from_secs(self.execution_timeout_secs)
    }

    pub fn log_level_mask(&self) -> LogLevels {
        self.log_levels.iter().copied().collect()
    }
}
