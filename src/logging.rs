// ABOUTME: Tracing subscriber setup and the leveled log sink bots write through.
// ABOUTME: A level mask decides which bot messages reach the sink; the rest are dropped.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Target used for messages logged by bot code
pub const BOT_TARGET: &str = "mcc_bridge::bot";

/// Install the global subscriber: `RUST_LOG` if set, else `default_filter`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Like `init`, but emits one JSON object per line for log collectors
pub fn init_json(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub fn bit(self) -> u8 {
        match self {
            Self::Info => 1,
            Self::Warn => 2,
            Self::Error => 4,
            Self::Debug => 8,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warn => "Warn",
            Self::Error => "Error",
            Self::Debug => "Debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            "debug" => Ok(Self::Debug),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Set of enabled bot log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevels(u8);

impl LogLevels {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn enabled(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn with(self, level: LogLevel) -> Self {
        Self(self.0 | level.bit())
    }
}

impl Default for LogLevels {
    fn default() -> Self {
        Self::NONE
            .with(LogLevel::Info)
            .with(LogLevel::Warn)
            .with(LogLevel::Error)
    }
}

impl FromIterator<LogLevel> for LogLevels {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Destination for bot log messages. Calls must not block.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Info => self.info(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Error => self.error(message),
            LogLevel::Debug => self.debug(message),
        }
    }
}

/// Forwards bot messages to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: BOT_TARGET, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: BOT_TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: BOT_TARGET, "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: BOT_TARGET, "{}", message);
    }
}

/// Plain console output in the `[MCC.JS][Level] message` format
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn format(level: LogLevel, message: &str) -> String {
        format!("[MCC.JS][{}] {}", level, message)
    }
}

impl LogSink for ConsoleSink {
    fn info(&self, message: &str) {
        println!("{}", Self::format(LogLevel::Info, message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", Self::format(LogLevel::Warn, message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", Self::format(LogLevel::Error, message));
    }

    fn debug(&self, message: &str) {
        println!("{}", Self::format(LogLevel::Debug, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels_exclude_debug() {
        let levels = LogLevels::default();
        assert_eq!(levels.bits(), 7);
        assert!(levels.enabled(LogLevel::Warn));
        assert!(!levels.enabled(LogLevel::Debug));
    }

    #[test]
    fn test_levels_collect_from_iterator() {
        let levels: LogLevels = [LogLevel::Error, LogLevel::Debug].into_iter().collect();
        assert_eq!(levels.bits(), 12);
        assert!(!levels.enabled(LogLevel::Info));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("WARN".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!(" debug ".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_console_format() {
        assert_eq!(
            ConsoleSink::format(LogLevel::Info, "hello"),
            "[MCC.JS][Info] hello"
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        init("warn");
        init("debug");
        init_json("info");
    }
}
