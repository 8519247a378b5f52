//! Configuration management
//!
//! Settings are loaded from environment variables with sensible defaults.
//!
//! # Environment Variables
//!
//! - `PROCFILE_EXTRACT_PROCFILE_NAME`: file looked up in the image - default: "Procfile"
//! - `PROCFILE_EXTRACT_TIMEOUT`: per runtime call timeout in seconds, 0 disables - default: "60"
//! - `PROCFILE_EXTRACT_STRATEGIES`: comma separated extractor order - default: "file,cmd"
//! - `PROCFILE_EXTRACT_LOG_LEVEL`: logging level - default: "info"
//! - `DOCKER_HOST`: container runtime endpoint, read by the Docker client
//!
//! # Example
//!
//! ```no_run
//! use procfile_extract::ExtractConfig;
//!
//! std::env::set_var("PROCFILE_EXTRACT_STRATEGIES", "file");
//! let config = ExtractConfig::default();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::procfile::PROCFILE_NAME;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_STRATEGIES: &str = "file,cmd";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid strategy: {0}. Valid options: file, cmd")]
    InvalidStrategy(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// A Procfile extraction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Read the Procfile out of the image filesystem
    File,
    /// Synthesize a `web` process from the image's CMD
    Cmd,
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Strategy::File),
            "cmd" => Ok(Strategy::Cmd),
            other => Err(ConfigError::InvalidStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::File => write!(f, "file"),
            Strategy::Cmd => write!(f, "cmd"),
        }
    }
}

/// Parses a comma separated strategy list such as `file,cmd`.
pub fn parse_strategies(s: &str) -> Result<Vec<Strategy>, ConfigError> {
    s.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(Strategy::from_str)
        .collect()
}

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// File name of the Procfile inside the image's working directory
    pub procfile_name: String,

    /// Timeout applied to each container runtime call; `None` disables it
    pub call_timeout: Option<Duration>,

    /// Extractors to try, in order
    pub strategies: Vec<Strategy>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ExtractConfig {
    /// Loads the configuration from `PROCFILE_EXTRACT_*` variables.
    ///
    /// Unparseable values fall back to their defaults, except for the
    /// strategy list, which [`ExtractConfig::from_env`] reports as an error.
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self {
            strategies: vec![Strategy::File, Strategy::Cmd],
            ..Self::base()
        })
    }
}

impl ExtractConfig {
    fn base() -> Self {
        let procfile_name = env::var("PROCFILE_EXTRACT_PROCFILE_NAME")
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| PROCFILE_NAME.to_string());

        let timeout_secs = env::var("PROCFILE_EXTRACT_TIMEOUT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let log_level = env::var("PROCFILE_EXTRACT_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            procfile_name,
            call_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            strategies: Vec::new(),
            log_level,
        }
    }

    /// Like `default()`, but rejects an invalid `PROCFILE_EXTRACT_STRATEGIES`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let strategies = env::var("PROCFILE_EXTRACT_STRATEGIES")
            .unwrap_or_else(|_| DEFAULT_STRATEGIES.to_string());

        Ok(Self {
            strategies: parse_strategies(&strategies)?,
            ..Self::base()
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategies.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one extraction strategy is required".to_string(),
            ));
        }

        if self.procfile_name.contains('/') {
            return Err(ConfigError::ValidationFailed(format!(
                "Procfile name must be a file name, not a path: {}",
                self.procfile_name
            )));
        }

        if let Some(timeout) = self.call_timeout {
            if timeout > Duration::from_secs(3600) {
                return Err(ConfigError::ValidationFailed(
                    "Call timeout cannot exceed 1 hour".to_string(),
                ));
            }
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for ExtractConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strategies: Vec<String> = self.strategies.iter().map(Strategy::to_string).collect();
        writeln!(f, "Procfile Extract Configuration:")?;
        writeln!(f, "  Procfile Name: {}", self.procfile_name)?;
        match self.call_timeout {
            Some(timeout) => writeln!(f, "  Call Timeout: {}s", timeout.as_secs())?,
            None => writeln!(f, "  Call Timeout: none")?,
        }
        writeln!(f, "  Strategies: {}", strategies.join(","))?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper to temporarily set environment variables for testing
    struct EnvGuard {
        key: String,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self {
                key: key.to_string(),
                old_value,
            }
        }

        fn unset(key: &str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self {
                key: key.to_string(),
                old_value,
            }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(v) => env::set_var(&self.key, v),
                None => env::remove_var(&self.key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_default_configuration() {
        let _guards = vec![
            EnvGuard::unset("PROCFILE_EXTRACT_PROCFILE_NAME"),
            EnvGuard::unset("PROCFILE_EXTRACT_TIMEOUT"),
            EnvGuard::unset("PROCFILE_EXTRACT_STRATEGIES"),
            EnvGuard::unset("PROCFILE_EXTRACT_LOG_LEVEL"),
        ];

        let config = ExtractConfig::default();
        assert_eq!(config.procfile_name, "Procfile");
        assert_eq!(config.call_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.strategies, vec![Strategy::File, Strategy::Cmd]);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let _guards = vec![
            EnvGuard::set("PROCFILE_EXTRACT_PROCFILE_NAME", "Procfile.dev"),
            EnvGuard::set("PROCFILE_EXTRACT_TIMEOUT", "0"),
            EnvGuard::set("PROCFILE_EXTRACT_STRATEGIES", "cmd, file"),
            EnvGuard::set("PROCFILE_EXTRACT_LOG_LEVEL", "DEBUG"),
        ];

        let config = ExtractConfig::from_env().unwrap();
        assert_eq!(config.procfile_name, "Procfile.dev");
        assert_eq!(config.call_timeout, None);
        assert_eq!(config.strategies, vec![Strategy::Cmd, Strategy::File]);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    #[serial]
    fn test_invalid_strategy() {
        let _guard = EnvGuard::set("PROCFILE_EXTRACT_STRATEGIES", "file,magic");

        assert_eq!(
            ExtractConfig::from_env().unwrap_err(),
            ConfigError::InvalidStrategy("magic".to_string())
        );
        assert_eq!(
            ExtractConfig::default().strategies,
            vec![Strategy::File, Strategy::Cmd]
        );
    }

    #[test]
    fn test_parse_strategies_skips_blanks() {
        assert_eq!(parse_strategies("file,,cmd,").unwrap(), vec![Strategy::File, Strategy::Cmd]);
        assert!(parse_strategies("").unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = ExtractConfig {
            procfile_name: "Procfile".to_string(),
            call_timeout: None,
            strategies: vec![Strategy::File],
            log_level: "info".to_string(),
        };
        assert!(base.validate().is_ok());

        let empty = ExtractConfig {
            strategies: Vec::new(),
            ..base.clone()
        };
        assert!(matches!(empty.validate(), Err(ConfigError::ValidationFailed(_))));

        let path = ExtractConfig {
            procfile_name: "app/Procfile".to_string(),
            ..base.clone()
        };
        assert!(path.validate().is_err());

        let level = ExtractConfig {
            log_level: "loud".to_string(),
            ..base
        };
        assert!(level.validate().is_err());
    }

    #[test]
    fn test_display() {
        let config = ExtractConfig {
            procfile_name: "Procfile".to_string(),
            call_timeout: Some(Duration::from_secs(30)),
            strategies: vec![Strategy::File, Strategy::Cmd],
            log_level: "info".to_string(),
        };
        let rendered = config.to_string();
        assert!(rendered.contains("Call Timeout: 30s"));
        assert!(rendered.contains("Strategies: file,cmd"));
    }
}
