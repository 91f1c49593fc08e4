//! Configuration loading and validation for the vault generator.
//!
//! All values are read from environment variables and every value has a
//! default, so a bare invocation needs no setup: it encrypts the builtin
//! table into `keys.txt` in the working directory.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path of the output file (created or truncated).
    #[serde(default = "default_output_path")]
    pub output_path: String,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_output_path() -> String {
    "keys.txt".into()
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed, or if
    /// validation fails.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.output_path.trim().is_empty() {
            anyhow::bail!("OUTPUT_PATH must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(default_output_path(), "keys.txt");
        assert_eq!(default_log_level(), "info");
    }

    #[test]
    fn validate_rejects_empty_output_path() {
        let cfg = Config {
            output_path: "  ".into(),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_defaults() {
        let cfg = Config {
            output_path: default_output_path(),
            log_level: default_log_level(),
        };
        assert!(cfg.validate().is_ok());
    }
}
