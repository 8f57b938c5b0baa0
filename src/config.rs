//! Centralized configuration management for roster-wizard

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Default simulated finalize duration, in milliseconds
pub const DEFAULT_FINALIZE_DELAY_MS: u64 = 3500;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory receiving exported CSV and PDF files
    pub output_dir: PathBuf,
    /// Log file written while the terminal UI is active
    pub log_file: PathBuf,
    /// UI timing configuration
    pub timing: TimingConfig,
}

/// Timing configuration for the event loop and the finalize step
#[derive(Debug, Clone)]
pub struct TimingConfig {
    /// Simulated finalize duration (milliseconds)
    pub finalize_delay_ms: u64,
    /// How long the event loop waits for input before redrawing (milliseconds)
    pub tick_rate_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            finalize_delay_ms: DEFAULT_FINALIZE_DELAY_MS,
            tick_rate_ms: 100,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./exports"),
            log_file: PathBuf::from("roster_wizard.log"),
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let output_dir = std::env::var("ROSTER_OUTPUT_DIR")
            .unwrap_or_else(|_| "./exports".to_string())
            .into();

        let log_file = std::env::var("ROSTER_LOG_FILE")
            .unwrap_or_else(|_| "roster_wizard.log".to_string())
            .into();

        let timing = TimingConfig {
            finalize_delay_ms: parse_env_var("ROSTER_FINALIZE_DELAY_MS")?
                .unwrap_or(DEFAULT_FINALIZE_DELAY_MS),
            tick_rate_ms: parse_env_var("ROSTER_TICK_RATE_MS")?.unwrap_or(100),
        };

        Ok(Config {
            output_dir,
            log_file,
            timing,
        })
    }

    /// Get the finalize delay as Duration
    pub fn finalize_delay(&self) -> Duration {
        Duration::from_millis(self.timing.finalize_delay_ms)
    }

    /// Get the event loop tick as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.timing.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.timing.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("Tick rate must be greater than zero"));
        }

        // Check if output directory can be created
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Cannot create output directory: {}", self.output_dir.display())
        })?;

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}
