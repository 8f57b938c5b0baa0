use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "roster-wizard")]
#[command(about = "Terminal wizard for collecting an order's roster and exporting it as CSV and PDF")]
#[command(version)]
pub struct Cli {
    /// Directory for exported files (overrides ROSTER_OUTPUT_DIR)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Simulated finalize duration in milliseconds (overrides ROSTER_FINALIZE_DELAY_MS)
    #[arg(long)]
    pub finalize_delay_ms: Option<u64>,

    /// Log file path (overrides ROSTER_LOG_FILE)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command line overrides on top of the environment configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(ref dir) = self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(delay) = self.finalize_delay_ms {
            config.timing.finalize_delay_ms = delay;
        }
        if let Some(ref log_file) = self.log_file {
            config.log_file = log_file.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "roster-wizard",
            "--output-dir",
            "/tmp/orders",
            "--finalize-delay-ms",
            "10",
        ]);
        let config = cli.apply(Config::default());
        assert_eq!(config.output_dir, PathBuf::from("/tmp/orders"));
        assert_eq!(config.timing.finalize_delay_ms, 10);
        assert_eq!(config.log_file, PathBuf::from("roster_wizard.log"));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["roster-wizard"]);
        let config = cli.apply(Config::default());
        assert_eq!(config.timing.finalize_delay_ms, 3500);
    }
}
