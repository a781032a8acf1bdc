use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "blockscope.config.json";

/// Blockscope configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// How long a request waits for the host before failing
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Directory CSV exports are written to
    #[serde(default = "default_csv_out_dir")]
    pub csv_out_dir: String,

    /// Bound of the host channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_csv_out_dir() -> String {
    ".".to_string()
}

fn default_channel_capacity() -> usize {
    100
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Get absolute path to the CSV output directory
    pub fn get_csv_out_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.csv_out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
            csv_out_dir: default_csv_out_dir(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
