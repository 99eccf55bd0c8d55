// Configuration module for jlens
// Reads from environment variables with sensible defaults

use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// How batch detections within one file are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum BatchRecordMode {
    /// One record per file; later rules overwrite fields set by earlier ones.
    #[default]
    Merged,
    /// One record per triggering rule.
    PerRule,
}

impl FromStr for BatchRecordMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "merged" => Ok(Self::Merged),
            "per-rule" | "per_rule" | "perrule" => Ok(Self::PerRule),
            other => Err(format!("unknown batch record mode: {other}")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Build output directory names skipped at any depth (JLENS_EXCLUDED_DIRS)
    pub excluded_dirs: Vec<String>,

    /// Source files larger than this are skipped (JLENS_MAX_FILE_BYTES)
    pub max_file_bytes: u64,

    /// Batch fact recording mode (JLENS_BATCH_RECORDS)
    pub batch_records: BatchRecordMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            excluded_dirs: vec!["target".to_string(), "build".to_string()],
            max_file_bytes: 4 * 1024 * 1024,
            batch_records: BatchRecordMode::Merged,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(val) = env::var("JLENS_EXCLUDED_DIRS") {
            config.excluded_dirs = parse_dir_list(&val);
        }

        if let Ok(val) = env::var("JLENS_MAX_FILE_BYTES") {
            if let Ok(parsed) = val.parse() {
                config.max_file_bytes = parsed;
            } else {
                tracing::warn!(
                    "invalid JLENS_MAX_FILE_BYTES value: {}, using default: {}",
                    val,
                    config.max_file_bytes
                );
            }
        }

        if let Ok(val) = env::var("JLENS_BATCH_RECORDS") {
            match val.parse() {
                Ok(parsed) => config.batch_records = parsed,
                Err(err) => tracing::warn!("{err}, using default: merged"),
            }
        }

        config
    }

    /// Get the global configuration instance
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(Config::from_env)
    }
}

fn parse_dir_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| item.to_string())
        .collect()
}
