//! Optional JSON settings stored next to the database. A missing file simply
//! means defaults, so first launches need no setup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".student-roster";
const CONFIG_FILE_NAME: &str = "config.json";
const DEFAULT_DB_FILE: &str = "students.sqlite";
const DEFAULT_LOG_FILE: &str = "student-roster.log";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite file. Relative paths are resolved against the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: PathBuf,

    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Filter directive handed to `tracing_subscriber::EnvFilter`, e.g.
    /// `"debug"` or `"student_roster=trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database_file() -> PathBuf {
    PathBuf::from(DEFAULT_DB_FILE)
}

fn default_log_file() -> PathBuf {
    PathBuf::from(DEFAULT_LOG_FILE)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_file: default_database_file(),
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Read `config.json` from `data_dir`, falling back to defaults when the
    /// file does not exist.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database_file)
    }

    pub fn log_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.log_file)
    }
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
