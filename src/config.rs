//! Application configuration from the environment

use crate::llm::LlmConfig;
use std::path::PathBuf;

const DATA_DIR: &str = ".saathi";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Paths default to `$HOME/.saathi/`, or `/tmp/.saathi/` without a home
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let data_dir = PathBuf::from(var("HOME").unwrap_or_else(|| "/tmp".to_string())).join(DATA_DIR);

        Self {
            llm: LlmConfig::from_lookup(&lookup),
            db_path: var("SAATHI_DB_PATH").map_or_else(|| data_dir.join("saathi.db"), PathBuf::from),
            log_path: var("SAATHI_LOG_PATH").map_or_else(|| data_dir.join("saathi.log"), PathBuf::from),
        }
    }
}
