use std::env;
use std::path::PathBuf;

use tracing::warn;

pub const DEFAULT_DATASET_URL: &str = concat!(
    "https://raw.githubusercontent.com/statzenthusiast921/ATP_Analysis/",
    "main/main/data/model_df_v2.parquet.gzip"
);
pub const DEFAULT_MIN_MATCHES: usize = 300;
pub const DEFAULT_LOG_FILTER: &str = "atp_dashboard=info";
const DEFAULT_DOWNLOAD_ATTEMPTS: u32 = 4;
const CACHE_DIR: &str = "atp_dashboard";

#[derive(Debug, Clone)]
pub struct Config {
    pub dataset: String,
    pub min_matches: usize,
    pub cache_dir: Option<PathBuf>,
    pub log_filter: String,
    pub download_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET_URL.to_string(),
            min_matches: DEFAULT_MIN_MATCHES,
            cache_dir: app_cache_dir(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            download_attempts: DEFAULT_DOWNLOAD_ATTEMPTS,
        }
    }
}

impl Config {
    /// Reads `.env.local` and `.env` (real env vars win), then the `ATP_*` keys.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Config::default();

        if let Some(raw) = non_empty(lookup("ATP_DATASET")) {
            cfg.dataset = raw;
        }
        if let Some(raw) = non_empty(lookup("ATP_MIN_MATCHES")) {
            match raw.parse::<usize>() {
                Ok(v) => cfg.min_matches = v,
                Err(_) => warn!(value = %raw, "ignoring malformed ATP_MIN_MATCHES"),
            }
        }
        if let Some(raw) = non_empty(lookup("ATP_CACHE_DIR")) {
            cfg.cache_dir = Some(PathBuf::from(raw));
        }
        if let Some(raw) = non_empty(lookup("ATP_LOG")) {
            cfg.log_filter = raw;
        }
        if let Some(raw) = non_empty(lookup("ATP_DOWNLOAD_ATTEMPTS")) {
            match raw.parse::<u32>() {
                Ok(v) => cfg.download_attempts = v.clamp(1, 10),
                Err(_) => warn!(value = %raw, "ignoring malformed ATP_DOWNLOAD_ATTEMPTS"),
            }
        }
        cfg
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME")
        && !base.trim().is_empty()
    {
        return Some(PathBuf::from(base).join(CACHE_DIR));
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
