use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

const REQUEST_TIMEOUT_SECS: u64 = 180;
const USER_AGENT: &str = "atp-dashboard/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

pub fn is_remote(source: &str) -> bool {
    let lower = source.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Maps a dataset source to a local parquet path, downloading remote sources
/// into `cache_dir` once.
pub fn resolve_dataset(source: &str, cache_dir: Option<&Path>, attempts: u32) -> Result<PathBuf> {
    let source = source.trim();
    if !is_remote(source) {
        let path = PathBuf::from(source);
        if !path.exists() {
            return Err(anyhow!("dataset not found at {}", path.display()));
        }
        return Ok(path);
    }

    let dir = cache_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::temp_dir().join("atp_dashboard"));
    let target = dir.join(cached_file_name(source));
    if target.exists() {
        info!(path = %target.display(), "using cached dataset");
        return Ok(target);
    }
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    download_file(source, &target, attempts)
}

pub fn cached_file_name(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let hex: String = digest.iter().take(12).map(|b| format!("{b:02x}")).collect();
    format!("match_log_{hex}.parquet")
}

fn download_file(url: &str, path: &Path, attempts: u32) -> Result<PathBuf> {
    let client = http_client()?;
    let attempts = attempts.max(1);
    let mut last_err: Option<anyhow::Error> = None;
    for attempt in 1..=attempts {
        let fetched = client
            .get(url)
            .send()
            .with_context(|| format!("request {url}"))
            .and_then(|res| {
                res.error_for_status()
                    .with_context(|| format!("status for {url}"))
            })
            .and_then(|res| res.bytes().with_context(|| format!("read body {url}")));
        match fetched {
            Ok(bytes) => {
                let tmp = path.with_extension("parquet.tmp");
                fs::write(&tmp, &bytes).with_context(|| format!("write {}", tmp.display()))?;
                fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
                info!(url, bytes = bytes.len(), path = %path.display(), "dataset downloaded");
                return Ok(path.to_path_buf());
            }
            Err(err) => {
                warn!(url, attempt, error = %err, "dataset download failed");
                last_err = Some(err);
                if attempt < attempts {
                    let sleep_ms = 500_u64.saturating_mul(attempt as u64);
                    std::thread::sleep(Duration::from_millis(sleep_ms));
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow!("download failed for {url}")))
}
