//! Configuration: optional TOML file, overridden by environment variables.
//!
//! Lookup order per knob: `caddie.toml` (or `$CADDIE_CONFIG`) → `CADDIE_*`
//! environment variables → built-in default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://connect.garmin.com";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_REPLY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    base_url: Option<String>,
    data_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    reply_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
    pub reply_timeout: Duration,
}

impl Settings {
    pub fn load() -> Result<Self> {
        // A .env next to the binary is a convenience, not a requirement.
        let _ = dotenvy::dotenv();

        let file = load_file()?;

        let base_url = std::env::var("CADDIE_BASE_URL")
            .ok()
            .or(file.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("invalid base url: {base_url}"))?;

        let data_dir = std::env::var("CADDIE_DATA_DIR")
            .ok()
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(default_data_dir);

        let request_timeout_secs = env_u64("CADDIE_REQUEST_TIMEOUT_SECS")?
            .or(file.request_timeout_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let reply_timeout_secs = env_u64("CADDIE_REPLY_TIMEOUT_SECS")?
            .or(file.reply_timeout_secs)
            .unwrap_or(DEFAULT_REPLY_TIMEOUT_SECS);

        Ok(Settings {
            base_url,
            data_dir,
            request_timeout: Duration::from_secs(request_timeout_secs),
            reply_timeout: Duration::from_secs(reply_timeout_secs),
        })
    }

    pub fn credential_path(&self) -> PathBuf {
        self.data_dir.join("credentials.json")
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.data_dir.join("overrides.json")
    }
}

fn load_file() -> Result<SettingsFile> {
    let path = std::env::var("CADDIE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("caddie.toml"));

    match std::fs::read_to_string(&path) {
        Ok(body) => toml::from_str(&body)
            .with_context(|| format!("invalid config file {}", path.display())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(SettingsFile::default()),
        Err(err) => {
            Err(err).with_context(|| format!("cannot read config file {}", path.display()))
        }
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .map(Some)
            .with_context(|| format!("{key} must be an integer, got {value:?}")),
        Err(_) => Ok(None),
    }
}

fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".local/share/caddie"),
        Err(_) => PathBuf::from(".caddie"),
    }
}
