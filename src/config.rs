use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use lol_scraping_utils::fs_util::read_toml;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use url::Url;

use crate::xdx::DEFAULT_BASE_URL;

/// Settings of a scraping run, optionally loaded from a TOML file.
/// Missing keys keep their defaults.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub file_prefix: String,
    /// Pause between two consecutive accounts.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub request_interval: Duration,
    /// Time given to the page's scripts after navigation completes.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub page_load_wait: Duration,
    pub base_url: Url,
    pub window_size: (u32, u32),
    pub remote_debugging_port: Option<u16>,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            file_prefix: "lol_accounts".to_owned(),
            request_interval: Duration::from_secs(3),
            page_load_wait: Duration::from_secs(3),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("the default base URL is valid"),
            window_size: (1920, 1080),
            remote_debugging_port: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_owned(),
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => read_toml(path),
            None => Ok(Self::default()),
        }
    }
}
