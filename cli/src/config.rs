//! Persisted base-URL preference.
//!
//! One file under the platform config directory holds the API base URL as a
//! plain string. It is read once at startup and rewritten on every list, so
//! the stored value always tracks the last URL the user listed against.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

const BASE_URL_FILE: &str = "base_url.conf";

#[derive(Debug)]
pub struct Config {
    base_url_file: PathBuf,
}

impl Config {
    pub fn new() -> Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "blogcli", "blogcli")
            .context("Failed to get project directories")?;
        let config_dir = proj_dirs.config_dir().to_path_buf();
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("Failed to create {}", config_dir.display()))?;
        Ok(Self {
            base_url_file: config_dir.join(BASE_URL_FILE),
        })
    }

    /// Config rooted at an explicit directory, for tests.
    pub fn at(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        Ok(Self {
            base_url_file: dir.join(BASE_URL_FILE),
        })
    }

    /// The persisted base URL, or `None` when nothing was saved yet.
    pub fn load_base_url(&self) -> Result<Option<String>> {
        if !self.base_url_file.exists() {
            return Ok(None);
        }
        let url = fs::read_to_string(&self.base_url_file)
            .with_context(|| format!("Failed to read {}", self.base_url_file.display()))?;
        let url = url.trim().to_string();
        Ok(if url.is_empty() { None } else { Some(url) })
    }

    pub fn save_base_url(&self, url: &str) -> Result<()> {
        fs::write(&self.base_url_file, url)
            .with_context(|| format!("Failed to write {}", self.base_url_file.display()))
    }
}
