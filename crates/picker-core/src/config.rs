use crate::model::RepositoryRecord;
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "https://api.github.com";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    #[default]
    Oss,
    Saas,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub app_mode: AppMode,
    pub app_slug: Option<String>,
    pub api_host: String,
    pub debounce_ms: u64,
    pub token: Option<String>,
    pub repositories: Vec<RepositoryRecord>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            app_mode: AppMode::Oss,
            app_slug: None,
            api_host: DEFAULT_API_HOST.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            token: None,
            repositories: Vec::new(),
        }
    }
}

impl PickerConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path).context("read config")?;
        let config = serde_json::from_str(&data).context("parse config")?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("create config directory")?;
        }
        let data = serde_json::to_string_pretty(self).context("serialize config")?;
        fs::write(path, data).context("write config")?;
        Ok(())
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let project =
        ProjectDirs::from("com", "repo-picker", "repo-picker").context("resolve project dirs")?;
    Ok(project.config_dir().join("config.json"))
}

/// Reads a JSON array of repositories, used as the known list.
pub fn load_repositories(path: &Path) -> anyhow::Result<Vec<RepositoryRecord>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read repositories from {}", path.display()))?;
    serde_json::from_str(&data).context("parse repositories")
}
