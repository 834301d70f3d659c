use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};

/// Overrides the settings file location, like the server's own config variable.
pub const CONFIG_ENV_VAR: &str = "ELOGY_CONFIG_FILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub server_url: String,
    // None: take `n` from the location, falling back to 50
    pub page_size: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub start_location: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8000".to_string(),
            page_size: None,
            request_timeout_secs: None,
            start_location: "/logbooks/0".to_string(),
        }
    }
}

impl AppSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new() -> Result<Self> {
        if let Some(p) = env::var_os(CONFIG_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(Self::at(PathBuf::from(p)));
        }
        let dirs = ProjectDirs::from("org", "elogy", "elogy")
            .ok_or_else(|| anyhow::anyhow!("failed to resolve config directory"))?;
        Ok(Self::at(dirs.config_dir().join("settings.toml")))
    }

    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn load(&self) -> Result<AppSettings> {
        if !self.path.exists() {
            return Ok(AppSettings::default());
        }
        let text = fs::read_to_string(&self.path).with_context(|| format!("read {}", self.path.display()))?;
        let settings: AppSettings = toml::from_str(&text).with_context(|| format!("parse {}", self.path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &AppSettings) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).context("create config dir")?;
        }
        let text = toml::to_string_pretty(settings)?;
        fs::write(&self.path, text).context("write settings")?;
        Ok(())
    }
}
