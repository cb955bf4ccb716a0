use crate::application::config::AppConfig;
use crate::core::traits::ConfigStore;
use crate::utils::{APP_NAME, write_atomically};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct TomlConfigStore {
    file_path: PathBuf,
}

impl TomlConfigStore {
    pub fn new() -> Result<Self> {
        let mut path = dirs::config_dir().context("Could not find config directory")?;
        path.push(APP_NAME);
        path.push("config.toml");
        Ok(Self::at(path))
    }

    /// Store backed by an explicit file
    pub fn at(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.file_path
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Result<AppConfig> {
        if !self.file_path.exists() {
            return Ok(AppConfig::default());
        }
        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid settings in {}", self.file_path.display()))?;
        Ok(config)
    }

    fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(dir) = self.file_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(config)?;
        write_atomically(&self.file_path, content.as_bytes())?;
        Ok(())
    }
}
