use crate::application::config::AppConfig;
use crate::cli_handlers::CliCommand;
use crate::core::models::ContainerFormat;
use crate::core::traits::ConfigStore;
use crate::modules::export::resolve_output_dir;
use crate::modules::storage::toml_backend::TomlConfigStore;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use anyhow::{Context, Result};
use std::path::{self, PathBuf};

pub struct ConfigCommand {
    pub output_dir: Option<PathBuf>,
    pub format: Option<ContainerFormat>,
    pub name: Option<String>,
    pub reset: bool,
}

impl ConfigCommand {
    fn is_update(&self) -> bool {
        self.reset || self.output_dir.is_some() || self.format.is_some() || self.name.is_some()
    }

    fn apply(&self, config: &mut AppConfig) -> Result<()> {
        if self.reset {
            *config = AppConfig::default();
            return Ok(());
        }

        if let Some(dir) = &self.output_dir {
            if dir.exists() && !dir.is_dir() {
                anyhow::bail!("{} exists and is not a directory.", dir.display());
            }
            let dir = path::absolute(dir).with_context(|| format!("Invalid path {}", dir.display()))?;
            config.output_dir = Some(dir);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(name) = &self.name {
            validate_stem(name)?;
            config.output_name = name.clone();
        }
        Ok(())
    }
}

fn validate_stem(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        anyhow::bail!("Output name must not be empty.");
    }
    if name.contains(['/', '\\']) {
        anyhow::bail!("Output name must be a file stem, not a path: {}", name);
    }
    Ok(())
}

impl CliCommand for ConfigCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let storage = TomlConfigStore::new()?;
        let mut config = storage.load()?;
        let ui = TerminalRenderer::new();

        if self.is_update() {
            self.apply(&mut config)?;
            storage.save(&config)?;
            ui.print_message("✓ Settings saved");
        }

        let output_dir = match &config.output_dir {
            Some(dir) => dir.display().to_string(),
            None => match resolve_output_dir(None) {
                Ok(desktop) => format!("{} (desktop)", desktop.display()),
                Err(_) => "desktop (not found)".to_string(),
            },
        };

        ui.print_message(&format!("Settings file: {}", storage.path().display()));
        ui.print_fields(&[
            ("Output directory", output_dir),
            ("Format", config.format.to_string()),
            ("Output name", config.output_name.clone()),
            (
                "Random fragments",
                format!("{}-{} ms", config.random.min_chunk_ms, config.random.max_chunk_ms),
            ),
            ("Random buffer", format!("{} ms", config.random.buffer_ms)),
        ]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn command() -> ConfigCommand {
        ConfigCommand { output_dir: None, format: None, name: None, reset: false }
    }

    #[test]
    fn updates_only_given_fields() {
        let mut config = AppConfig::default();
        config.output_name = "kept".to_string();

        let cmd = ConfigCommand { format: Some(ContainerFormat::Wav), ..command() };
        assert!(cmd.is_update());
        cmd.apply(&mut config).unwrap();

        assert_eq!(config.format, ContainerFormat::Wav);
        assert_eq!(config.output_name, "kept");
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn relative_output_dir_is_made_absolute() {
        let mut config = AppConfig::default();
        let cmd = ConfigCommand { output_dir: Some(PathBuf::from("renders")), ..command() };
        cmd.apply(&mut config).unwrap();

        assert!(config.output_dir.unwrap().is_absolute());
    }

    #[test]
    fn output_dir_must_not_be_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("taken");
        std::fs::write(&file, "x").unwrap();

        let cmd = ConfigCommand { output_dir: Some(file), ..command() };
        assert!(cmd.apply(&mut AppConfig::default()).is_err());
    }

    #[test]
    fn name_must_be_a_stem() {
        let mut config = AppConfig::default();
        for bad in ["", "  ", "a/b", "a\\b"] {
            let cmd = ConfigCommand { name: Some(bad.to_string()), ..command() };
            assert!(cmd.apply(&mut config).is_err(), "{:?} accepted", bad);
        }
        assert_eq!(config.output_name, "evp_audio");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut config = AppConfig::default();
        config.format = ContainerFormat::Wav;
        config.random.buffer_ms = 10;

        ConfigCommand { reset: true, ..command() }.apply(&mut config).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn no_flags_only_shows() {
        assert!(!command().is_update());
    }
}
