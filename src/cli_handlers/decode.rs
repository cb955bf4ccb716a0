use crate::application::converter::audio_to_numbers;
use crate::cli_handlers::CliCommand;
use crate::core::traits::ConfigStore;
use crate::modules::export::resolve_output_dir;
use crate::modules::storage::toml_backend::TomlConfigStore;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::format_seconds;
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct DecodeCommand {
    pub audio: PathBuf,
}

impl CliCommand for DecodeCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let config = TomlConfigStore::new()?.load()?;
        let ui = TerminalRenderer::new();

        let output_dir = resolve_output_dir(config.output_dir.as_deref())?;
        let report = audio_to_numbers(&self.audio, &output_dir)
            .with_context(|| format!("Could not extract numbers from {}", self.audio.display()))?;

        ui.print_message(&format!("✓ Saved {}", report.path.display()));
        ui.print_fields(&[
            ("Samples", report.samples.to_string()),
            ("Format", report.pcm.to_string()),
            ("Duration", format!("~{}", format_seconds(report.approx_duration_secs))),
        ]);

        Ok(())
    }
}
