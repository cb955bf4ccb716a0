use crate::application::converter::{EncodeOptions, InputSyntax, numbers_to_audio};
use crate::cli_handlers::CliCommand;
use crate::core::models::ContainerFormat;
use crate::core::traits::ConfigStore;
use crate::modules::export::resolve_output_dir;
use crate::modules::storage::toml_backend::TomlConfigStore;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::format_seconds;
use anyhow::{Context, Result};
use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

pub struct EncodeCommand {
    pub file: Option<PathBuf>,
    pub text: Option<String>,
    pub duration: Option<f64>,
    pub name: Option<String>,
    pub format: Option<ContainerFormat>,
    pub plain: bool,
}

impl EncodeCommand {
    fn read_input(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        if let Some(file) = &self.file {
            return fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()));
        }

        let stdin = io::stdin();
        if stdin.is_terminal() {
            eprintln!("Reading numbers from stdin (finish with Ctrl+D)...");
        }
        io::read_to_string(stdin).context("Failed to read stdin")
    }
}

impl CliCommand for EncodeCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let config = TomlConfigStore::new()?.load()?;
        let ui = TerminalRenderer::new();

        let input = self.read_input()?;
        let options = EncodeOptions {
            syntax: if self.plain { InputSyntax::Plain } else { InputSyntax::Annotated },
            duration_secs: self.duration,
            format: self.format.unwrap_or(config.format),
            output_dir: resolve_output_dir(config.output_dir.as_deref())?,
            output_name: self.name.clone().unwrap_or(config.output_name),
        };

        let report = numbers_to_audio(&input, &options).context("Could not convert numbers to audio")?;

        ui.print_message(&format!("✓ Saved {}", report.path.display()));
        ui.print_fields(&[
            ("Container", report.container.to_string()),
            ("Format", report.pcm.to_string()),
            ("Duration", format_seconds(report.duration_secs)),
            (
                "Metadata",
                report
                    .metadata
                    .as_ref()
                    .map(|meta| meta.to_string())
                    .unwrap_or_else(|| "none (legacy mode)".to_string()),
            ),
        ]);

        Ok(())
    }
}
