use crate::application::converter::{InputSyntax, load_numbers};
use crate::cli_handlers::CliCommand;
use crate::core::events::LoopEvent;
use crate::core::models::{FormatMetadata, PcmFormat};
use crate::core::traits::ConfigStore;
use crate::modules::playback::fragment_picker::RandomLoopSettings;
use crate::modules::playback::random_loop::{LoopState, RandomPlayer};
use crate::modules::playback::rodio_output::RodioOutput;
use crate::modules::storage::toml_backend::TomlConfigStore;
use crate::modules::ui::terminal::renderer::TerminalRenderer;
use crate::utils::format_seconds;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::path::PathBuf;
use std::time::Duration;

const KEY_HINT: &str = "[Space/P: Start/Stop | Q/Esc: Quit]";

pub struct RandomCommand {
    pub file: PathBuf,
    pub min_chunk_ms: Option<u32>,
    pub max_chunk_ms: Option<u32>,
    pub buffer_ms: Option<u32>,
}

impl RandomCommand {
    /// Stored settings with command-line overrides applied
    fn settings(&self, stored: RandomLoopSettings) -> RandomLoopSettings {
        RandomLoopSettings {
            min_chunk_ms: self.min_chunk_ms.unwrap_or(stored.min_chunk_ms),
            max_chunk_ms: self.max_chunk_ms.unwrap_or(stored.max_chunk_ms),
            buffer_ms: self.buffer_ms.unwrap_or(stored.buffer_ms),
        }
    }
}

enum KeyAction {
    Toggle,
    Quit,
}

fn key_action(key: &KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Some(KeyAction::Toggle),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(KeyAction::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyAction::Quit),
        _ => None,
    }
}

fn status_text(state: LoopState, format: &PcmFormat) -> String {
    match state {
        LoopState::Running => format!("▶ Playing random fragments ({})", format),
        LoopState::Idle => "■ Stopped".to_string(),
    }
}

impl CliCommand for RandomCommand {
    fn execute(self: Box<Self>) -> Result<()> {
        let config = TomlConfigStore::new()?.load()?;
        let settings = self.settings(config.random);
        settings.validate()?;

        let (numbers, meta) = load_numbers(&self.file, InputSyntax::Annotated)
            .with_context(|| format!("Could not load numbers from {}", self.file.display()))?;
        let format = meta.as_ref().map(FormatMetadata::pcm_format).unwrap_or_default();

        let mut ui = TerminalRenderer::new();
        ui.print_message(&format!("Source: {} ({} bytes)", self.file.display(), numbers.len()));
        ui.print_fields(&[
            ("Format", format.to_string()),
            (
                "Length",
                format_seconds(numbers.len() as f64 / format.byte_rate().max(1) as f64),
            ),
            (
                "Fragments",
                format!("{}-{} ms", settings.min_chunk_ms, settings.max_chunk_ms),
            ),
        ]);

        let mut player = RandomPlayer::new(RodioOutput::open, settings);
        player.start(&numbers, meta.as_ref())?;

        ui.enter_raw_mode()?;
        let result = player_loop(&mut ui, &mut player, &numbers, meta.as_ref(), &format);
        player.stop();
        ui.leave_raw_mode()?;

        ui.print_message("✓ Random playback ended");
        result
    }
}

fn player_loop<F>(
    ui: &mut TerminalRenderer,
    player: &mut RandomPlayer<RodioOutput, F>,
    numbers: &[u8],
    meta: Option<&FormatMetadata>,
    format: &PcmFormat,
) -> Result<()>
where
    F: Fn(&PcmFormat) -> crate::error::Result<RodioOutput> + Send + Sync + 'static,
{
    let mut shown = None;

    loop {
        for event in player.drain_events() {
            match event {
                LoopEvent::DeviceError { message } => ui.print_error(&format!("Audio device: {}", message)),
                LoopEvent::WriteFailed { message } => log::debug!("write failed: {}", message),
                LoopEvent::Started { format } => log::debug!("output opened for {}", format),
                LoopEvent::Stopped => {}
            }
            shown = None;
        }

        let state = player.state();
        if shown != Some(state) {
            ui.render_status(&status_text(state, format), KEY_HINT)?;
            shown = Some(state);
        }

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key_action(&key) {
                Some(KeyAction::Toggle) => {
                    if let Err(e) = player.toggle(numbers, meta) {
                        ui.print_error(&e.to_string());
                    }
                    shown = None;
                }
                Some(KeyAction::Quit) => break,
                None => {}
            }
        }
    }

    Ok(())
}
