mod config;
mod decode;
mod encode;
mod random;

pub use config::ConfigCommand;
pub use decode::DecodeCommand;
pub use encode::EncodeCommand;
pub use random::RandomCommand;

use crate::cli::Commands;
use anyhow::Result;

/// Every CLI command implements this trait.
///
/// Commands own their arguments and are consumed on execution, so they run exactly once.
pub trait CliCommand {
    fn execute(self: Box<Self>) -> Result<()>;
}

/// Converts a parsed [`Commands`] variant into a boxed [`CliCommand`] ready to execute.
pub fn from_cli(cmd: Commands) -> Box<dyn CliCommand> {
    match cmd {
        Commands::Encode { file, text, duration, name, format, plain } => Box::new(EncodeCommand {
            file,
            text,
            duration,
            name,
            format,
            plain,
        }),
        Commands::Decode { audio } => Box::new(DecodeCommand { audio }),
        Commands::Random { file, min_chunk_ms, max_chunk_ms, buffer_ms } => Box::new(RandomCommand {
            file,
            min_chunk_ms,
            max_chunk_ms,
            buffer_ms,
        }),
        Commands::Config { output_dir, format, name, reset } => Box::new(ConfigCommand {
            output_dir,
            format,
            name,
            reset,
        }),
    }
}
