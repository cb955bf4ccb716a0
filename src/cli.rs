use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::models::ContainerFormat;
use crate::utils::APP_NAME;

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(about = "Turn number arrays into audio and back", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert numbers (0-255) into an audio file
    Encode {
        /// Text file with the numbers; stdin when neither this nor --text is given
        file: Option<PathBuf>,

        /// Numbers given inline instead of a file
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Target duration in seconds (pads with silence or truncates)
        #[arg(short, long)]
        duration: Option<f64>,

        /// Output file stem
        #[arg(short, long)]
        name: Option<String>,

        /// Output container
        #[arg(short, long, value_enum)]
        format: Option<ContainerFormat>,

        /// Input is a plain `[1, 2, 3]` list without a #META header
        #[arg(long)]
        plain: bool,
    },

    /// Convert an audio file into a numeric dump
    Decode {
        /// Audio file to decode
        audio: PathBuf,
    },

    /// Play random fragments of a numeric file in a loop
    Random {
        /// Text file with the numbers
        file: PathBuf,

        /// Shortest fragment, in milliseconds
        #[arg(long)]
        min_chunk_ms: Option<u32>,

        /// Longest fragment, in milliseconds
        #[arg(long)]
        max_chunk_ms: Option<u32>,

        /// Audio handed to the device per write, in milliseconds
        #[arg(long)]
        buffer_ms: Option<u32>,
    },

    /// Show or update stored settings
    Config {
        /// Directory for exported files
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Default output container
        #[arg(long, value_enum)]
        format: Option<ContainerFormat>,

        /// Default output file stem
        #[arg(long)]
        name: Option<String>,

        /// Restore all defaults
        #[arg(long, conflicts_with_all = ["output_dir", "format", "name"])]
        reset: bool,
    },
}
