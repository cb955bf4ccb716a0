mod application;
mod cli;
mod cli_handlers;
mod core;
mod error;
mod modules;
mod utils;

use clap::Parser;
use cli::Cli;
use cli_handlers::from_cli;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = from_cli(cli.command).execute() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
