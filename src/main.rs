use clap::Parser;
use tracing_subscriber::EnvFilter;

use statement_ingest::cli::{self, Cli, Commands, ConfigCommands};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            file,
            delimiter,
            format,
            fingerprints,
        } => cli::parse::run(&file, delimiter, format, fingerprints),
        Commands::Payload {
            file,
            top_k,
            delimiter,
        } => cli::payload::run(&file, top_k, delimiter),
        Commands::SavePayload { file } => cli::save_payload::run(&file),
        Commands::Config { command } => match command {
            ConfigCommands::Show => cli::config::show(),
            ConfigCommands::Set { key, value } => cli::config::set(&key, &value),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
