pub mod config;
pub mod parse;
pub mod payload;
pub mod save_payload;

use std::io::Read;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tokenizer::Delimiter;

/// Read a whole input file, or stdin when the path is `-`.
pub(crate) fn read_input(file: &str) -> Result<Vec<u8>> {
    if file == "-" {
        let mut buf = Vec::new();
        std::io::stdin().lock().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read(file)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

#[derive(Parser)]
#[command(
    name = "stmt",
    version,
    about = "Turn bank-statement CSV exports into clean transactions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a statement and preview the kept transactions.
    Parse {
        /// CSV file to read, or - for stdin
        file: String,
        /// Field delimiter (default from settings, normally auto)
        #[arg(long, value_enum)]
        delimiter: Option<Delimiter>,
        /// Output format (default from settings, normally table)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
        /// Include each row's classification cache key
        #[arg(long)]
        fingerprints: bool,
    },
    /// Print the classification request body for a statement.
    Payload {
        /// CSV file to read, or - for stdin
        file: String,
        /// Number of candidate categories to request per transaction
        #[arg(long = "top-k", value_parser = clap::value_parser!(u32).range(1..))]
        top_k: Option<u32>,
        /// Field delimiter (default from settings, normally auto)
        #[arg(long, value_enum)]
        delimiter: Option<Delimiter>,
    },
    /// Turn a classification response into a save-expenses request body.
    SavePayload {
        /// JSON file holding the classifier response, or - for stdin
        file: String,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the settings file and effective values.
    Show,
    /// Change one setting (delimiter, format, top_k).
    Set {
        key: String,
        value: String,
    },
}
