use tracing::info;

use crate::cli::read_input;
use crate::error::Result;
use crate::importer::parse_with;
use crate::models::{ClassifyRequest, ParseOutcome};
use crate::settings::load_settings;
use crate::tokenizer::{CsvTokenizer, Delimiter};

pub fn run(file: &str, top_k: Option<u32>, delimiter: Option<Delimiter>) -> Result<()> {
    let settings = load_settings();
    let delimiter = delimiter.unwrap_or(settings.delimiter);
    let top_k = top_k.unwrap_or(settings.top_k);

    let input = read_input(file)?;
    let outcome = parse_with(&CsvTokenizer::new(delimiter), &input)?;
    info!(
        kept = outcome.stats.kept,
        total = outcome.stats.total,
        top_k,
        "building classify request"
    );

    println!("{}", classify_request_json(outcome, top_k)?);
    Ok(())
}

pub fn classify_request_json(outcome: ParseOutcome, top_k: u32) -> Result<String> {
    let request = ClassifyRequest {
        transactions: outcome.rows,
        top_k,
    };
    Ok(serde_json::to_string_pretty(&request)?)
}
