use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;

use crate::cli::{read_input, OutputFormat};
use crate::error::{IngestError, Result};
use crate::fingerprint::fingerprint;
use crate::fmt::{amount, short_hash};
use crate::importer::parse_with;
use crate::models::{ParseOutcome, ParseStats, Transaction};
use crate::settings::load_settings;
use crate::tokenizer::{CsvTokenizer, Delimiter};

#[derive(Serialize)]
struct PreviewRow<'a> {
    #[serde(flatten)]
    transaction: &'a Transaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    hash: Option<&'a str>,
}

#[derive(Serialize)]
struct Preview<'a> {
    rows: Vec<PreviewRow<'a>>,
    stats: ParseStats,
}

pub fn run(
    file: &str,
    delimiter: Option<Delimiter>,
    format: Option<OutputFormat>,
    fingerprints: bool,
) -> Result<()> {
    let settings = load_settings();
    let delimiter = delimiter.unwrap_or(settings.delimiter);
    let format = format.unwrap_or(settings.format);

    let input = read_input(file)?;
    let outcome = parse_with(&CsvTokenizer::new(delimiter), &input)?;

    let hashes = if fingerprints {
        Some(
            outcome
                .rows
                .iter()
                .map(fingerprint)
                .collect::<Result<Vec<_>>>()?,
        )
    } else {
        None
    };

    match format {
        OutputFormat::Table => {
            println!("{}", format_table(&outcome, hashes.as_deref()));
            println!("{}", format_stats(&outcome.stats));
            if let Some(hint) = empty_hint(&outcome.stats) {
                eprintln!("{}", hint.yellow());
            }
        }
        OutputFormat::Json => println!("{}", format_json(&outcome, hashes.as_deref())?),
        OutputFormat::Csv => print!("{}", format_csv(&outcome, hashes.as_deref())?),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Pure formatting functions (parse outcome → String)
// ---------------------------------------------------------------------------

pub fn format_table(outcome: &ParseOutcome, hashes: Option<&[String]>) -> String {
    let mut table = Table::new();
    let mut header = vec!["Date", "Description", "Amount"];
    if hashes.is_some() {
        header.push("Key");
    }
    table.set_header(header);

    for (i, txn) in outcome.rows.iter().enumerate() {
        let shown = amount(txn.amount);
        let amount_cell = if txn.amount < 0.0 {
            Cell::new(shown.red())
        } else {
            Cell::new(shown)
        };
        let mut row = vec![
            Cell::new(&txn.date),
            Cell::new(&txn.description),
            amount_cell.set_alignment(CellAlignment::Right),
        ];
        if let Some(hash) = hashes.and_then(|h| h.get(i)) {
            row.push(Cell::new(short_hash(hash)));
        }
        table.add_row(row);
    }
    table.to_string()
}

pub fn format_stats(stats: &ParseStats) -> String {
    let line = format!("{}/{} rows kept", stats.kept, stats.total);
    if stats.kept == stats.total {
        line.green().to_string()
    } else {
        format!("{line} ({} dropped)", stats.total - stats.kept)
    }
}

/// Nudge the user when nothing survived: the usual cause is an unrecognised
/// header or an amount column in an unexpected format.
pub fn empty_hint(stats: &ParseStats) -> Option<String> {
    if stats.total == 0 || stats.kept > 0 {
        return None;
    }
    Some(
        "No rows kept. Check that the header names a description column \
         (description, memo, text, payee, merchant, narrative, beskrivning) and an \
         amount column (amount, debit, credit, belopp), and that amounts look like \
         numbers such as -45.67 or 1 234,50."
            .to_string(),
    )
}

pub fn format_json(outcome: &ParseOutcome, hashes: Option<&[String]>) -> Result<String> {
    let rows = outcome
        .rows
        .iter()
        .enumerate()
        .map(|(i, transaction)| PreviewRow {
            transaction,
            hash: hashes.and_then(|h| h.get(i)).map(String::as_str),
        })
        .collect();
    let preview = Preview {
        rows,
        stats: outcome.stats,
    };
    Ok(serde_json::to_string_pretty(&preview)?)
}

pub fn format_csv(outcome: &ParseOutcome, hashes: Option<&[String]>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["date", "description", "amount"];
    if hashes.is_some() {
        header.push("hash");
    }
    wtr.write_record(&header)?;

    for (i, txn) in outcome.rows.iter().enumerate() {
        let amount = txn.amount.to_string();
        let mut record = vec![txn.date.as_str(), txn.description.as_str(), amount.as_str()];
        if let Some(hash) = hashes.and_then(|h| h.get(i)) {
            record.push(hash);
        }
        wtr.write_record(&record)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| IngestError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
