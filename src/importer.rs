use tracing::{debug, trace};

use crate::amount::{normalize_amount, Cell};
use crate::error::Result;
use crate::models::{ParseOutcome, ParseStats, RawRecord, Transaction};
use crate::tokenizer::{CsvTokenizer, Tokenizer};

// ---------------------------------------------------------------------------
// Header aliases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Description,
    Amount,
}

/// Header names accepted for each canonical field, highest priority first.
/// Matching is against trimmed, lower-cased headers.
pub const HEADER_ALIASES: &[(&str, Field)] = &[
    ("date", Field::Date),
    ("transaction date", Field::Date),
    ("booking date", Field::Date),
    ("timestamp", Field::Date),
    ("datum", Field::Date),
    ("description", Field::Description),
    ("memo", Field::Description),
    ("text", Field::Description),
    ("payee", Field::Description),
    ("merchant", Field::Description),
    ("narrative", Field::Description),
    ("beskrivning", Field::Description),
    ("amount", Field::Amount),
    ("amount (sek)", Field::Amount),
    ("debit", Field::Amount),
    ("credit", Field::Amount),
    ("belopp", Field::Amount),
    ("belopp (sek)", Field::Amount),
];

impl Field {
    pub fn aliases(self) -> impl Iterator<Item = &'static str> {
        HEADER_ALIASES
            .iter()
            .filter(move |(_, field)| *field == self)
            .map(|(alias, _)| *alias)
    }

    /// The cell under the first alias present in `record`. A present but empty
    /// cell still wins over later aliases.
    pub fn resolve(self, record: &RawRecord) -> Option<&str> {
        self.aliases().find_map(|alias| record.get(alias))
    }
}

// ---------------------------------------------------------------------------
// Row mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    MissingDescription,
    UnusableAmount,
}

/// Map one raw record onto a transaction, or say why it was dropped.
pub fn map_record(record: &RawRecord) -> std::result::Result<Transaction, DropReason> {
    let date = Field::Date.resolve(record).unwrap_or_default().trim();
    let description = Field::Description.resolve(record).unwrap_or_default().trim();
    let amount = normalize_amount(Field::Amount.resolve(record).map(Cell::Text));

    if description.is_empty() {
        return Err(DropReason::MissingDescription);
    }
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return Err(DropReason::UnusableAmount);
    };

    Ok(Transaction {
        date: date.to_string(),
        description: description.to_string(),
        amount,
    })
}

/// Map and filter already tokenized records, keeping input order.
pub fn map_records(records: &[RawRecord]) -> ParseOutcome {
    let mut rows = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match map_record(record) {
            Ok(txn) => rows.push(txn),
            Err(reason) => trace!(index, ?reason, "dropping row"),
        }
    }

    let stats = ParseStats {
        total: records.len(),
        kept: rows.len(),
    };
    debug!(total = stats.total, kept = stats.kept, "parsed statement");
    ParseOutcome { rows, stats }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse delimited text with the default tokenizer.
pub fn parse(text: &str) -> Result<ParseOutcome> {
    parse_with(&CsvTokenizer::default(), text.as_bytes())
}

/// Parse raw input through any tokenizer. Only a tokenizer failure is an
/// error; bad rows are dropped and show up in the stats.
pub fn parse_with<T: Tokenizer + ?Sized>(tokenizer: &T, input: &[u8]) -> Result<ParseOutcome> {
    let records = tokenizer.records(input)?;
    Ok(map_records(&records))
}
