pub mod amount;
pub mod cli;
pub mod error;
pub mod fingerprint;
pub mod fmt;
pub mod importer;
pub mod models;
pub mod settings;
pub mod tokenizer;

pub use amount::{normalize_amount, normalize_amount_str, Cell};
pub use error::{IngestError, Result};
pub use importer::{parse, parse_with};
pub use models::{ParseOutcome, ParseStats, RawRecord, Transaction};
pub use tokenizer::{CsvTokenizer, Delimiter, Tokenizer};
