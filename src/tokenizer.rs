use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::RawRecord;

/// Turns raw input into header-keyed records. The first non-blank line is the
/// header; blank lines produce no record.
pub trait Tokenizer {
    fn records(&self, input: &[u8]) -> Result<Vec<RawRecord>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Auto,
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

const SNIFF_ORDER: [u8; 4] = [b',', b';', b'\t', b'|'];

impl Delimiter {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Comma => "comma",
            Self::Semicolon => "semicolon",
            Self::Tab => "tab",
            Self::Pipe => "pipe",
        }
    }

    /// The byte to split on. `Auto` looks at the header line.
    pub fn resolve(&self, input: &[u8]) -> u8 {
        match self {
            Self::Auto => sniff_delimiter(input),
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
            Self::Pipe => b'|',
        }
    }
}

/// A line made only of whitespace, quotes and candidate delimiters tokenizes
/// to a blank record under any of them, so it cannot be the header.
fn is_blank_line(line: &[u8]) -> bool {
    line.iter()
        .all(|b| b.is_ascii_whitespace() || *b == b'"' || SNIFF_ORDER.contains(b))
}

fn sniff_delimiter(input: &[u8]) -> u8 {
    let header = input
        .split(|b| *b == b'\n')
        .find(|line| !is_blank_line(line))
        .unwrap_or_default();

    let mut counts = [0usize; SNIFF_ORDER.len()];
    let mut quoted = false;
    for &b in header {
        if b == b'"' {
            quoted = !quoted;
            continue;
        }
        if quoted {
            continue;
        }
        if let Some(i) = SNIFF_ORDER.iter().position(|d| *d == b) {
            counts[i] += 1;
        }
    }

    let mut best = 0;
    for i in 1..SNIFF_ORDER.len() {
        if counts[i] > counts[best] {
            best = i;
        }
    }
    SNIFF_ORDER[best]
}

/// RFC 4180 tokenizer backed by the `csv` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvTokenizer {
    delimiter: Delimiter,
}

impl CsvTokenizer {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.iter().all(|cell| cell.trim().is_empty())
}

impl Tokenizer for CsvTokenizer {
    fn records(&self, input: &[u8]) -> Result<Vec<RawRecord>> {
        let delimiter = self.delimiter.resolve(input);
        debug!(delimiter = %(delimiter as char).escape_default(), "tokenizing input");

        let rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(input);

        let mut lines = rdr
            .into_records()
            .filter(|r| !matches!(r, Ok(record) if is_blank(record)));

        let Some(header) = lines.next() else {
            return Ok(Vec::new());
        };
        let names: Vec<String> = header?.iter().map(String::from).collect();

        let mut records = Vec::new();
        for line in lines {
            let line = line?;
            // Cells past the header are dropped; missing ones stay absent.
            records.push(names.iter().zip(line.iter()).collect());
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(text: &str) -> Vec<RawRecord> {
        CsvTokenizer::default().records(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_header_keys_are_normalized() {
        let records = tokenize(" Date ,DESCRIPTION,Amount\n2025-06-01,ICA,-1\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("date"), Some("2025-06-01"));
        assert_eq!(records[0].get("description"), Some("ICA"));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let text = "\n\n  \ndate,description,amount\n\n2025-06-01,A,1\n,,\n\n2025-06-02,B,2\n";
        let records = tokenize(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get("description"), Some("B"));
    }

    #[test]
    fn test_short_rows_leave_keys_absent() {
        let records = tokenize("date,description,amount\n2025-06-01,A\n");
        assert_eq!(records[0].get("description"), Some("A"));
        assert_eq!(records[0].get("amount"), None);
        assert_eq!(records[0].len(), 2);
    }

    #[test]
    fn test_extra_cells_are_ignored() {
        let records = tokenize("date,description\n2025-06-01,A,99,extra\n");
        assert_eq!(records[0].get("description"), Some("A"));
        assert_eq!(records[0].get("amount"), None);
    }

    #[test]
    fn test_quoted_cells() {
        let records = tokenize("description,amount\n\"Coffee, large\",\"1 234,50 kr\"\n");
        assert_eq!(records[0].get("description"), Some("Coffee, large"));
        assert_eq!(records[0].get("amount"), Some("1 234,50 kr"));
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("date,description,amount\n").is_empty());
    }

    #[test]
    fn test_sniffs_semicolon() {
        assert_eq!(Delimiter::Auto.resolve(b"Datum;Text;Belopp\n1;2;3"), b';');
        assert_eq!(Delimiter::Auto.resolve(b"a\tb\tc\n"), b'\t');
        assert_eq!(Delimiter::Auto.resolve(b"\"a;b\",c\n"), b',');
        assert_eq!(Delimiter::Auto.resolve(b"amount\n"), b',');
        let records = tokenize("Datum;Text;Belopp\n2025-06-01;ICA;-45,67\n");
        assert_eq!(records[0].get("belopp"), Some("-45,67"));
    }

    #[test]
    fn test_sniffing_skips_delimiter_only_lines() {
        let text = ",,\nDatum;Text;Belopp\n2025-06-01;ICA;5\n";
        assert_eq!(Delimiter::Auto.resolve(text.as_bytes()), b';');
        let records = tokenize(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("text"), Some("ICA"));
        assert_eq!(records[0].get("belopp"), Some("5"));

        let text = ";;\ndate,description,amount\n2025-06-01,A,1\n";
        assert_eq!(Delimiter::Auto.resolve(text.as_bytes()), b',');
        let records = tokenize(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("amount"), Some("1"));

        assert_eq!(Delimiter::Auto.resolve(b" \t ; \r\n\"\",\"\"\na|b|c\n"), b'|');
    }

    #[test]
    fn test_explicit_delimiter_overrides_sniffing() {
        let tokenizer = CsvTokenizer::new(Delimiter::Pipe);
        let records = tokenizer.records(b"a,b|c\n1,2|3\n").unwrap();
        assert_eq!(records[0].get("a,b"), Some("1,2"));
        assert_eq!(records[0].get("c"), Some("3"));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let input = b"date,description,amount\n2025-06-01,\xff\xfe,1\n";
        assert!(CsvTokenizer::default().records(input).is_err());
    }
}
