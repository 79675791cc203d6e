use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One canonical transaction as produced by the importer and sent to the
/// classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total: usize,
    pub kept: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseOutcome {
    pub rows: Vec<Transaction>,
    pub stats: ParseStats,
}

/// Header-keyed cells of a single data line. Keys are stored trimmed and
/// lower-cased, so lookups are case and whitespace insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: HashMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, header: &str, value: impl Into<String>) {
        self.fields.insert(normalize_header(header), value.into());
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(&normalize_header(header)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (header, value) in iter {
            record.insert(header.as_ref(), value);
        }
        record
    }
}

pub fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Classifier service payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub transactions: Vec<Transaction>,
    pub top_k: u32,
}

/// A transaction with the category the classifier picked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classified {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub results: Vec<Classified>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveExpensesRequest {
    pub expenses: Vec<Classified>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_header_lookup_is_normalized() {
        let record: RawRecord = [(" Transaction Date ", "2025-06-01")].into_iter().collect();
        assert_eq!(record.get("transaction date"), Some("2025-06-01"));
        assert_eq!(record.get("TRANSACTION DATE"), Some("2025-06-01"));
        assert_eq!(record.get("date"), None);
    }

    #[test]
    fn test_raw_record_strips_bom() {
        let mut record = RawRecord::new();
        record.insert("\u{feff}Date", "x");
        assert_eq!(record.get("date"), Some("x"));
    }

    #[test]
    fn test_classified_flattens_transaction() {
        let json = r#"{"date":"2025-06-01","description":"ICA","amount":-45.67,"category_id":4}"#;
        let c: Classified = serde_json::from_str(json).unwrap();
        assert_eq!(c.transaction.amount, -45.67);
        assert_eq!(c.category_id, Some(4));
        assert!(c.category.is_none());
        assert!(c.confidence.is_none());
    }
}
