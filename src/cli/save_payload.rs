use chrono::NaiveDate;
use serde::Deserialize;

use crate::cli::read_input;
use crate::error::{IngestError, Result};
use crate::models::{Classified, ClassifyResponse, SaveExpensesRequest};

/// The classifier answers with `{"results": [...]}`; a bare array is accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifierOutput {
    Wrapped(ClassifyResponse),
    Bare(Vec<Classified>),
}

pub fn run(file: &str) -> Result<()> {
    let input = read_input(file)?;
    let request = build_save_request(&input)?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

pub fn build_save_request(input: &[u8]) -> Result<SaveExpensesRequest> {
    let results = match serde_json::from_slice(input)? {
        ClassifierOutput::Wrapped(response) => response.results,
        ClassifierOutput::Bare(rows) => rows,
    };
    for (index, row) in results.iter().enumerate() {
        validate(row).map_err(|reason| IngestError::InvalidRow { index, reason })?;
    }
    Ok(SaveExpensesRequest { expenses: results })
}

/// The expenses endpoint only stores ISO dates and real amounts.
fn validate(row: &Classified) -> std::result::Result<(), String> {
    let txn = &row.transaction;
    if NaiveDate::parse_from_str(&txn.date, "%Y-%m-%d").is_err() {
        return Err(format!("date {:?} is not YYYY-MM-DD", txn.date));
    }
    if !txn.amount.is_finite() {
        return Err(format!("amount {} is not a finite number", txn.amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_response() {
        let input = br#"{"results":[
            {"date":"2025-06-01","description":"ICA","amount":-45.67,"category":null,"category_id":3,"confidence":null}
        ]}"#;
        let request = build_save_request(input).unwrap();
        assert_eq!(request.expenses.len(), 1);
        assert_eq!(request.expenses[0].category_id, Some(3));
        assert_eq!(request.expenses[0].transaction.description, "ICA");
    }

    #[test]
    fn test_bare_array() {
        let input = br#"[{"date":"2025-06-01","description":"Uber","amount":-120,"category":"transportation","confidence":0.92}]"#;
        let request = build_save_request(input).unwrap();
        assert_eq!(request.expenses[0].category.as_deref(), Some("transportation"));
        assert_eq!(request.expenses[0].confidence, Some(0.92));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["expenses"][0]["amount"], -120.0);
        assert_eq!(json["expenses"][0]["date"], "2025-06-01");
    }

    #[test]
    fn test_rejects_non_iso_date() {
        let input = br#"{"results":[
            {"date":"2025-06-01","description":"A","amount":1},
            {"date":"","description":"B","amount":2}
        ]}"#;
        let err = build_save_request(input).unwrap_err();
        assert!(matches!(err, IngestError::InvalidRow { index: 1, .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(build_save_request(b"{results"), Err(IngestError::Json(_))));
    }
}
