use std::io::{self, Write};

use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::models::Transaction;

// Field order is the sorted key order.
#[derive(Serialize)]
struct CacheKey<'a> {
    amount: f64,
    date: &'a str,
    description: &'a str,
}

struct AsciiFormatter;

impl Formatter for AsciiFormatter {
    fn write_f64<W>(&mut self, writer: &mut W, value: f64) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(float_repr(value).as_bytes())
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        for c in fragment.chars() {
            if c.is_ascii() && c != '\x7f' {
                writer.write_all(&[c as u8])?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}

/// Shortest round-trip digits, fixed notation for exponents in `-4..16`,
/// otherwise `d.ddde+XX`.
fn float_repr(value: f64) -> String {
    let sci = format!("{value:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(m) => ("-", m),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let int_len = exp as usize + 1;
            if digits.len() <= int_len {
                let pad = "0".repeat(int_len - digits.len());
                format!("{sign}{digits}{pad}.0")
            } else {
                format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
            }
        } else {
            let pad = "0".repeat((-exp - 1) as usize);
            format!("{sign}0.{pad}{digits}")
        }
    } else {
        let exp_sign = if exp < 0 { '-' } else { '+' };
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits
        };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exp.abs())
    }
}

pub fn canonical_json(txn: &Transaction) -> Result<String> {
    let key = CacheKey {
        amount: txn.amount,
        date: &txn.date,
        description: &txn.description,
    };
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, AsciiFormatter);
    key.serialize(&mut ser)?;
    // Formatter output is pure ASCII.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Classification cache key: lowercase hex SHA-256 of the transaction dumped
/// as JSON with sorted keys, compact separators, ASCII-only escapes and floats
/// written the way Python's `repr` writes them. Matching the service's bytes
/// lets a preview show which rows it has already seen.
pub fn fingerprint(txn: &Transaction) -> Result<String> {
    let json = canonical_json(txn)?;
    Ok(hex::encode(Sha256::digest(json.as_bytes())))
}
