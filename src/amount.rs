use std::sync::LazyLock;

use regex::Regex;

static CURRENCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i-u:sek|kr)|[$€£]").expect("currency pattern compiles"));

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("number pattern compiles")
});

/// A raw cell as handed over by a tokenizer or a caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

impl From<f64> for Cell<'_> {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl<'a> From<&'a str> for Cell<'a> {
    fn from(s: &'a str) -> Self {
        Cell::Text(s)
    }
}

/// Which character separates the integer part from the fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecimalMark {
    Comma,
    Dot,
}

impl DecimalMark {
    /// A comma is the decimal mark when no dot is present, or when every dot
    /// is a strict three-digit thousands group ahead of a single comma
    /// (`1.234,56`). In any other mix the dot wins, even if a comma sits to
    /// its right.
    pub fn detect(s: &str) -> Self {
        if !s.contains(',') {
            return Self::Dot;
        }
        if !s.contains('.') || has_dot_grouping(s) {
            Self::Comma
        } else {
            Self::Dot
        }
    }

    /// Rewrite `s` into dot-decimal form with no grouping separators.
    fn canonicalize(self, s: &str) -> String {
        match self {
            // Only the first comma becomes the decimal point; a second one
            // leaves the string unparseable.
            Self::Comma => s.replace('.', "").replacen(',', ".", 1),
            Self::Dot => s.replace(',', ""),
        }
    }
}

fn has_dot_grouping(s: &str) -> bool {
    let Some((head, tail)) = s.split_once(',') else {
        return false;
    };
    if tail.contains(',') || tail.contains('.') {
        return false;
    }
    let mut groups = head.split('.');
    let lead = groups.next().unwrap_or_default();
    let lead_digits = lead.trim_start_matches(['(', '+', '-']);
    if lead_digits.is_empty()
        || lead_digits.len() > 3
        || !lead_digits.bytes().all(|b| b.is_ascii_digit())
    {
        return false;
    }
    groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Normalize a raw cell into a signed amount.
///
/// Currency tokens and whitespace are dropped, the decimal mark is chosen from
/// the separators that remain, and accounting-style parentheses flip the sign.
///
/// Returns `None` for absent or empty cells and for anything that does not
/// reduce to a plain decimal literal. Never panics and never errors.
pub fn normalize_amount(value: Option<Cell<'_>>) -> Option<f64> {
    match value? {
        Cell::Number(n) if !n.is_nan() => Some(n),
        Cell::Number(_) => None,
        Cell::Text(s) => normalize_text(s),
    }
}

pub fn normalize_amount_str(raw: &str) -> Option<f64> {
    normalize_amount(Some(Cell::Text(raw)))
}

fn normalize_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim_matches(is_space);
    if trimmed.is_empty() {
        return None;
    }

    let without_currency = CURRENCY_RE.replace_all(trimmed, "");
    let compact: String = without_currency.chars().filter(|c| !is_space(*c)).collect();
    let canonical = DecimalMark::detect(&compact).canonicalize(&compact);

    let (digits, negative) = match canonical
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (canonical.as_str(), false),
    };

    if !NUMBER_RE.is_match(digits) {
        return None;
    }
    let value: f64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}
