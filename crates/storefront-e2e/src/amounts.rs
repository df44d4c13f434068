// Numeric extraction from rendered cart text
//
// Prices render as "$1,281.50", "$10", "Total $30"; quantities as "4".

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+\.?\d*").expect("amount pattern is valid"));

/// Extracts the first numeric token from `text`.
///
/// Thousands separators are stripped before parsing. Returns `Ok(None)` when the
/// text holds no numeric token at all, and `Error::Parse` when the token is not a
/// number once separators are gone (a lone `","` for instance).
pub fn extract_amount(text: &str) -> Result<Option<f64>> {
    let Some(token) = AMOUNT.find(text) else {
        return Ok(None);
    };

    let digits = token.as_str().replace(',', "");
    digits.parse::<f64>().map(Some).map_err(|_| Error::Parse {
        what: "price",
        text: text.to_string(),
    })
}

/// Parses a displayed quantity.
///
/// Blank text counts as zero. Otherwise the leading integer is used and anything
/// after it is ignored ("4 items" is 4).
pub fn parse_quantity(text: &str) -> Result<i64> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }

    let sign_len = usize::from(text.starts_with(['-', '+']));
    let digit_len = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();

    text[..sign_len + digit_len]
        .parse::<i64>()
        .map_err(|_| Error::Parse {
            what: "quantity",
            text: text.to_string(),
        })
}

/// Returns true when `text` looks like a price line (carries a currency marker).
pub fn is_price_line(text: &str) -> bool {
    text.contains('$')
}
