use crate::core::models::FormatMetadata;
use crate::error::InputError;
use regex::Regex;
use std::sync::LazyLock;

/// Marker that opens the optional header line
pub const META_MARKER: &str = "#META";

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("integer pattern is valid"));

/// Parse free-form numeric text with an optional `#META` header line.
///
/// Every integer substring in the body is collected in order and must lie in
/// 0..=255. Separators are irrelevant: whitespace, commas, brackets and any
/// other non-digit text simply split the numbers.
///
/// # Returns
/// * `(numbers, None)` - plain input, to be read in legacy mode
/// * `(numbers, Some(meta))` - input carried a header line
pub fn parse_number_array(text: &str) -> Result<(Vec<u8>, Option<FormatMetadata>), InputError> {
    let cleaned = text.trim();
    if cleaned.is_empty() {
        return Err(InputError::Empty);
    }

    let (first_line, rest) = cleaned.split_once('\n').unwrap_or((cleaned, ""));
    let first_line = first_line.trim();

    let (meta, body) = match first_line.strip_prefix(META_MARKER) {
        Some(header) => (Some(parse_meta_header(header)?), rest),
        None => (None, cleaned),
    };

    let numbers = INTEGER
        .find_iter(body)
        .map(|m| to_byte(m.as_str()))
        .collect::<Result<Vec<u8>, _>>()?;

    if numbers.is_empty() {
        return Err(InputError::NoNumbers);
    }

    Ok((numbers, meta))
}

/// Parse a simple list such as `[1, 2, 3]` or `1 2 3`.
///
/// Unlike [`parse_number_array`], every token must be an integer and no header
/// line is recognised.
pub fn parse_plain_list(text: &str) -> Result<Vec<u8>, InputError> {
    let mut cleaned = text.trim();
    if let Some(inner) = cleaned.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        cleaned = inner.trim();
    }
    if cleaned.is_empty() {
        return Err(InputError::Empty);
    }

    let numbers = cleaned
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            if INTEGER.find(token).is_some_and(|m| m.len() == token.len()) {
                to_byte(token)
            } else {
                Err(InputError::InvalidToken { token: token.to_string() })
            }
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if numbers.is_empty() {
        return Err(InputError::NoNumbers);
    }

    Ok(numbers)
}

/// Render bytes as space-separated decimal text.
pub fn format_numbers(numbers: &[u8]) -> String {
    let mut out = String::with_capacity(numbers.len() * 4);
    for (i, n) in numbers.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&n.to_string());
    }
    out
}

/// Header tokens after the marker: `key=value` separated by whitespace
fn parse_meta_header(header: &str) -> Result<FormatMetadata, InputError> {
    let mut meta = FormatMetadata::default();

    for token in header.split_whitespace() {
        let (key, value) = token.split_once('=').ok_or_else(|| InputError::InvalidMetaValue {
            key: token.to_string(),
            value: String::new(),
        })?;
        meta.set(key, value)?;
    }

    Ok(meta)
}

fn to_byte(digits: &str) -> Result<u8, InputError> {
    // Anything that overflows i64 is out of range as well
    digits
        .parse::<i64>()
        .ok()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| InputError::OutOfRange { value: digits.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{PcmFormat, SampleMode};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    // ── parse_number_array ────────────────────────────────────────────────────

    #[test]
    fn parses_mixed_separators() {
        let (numbers, meta) = parse_number_array("128 128, 128\n255;0\t64 [192]").unwrap();
        assert_eq!(numbers, vec![128, 128, 128, 255, 0, 64, 192]);
        assert_eq!(meta, None);
    }

    #[test]
    fn parses_meta_header() {
        let text = "#META mode=bytes sample_rate=8000 channels=2 sample_width=1\n1 2 3 4";
        let (numbers, meta) = parse_number_array(text).unwrap();

        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(meta, Some(FormatMetadata::raw_bytes(PcmFormat::new(8_000, 2, 1))));
    }

    #[test]
    fn header_numbers_are_not_part_of_the_body() {
        let (numbers, meta) = parse_number_array("  #META sample_rate=22050 \n 7").unwrap();
        assert_eq!(numbers, vec![7]);
        let meta = meta.unwrap();
        assert_eq!(meta.sample_rate, Some(22_050));
        assert_eq!(meta.mode, None);
    }

    #[test]
    fn header_only_has_no_numbers() {
        assert_eq!(
            parse_number_array("#META mode=bytes"),
            Err(InputError::NoNumbers)
        );
    }

    #[test]
    fn header_with_legacy_mode() {
        let (_, meta) = parse_number_array("#META mode=legacy\n1").unwrap();
        assert_eq!(meta.unwrap().mode, Some(SampleMode::Legacy));
    }

    #[test]
    fn header_rejects_unknown_key_and_bare_token() {
        assert_eq!(
            parse_number_array("#META rate=8000\n1"),
            Err(InputError::UnknownMetaKey { key: "rate".into() })
        );
        assert!(matches!(
            parse_number_array("#META bytes\n1"),
            Err(InputError::InvalidMetaValue { .. })
        ));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_number_array(""), Err(InputError::Empty));
        assert_eq!(parse_number_array("  \n\t "), Err(InputError::Empty));
    }

    #[test]
    fn text_without_numbers_is_rejected() {
        assert_eq!(parse_number_array("hello, world"), Err(InputError::NoNumbers));
    }

    #[test]
    fn out_of_range_values_are_named() {
        assert_eq!(
            parse_number_array("1 2 300"),
            Err(InputError::OutOfRange { value: "300".into() })
        );
        assert_eq!(
            parse_number_array("5 -1"),
            Err(InputError::OutOfRange { value: "-1".into() })
        );
        assert_eq!(
            parse_number_array("99999999999999999999999"),
            Err(InputError::OutOfRange { value: "99999999999999999999999".into() })
        );
    }

    // ── parse_plain_list ──────────────────────────────────────────────────────

    #[test]
    fn plain_list_accepts_brackets_and_commas() {
        assert_eq!(parse_plain_list("[1, 2,3]").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_plain_list("4 5\n6,,7").unwrap(), vec![4, 5, 6, 7]);
    }

    #[test]
    fn plain_list_rejects_non_integer_tokens() {
        assert_eq!(
            parse_plain_list("1, two, 3"),
            Err(InputError::InvalidToken { token: "two".into() })
        );
        assert!(matches!(
            parse_plain_list("#META mode=bytes\n1"),
            Err(InputError::InvalidToken { .. })
        ));
    }

    #[test]
    fn plain_list_rejects_empty_and_out_of_range() {
        assert_eq!(parse_plain_list("[ ]"), Err(InputError::Empty));
        assert_eq!(parse_plain_list(" , "), Err(InputError::NoNumbers));
        assert_eq!(
            parse_plain_list("[256]"),
            Err(InputError::OutOfRange { value: "256".into() })
        );
    }

    // ── format_numbers ────────────────────────────────────────────────────────

    #[test]
    fn format_numbers_is_space_separated() {
        assert_eq!(format_numbers(&[0, 12, 255]), "0 12 255");
        assert_eq!(format_numbers(&[]), "");
    }

    proptest! {
        #[test]
        fn formatted_numbers_parse_back(numbers in prop::collection::vec(any::<u8>(), 1..200)) {
            let (parsed, meta) = parse_number_array(&format_numbers(&numbers)).unwrap();
            prop_assert_eq!(parsed, numbers.clone());
            prop_assert_eq!(meta, None);
            prop_assert_eq!(parse_plain_list(&format_numbers(&numbers)).unwrap(), numbers);
        }
    }
}
