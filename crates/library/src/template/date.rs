//! Capture date rendering for `{date:...}` tokens.
//!
//! Two dialects are understood. A format containing `%` is a strftime
//! description (`%Y/%m`, `%Y-%m-%d %H`). Anything else uses the spelled-out
//! dialect of the default prompt, where `YYYY`, `YY`, `MM` and `DD` stand for
//! the year, two-digit year, month and day. Only whole words made of those
//! tokens are translated (`YYYYMMDD` is, `SUMMER_YYYY` keeps its `SUMMER`),
//! so folder names can carry literal text.

use time::PrimitiveDateTime;
use time::format_description::parse_strftime_borrowed;

pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d";
/// Folder name used when a file has no capture date.
pub const UNKNOWN_DATE: &str = "unknown_date";

const DIALECT: [(&str, &str); 4] = [("YYYY", "%Y"), ("YY", "%y"), ("MM", "%m"), ("DD", "%d")];

/// Renders `timestamp` with `format`, or [`DEFAULT_DATE_FORMAT`] when the
/// format is absent or empty.
///
/// Never fails: a format that cannot be parsed or rendered falls back to the
/// default and logs a warning.
pub fn format_date(timestamp: PrimitiveDateTime, format: Option<&str>) -> String {
    let strftime = match format {
        None | Some("") => return default_format(timestamp),
        Some(format) if format.contains('%') => format.to_string(),
        Some(format) => translate(format),
    };
    let rendered = parse_strftime_borrowed(&strftime)
        .map_err(|e| e.to_string())
        .and_then(|items| timestamp.format(&items).map_err(|e| e.to_string()));
    match rendered {
        Ok(rendered) => rendered,
        Err(error) => {
            tracing::warn!(format = %strftime, %error, "Unusable date format, using the default");
            default_format(timestamp)
        },
    }
}

fn translate(format: &str) -> String {
    let mut translated = String::with_capacity(format.len());
    let mut rest = format;
    while let Some(start) = rest.find(char::is_alphabetic) {
        translated.push_str(&rest[..start]);
        let word_len = rest[start..].find(|c: char| !c.is_alphabetic()).unwrap_or(rest.len() - start);
        let (word, tail) = rest[start..].split_at(word_len);
        match dialect_word(word) {
            Some(strftime) => translated.push_str(&strftime),
            None => translated.push_str(word),
        }
        rest = tail;
    }
    translated.push_str(rest);
    translated
}

/// Translates a word made up entirely of dialect tokens, or `None`.
fn dialect_word(mut word: &str) -> Option<String> {
    let mut strftime = String::new();
    while !word.is_empty() {
        let (token, item) = DIALECT.iter().find(|(token, _)| word.starts_with(token))?;
        strftime.push_str(item);
        word = &word[token.len()..];
    }
    Some(strftime)
}

fn default_format(timestamp: PrimitiveDateTime) -> String {
    format!("{:04}/{:02}/{:02}", timestamp.year(), u8::from(timestamp.month()), timestamp.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::datetime;

    #[rstest]
    #[case(None, "2023/06/15")]
    #[case(Some(""), "2023/06/15")]
    #[case(Some("%Y/%m"), "2023/06")]
    #[case(Some("%Y-%m-%d_%H%M"), "2023-06-15_1005")]
    #[case(Some("YYYY/MM"), "2023/06")]
    #[case(Some("YYYY"), "2023")]
    #[case(Some("YY-MM-DD"), "23-06-15")]
    #[case(Some("DD.MM.YYYY"), "15.06.2023")]
    #[case(Some("holiday"), "holiday")]
    #[case(Some("SUMMER_YYYY"), "SUMMER_2023")]
    #[case(Some("YYYYMMDD"), "20230615")]
    #[case(Some("DAYS/DD"), "DAYS/15")]
    #[case(Some("MMM YYYY"), "MMM 2023")]
    #[case(Some("Été-YYYY"), "Été-2023")]
    fn test_formats(#[case] format: Option<&str>, #[case] expected: &str) {
        assert_eq!(format_date(datetime!(2023-06-15 10:05:00), format), expected);
    }

    #[rstest]
    #[case("%Q")]
    #[case("%")]
    #[case("%Y/%z")]
    fn test_unusable_format_falls_back(#[case] format: &str) {
        assert_eq!(format_date(datetime!(2023-06-15 10:05:00), Some(format)), "2023/06/15");
    }

    #[test]
    fn test_default_pads() {
        assert_eq!(format_date(datetime!(0987-01-02 00:00:00), None), "0987/01/02");
    }
}
