//! The organization prompt language.
//!
//! A prompt is a comma-separated list of tokens, each naming one level of the
//! destination directory:
//!
//! | Segment            | Token                  | Contributes                                  |
//! |--------------------|------------------------|----------------------------------------------|
//! | `{main}`           | [`Token::MainFolder`]  | the gallery destination                      |
//! | `{date}`           | [`Token::Date`]        | capture date, `%Y/%m/%d` (or `unknown_date`) |
//! | `{date:<fmt>}`     | [`Token::Date`]        | capture date rendered with `<fmt>`           |
//! | `{type}`           | [`Token::Type`]        | lowercased file kind (`jpeg`, `png`, ...)    |
//! | `{tags}`           | [`Token::Tags`]        | tags, one directory level each               |
//! | `{camera}`         | [`Token::Camera`]      | camera model                                 |
//! | `{custom}`         | [`Token::Custom`]      | the configured custom format                 |
//! | `{custom:<fmt>}`   | [`Token::Custom`]      | `<fmt>` with `%name`, `%tags`, `%camera`     |
//!
//! Segments that match none of these are dropped. A typo costs one directory
//! level, not the whole prompt.
//!
//! # Example
//!
//! ```
//! use darkroom_library::template::{Prompt, Token};
//!
//! let prompt: Prompt = "{main}, {date:YYYY}, {bogus}, {camera}".parse().unwrap();
//! assert_eq!(
//!     prompt.tokens(),
//!     &[Token::MainFolder, Token::Date(Some("YYYY".into())), Token::Camera]
//! );
//! ```

mod date;
mod resolve;

pub use self::date::{DEFAULT_DATE_FORMAT, UNKNOWN_DATE, format_date};
pub use self::resolve::{Resolver, resolve};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// One parsed unit of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    MainFolder,
    /// Capture date; the format is kept verbatim and only interpreted when
    /// resolving.
    Date(Option<String>),
    Type,
    Tags,
    Camera,
    Custom(Option<String>),
}

impl Token {
    /// Matches a single trimmed segment against the token table.
    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "{main}" => Some(Self::MainFolder),
            "{date}" => Some(Self::Date(None)),
            "{type}" => Some(Self::Type),
            "{tags}" => Some(Self::Tags),
            "{camera}" => Some(Self::Camera),
            "{custom}" => Some(Self::Custom(None)),
            _ => {
                let (name, format) = segment.strip_prefix('{')?.strip_suffix('}')?.split_once(':')?;
                match name {
                    "date" => Some(Self::Date(Some(format.to_string()))),
                    "custom" => Some(Self::Custom(Some(format.to_string()))),
                    _ => None,
                }
            },
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainFolder => f.write_str("{main}"),
            Self::Date(None) => f.write_str("{date}"),
            Self::Date(Some(format)) => write!(f, "{{date:{format}}}"),
            Self::Type => f.write_str("{type}"),
            Self::Tags => f.write_str("{tags}"),
            Self::Camera => f.write_str("{camera}"),
            Self::Custom(None) => f.write_str("{custom}"),
            Self::Custom(Some(format)) => write!(f, "{{custom:{format}}}"),
        }
    }
}

/// Parses a prompt into its tokens, left to right. Never fails.
pub fn parse(prompt: &str) -> Vec<Token> {
    prompt.split(',').map(str::trim).filter_map(Token::from_segment).collect()
}

/// A parsed organization prompt.
///
/// Parsing is infallible, so `"...".parse::<Prompt>()` can be unwrapped, but
/// an empty token list is possible and resolves to the gallery root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prompt {
    tokens: Vec<Token>,
}
impl FromStr for Prompt {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self { tokens: parse(s) })
    }
}
impl Prompt {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Prompt {
    /// Canonical form: recognised tokens only, `", "` separated.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            token.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(format: &str) -> Token {
        Token::Date(Some(format.to_string()))
    }

    fn custom(format: &str) -> Token {
        Token::Custom(Some(format.to_string()))
    }

    #[rstest]
    #[case("{main}, {type}", vec![Token::MainFolder, Token::Type])]
    #[case("{date:YYYY}, {bogus}, {camera}", vec![date("YYYY"), Token::Camera])]
    #[case("{main}, {date:YYYY/MM}, {type}", vec![Token::MainFolder, date("YYYY/MM"), Token::Type])]
    #[case("{main},{date:%Y-%m-%d %H:%M},{tags}", vec![Token::MainFolder, date("%Y-%m-%d %H:%M"), Token::Tags])]
    #[case("  {camera}  ,\t{custom:event_%name} ", vec![Token::Camera, custom("event_%name")])]
    #[case("{date}, {custom}", vec![Token::Date(None), Token::Custom(None)])]
    #[case("{date:}", vec![date("")])]
    #[case("{type}, {type}", vec![Token::Type, Token::Type])]
    fn test_parses(#[case] prompt: &str, #[case] expected: Vec<Token>) {
        assert_eq!(parse(prompt), expected);
    }

    #[rstest]
    #[case("")]
    #[case(",,,")]
    #[case("main, type")]
    #[case("{MAIN}")]
    #[case("{ main }")]
    #[case("{date:YYYY")]
    #[case("date:YYYY}")]
    #[case("{year:YYYY}")]
    #[case("{main}{type}")]
    fn test_drops_unrecognised_segments(#[case] prompt: &str) {
        assert!(parse(prompt).is_empty());
    }

    #[test]
    fn test_custom_format_may_not_contain_commas() {
        // The comma splits first; neither half is a complete token.
        assert!(parse("{custom:a,b}").is_empty());
    }

    #[test]
    fn test_prompt_display_is_canonical() {
        let prompt: Prompt = " {main} ,{bogus},{date:%Y/%m},{custom}".parse().unwrap();
        assert_eq!(prompt.to_string(), "{main}, {date:%Y/%m}, {custom}");
        assert_eq!(prompt.to_string().parse::<Prompt>().unwrap(), prompt);
    }
}
