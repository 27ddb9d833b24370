use crate::template::Token;
use crate::template::date::{UNKNOWN_DATE, format_date};
use darkroom_config::PlaceholderPolicy;
use darkroom_extract::models::MediaMetadata;
use std::path::{Path, PathBuf};
use tracing::instrument;

const NAME: &str = "%name";
const TAGS: &str = "%tags";
const CAMERA: &str = "%camera";

/// Turns token sequences into destination directories for one gallery.
///
/// Resolution is total: every token either contributes a path segment or
/// nothing, so the result may be just the base, or even empty when the prompt
/// has no `{main}` and nothing else applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    base: PathBuf,
    custom_format: Option<String>,
    placeholders: PlaceholderPolicy,
}

enum Segment<'a> {
    Base(&'a Path),
    Folders(String),
}

impl Resolver {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into(), custom_format: None, placeholders: PlaceholderPolicy::default() }
    }

    /// Format used for every `Custom` token in place of its own.
    pub fn with_custom_format(mut self, format: impl Into<Option<String>>) -> Self {
        self.custom_format = format.into();
        self
    }

    pub fn with_placeholders(mut self, policy: PlaceholderPolicy) -> Self {
        self.placeholders = policy;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Resolves `tokens` against `metadata`, in order.
    ///
    /// `MainFolder` contributes the base as a root, the way joining an absolute
    /// path does: whatever came before it is discarded. Every other segment is
    /// split on `/`, so date formats and tags nest, and no segment can turn
    /// the path absolute.
    #[instrument(level = "debug", skip_all, fields(base_name = %metadata.base_name), ret)]
    pub fn resolve(&self, tokens: &[Token], metadata: &MediaMetadata) -> PathBuf {
        let mut path = PathBuf::new();
        for token in tokens {
            match self.segment(token, metadata) {
                Some(Segment::Base(base)) => path.push(base),
                Some(Segment::Folders(folders)) => {
                    folders.split('/').filter(|f| !f.is_empty()).for_each(|folder| path.push(folder));
                },
                None => {},
            }
        }
        path
    }

    fn segment<'a>(&'a self, token: &Token, metadata: &MediaMetadata) -> Option<Segment<'a>> {
        let folders = match token {
            Token::MainFolder => return Some(Segment::Base(&self.base)),
            Token::Date(format) => match metadata.capture_timestamp {
                Some(timestamp) => format_date(timestamp, format.as_deref()),
                None => UNKNOWN_DATE.to_string(),
            },
            Token::Type => metadata.file_kind.to_lowercase(),
            Token::Tags => metadata.tags.join("/"),
            Token::Camera => metadata.camera_model.clone().unwrap_or_default(),
            Token::Custom(format) => match self.custom_format.as_deref().or(format.as_deref()) {
                Some(format) => substitute(format, metadata, self.placeholders),
                None => return None,
            },
        };
        (!folders.is_empty()).then_some(Segment::Folders(folders))
    }
}

/// Resolves with the default placeholder policy.
///
/// `custom_format`, when given, replaces the format of every `Custom` token.
pub fn resolve(tokens: &[Token], metadata: &MediaMetadata, base: &Path, custom_format: Option<&str>) -> PathBuf {
    Resolver::new(base).with_custom_format(custom_format.map(str::to_string)).resolve(tokens, metadata)
}

/// Replaces `%name`, then `%tags`, then `%camera`.
fn substitute(format: &str, metadata: &MediaMetadata, policy: PlaceholderPolicy) -> String {
    let tags = metadata.tags.join("_");
    let name = Some(metadata.base_name.as_str());
    let camera = metadata.camera_model.as_deref();
    [(NAME, name), (TAGS, Some(tags.as_str())), (CAMERA, camera)].into_iter().fold(
        format.to_string(),
        |acc, (placeholder, value)| match (value.filter(|v| !v.is_empty()), policy) {
            (Some(value), _) => acc.replace(placeholder, value),
            (None, PlaceholderPolicy::Keep) => acc,
            (None, PlaceholderPolicy::Drop) => acc.replace(placeholder, ""),
        },
    )
}
