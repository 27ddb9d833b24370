use derive_more::Display;

/// Non-fatal problems noticed during extraction.
///
/// A warning never prevents a [`MediaMetadata`](super::MediaMetadata) from
/// being produced; the affected field is simply left empty.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The embedded capture date did not match `YYYY:MM:DD HH:MM:SS`.
    #[display("could not parse capture date from EXIF: {value:?}")]
    DateParse { value: String },
}
