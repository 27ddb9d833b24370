//! Capture metadata from the embedded EXIF table.

use crate::consts::{CAMERA_MODEL_TAG, CAPTURE_DATE_FORMAT, CAPTURE_DATE_TAG, PIXEL_DIMENSION_TAGS};
use crate::models::{Dimensions, Warning};
use exif::{Exif, Field, In, Reader, Value};
use std::io::{BufRead, Seek};
use time::PrimitiveDateTime;

/// The parts of the EXIF table that path resolution cares about.
#[derive(Debug, Default)]
pub(crate) struct Capture {
    pub timestamp: Option<PrimitiveDateTime>,
    pub camera_model: Option<String>,
    /// Only consulted for formats the decoder cannot size.
    pub dimensions: Option<Dimensions>,
    pub warnings: Vec<Warning>,
}
impl Capture {
    /// Reads capture metadata from any container [`exif`] understands (JPEG,
    /// TIFF, PNG, WebP, HEIF).
    ///
    /// Files without an EXIF table, or with one too broken to parse, simply
    /// have no capture metadata.
    pub fn read<R: BufRead + Seek>(reader: &mut R) -> Self {
        match Reader::new().read_from_container(reader) {
            Ok(exif) => Self::from_exif(&exif),
            Err(exif::Error::NotFound(_)) => Self::default(),
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring unreadable EXIF table");
                Self::default()
            },
        }
    }

    fn from_exif(exif: &Exif) -> Self {
        let mut capture = Self::default();
        if let Some(value) = exif.get_field(CAPTURE_DATE_TAG, In::PRIMARY).and_then(ascii) {
            match parse_capture_date(&value) {
                Ok(timestamp) => capture.timestamp = Some(timestamp),
                Err(warning) => {
                    tracing::warn!(%warning, "Leaving capture date empty");
                    capture.warnings.push(warning);
                },
            }
        }
        capture.camera_model = exif.get_field(CAMERA_MODEL_TAG, In::PRIMARY).and_then(ascii);
        let (width, height) = PIXEL_DIMENSION_TAGS;
        let uint = |tag| exif.get_field(tag, In::PRIMARY).and_then(|field| field.value.get_uint(0));
        if let (Some(width), Some(height)) = (uint(width), uint(height)) {
            capture.dimensions = Some(Dimensions { width, height });
        }
        capture
    }
}

/// First ASCII string of a field, if the field holds text at all.
fn ascii(field: &Field) -> Option<String> {
    match &field.value {
        Value::Ascii(strings) => strings.first().map(|s| String::from_utf8_lossy(s).into_owned()),
        _ => None,
    }
}

/// Parses an EXIF date in its fixed `YYYY:MM:DD HH:MM:SS` layout.
pub(crate) fn parse_capture_date(value: &str) -> Result<PrimitiveDateTime, Warning> {
    PrimitiveDateTime::parse(value, CAPTURE_DATE_FORMAT).map_err(|_| Warning::DateParse { value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;
    use time::macros::datetime;

    #[rstest]
    #[case("2023:06:15 10:00:00", datetime!(2023-06-15 10:00:00))]
    #[case("1999:12:31 23:59:59", datetime!(1999-12-31 23:59:59))]
    #[case("2024:02:29 00:00:01", datetime!(2024-02-29 00:00:01))]
    fn test_parses_capture_date(#[case] value: &str, #[case] expected: PrimitiveDateTime) {
        assert_eq!(parse_capture_date(value).unwrap(), expected);
    }

    #[rstest]
    #[case("2023-06-15 10:00:00")]
    #[case("2023:13:01 10:00:00")]
    #[case("0000:00:00 00:00:00")]
    #[case("2023:06:15")]
    #[case("")]
    fn test_rejects_malformed_capture_date(#[case] value: &str) {
        assert_eq!(parse_capture_date(value), Err(Warning::DateParse { value: value.to_string() }));
    }

    #[test]
    fn test_no_exif_means_no_capture() {
        let mut reader = Cursor::new(b"definitely not an image".to_vec());
        let capture = Capture::read(&mut reader);
        assert!(capture.timestamp.is_none());
        assert!(capture.camera_model.is_none());
        assert!(capture.warnings.is_empty());
    }
}
