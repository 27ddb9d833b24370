//! Image decoding and metadata assembly.

mod exif;
mod heif;

use self::exif::Capture;
use crate::consts::HEIF_KIND;
use crate::error::{ErrorKind, Result};
use crate::models::{Dimensions, MediaMetadata, Warning};
use exn::ResultExt;
use image::{ImageFormat, ImageReader};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::instrument;

/// A [`MediaMetadata`] record plus the non-fatal warnings raised while
/// building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub metadata: MediaMetadata,
    pub warnings: Vec<Warning>,
}
impl Extraction {
    /// Extracts metadata from the file at `path`.
    ///
    /// The decoder identifies the format from the file's leading bytes
    /// (falling back to its extension) and reads the pixel dimensions from the
    /// header only. Capture date and camera model come from the EXIF table
    /// when there is one. The size is taken from the filesystem.
    ///
    /// HEIF photos (`.heic`) cannot be decoded, so they are recognised by
    /// their container alone. Their dimensions come from the EXIF table, and
    /// are zero when it does not record them.
    ///
    /// # Errors
    /// - [`ErrorKind::Open`] if the file cannot be opened or read.
    /// - [`ErrorKind::UnreadableMedia`] if it is not an image the decoder
    ///   understands.
    /// - [`ErrorKind::Metadata`] if its size cannot be read.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open = || File::open(path).or_raise(|| ErrorKind::Open(path.to_path_buf()));
        let reader = ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .or_raise(|| ErrorKind::Open(path.to_path_buf()))?;
        let (file_kind, decoded) = match reader.format() {
            Some(format) => {
                let dimensions =
                    reader.into_dimensions().or_raise(|| ErrorKind::UnreadableMedia(path.to_path_buf()))?;
                (file_kind(format, path), Some(Dimensions::from(dimensions)))
            },
            None if heif::is_heif(open()?).or_raise(|| ErrorKind::Open(path.to_path_buf()))? => {
                (extension_kind(path).unwrap_or_else(|| HEIF_KIND.to_string()), None)
            },
            None => exn::bail!(ErrorKind::UnreadableMedia(path.to_path_buf())),
        };

        let Capture { timestamp, camera_model, dimensions, warnings } = Capture::read(&mut BufReader::new(open()?));
        let dimensions = decoded.or(dimensions).unwrap_or_default();

        let byte_size = fs::metadata(path).or_raise(|| ErrorKind::Metadata(path.to_path_buf()))?.len();
        let base_name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();

        tracing::debug!(%file_kind, %dimensions, byte_size, "Extracted media metadata");
        Ok(Self {
            metadata: MediaMetadata {
                capture_timestamp: timestamp,
                camera_model,
                file_kind,
                byte_size,
                dimensions,
                base_name,
                tags: Vec::new(),
            },
            warnings,
        })
    }
}

/// Short, uppercase name for a decoded format.
///
/// Formats without a well-known name fall back to the file's extension
/// (uppercased, without the dot), and only then to the decoder's own name.
pub fn file_kind(format: ImageFormat, path: &Path) -> String {
    match format_name(format) {
        Some(name) => name.to_string(),
        None => extension_kind(path).unwrap_or_else(|| format!("{format:?}").to_uppercase()),
    }
}

fn extension_kind(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy();
    (!ext.is_empty()).then(|| ext.to_uppercase())
}

fn format_name(format: ImageFormat) -> Option<&'static str> {
    Some(match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::Gif => "GIF",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Ico => "ICO",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Hdr => "HDR",
        ImageFormat::Pnm => "PPM",
        _ => return None,
    })
}
