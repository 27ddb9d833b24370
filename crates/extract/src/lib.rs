//! Metadata extraction for media files.
//!
//! Opens a file with the [`image`] decoder to learn its format and pixel
//! dimensions, then reads the embedded EXIF table (via [`exif`]) for the
//! capture date and camera model. The result is a [`MediaMetadata`] record,
//! or an [`Error`](error::Error) if the file is not a readable image.
//!
//! Extraction only ever reads; the file is closed again before returning.

mod consts;
pub mod error;
mod extract;
pub mod models;

pub use crate::extract::{Extraction, file_kind};
use crate::error::Result;
use crate::models::MediaMetadata;
use std::path::Path;

/// Easy, top-level entrypoint: extract a [`MediaMetadata`] record from the
/// file at `path`.
///
/// Warnings (such as an unparseable capture date) are logged and dropped; use
/// [`Extraction::from_path`] to keep them.
pub fn extract(path: impl AsRef<Path>) -> Result<MediaMetadata> {
    Ok(Extraction::from_path(path)?.metadata)
}
