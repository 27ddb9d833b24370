use std::fs::Metadata;
use std::path::PathBuf;
use time::OffsetDateTime;

/// How a file gets from its source folder into the gallery.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Transfer {
    /// The source file is gone afterwards.
    #[default]
    Move,
    /// The source file is left untouched.
    Copy,
}

/// A regular file seen on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path, exactly as listed.
    pub path: PathBuf,
    pub size: u64,
    pub modified: OffsetDateTime,
}
impl FileEntry {
    pub(crate) fn new(path: PathBuf, metadata: &Metadata) -> std::io::Result<Self> {
        Ok(Self { path, size: metadata.len(), modified: metadata.modified()?.into() })
    }
}
