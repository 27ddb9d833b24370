use crate::error::{ErrorKind, Result};
use darkroom_storage::Transfer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROMPT: &str = "{main}, {date:YYYY/MM}, {type}";
const DEFAULT_THUMBNAIL_SIZE: (u32, u32) = (200, 200);
const DEFAULT_EXTENSIONS: [&str; 7] = [".jpg", ".jpeg", ".png", ".heic", ".raw", ".cr2", ".nef"];
const DEFAULT_WATCH_INTERVAL_MS: u64 = 2000;

/// What to do with `%name`, `%tags` and `%camera` in a custom format when the
/// file has no such metadata.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderPolicy {
    /// Leave the placeholder text in the folder name.
    #[default]
    Keep,
    /// Remove the placeholder.
    Drop,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Folders whose contents get organized (scanned at startup, then watched).
    pub source_dirs: Vec<PathBuf>,
    /// Root of the organized gallery; what `{main}` resolves to.
    pub destination_dir: Option<PathBuf>,
    /// Informational only; the prompt decides the layout.
    pub organize_by_date: bool,
    /// Informational only; the prompt decides the layout.
    pub organize_by_type: bool,
    pub create_thumbnails: bool,
    /// Bounding box `(width, height)` thumbnails are shrunk into.
    pub thumbnail_size: (u32, u32),
    /// Accepted extensions, with or without the leading dot, any case.
    pub file_extensions: BTreeSet<String>,
    pub backup_enabled: bool,
    pub backup_location: Option<PathBuf>,
    pub organization_prompt: String,
    /// Replaces the format of every `{custom}` token when set.
    pub custom_prompt: Option<String>,
    pub transfer: Transfer,
    pub placeholders: PlaceholderPolicy,
    /// How often the polling watcher looks at the source folders.
    pub watch_interval_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            source_dirs: Vec::new(),
            destination_dir: None,
            organize_by_date: true,
            organize_by_type: true,
            create_thumbnails: true,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            file_extensions: DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect(),
            backup_enabled: false,
            backup_location: None,
            organization_prompt: DEFAULT_PROMPT.to_string(),
            custom_prompt: None,
            transfer: Transfer::default(),
            placeholders: PlaceholderPolicy::default(),
            watch_interval_ms: DEFAULT_WATCH_INTERVAL_MS,
        }
    }
}

impl GalleryConfig {
    pub fn new(destination_dir: impl Into<PathBuf>) -> Self {
        Self { destination_dir: Some(destination_dir.into()), ..Self::default() }
    }

    /// Checks the invariants a run depends on.
    ///
    /// # Errors
    ///
    /// The first problem found, in field order.
    pub fn validate(&self) -> Result<()> {
        if self.destination().is_none() {
            exn::bail!(ErrorKind::MissingDestination);
        }
        if self.backup_enabled && self.backup().is_none() {
            exn::bail!(ErrorKind::MissingBackupLocation);
        }
        let (width, height) = self.thumbnail_size;
        if self.create_thumbnails && (width == 0 || height == 0) {
            exn::bail!(ErrorKind::InvalidThumbnailSize { width, height });
        }
        if let Some(missing) = self.source_dirs.iter().find(|dir| !dir.is_dir()) {
            exn::bail!(ErrorKind::MissingSourceDirectory(missing.clone()));
        }
        Ok(())
    }

    /// The destination directory, if one is set and non-empty.
    pub fn destination(&self) -> Option<&Path> {
        non_empty(self.destination_dir.as_deref())
    }

    /// The backup location, only when backups are switched on.
    pub fn backup(&self) -> Option<&Path> {
        match self.backup_enabled {
            true => non_empty(self.backup_location.as_deref()),
            false => None,
        }
    }

    /// Whether `path` has one of the accepted extensions. Case is ignored.
    pub fn accepts(&self, path: impl AsRef<Path>) -> bool {
        let Some(extension) = path.as_ref().extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.file_extensions
            .iter()
            .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(extension))
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}
