//! Local filesystem trees and source folder listing.
//!
//! All I/O goes through `tokio::fs`. A [`Tree`] only accepts paths relative to
//! its root and validates them before touching the disk.

use crate::error::{ErrorKind, Result};
use crate::models::{FileEntry, Transfer};
use crate::path::validate as validate_path;
use async_stream::stream;
use exn::ResultExt;
use futures::Stream;
use std::fs::{FileTimes, create_dir_all as sync_create_dir};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::fs::{self, DirEntry};
use tokio::io::AsyncWriteExt;
use tracing::instrument;

/// Stream of files found in a source folder.
pub type FileStream<'a> = Pin<Box<dyn Stream<Item = Result<FileEntry>> + Send + 'a>>;

/// A directory on the local filesystem that files are organized into.
///
/// Used for both the gallery destination and its backup mirror.
///
/// # Examples
///
/// ```no_run
/// use darkroom_storage::Tree;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let gallery = Tree::new("/srv/photos/gallery")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: PathBuf,
}
impl Tree {
    /// Opens the tree rooted at `root`, creating the directory if it does not
    /// exist yet.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::InvalidPath`] if `root` is relative, or exists but is not a
    /// directory. Creation failures map through the usual I/O kinds.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Only happens once when a run starts, no need for async.
            sync_create_dir(&root).map_err(|e| ErrorKind::from_io(e, &root))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates `relative` and joins it onto the root.
    pub fn absolute_path(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        Ok(self.root.join(validate_path(relative)?))
    }

    /// Converts an absolute path inside the tree back to a relative one.
    ///
    /// The root itself maps to an empty path. Anything that is outside the
    /// root, or that climbs out of it with `..`, is rejected.
    pub fn relative_path(&self, absolute: impl AsRef<Path>) -> Result<PathBuf> {
        let absolute = absolute.as_ref();
        let relative =
            absolute.strip_prefix(&self.root).or_raise(|| ErrorKind::InvalidPath(absolute.to_path_buf()))?;
        if relative.as_os_str().is_empty() {
            return Ok(PathBuf::new());
        }
        validate_path(relative)
    }

    /// Creates the directory at `relative` (and any missing parents).
    ///
    /// Safe to call for a directory that already exists, including when
    /// another task creates it at the same moment. An empty path means the
    /// root itself.
    pub async fn ensure_dir(&self, relative: impl AsRef<Path>) -> Result<PathBuf> {
        let relative = relative.as_ref();
        let dir = match relative.as_os_str().is_empty() {
            true => self.root.clone(),
            false => self.absolute_path(relative)?,
        };
        fs::create_dir_all(&dir).await.map_err(|e| ErrorKind::from_io(e, &dir))?;
        Ok(dir)
    }

    /// Brings `source` into the tree at `relative`, never replacing a file
    /// that is already there.
    ///
    /// Claiming the target is atomic, so two imports racing for the same name
    /// cannot both succeed. A move links the source into place and then
    /// unlinks it; where hard links are unavailable (another filesystem, or
    /// one without link support) it copies into a freshly created file and
    /// deletes the source.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::AlreadyExists`] if the target is taken, otherwise the
    /// I/O kind of whichever step failed. The source is intact on error.
    #[instrument(level = "debug", skip_all, fields(source = %source.display(), ?transfer, target))]
    pub async fn import(&self, source: &Path, relative: &Path, transfer: Transfer) -> Result<PathBuf> {
        let target = self.absolute_path(relative)?;
        tracing::Span::current().record("target", tracing::field::display(target.display()));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        match transfer {
            Transfer::Copy => copy_exclusive(source, &target).await?,
            Transfer::Move => move_file(source, &target).await?,
        }
        Ok(target)
    }

    /// Copies `source` to `relative`, overwriting whatever is there and
    /// keeping the source's access and modification times.
    #[instrument(level = "debug", skip_all, fields(source = %source.display(), relative = %relative.display()))]
    pub async fn mirror(&self, source: &Path, relative: &Path) -> Result<PathBuf> {
        let target = self.absolute_path(relative)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(|e| ErrorKind::from_io(e, parent))?;
        }
        copy_preserving(source, &target).await?;
        Ok(target)
    }
}

async fn move_file(from: &Path, to: &Path) -> Result<()> {
    match fs::hard_link(from, to).await {
        Ok(()) => {},
        Err(e) if e.kind() == IoErrorKind::AlreadyExists => exn::bail!(ErrorKind::AlreadyExists(to.to_path_buf())),
        Err(e) if e.kind() == IoErrorKind::NotFound => exn::bail!(ErrorKind::NotFound(from.to_path_buf())),
        Err(e) => {
            tracing::debug!(from = %from.display(), to = %to.display(), error = %e, "Cannot link, copying instead");
            copy_exclusive(from, to).await?;
        },
    }
    if let Err(e) = fs::remove_file(from).await {
        // Leave exactly one copy behind.
        let _ = fs::remove_file(to).await;
        exn::bail!(ErrorKind::from_io(e, from));
    }
    Ok(())
}

/// Copies into a file that must not exist yet. A partial copy is removed
/// again; the target was ours to remove since we created it.
async fn copy_exclusive(from: &Path, to: &Path) -> Result<()> {
    let mut reader = fs::File::open(from).await.map_err(|e| ErrorKind::from_io(e, from))?;
    let mut writer =
        fs::OpenOptions::new().write(true).create_new(true).open(to).await.map_err(|e| ErrorKind::from_io(e, to))?;
    let copied = async {
        tokio::io::copy(&mut reader, &mut writer).await?;
        writer.flush().await?;
        writer.sync_all().await
    };
    if let Err(e) = copied.await {
        drop(writer);
        let _ = fs::remove_file(to).await;
        exn::bail!(ErrorKind::from_io(e, to));
    }
    drop(writer);
    preserve_metadata(from, to).await
}

async fn copy_preserving(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).await.map_err(|e| ErrorKind::from_io(e, from))?;
    preserve_metadata(from, to).await
}

/// Carries permissions, access and modification times over from `from`.
async fn preserve_metadata(from: &Path, to: &Path) -> Result<()> {
    let metadata = fs::metadata(from).await.map_err(|e| ErrorKind::from_io(e, from))?;
    let mut times = FileTimes::new();
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    let file = fs::OpenOptions::new().write(true).open(to).await.map_err(|e| ErrorKind::from_io(e, to))?;
    let file = file.into_std().await;
    file.set_times(times).map_err(|e| ErrorKind::from_io(e, to))?;
    // Last, so a read-only source does not lock us out of the times.
    fs::set_permissions(to, metadata.permissions()).await.map_err(|e| ErrorKind::from_io(e, to))?;
    Ok(())
}

/// Reads size and modification time of the file at `path`.
pub async fn stat(path: impl AsRef<Path>) -> Result<FileEntry> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).await.map_err(|e| ErrorKind::from_io(e, path))?;
    if !metadata.is_file() {
        exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
    }
    Ok(FileEntry::new(path.to_path_buf(), &metadata).map_err(ErrorKind::Io)?)
}

/// Lists the regular files directly inside `dir`, in the order the
/// filesystem returns them. Subdirectories are not descended into.
///
/// A folder that cannot be opened yields a single error. Entries that vanish
/// between listing and inspection are skipped silently.
pub fn list_files(dir: &Path) -> FileStream<'_> {
    Box::pin(stream! {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(err) => {
                yield Err(exn::Exn::from(ErrorKind::from_io(err, dir)));
                return;
            },
        };
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(err) => {
                    yield Err(exn::Exn::from(ErrorKind::from_io(err, dir)));
                    break;
                },
            };
            match inspect(entry).await {
                Ok(Some(file)) => yield Ok(file),
                Ok(None) => {},
                Err(e) => yield Err(e),
            }
        }
    })
}

/// Follows symlinks, so a link to a photo counts as a photo.
async fn inspect(entry: DirEntry) -> Result<Option<FileEntry>> {
    let path = entry.path();
    let metadata = match fs::metadata(&path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == IoErrorKind::NotFound => return Ok(None),
        Err(e) => exn::bail!(ErrorKind::from_io(e, &path)),
    };
    if !metadata.is_file() {
        return Ok(None);
    }
    Ok(Some(FileEntry::new(path, &metadata).map_err(ErrorKind::Io)?))
}
