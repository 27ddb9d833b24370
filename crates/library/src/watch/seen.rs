use darkroom_storage::stat;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use time::OffsetDateTime;

/// Files already handed to the organizer, keyed by absolute path and
/// modification time.
///
/// Shared by the scan and watch lanes of one run so a file present at startup
/// and also announced by the watcher is organized once. A file replaced under
/// the same name gets a new modification time and counts as new. Once a file
/// has been moved out of its folder its entries are dropped again, so a long
/// run only remembers files still sitting in the source folders.
#[derive(Debug, Default)]
pub struct Seen {
    entries: Mutex<HashSet<(PathBuf, OffsetDateTime)>>,
}

impl Seen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the file, returning `false` if it was already recorded.
    pub fn insert(&self, path: impl AsRef<Path>, modified: OffsetDateTime) -> bool {
        let path = path.as_ref();
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).insert((path, modified))
    }

    /// Looks the file up on disk and records it.
    ///
    /// A file that can no longer be read (typically because the other lane
    /// already moved it) is never "first time": there is nothing left to
    /// organize.
    pub async fn first_time(&self, path: impl AsRef<Path>) -> bool {
        match stat(path.as_ref()).await {
            Ok(entry) => self.insert(entry.path, entry.modified),
            Err(e) => {
                tracing::debug!(path = %path.as_ref().display(), error = %*e, "File vanished before it was organized");
                false
            },
        }
    }

    /// Drops every entry for `path` if the file is gone.
    ///
    /// Safe to call as soon as a file is organized: a path that cannot be
    /// read is never [`first_time`](Self::first_time) anyway.
    pub async fn forget_if_gone(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if stat(path).await.is_ok() {
            return;
        }
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).retain(|(known, _)| *known != path);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, FileTimes};
    use std::time::{Duration, SystemTime};
    use time::macros::datetime;

    #[test]
    fn test_insert_keys_on_path_and_time() {
        let seen = Seen::new();
        assert!(seen.insert("/in/a.jpg", datetime!(2024-01-01 0:00 UTC)));
        assert!(!seen.insert("/in/a.jpg", datetime!(2024-01-01 0:00 UTC)));
        assert!(seen.insert("/in/a.jpg", datetime!(2024-01-02 0:00 UTC)));
        assert!(seen.insert("/in/b.jpg", datetime!(2024-01-01 0:00 UTC)));
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn test_first_time_reads_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        fs::write(&path, b"x").unwrap();
        let seen = Seen::new();

        assert!(seen.first_time(&path).await);
        assert!(!seen.first_time(&path).await);

        // Same name, newer file.
        let later = SystemTime::now() + Duration::from_secs(60);
        fs::File::options().write(true).open(&path).unwrap().set_times(FileTimes::new().set_modified(later)).unwrap();
        assert!(seen.first_time(&path).await);
    }

    #[tokio::test]
    async fn test_moved_files_are_forgotten() {
        let dir = tempfile::tempdir().unwrap();
        let (kept, moved) = (dir.path().join("kept.jpg"), dir.path().join("moved.jpg"));
        fs::write(&kept, b"x").unwrap();
        fs::write(&moved, b"y").unwrap();
        let seen = Seen::new();
        assert!(seen.first_time(&kept).await);
        assert!(seen.first_time(&moved).await);

        fs::rename(&moved, dir.path().join("elsewhere.jpg")).unwrap();
        seen.forget_if_gone(&kept).await;
        seen.forget_if_gone(&moved).await;
        assert_eq!(seen.len(), 1);
        assert!(!seen.first_time(&kept).await);
        assert!(!seen.first_time(&moved).await);
    }

    #[tokio::test]
    async fn test_many_moved_files_leave_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let seen = Seen::new();
        for i in 0..500 {
            let path = dir.path().join(format!("IMG_{i:04}.jpg"));
            fs::write(&path, b"x").unwrap();
            assert!(seen.first_time(&path).await);
            fs::remove_file(&path).unwrap();
            seen.forget_if_gone(&path).await;
        }
        assert!(seen.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_never_first() {
        let dir = tempfile::tempdir().unwrap();
        let seen = Seen::new();
        assert!(!seen.first_time(dir.path().join("gone.jpg")).await);
        assert!(seen.is_empty());
    }
}
