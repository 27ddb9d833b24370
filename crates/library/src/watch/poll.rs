use async_stream::stream;
use darkroom_config::GalleryConfig;
use darkroom_storage::list_files;
use futures::{Stream, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Announces files created in a set of folders by listing them on a timer.
///
/// Files present when the stream starts are the baseline and never announced;
/// the scan lane covers those. A new file is announced once its size has held
/// still across two polls, so copies still in progress are left alone.
/// Subfolders are not watched.
#[derive(Debug, Clone)]
pub struct PollWatcher {
    dirs: Vec<PathBuf>,
    interval: Duration,
}

impl PollWatcher {
    pub fn new(dirs: Vec<PathBuf>, interval: Duration) -> Self {
        Self { dirs, interval }
    }

    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::new(config.source_dirs.clone(), Duration::from_millis(config.watch_interval_ms.max(1)))
    }

    /// Never ends on its own; drop it to stop watching.
    pub fn stream(self) -> impl Stream<Item = PathBuf> + Send + 'static {
        stream! {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            let mut tracker = Tracker::default();
            tracker.baseline(snapshot(&self.dirs).await);
            tracing::debug!(dirs = self.dirs.len(), known = tracker.known.len(), "Watching source directories");

            loop {
                ticker.tick().await;
                for path in tracker.observe(snapshot(&self.dirs).await) {
                    yield path;
                }
            }
        }
    }
}

/// One listing of every watched folder.
#[derive(Debug, Default)]
struct Snapshot {
    /// Size of each regular file found.
    files: HashMap<PathBuf, u64>,
    /// Folders that could not be listed (completely) this round.
    unlisted: HashSet<PathBuf>,
}

async fn snapshot(dirs: &[PathBuf]) -> Snapshot {
    let mut snapshot = Snapshot::default();
    for dir in dirs {
        let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.clone());
        let mut listing = list_files(&dir);
        while let Some(entry) = listing.next().await {
            match entry {
                Ok(file) => {
                    snapshot.files.insert(file.path, file.size);
                },
                Err(e) => {
                    tracing::debug!(dir = %dir.display(), error = %*e, "Cannot list watched directory");
                    snapshot.unlisted.insert(dir.clone());
                    break;
                },
            }
        }
    }
    snapshot
}

/// Decides which files are new and settled, one snapshot at a time.
///
/// A folder that cannot be listed keeps what is known about it until it can
/// be listed again, so an unplugged card does not turn its files into new
/// ones when it comes back. A folder that could not be listed when watching
/// started has no baseline: its files are announced once it shows up.
#[derive(Debug, Default)]
struct Tracker {
    known: HashSet<PathBuf>,
    pending: HashMap<PathBuf, u64>,
}

impl Tracker {
    fn baseline(&mut self, snapshot: Snapshot) {
        self.known = snapshot.files.into_keys().collect();
    }

    /// Returns the files that settled since the last poll, sorted by path.
    fn observe(&mut self, snapshot: Snapshot) -> Vec<PathBuf> {
        let Snapshot { files, unlisted } = snapshot;
        let held = |path: &Path| path.parent().is_some_and(|dir| unlisted.contains(dir));
        // Forget files that went away, so one reappearing later is new again.
        self.known.retain(|path| files.contains_key(path) || held(path.as_path()));
        self.pending.retain(|path, _| files.contains_key(path) || held(path.as_path()));

        let mut settled = Vec::new();
        for (path, size) in files {
            if self.known.contains(&path) || held(path.as_path()) {
                continue;
            }
            match self.pending.insert(path.clone(), size) {
                Some(previous) if previous == size => {
                    self.pending.remove(&path);
                    self.known.insert(path.clone());
                    settled.push(path);
                },
                _ => {},
            }
        }
        settled.sort();
        settled
    }
}
