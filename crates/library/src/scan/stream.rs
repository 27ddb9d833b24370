use crate::Context;
use crate::error::{ErrorKind as LibraryErrorKind, Result as LibraryResult};
use crate::organize::{Outcome, Status, organize_file};
use crate::watch::Seen;
use async_stream::stream;
use darkroom_storage::list_files;
use futures::Stream;
use std::path::PathBuf;

/// Progress events emitted by [`scan`].
///
/// Events follow a strict ordering:
/// 1. [`Started`](Self::Started): exactly once.
/// 2. [`Organized`](Self::Organized): zero or more times, one per file.
/// 3. [`Complete`](Self::Complete): exactly once, signalling the stream is
///    finished.
///
/// A source folder that cannot be listed shows up as an `Err` item between
/// these; the scan carries on with the next folder.
#[derive(Debug)]
pub enum ScanEvent {
    Started { sources: usize },
    Organized { source: PathBuf, outcome: Outcome },
    Complete(Summary),
}

/// Outcome counts for a finished scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub organized: u64,
    pub skipped: u64,
    pub failed: u64,
    /// Files passed over because `seen` already had them.
    pub duplicates: u64,
}
impl Summary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome.status() {
            Status::Succeeded => self.organized += 1,
            Status::Skipped => self.skipped += 1,
            Status::Failed => self.failed += 1,
        }
    }
}

/// Organizes every regular file directly inside each configured source
/// folder, one at a time.
///
/// Each folder is listed completely before its first file is touched, then
/// files are processed in listing order. Subfolders are left alone,
/// including the `thumbnails` folder of a gallery that doubles as a source.
///
/// With `seen`, a file whose path and modification time were already recorded
/// (by this or the watch lane) is passed over.
pub fn scan<'a>(ctx: &'a Context, seen: Option<&'a Seen>) -> impl Stream<Item = LibraryResult<ScanEvent>> + 'a {
    stream! {
        let sources = &ctx.config().source_dirs;
        yield Ok(ScanEvent::Started { sources: sources.len() });
        let mut summary = Summary::default();

        for dir in sources {
            let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.clone());
            let mut files = Vec::new();
            for await entry in list_files(&dir) {
                match entry {
                    Ok(file) => files.push(file),
                    Err(e) => {
                        yield Err(e.raise(LibraryErrorKind::Scan(dir.clone())));
                    },
                }
            }
            tracing::debug!(dir = %dir.display(), files = files.len(), "Listed source directory");

            for file in files {
                if let Some(seen) = seen
                    && !seen.insert(&file.path, file.modified)
                {
                    summary.duplicates += 1;
                    continue;
                }
                let outcome = organize_file(ctx, &file.path).await;
                if let Some(seen) = seen {
                    seen.forget_if_gone(&file.path).await;
                }
                summary.record(&outcome);
                yield Ok(ScanEvent::Organized { source: file.path, outcome });
            }
        }

        tracing::info!(
            organized = summary.organized,
            skipped = summary.skipped,
            failed = summary.failed,
            "Startup scan complete"
        );
        yield Ok(ScanEvent::Complete(summary));
    }
}
