//! Watch lane: organize files as they appear.
//!
//! Where the events come from is up to the caller. [`PollWatcher`] is a
//! portable source that needs nothing but directory listings.

mod poll;
mod seen;

pub use self::poll::PollWatcher;
pub use self::seen::Seen;
use crate::Context;
use crate::organize::{Outcome, organize_file};
use async_stream::stream;
use futures::Stream;
use std::path::PathBuf;

/// Organizes each created file in the order the events arrive, yielding its
/// outcome.
///
/// The stream ends when `events` does. With `seen`, files already recorded
/// (by this or the scan lane) are passed over without an outcome, and files
/// moved into the gallery are forgotten again.
pub fn watch<'a>(
    ctx: &'a Context,
    events: impl Stream<Item = PathBuf> + 'a,
    seen: Option<&'a Seen>,
) -> impl Stream<Item = (PathBuf, Outcome)> + 'a {
    stream! {
        for await path in events {
            if let Some(seen) = seen
                && !seen.first_time(&path).await
            {
                tracing::debug!(path = %path.display(), "Already handled, ignoring event");
                continue;
            }
            let outcome = organize_file(ctx, &path).await;
            if let Some(seen) = seen {
                seen.forget_if_gone(&path).await;
            }
            yield (path, outcome);
        }
    }
}
