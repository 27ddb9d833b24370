//! The per-file organize transaction.
//!
//! [`organize_file`] runs the steps for one source file: extension filter,
//! metadata extraction, path resolution, directory creation, relocation, then
//! the optional thumbnail and backup. It never returns an error; every file
//! ends in exactly one [`Outcome`], which is also handed to the context's
//! [`ReportSink`].
//!
//! Steps up to and including relocation are all-or-nothing for the file.
//! Thumbnail and backup failures happen after the file is already in place,
//! so they are attached to the success as [`Warning`]s instead.

pub mod error;
mod file;
mod outcome;
mod report;
mod thumbnail;

pub use self::file::{Plan, organize_file, plan};
pub use self::outcome::{Organized, Outcome, Status, Warning};
pub use self::report::{MemorySink, Report, ReportSink, TracingSink};
pub use self::thumbnail::THUMBNAIL_DIR;
