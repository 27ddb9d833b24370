//! Startup scan: organize every file already sitting in the source folders.

mod stream;

pub use self::stream::{ScanEvent, Summary, scan};
