//! Sorts media files into a gallery folder tree described by a prompt.
//!
//! Two lanes feed the same organizer: [`scan`](scan::scan) walks the source
//! folders once, and [`watch`](watch::watch) handles files as they are
//! announced. Both share one [`Context`].

pub mod error;
mod context;
pub mod organize;
pub mod scan;
pub mod template;
pub mod watch;

pub use crate::context::Context;
pub use crate::organize::{Outcome, Plan, organize_file, plan};
pub use crate::template::{Prompt, Resolver, Token};
