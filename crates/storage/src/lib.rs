//! Filesystem primitives for the gallery.
//!
//! A [`Tree`] is a directory root (the gallery destination, or its backup
//! mirror) that only ever hands out paths inside itself. Source folders are
//! not trees: they are read with [`list_files`] and [`stat`], and files leave
//! them through [`Tree::import`].

pub mod error;
mod local;
mod models;
mod path;

pub use crate::local::{FileStream, Tree, list_files, stat};
pub use crate::models::{FileEntry, Transfer};
pub use crate::path::validate as validate_path;
