//! Gallery configuration.
//!
//! [`GalleryConfig`] is read-only for the rest of the workspace: it is loaded
//! and validated once, then borrowed by every organize call of a run.

pub mod error;
mod gallery;
mod load;

pub use crate::gallery::{DEFAULT_PROMPT, GalleryConfig, PlaceholderPolicy};
pub use crate::load::{APP_NAME, CONFIG_FILE, ENV_PREFIX, load};
pub use darkroom_storage::Transfer;
