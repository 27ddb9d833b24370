use crate::organize::error::Error;
use darkroom_extract::models::{MediaMetadata, Warning as ExtractWarning};
use derive_more::Display;
use std::fmt;
use std::path::PathBuf;

/// The result of organizing one file.
#[derive(Debug)]
pub enum Outcome {
    /// The extension is not in the accepted set; the file was not opened.
    Skipped { extension: Option<String> },
    Succeeded(Box<Organized>),
    Failed(Error),
}

/// Where a file ended up, and what went wrong along the way without stopping
/// it getting there.
#[derive(Debug)]
pub struct Organized {
    pub source: PathBuf,
    pub path: PathBuf,
    pub metadata: MediaMetadata,
    pub thumbnail: Option<PathBuf>,
    pub backup: Option<PathBuf>,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Display)]
pub enum Warning {
    #[display("{_0}")]
    Extract(ExtractWarning),
    #[display("{}", **_0)]
    Thumbnail(Error),
    #[display("{}", **_0)]
    Backup(Error),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    #[display("skipped")]
    Skipped,
    #[display("organized")]
    Succeeded,
    #[display("failed")]
    Failed,
}

impl Outcome {
    pub fn status(&self) -> Status {
        match self {
            Self::Skipped { .. } => Status::Skipped,
            Self::Succeeded(_) => Status::Succeeded,
            Self::Failed(_) => Status::Failed,
        }
    }

    /// The final path, if the file was organized.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Succeeded(organized) => Some(&organized.path),
            _ => None,
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        match self {
            Self::Succeeded(organized) => &organized.warnings,
            _ => &[],
        }
    }
}

impl fmt::Display for Outcome {
    /// One line for a human: `organized -> /gallery/2023/06/jpeg/IMG_0042.jpg`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped { extension: Some(extension) } => write!(f, "skipped (.{extension} not accepted)"),
            Self::Skipped { extension: None } => f.write_str("skipped (no extension)"),
            Self::Succeeded(organized) => {
                write!(f, "organized -> {}", organized.path.display())?;
                match organized.warnings.len() {
                    0 => Ok(()),
                    1 => f.write_str(" (1 warning)"),
                    n => write!(f, " ({n} warnings)"),
                }
            },
            Self::Failed(error) => write!(f, "failed: {}", **error),
        }
    }
}
