//! Path validation for gallery trees.
//!
//! Resolved folder names come from image metadata (camera models, tags,
//! file names), so anything joined onto a tree root is checked first.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Normalizes a path relative to a tree root, refusing anything that would
/// step outside it.
///
/// `.` components and repeated separators disappear, `..` pops the previous
/// component, and a leading `/` is ignored. Null bytes are rejected because
/// the C-based syscalls truncate at them.
///
/// # Returns
/// The normalized relative path, or
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath) when it is empty,
/// escapes the root, or carries a platform prefix.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use darkroom_storage::validate_path;
/// assert!(validate_path("2023/06/JPEG/IMG_0042.jpg").is_ok());
/// assert!(validate_path("Canon/../IMG_0042.jpg").is_ok());
/// assert!(validate_path("../IMG_0042.jpg").is_err());
/// assert_eq!(
///     validate_path("./2023//06/./JPEG/").unwrap(),
///     Path::new("2023/06/JPEG")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let invalid = || ErrorKind::InvalidPath(original.to_path_buf());
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(s) if s.as_encoded_bytes().contains(&0) => exn::bail!(invalid()),
            Component::Normal(s) => components.push(s),
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(invalid()),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(invalid());
                }
            },
        }
    }
    if components.is_empty() {
        exn::bail!(invalid());
    }
    Ok(components.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("IMG_0042.jpg", "IMG_0042.jpg")]
    #[case("2023/06/JPEG/IMG_0042.jpg", "2023/06/JPEG/IMG_0042.jpg")]
    #[case("2023//06///JPEG", "2023/06/JPEG")]
    #[case("./2023/./06/", "2023/06")]
    #[case("/Vacation/beach.png", "Vacation/beach.png")]
    #[case("Canon/../unknown_date", "unknown_date")]
    fn test_normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate(input).unwrap(), Path::new(expected));
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("//")]
    #[case("..")]
    #[case("../IMG_0042.jpg")]
    #[case("2023/../../etc/passwd")]
    #[case("Canon\0EOS")]
    fn test_rejects(#[case] input: &str) {
        let err = validate(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidPath(p) if p == Path::new(input)));
    }
}
