use exif::Tag;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// EXIF `DateTimeOriginal`, tag 36867 (`0x9003`) in the Exif IFD.
pub(crate) const CAPTURE_DATE_TAG: Tag = Tag::DateTimeOriginal;
/// EXIF `PixelXDimension` and `PixelYDimension`, the size of the
/// compressed image.
pub(crate) const PIXEL_DIMENSION_TAGS: (Tag, Tag) = (Tag::PixelXDimension, Tag::PixelYDimension);
/// EXIF `Model`, tag 272 (`0x0110`) in IFD0.
pub(crate) const CAMERA_MODEL_TAG: Tag = Tag::Model;

/// `YYYY:MM:DD HH:MM:SS`, the only layout EXIF allows for dates.
pub(crate) const CAPTURE_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]:[month]:[day] [hour]:[minute]:[second]");

/// Kind of a HEIF file that has no extension to name it by.
pub(crate) const HEIF_KIND: &str = "HEIF";
