mod dimensions;
mod metadata;
mod warning;

pub use self::dimensions::Dimensions;
pub use self::metadata::MediaMetadata;
pub use self::warning::Warning;
