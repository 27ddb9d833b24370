use super::Dimensions;
use time::PrimitiveDateTime;

/// Normalized description of a single media file, produced once per file by
/// [`extract`](crate::extract) and consumed by path resolution.
///
/// Optional fields are `None` when the file carries no such information; the
/// record itself is always complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaMetadata {
    /// EXIF `DateTimeOriginal`, if present and parseable. Camera clocks have
    /// no timezone, so neither does this.
    pub capture_timestamp: Option<PrimitiveDateTime>,
    /// EXIF `Model`, verbatim.
    pub camera_model: Option<String>,
    /// Decoder format name (`"JPEG"`, `"PNG"`, ...), or the uppercased file
    /// extension when the decoder's format has no known name.
    pub file_kind: String,
    /// Size on disk at extraction time.
    pub byte_size: u64,
    pub dimensions: Dimensions,
    /// Original filename without its extension.
    pub base_name: String,
    /// Free-form labels. Nothing populates these yet, but both the resolver
    /// and custom formats already understand them.
    pub tags: Vec<String>,
}
impl MediaMetadata {
    /// A record with every optional field empty.
    pub fn new(file_kind: impl Into<String>, base_name: impl Into<String>) -> Self {
        Self {
            capture_timestamp: None,
            camera_model: None,
            file_kind: file_kind.into(),
            byte_size: 0,
            dimensions: Dimensions::default(),
            base_name: base_name.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_capture_timestamp(mut self, timestamp: impl Into<Option<PrimitiveDateTime>>) -> Self {
        self.capture_timestamp = timestamp.into();
        self
    }

    pub fn with_camera_model(mut self, model: impl Into<String>) -> Self {
        self.camera_model = Some(model.into());
        self
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
