use crate::organize::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Thumbnails live in this folder next to the image they belong to, under the
/// same file name.
pub const THUMBNAIL_DIR: &str = "thumbnails";
const JPEG_QUALITY: u8 = 85;

/// Writes a thumbnail of `image` that fits inside `size`, keeping the aspect
/// ratio. Images that already fit are written at their own size.
pub(crate) async fn create(image: &Path, size: (u32, u32)) -> Result<PathBuf> {
    let target = thumbnail_path(image)?;
    let (source, output) = (image.to_path_buf(), target.clone());
    tokio::task::spawn_blocking(move || render(&source, &output, size))
        .await
        .or_raise(|| ErrorKind::Thumbnail("thumbnail task did not finish".to_string()))??;
    Ok(target)
}

fn thumbnail_path(image: &Path) -> Result<PathBuf> {
    let invalid = || ErrorKind::Thumbnail(format!("no file name in {}", image.display()));
    let name = image.file_name().ok_or_raise(invalid)?;
    let parent = image.parent().ok_or_raise(invalid)?;
    Ok(parent.join(THUMBNAIL_DIR).join(name))
}

fn render(source: &Path, target: &Path, (width, height): (u32, u32)) -> Result<()> {
    let failed = |what: &str, path: &Path| ErrorKind::Thumbnail(format!("{what} {}", path.display()));
    let reader = ImageReader::open(source)
        .and_then(ImageReader::with_guessed_format)
        .or_raise(|| failed("cannot open", source))?;
    let format = reader.format();
    let image = reader.decode().or_raise(|| failed("cannot decode", source))?;
    let image = match image.width() > width || image.height() > height {
        true => image.thumbnail(width, height),
        false => image,
    };

    if let Some(dir) = target.parent() {
        fs::create_dir_all(dir).or_raise(|| failed("cannot create", dir))?;
    }
    match format {
        Some(ImageFormat::Jpeg) => write_jpeg(&image, target).or_raise(|| failed("cannot write", target)),
        Some(format) => image.save_with_format(target, format).or_raise(|| failed("cannot write", target)),
        None => image.save(target).or_raise(|| failed("cannot write", target)),
    }
}

fn write_jpeg(image: &DynamicImage, target: &Path) -> image::ImageResult<()> {
    let writer = BufWriter::new(File::create(target)?);
    JpegEncoder::new_with_quality(writer, JPEG_QUALITY).encode_image(&image.to_rgb8())
}
