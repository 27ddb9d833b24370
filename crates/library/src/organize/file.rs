use crate::Context;
use crate::organize::error::{ErrorKind, Result};
use crate::organize::outcome::{Organized, Outcome, Warning};
use crate::organize::thumbnail;
use darkroom_extract::Extraction;
use darkroom_extract::error::ErrorKind as ExtractErrorKind;
use darkroom_extract::models::{MediaMetadata, Warning as ExtractWarning};
use darkroom_storage::Tree;
use exn::{OptionExt, ResultExt};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Where a file would go, worked out without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub source: PathBuf,
    pub metadata: MediaMetadata,
    /// Destination directory relative to the gallery root (empty for the root
    /// itself).
    pub directory: PathBuf,
    /// Absolute path the file would be relocated to.
    pub target: PathBuf,
    pub warnings: Vec<ExtractWarning>,
}

/// Organizes the file at `source` and reports the outcome to the context's
/// sink.
///
/// Never fails: see the [module documentation](crate::organize).
#[instrument(skip_all, fields(source = %source.as_ref().display()))]
pub async fn organize_file(ctx: &Context, source: impl AsRef<Path>) -> Outcome {
    let source = source.as_ref();
    let outcome = organize(ctx, source).await;
    ctx.sink().report(source, &outcome);
    outcome
}

/// Extracts and resolves `source` the way [`organize_file`] would, without
/// creating, moving or writing anything. The extension filter is not applied.
///
/// # Errors
///
/// [`ErrorKind::Extraction`] if the file is not a readable image, or
/// [`ErrorKind::Directory`] if the resolved directory would escape the
/// gallery.
#[instrument(skip_all, fields(source = %source.as_ref().display()))]
pub async fn plan(ctx: &Context, source: impl AsRef<Path>) -> Result<Plan> {
    let source = source.as_ref().to_path_buf();
    let owned = source.clone();
    let Extraction { metadata, warnings } = tokio::task::spawn_blocking(move || Extraction::from_path(owned))
        .await
        .or_raise(|| ErrorKind::Extraction(ExtractErrorKind::UnreadableMedia(source.clone())))?
        .map_err(ErrorKind::extraction)?;

    let resolved = ctx.resolver().resolve(ctx.prompt().tokens(), &metadata);
    // Prompts without `{main}` resolve relative to the gallery, not the
    // working directory.
    let anchored = match resolved.is_absolute() {
        true => resolved,
        false => ctx.gallery().root().join(resolved),
    };
    let directory = ctx.gallery().relative_path(&anchored).map_err(|e| ErrorKind::storage(e, ErrorKind::Directory))?;
    let name = source
        .file_name()
        .ok_or_raise(|| ErrorKind::Relocation(format!("no file name in {}", source.display())))?;
    let target = ctx.gallery().root().join(&directory).join(name);
    Ok(Plan { source, metadata, directory, target, warnings })
}

async fn organize(ctx: &Context, source: &Path) -> Outcome {
    let config = ctx.config();
    if !config.accepts(source) {
        let extension = source.extension().map(|e| e.to_string_lossy().into_owned());
        return Outcome::Skipped { extension };
    }

    let plan = match plan(ctx, source).await {
        Ok(plan) => plan,
        Err(e) => return Outcome::Failed(e),
    };
    let path = match relocate(ctx.gallery(), &plan, config.transfer).await {
        Ok(path) => path,
        Err(e) => return Outcome::Failed(e),
    };

    let mut warnings: Vec<Warning> = plan.warnings.into_iter().map(Warning::Extract).collect();
    let mut thumbnail_path = None;
    if config.create_thumbnails {
        match thumbnail::create(&path, config.thumbnail_size).await {
            Ok(created) => thumbnail_path = Some(created),
            Err(e) => warnings.push(Warning::Thumbnail(e)),
        }
    }
    let mut backup_path = None;
    if let Some(backup) = ctx.backup() {
        match mirror(ctx.gallery(), backup, &path).await {
            Ok(copied) => backup_path = Some(copied),
            Err(e) => warnings.push(Warning::Backup(e)),
        }
    }

    Outcome::Succeeded(Box::new(Organized {
        source: plan.source,
        path,
        metadata: plan.metadata,
        thumbnail: thumbnail_path,
        backup: backup_path,
        warnings,
    }))
}

async fn relocate(gallery: &Tree, plan: &Plan, transfer: darkroom_storage::Transfer) -> Result<PathBuf> {
    gallery.ensure_dir(&plan.directory).await.map_err(|e| ErrorKind::storage(e, ErrorKind::Directory))?;
    let relative = gallery.relative_path(&plan.target).map_err(|e| ErrorKind::storage(e, ErrorKind::Relocation))?;
    gallery
        .import(&plan.source, &relative, transfer)
        .await
        .map_err(|e| ErrorKind::storage(e, ErrorKind::Relocation))
}

/// Copies the organized file to the same relative place under the backup root.
async fn mirror(gallery: &Tree, backup: &Tree, organized: &Path) -> Result<PathBuf> {
    let relative = gallery.relative_path(organized).map_err(|e| ErrorKind::storage(e, ErrorKind::Backup))?;
    backup.mirror(organized, &relative).await.map_err(|e| ErrorKind::storage(e, ErrorKind::Backup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organize::{MemorySink, Status, THUMBNAIL_DIR};
    use darkroom_config::{GalleryConfig, Transfer};
    use image::RgbImage;
    use std::fs;
    use std::ops::Deref;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        sink: Arc<MemorySink>,
    }
    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::create_dir(dir.path().join("inbox")).unwrap();
            Self { dir, sink: Arc::new(MemorySink::new()) }
        }

        fn gallery(&self) -> PathBuf {
            self.dir.path().join("gallery")
        }

        fn config(&self) -> GalleryConfig {
            GalleryConfig { organization_prompt: "{main}, {date}, {type}".into(), ..GalleryConfig::new(self.gallery()) }
        }

        fn context(&self, config: GalleryConfig) -> Context {
            Context::new(config).unwrap().with_sink(self.sink.clone())
        }

        fn image(&self, name: &str, (width, height): (u32, u32)) -> PathBuf {
            let path = self.dir.path().join("inbox").join(name);
            RgbImage::new(width, height).save_with_format(&path, image::ImageFormat::Png).unwrap();
            path
        }

        fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
            let path = self.dir.path().join("inbox").join(name);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    #[tokio::test]
    async fn test_skips_unaccepted_extension() {
        let fx = Fixture::new();
        let ctx = fx.context(fx.config());
        // Not an image at all: a skip must not even try to read it.
        let source = fx.file("clip.MOV", b"not read");

        let outcome = organize_file(&ctx, &source).await;
        assert!(matches!(&outcome, Outcome::Skipped { extension: Some(e) } if e == "MOV"));
        assert!(source.exists());
        assert_eq!(fx.sink.reports()[0].status, Status::Skipped);
    }

    #[tokio::test]
    async fn test_moves_into_resolved_directory() {
        let fx = Fixture::new();
        let ctx = fx.context(GalleryConfig { create_thumbnails: false, ..fx.config() });
        let source = fx.image("IMG_0001.png", (8, 8));

        let outcome = organize_file(&ctx, &source).await;
        let expected = fx.gallery().join("unknown_date/png/IMG_0001.png");
        assert_eq!(outcome.path(), Some(&expected));
        assert!(expected.is_file());
        assert!(!source.exists());

        let reports = fx.sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, Status::Succeeded);
        assert_eq!(reports[0].line, format!("organized -> {}", expected.display()));
    }

    #[tokio::test]
    async fn test_copy_keeps_source() {
        let fx = Fixture::new();
        let ctx = fx.context(GalleryConfig { transfer: Transfer::Copy, create_thumbnails: false, ..fx.config() });
        let source = fx.image("IMG_0002.png", (8, 8));

        let outcome = organize_file(&ctx, &source).await;
        assert!(outcome.path().unwrap().is_file());
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_prompt_without_main_is_anchored() {
        let fx = Fixture::new();
        let config =
            GalleryConfig { organization_prompt: "{type}".into(), create_thumbnails: false, ..fx.config() };
        let ctx = fx.context(config);
        let source = fx.image("a.png", (4, 4));

        let outcome = organize_file(&ctx, &source).await;
        assert_eq!(outcome.path(), Some(&fx.gallery().join("png/a.png")));
    }

    #[tokio::test]
    async fn test_extraction_failure_leaves_file() {
        let fx = Fixture::new();
        let ctx = fx.context(fx.config());
        let source = fx.file("corrupt.jpg", b"definitely not a jpeg");

        let outcome = organize_file(&ctx, &source).await;
        let Outcome::Failed(error) = &outcome else { panic!("expected failure, got {outcome}") };
        assert!(matches!(error.deref(), ErrorKind::Extraction(ExtractErrorKind::UnreadableMedia(_))));
        assert!(source.exists());
        assert!(!fx.gallery().join("unknown_date").exists());
        assert_eq!(fx.sink.reports()[0].status, Status::Failed);
    }

    #[tokio::test]
    async fn test_collision_is_a_relocation_failure() {
        let fx = Fixture::new();
        let ctx = fx.context(GalleryConfig { create_thumbnails: false, ..fx.config() });
        let occupied = fx.gallery().join("unknown_date/png/dup.png");
        fs::create_dir_all(occupied.parent().unwrap()).unwrap();
        fs::write(&occupied, b"already here").unwrap();
        let source = fx.image("dup.png", (4, 4));

        let outcome = organize_file(&ctx, &source).await;
        let Outcome::Failed(error) = &outcome else { panic!("expected failure, got {outcome}") };
        assert!(matches!(error.deref(), ErrorKind::Relocation(_)));
        assert!(source.exists());
        assert_eq!(fs::read(&occupied).unwrap(), b"already here");
    }

    #[tokio::test]
    async fn test_creates_thumbnail() {
        let fx = Fixture::new();
        let ctx = fx.context(GalleryConfig { thumbnail_size: (16, 16), ..fx.config() });
        let source = fx.image("big.png", (64, 32));

        let Outcome::Succeeded(organized) = organize_file(&ctx, &source).await else { panic!("expected success") };
        let thumbnail = organized.thumbnail.unwrap();
        assert_eq!(thumbnail, fx.gallery().join("unknown_date/png").join(THUMBNAIL_DIR).join("big.png"));
        assert_eq!(image::image_dimensions(&thumbnail).unwrap(), (16, 8));
        assert!(organized.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_thumbnail_failure_is_only_a_warning() {
        let fx = Fixture::new();
        let ctx = fx.context(fx.config());
        let dir = fx.gallery().join("unknown_date/png");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(THUMBNAIL_DIR), b"a file where the folder should be").unwrap();
        let source = fx.image("photo.png", (32, 32));

        let outcome = organize_file(&ctx, &source).await;
        assert_eq!(outcome.status(), Status::Succeeded);
        assert!(dir.join("photo.png").is_file());
        assert!(matches!(outcome.warnings(), [Warning::Thumbnail(_)]));
        assert_eq!(fx.sink.reports()[0].warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_backs_up_relative_structure() {
        let fx = Fixture::new();
        let backup = fx.dir.path().join("backup");
        let config = GalleryConfig {
            backup_enabled: true,
            backup_location: Some(backup.clone()),
            create_thumbnails: false,
            ..fx.config()
        };
        let ctx = fx.context(config);
        let source = fx.image("keep.png", (4, 4));

        let Outcome::Succeeded(organized) = organize_file(&ctx, &source).await else { panic!("expected success") };
        let expected = backup.join("unknown_date/png/keep.png");
        assert_eq!(organized.backup.as_ref(), Some(&expected));
        assert_eq!(fs::read(&expected).unwrap(), fs::read(&organized.path).unwrap());
    }

    #[tokio::test]
    async fn test_backup_failure_is_only_a_warning() {
        let fx = Fixture::new();
        let backup = fx.dir.path().join("backup");
        let config = GalleryConfig {
            backup_enabled: true,
            backup_location: Some(backup.clone()),
            create_thumbnails: false,
            ..fx.config()
        };
        let ctx = fx.context(config);
        fs::write(backup.join("unknown_date"), b"blocks the mirror").unwrap();
        let source = fx.image("keep.png", (4, 4));

        let outcome = organize_file(&ctx, &source).await;
        assert_eq!(outcome.status(), Status::Succeeded);
        assert!(matches!(outcome.warnings(), [Warning::Backup(_)]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_files_share_a_directory() {
        let fx = Fixture::new();
        let ctx = fx.context(GalleryConfig { create_thumbnails: false, ..fx.config() });
        let a = fx.image("a.png", (4, 4));
        let b = fx.image("b.png", (4, 4));

        let (first, second) = tokio::join!(organize_file(&ctx, &a), organize_file(&ctx, &b));
        assert_eq!(first.status(), Status::Succeeded);
        assert_eq!(second.status(), Status::Succeeded);
        assert_eq!(fx.sink.reports().len(), 2);
    }

    #[tokio::test]
    async fn test_plan_touches_nothing() {
        let fx = Fixture::new();
        let ctx = fx.context(fx.config());
        let source = fx.image("IMG_0003.png", (4, 4));

        let plan = plan(&ctx, &source).await.unwrap();
        assert_eq!(plan.directory, Path::new("unknown_date/png"));
        assert_eq!(plan.target, fx.gallery().join("unknown_date/png/IMG_0003.png"));
        assert_eq!(plan.metadata.file_kind, "PNG");
        assert!(source.exists());
        assert!(!fx.gallery().join("unknown_date").exists());
        assert!(fx.sink.reports().is_empty());
    }

    #[tokio::test]
    async fn test_plan_rejects_escaping_directories() {
        let fx = Fixture::new();
        let config = GalleryConfig { organization_prompt: "{main}, {custom:../..}".into(), ..fx.config() };
        let ctx = fx.context(config);
        let source = fx.image("escape.png", (4, 4));

        let err = plan(&ctx, &source).await.unwrap_err();
        assert!(matches!(err.deref(), ErrorKind::Directory(_)));
    }
}
