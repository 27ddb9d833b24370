//! `darkroom`: sorts photos from watched folders into a gallery.

mod error;

use crate::error::{ErrorKind, Result};
use clap::{Parser, Subcommand};
use darkroom_library::organize::Status;
use darkroom_library::scan::{ScanEvent, scan};
use darkroom_library::watch::{PollWatcher, Seen, watch};
use darkroom_library::{Context, organize_file, plan};
use exn::ResultExt;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,darkroom=info,darkroom_library=info";

#[derive(Debug, Parser)]
#[command(name = "darkroom", version, about = "Sorts photos into a prompt-described gallery")]
struct Cli {
    /// Configuration file (TOML, YAML or JSON), layered over the user config
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log per-file decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Organize everything in the source folders, then keep watching them
    Run {
        /// Stop after the startup scan
        #[arg(long)]
        no_watch: bool,
    },
    /// Organize the given files
    Organize {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Show where files would go without moving them
    Preview {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Validate the configuration and print the parsed prompt
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

fn init_tracing(verbose: bool) {
    let filter = match verbose {
        true => EnvFilter::new("info,darkroom=debug,darkroom_library=debug"),
        false => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

async fn execute(cli: Cli) -> Result<()> {
    let config = darkroom_config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let ctx = Context::new(config).or_raise(|| ErrorKind::Gallery)?;

    match cli.command {
        Command::Run { no_watch } => run(&ctx, !no_watch).await,
        Command::Organize { files } => organize(&ctx, &files).await,
        Command::Preview { files } => {
            preview(&ctx, &files).await;
            Ok(())
        },
        Command::Check => {
            check(&ctx);
            Ok(())
        },
    }
}

fn check(ctx: &Context) {
    let config = ctx.config();
    println!("gallery:  {}", ctx.gallery().root().display());
    if let Some(backup) = ctx.backup() {
        println!("backup:   {}", backup.root().display());
    }
    for source in &config.source_dirs {
        println!("source:   {}", source.display());
    }
    println!("prompt:   {}", ctx.prompt());
    println!("transfer: {:?}", config.transfer);
}

/// Runs the startup scan and, unless disabled, the watch lane alongside it
/// until interrupted.
async fn run(ctx: &Context, watching: bool) -> Result<()> {
    let seen = Seen::new();
    let scan_lane = async {
        let mut events = std::pin::pin!(scan(ctx, Some(&seen)));
        while let Some(event) = events.next().await {
            match event {
                Ok(ScanEvent::Complete(summary)) => {
                    println!(
                        "scan complete: {} organized, {} skipped, {} failed",
                        summary.organized, summary.skipped, summary.failed
                    );
                },
                Ok(_) => {},
                Err(err) => tracing::error!(error = ?err, "Source directory skipped"),
            }
        }
    };

    if !watching {
        scan_lane.await;
        return Ok(());
    }

    let watch_lane = async {
        let events = PollWatcher::from_config(ctx.config()).stream();
        let mut outcomes = std::pin::pin!(watch(ctx, events, Some(&seen)));
        while let Some((path, outcome)) = outcomes.next().await {
            println!("{}: {outcome}", path.display());
        }
    };

    tokio::select! {
        _ = async { tokio::join!(watch_lane, scan_lane) } => {},
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                tracing::warn!(%err, "Could not listen for interrupts");
            }
            tracing::info!("Interrupted, stopping");
        },
    }
    Ok(())
}

async fn organize(ctx: &Context, files: &[PathBuf]) -> Result<()> {
    let mut failed = 0;
    for file in files {
        let outcome = organize_file(ctx, file).await;
        if outcome.status() == Status::Failed {
            failed += 1;
        }
        println!("{}: {outcome}", file.display());
    }
    match failed {
        0 => Ok(()),
        n => exn::bail!(ErrorKind::Failed(n)),
    }
}

async fn preview(ctx: &Context, files: &[PathBuf]) {
    for file in files {
        println!("{}", preview_line(ctx, file).await);
    }
}

async fn preview_line(ctx: &Context, file: &Path) -> String {
    if !ctx.config().accepts(file) {
        return format!("{}: skipped", file.display());
    }
    match plan(ctx, file).await {
        Ok(plan) => {
            let mut line = format!("{} -> {}", file.display(), plan.target.display());
            for warning in &plan.warnings {
                line.push_str(&format!(" [{warning}]"));
            }
            line
        },
        Err(err) => format!("{}: {}", file.display(), *err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use darkroom_config::GalleryConfig;
    use image::RgbImage;
    use rstest::rstest;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(&["darkroom", "run"], false)]
    #[case(&["darkroom", "run", "--no-watch"], true)]
    #[case(&["darkroom", "--config", "gallery.toml", "run", "--no-watch"], true)]
    fn test_parses_run(#[case] args: &[&str], #[case] expected: bool) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Run { no_watch } if no_watch == expected));
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["darkroom", "organize"]).is_err());
        assert!(Cli::try_parse_from(["darkroom", "preview"]).is_err());
        let cli = Cli::try_parse_from(["darkroom", "preview", "a.jpg", "b.png", "-c", "x.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.yaml")));
        assert!(matches!(cli.command, Command::Preview { files } if files.len() == 2));
    }

    #[tokio::test]
    async fn test_preview_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = GalleryConfig {
            create_thumbnails: false,
            organization_prompt: "{main}, {type}".into(),
            ..GalleryConfig::new(dir.path().join("gallery"))
        };
        let ctx = Context::new(config).unwrap();
        let image = dir.path().join("a.png");
        RgbImage::new(2, 2).save(&image).unwrap();
        let text = dir.path().join("notes.txt");

        let expected = format!("{} -> {}", image.display(), dir.path().join("gallery/png/a.png").display());
        assert_eq!(preview_line(&ctx, &image).await, expected);
        assert_eq!(preview_line(&ctx, &text).await, format!("{}: skipped", text.display()));
        assert!(image.is_file());
    }

    #[tokio::test]
    async fn test_organize_counts_failures() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(GalleryConfig::new(dir.path().join("gallery"))).unwrap();
        let broken = dir.path().join("broken.jpg");
        std::fs::write(&broken, b"not an image").unwrap();

        let err = organize(&ctx, &[broken.clone(), dir.path().join("notes.txt")]).await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Failed(1)));
        assert!(broken.is_file());
    }
}
