//! pathoscore: headless driver for the annotation state engine.
//!
//! Stands in for the interactive surface: activates an image (recovering
//! any prior annotations), replays widget patch files through the
//! reconciler, regenerates the derived artifacts, and maintains the data
//! directory's retention policy.
//!
//! # Usage
//!
//! ```text
//! pathoscore annotate --image slide_04.png --patch patch.json
//! pathoscore resume
//! pathoscore report
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use pathoscore::config::{self, AppConfig};
use pathoscore::error::AnnotateError;
use pathoscore::export::{ArtifactKind, overlay};
use pathoscore::labels::{self, LabelSchema};
use pathoscore::reconcile::reconcile;
use pathoscore::state::{activate_image, regenerate_artifacts, resume_latest};
use pathoscore::storage::DataDirs;
use pathoscore::widget::{AnnotationWidget, FilePatchSource, InteractionMode, WidgetFrame};

/// Point-annotation engine for pathology images (HER2/Ki67 scoring).
#[derive(Parser)]
#[command(name = "pathoscore", version)]
struct Cli {
    /// Label schema YAML; defaults to the standard search order.
    #[arg(long)]
    schema: Option<String>,

    /// Data directory; defaults to the configured one.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the default config and label schema to the user config directory.
    Init,

    /// Activate an image and optionally apply a widget patch file.
    Annotate {
        /// Source image (PNG, JPEG, BMP).
        #[arg(long)]
        image: PathBuf,

        /// JSON array of {point, label_id} records reported by the widget.
        #[arg(long)]
        patch: Option<PathBuf>,

        /// Interaction mode presented to the widget.
        #[arg(long, value_enum, default_value_t = ModeArg::Add)]
        mode: ModeArg,

        /// Active label index for new points.
        #[arg(long, default_value_t = 0)]
        label: usize,
    },

    /// Resume the last session from the session log and refresh artifacts.
    Resume,

    /// Print the annotation report for the last active image.
    Report,

    /// Write the annotated overlay PNG.
    Overlay {
        /// Output path; defaults to `<image>_annotated.png` next to the reports.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Delete stale image/annotation/report files.
    Cleanup {
        /// How many recent image triplets to keep.
        #[arg(long)]
        keep_recent: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Add,
    Delete,
}

impl From<ModeArg> for InteractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Add => InteractionMode::Add,
            ModeArg::Delete => InteractionMode::Delete,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = config::load_config();

    match run(cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: AppConfig) -> Result<(), AnnotateError> {
    let schema_arg = cli.schema.or_else(|| config.labels.schema_file.clone());
    let schema = labels::load_schema(schema_arg.as_deref());

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        PathBuf::from(shellexpand::tilde(&config.storage.data_dir).as_ref())
    });
    let dirs = DataDirs::at(data_dir);

    match cli.command {
        Command::Init => init(&config),
        Command::Annotate {
            image,
            patch,
            mode,
            label,
        } => annotate(&dirs, &schema, &config, image, patch, mode.into(), label),
        Command::Resume => resume(&dirs, &schema),
        Command::Report => report(&dirs, &schema),
        Command::Overlay { out } => write_overlay(&dirs, &schema, out),
        Command::Cleanup { keep_recent } => {
            dirs.bootstrap()?;
            let keep = keep_recent.unwrap_or(config.storage.keep_recent);
            let deleted = dirs.cleanup_previous(None, keep)?;
            println!("Deleted {deleted} stale file(s), kept the {keep} most recent");
            Ok(())
        }
    }
}

fn init(config: &AppConfig) -> Result<(), AnnotateError> {
    let config_path =
        config::save_config(config).map_err(AnnotateError::Schema)?;
    let schema_path = labels::create_default_schema_file()?;
    println!("Wrote {} and {schema_path}", config_path.display());
    Ok(())
}

fn annotate(
    dirs: &DataDirs,
    schema: &LabelSchema,
    config: &AppConfig,
    image: PathBuf,
    patch: Option<PathBuf>,
    mode: InteractionMode,
    label: usize,
) -> Result<(), AnnotateError> {
    dirs.bootstrap()?;

    let mut ctx = activate_image(dirs, schema, &image)?;
    ctx.mode = mode;
    ctx.active_label = label.min(schema.len().saturating_sub(1));
    ctx.zoom = config.annotation.default_zoom;

    // Switching images retires older material; the active image is exempt.
    let stem = ctx.stem().to_string();
    dirs.cleanup_previous(Some(&stem), config.storage.keep_recent)?;

    let decoded = image::open(&ctx.image_path)?;

    if let Some(patch_path) = patch {
        let (points, labels) = ctx.patch_view();
        let frame = WidgetFrame {
            image_path: &ctx.image_path,
            schema,
            points,
            labels,
            width: decoded.width(),
            height: decoded.height(),
            mode: ctx.mode,
            active_label: ctx.active_label,
            zoom: ctx.zoom,
            point_width: config.annotation.point_width,
        };

        let mut source = FilePatchSource::new(patch_path);
        if let Some(reported) = source.present(&frame)? {
            let outcome = reconcile(&mut ctx.store, &reported);
            println!(
                "Reconciled: {} added, {} removed, {} total",
                outcome.added,
                outcome.removed,
                ctx.store.len()
            );
        }
    }

    regenerate_artifacts(&mut ctx, schema, dirs, &decoded)?;
    println!(
        "Saved annotations for {} ({} point(s))",
        ctx.image_name,
        ctx.store.len()
    );
    Ok(())
}

fn resume(dirs: &DataDirs, schema: &LabelSchema) -> Result<(), AnnotateError> {
    dirs.bootstrap()?;
    let mut ctx = resume_latest(dirs, schema)?;
    let decoded = image::open(&ctx.image_path)?;
    regenerate_artifacts(&mut ctx, schema, dirs, &decoded)?;
    println!(
        "Resumed {} with {} annotation(s)",
        ctx.image_name,
        ctx.store.len()
    );
    Ok(())
}

fn report(dirs: &DataDirs, schema: &LabelSchema) -> Result<(), AnnotateError> {
    let ctx = resume_latest(dirs, schema)?;
    let text = pathoscore::export::report::render_report(
        &ctx.store,
        schema,
        ctx.stem(),
        chrono::Local::now(),
    );
    println!("{text}");
    Ok(())
}

fn write_overlay(
    dirs: &DataDirs,
    schema: &LabelSchema,
    out: Option<PathBuf>,
) -> Result<(), AnnotateError> {
    let ctx = resume_latest(dirs, schema)?;
    let decoded = image::open(&ctx.image_path)?;
    let png = overlay::render_overlay(&decoded, &ctx.store, schema)?;

    let out = out.unwrap_or_else(|| {
        dirs.reports.join(format!(
            "{}_annotated.{}",
            ctx.stem(),
            ArtifactKind::Overlay.extension()
        ))
    });
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent).map_err(|e| AnnotateError::io_at(parent, e))?;
    }
    fs::write(&out, png).map_err(|e| AnnotateError::io_at(&out, e))?;
    println!("Wrote {}", out.display());
    Ok(())
}
