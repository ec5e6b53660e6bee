mod logger;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use image_export::{DirectoryTarget, ExportFormat, ExportOutcome, Exporter, ImageManifest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "imgx",
    about = "Export generated images as a zip archive or a PDF",
    version
)]
struct Cli {
    /// Image sources: URLs, file paths or data URIs
    #[arg(conflicts_with = "manifest")]
    sources: Vec<String>,

    /// JSON manifest listing images and their logical names
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "png", value_enum)]
    format: FormatArg,

    /// Base name of the saved file, without extension
    #[arg(short, long, default_value = "export")]
    name: String,

    /// Directory the artifact is saved into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Log every processing stage
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpg,
    Pdf,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => Self::RasterPng,
            FormatArg::Jpg => Self::RasterJpeg,
            FormatArg::Pdf => Self::PaginatedDocument,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::ConsoleLogger::new(cli.verbose).init()?;

    let manifest = match &cli.manifest {
        Some(path) => ImageManifest::load(path).await?,
        None => ImageManifest::from_sources(cli.sources),
    };

    let target = DirectoryTarget::new(&cli.output_dir);
    let exporter = Exporter::new(manifest, target);

    match exporter.export(cli.format.into(), &cli.name).await {
        ExportOutcome::Saved {
            file_name,
            item_count,
            bytes_written,
        } => {
            println!(
                "Exported {} image(s) → {} ({} bytes)",
                item_count,
                exporter.target().path_for(&file_name).display(),
                bytes_written
            );
        }
        ExportOutcome::Empty => println!("No images to export"),
        ExportOutcome::Busy => bail!("An export is already running"),
        ExportOutcome::Failed { notice } => bail!(notice),
    }

    Ok(())
}
