//! Export entry point
//!
//! One [`Exporter::export`] call turns the provider's current image list into
//! a single saved artifact: a zip of PNG/JPEG entries or a PDF. Failures of
//! any kind are logged in full here and reduced to one generic notice.

use crate::archive::{ArchiveEntry, package_archive};
use crate::constants::EXPORT_FAILED_NOTICE;
use crate::document::compose_document;
use crate::handles::HandleStore;
use crate::transcode::transcode;
use crate::types::*;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Supplies the images to export, queried once per export call
pub trait ImageProvider {
    fn images(&self) -> Vec<ImageResource>;
}

impl<F> ImageProvider for F
where
    F: Fn() -> Vec<ImageResource>,
{
    fn images(&self) -> Vec<ImageResource> {
        self()
    }
}

/// Receives the finished artifact
pub trait SaveTarget {
    fn save(&self, file_name: &str, bytes: Vec<u8>) -> impl Future<Output = Result<()>>;
}

/// Saves artifacts as files in a directory
#[derive(Debug, Clone)]
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl SaveTarget for DirectoryTarget {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(file_name), bytes).await?;
        Ok(())
    }
}

/// Whether an export is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportState {
    #[default]
    Idle,
    Running,
}

/// Holds the exporter in `Running`; dropping it returns to `Idle`
struct RunningGuard<'a> {
    state: &'a Mutex<ExportState>,
}

impl<'a> RunningGuard<'a> {
    fn try_start(state: &'a Mutex<ExportState>) -> Option<Self> {
        let mut current = lock(state);
        match *current {
            ExportState::Running => None,
            ExportState::Idle => {
                *current = ExportState::Running;
                Some(Self { state })
            }
        }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        *lock(self.state) = ExportState::Idle;
    }
}

fn lock(state: &Mutex<ExportState>) -> MutexGuard<'_, ExportState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Exporter<P, S> {
    provider: P,
    target: S,
    state: Mutex<ExportState>,
    handles: HandleStore,
}

impl<P: ImageProvider, S: SaveTarget> Exporter<P, S> {
    pub fn new(provider: P, target: S) -> Self {
        Self {
            provider,
            target,
            state: Mutex::new(ExportState::Idle),
            handles: HandleStore::new(),
        }
    }

    pub fn state(&self) -> ExportState {
        *lock(&self.state)
    }

    /// Transient handles owned by this exporter's session
    pub fn handles(&self) -> &HandleStore {
        &self.handles
    }

    pub fn target(&self) -> &S {
        &self.target
    }

    /// Export the provider's current images as `format`, saved under `base_name`.
    ///
    /// A call made while another is running is rejected with
    /// [`ExportOutcome::Busy`]; an empty image list saves nothing.
    pub async fn export(&self, format: ExportFormat, base_name: &str) -> ExportOutcome {
        let Some(_running) = RunningGuard::try_start(&self.state) else {
            log::warn!("Export already running, ignoring request for {base_name}");
            return ExportOutcome::Busy;
        };

        let images = self.provider.images();
        if images.is_empty() {
            log::info!("No images to export");
            return ExportOutcome::Empty;
        }

        match self.run(format, base_name, &images).await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!(
                    "Export of {} image(s) as {format:?} failed: {e} ({e:?})",
                    images.len()
                );
                ExportOutcome::Failed {
                    notice: EXPORT_FAILED_NOTICE,
                }
            }
        }
    }

    async fn run(
        &self,
        format: ExportFormat,
        base_name: &str,
        images: &[ImageResource],
    ) -> Result<ExportOutcome> {
        let file_name = format.artifact_name(base_name);
        log::info!("Exporting {} image(s) to {file_name}", images.len());

        let bytes = match format {
            ExportFormat::PaginatedDocument => compose_document(images, &self.handles).await?,
            ExportFormat::RasterPng => export_archive(images, RasterFormat::Png).await?,
            ExportFormat::RasterJpeg => export_archive(images, RasterFormat::Jpeg).await?,
        };

        let bytes_written = bytes.len();
        self.target.save(&file_name, bytes).await?;
        log::info!("Saved {file_name} ({bytes_written} bytes)");

        Ok(ExportOutcome::Saved {
            file_name,
            bytes_written,
            item_count: images.len(),
        })
    }
}

/// Transcode every image at once, then package them together
async fn export_archive(images: &[ImageResource], raster: RasterFormat) -> Result<Vec<u8>> {
    let transcodes = images.iter().enumerate().map(|(index, image)| async move {
        let asset = transcode(&image.source_location, raster)
            .await
            .map_err(|e| ExportError::at_index(index, e))?;
        Ok::<_, ExportError>(ArchiveEntry {
            name: image.renamed_for(raster.extension()),
            asset,
        })
    });

    let entries = futures::future::try_join_all(transcodes).await?;
    package_archive(entries)
}
