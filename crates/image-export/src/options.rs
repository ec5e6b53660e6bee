use crate::export::ImageProvider;
use crate::types::*;
use std::str::FromStr;

/// Ordered list of images handed over by the generation side
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageManifest {
    pub images: Vec<ImageResource>,
}

impl ImageManifest {
    /// Build a manifest from bare source locations, naming them `image-<n>.png`
    pub fn from_sources<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let images = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| ImageResource::new(source, format!("image-{}.png", i + 1)))
            .collect();
        Self { images }
    }

    /// Load a manifest from a JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let manifest: Self = serde_json::from_slice(&bytes)
            .map_err(|e| ExportError::Config(format!("Failed to parse manifest: {}", e)))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Save the manifest to a JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::Config(format!("Failed to serialize manifest: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the manifest.
    ///
    /// An empty manifest is valid; exporting it is a no-op.
    pub fn validate(&self) -> Result<()> {
        for (index, image) in self.images.iter().enumerate() {
            if image.source_location.trim().is_empty() {
                return Err(ExportError::Config(format!(
                    "Image {index} has no source location"
                )));
            }
            if image.logical_name.trim().is_empty() {
                return Err(ExportError::Config(format!(
                    "Image {index} has no logical name"
                )));
            }
        }
        Ok(())
    }
}

impl ImageProvider for ImageManifest {
    fn images(&self) -> Vec<ImageResource> {
        self.images.clone()
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::RasterPng),
            "jpg" | "jpeg" => Ok(ExportFormat::RasterJpeg),
            "pdf" => Ok(ExportFormat::PaginatedDocument),
            other => Err(ExportError::Config(format!(
                "Unknown export format '{other}' (expected png, jpg or pdf)"
            ))),
        }
    }
}
