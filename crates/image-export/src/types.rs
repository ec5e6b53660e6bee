use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Decode failure: {0}")]
    Decode(String),
    #[error("Encode failure: {0}")]
    Encode(String),
    #[error("Packaging failure: {0}")]
    Packaging(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Wrap a per-image failure so it aborts the whole batch
    pub(crate) fn at_index(index: usize, err: ExportError) -> Self {
        match err {
            ExportError::Packaging(msg) => ExportError::Packaging(msg),
            other => ExportError::Packaging(format!("image {index}: {other}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// One previously generated image, as supplied by the generation side
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageResource {
    /// Network address, file path or `data:` URI holding encoded bytes
    pub source_location: String,
    /// Base name with a placeholder extension, e.g. `portrait-1.png`
    pub logical_name: String,
}

impl ImageResource {
    pub fn new(source_location: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self {
            source_location: source_location.into(),
            logical_name: logical_name.into(),
        }
    }

    /// Logical name with its extension swapped for `extension`.
    ///
    /// Only the extension of the final path segment is replaced; a name
    /// without one gets the extension appended.
    pub fn renamed_for(&self, extension: &str) -> String {
        let name = self.logical_name.as_str();
        let segment_start = name.rfind('/').map(|i| i + 1).unwrap_or(0);
        match name[segment_start..].rfind('.') {
            Some(dot) if dot + 1 < name.len() - segment_start => {
                format!("{}.{extension}", &name[..segment_start + dot])
            }
            _ => format!("{name}.{extension}"),
        }
    }
}

/// Target encoding for the archive modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RasterFormat {
    Png,
    Jpeg,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Jpeg => "image/jpeg",
        }
    }
}

/// What a single export call produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExportFormat {
    /// Zip archive of PNG entries
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "png"))]
    RasterPng,
    /// Zip archive of JPEG entries
    #[cfg_attr(feature = "serde", serde(rename = "jpg"))]
    RasterJpeg,
    /// One PDF, one image per page
    #[cfg_attr(feature = "serde", serde(rename = "pdf"))]
    PaginatedDocument,
}

impl ExportFormat {
    /// Extension of the saved artifact
    pub fn artifact_extension(self) -> &'static str {
        match self {
            ExportFormat::RasterPng | ExportFormat::RasterJpeg => "zip",
            ExportFormat::PaginatedDocument => "pdf",
        }
    }

    pub fn artifact_name(self, base_name: &str) -> String {
        format!("{base_name}.{}", self.artifact_extension())
    }
}

/// Encoded image bytes waiting for their single consumer
#[derive(Debug, Clone)]
pub struct TranscodedAsset {
    pub buffer: Vec<u8>,
    pub mime_type: &'static str,
}

/// Result of an export call as seen by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The artifact was handed to the save target
    Saved {
        file_name: String,
        bytes_written: usize,
        item_count: usize,
    },
    /// Nothing to export
    Empty,
    /// Another export is still running
    Busy,
    /// The export failed; `notice` is safe to show to a user
    Failed { notice: &'static str },
}
