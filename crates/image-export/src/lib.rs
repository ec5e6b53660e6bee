mod archive;
pub mod constants;
mod document;
mod export;
mod handles;
mod layout;
mod options;
mod probe;
mod source;
mod transcode;
mod types;

pub use archive::{ArchiveEntry, package_archive};
pub use document::compose_document;
pub use export::{DirectoryTarget, ExportState, Exporter, ImageProvider, SaveTarget};
pub use handles::{HandleStore, TransientHandle};
pub use layout::{PageGeometry, export_page_size_pt};
pub use options::ImageManifest;
pub use probe::{probe, probe_bytes};
pub use source::SourceLocation;
pub use transcode::transcode;
pub use types::*;
