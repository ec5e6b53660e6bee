//! Zip packaging of transcoded images

use crate::types::*;
use std::io::{Cursor, Write};
use zip::CompressionMethod;
use zip::write::{SimpleFileOptions, ZipWriter};

/// One named entry of the archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub asset: TranscodedAsset,
}

/// Write every entry into a single zip container.
///
/// Either all entries are written and the finished container is returned,
/// or nothing is returned at all.
pub fn package_archive(entries: Vec<ArchiveEntry>) -> Result<Vec<u8>> {
    if entries.is_empty() {
        return Err(ExportError::Packaging("archive has no entries".to_string()));
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let entry_count = entries.len();

    for entry in entries {
        zip.start_file(entry.name.as_str(), options)
            .map_err(|e| ExportError::Packaging(format!("cannot add {}: {e}", entry.name)))?;
        zip.write_all(&entry.asset.buffer)
            .map_err(|e| ExportError::Packaging(format!("cannot write {}: {e}", entry.name)))?;
    }

    let bytes = zip
        .finish()
        .map_err(|e| ExportError::Packaging(format!("cannot finalize archive: {e}")))?
        .into_inner();

    log::debug!("Packaged {entry_count} entries, {} bytes", bytes.len());
    Ok(bytes)
}
