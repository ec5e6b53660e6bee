//! Reading the encoded bytes behind an image's source location

use crate::types::*;
use base64::{Engine as _, engine::general_purpose};
use std::path::PathBuf;

/// Where an image's encoded bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// `data:` URI with the bytes already embedded
    Embedded { mime_type: String, bytes: Vec<u8> },
    /// `http://` or `https://` address
    Remote(String),
    /// `file://` URI or plain filesystem path
    File(PathBuf),
}

impl SourceLocation {
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(ExportError::Decode("empty source location".to_string()));
        }

        if let Some(rest) = uri.strip_prefix("data:") {
            return parse_data_uri(rest);
        }

        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(SourceLocation::Remote(uri.to_string()));
        }

        let path = uri.strip_prefix("file://").unwrap_or(uri);
        Ok(SourceLocation::File(PathBuf::from(path)))
    }

    /// MIME type declared by the location itself, if any
    pub fn declared_mime(&self) -> Option<&str> {
        match self {
            SourceLocation::Embedded { mime_type, .. } => Some(mime_type),
            _ => None,
        }
    }

    pub fn is_declared_png(&self) -> bool {
        self.declared_mime()
            .is_some_and(|mime| mime.eq_ignore_ascii_case("image/png"))
    }

    /// Read the encoded bytes, consuming the location
    pub async fn fetch(self) -> Result<Vec<u8>> {
        match self {
            SourceLocation::Embedded { bytes, .. } => Ok(bytes),
            SourceLocation::Remote(url) => fetch_remote(&url).await,
            SourceLocation::File(path) => tokio::fs::read(&path).await.map_err(|e| {
                ExportError::Decode(format!("cannot read {}: {e}", path.display()))
            }),
        }
    }
}

fn parse_data_uri(rest: &str) -> Result<SourceLocation> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ExportError::Decode("malformed data URI: missing ','".to_string()))?;

    let mut params = header.split(';');
    let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| ExportError::Decode(format!("invalid base64 payload: {e}")))?
    } else {
        payload.as_bytes().to_vec()
    };

    Ok(SourceLocation::Embedded { mime_type, bytes })
}

async fn fetch_remote(url: &str) -> Result<Vec<u8>> {
    log::debug!("Fetching {url}");
    let response = reqwest::get(url)
        .await
        .map_err(|e| ExportError::Decode(format!("cannot fetch {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ExportError::Decode(format!(
            "cannot fetch {url}: HTTP {}",
            status.as_u16()
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| ExportError::Decode(format!("cannot read body of {url}: {e}")))?;
    Ok(body.to_vec())
}
