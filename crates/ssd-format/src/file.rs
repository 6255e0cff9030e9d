//! Reading and writing scene files.
//!
//! Scene files are classified by extension:
//!
//! - `.ssd` - the binary format
//! - `.ssda` - the XML text form (requires the `xml` feature)
//! - `.ssd_json` - the JSON text form (requires the `json` feature)

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{DecodeOptions, Document, Error, Result};

/// Extension of binary scene files.
pub const SSD_EXTENSION: &str = "ssd";

/// On-disk representation of a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    /// Binary SSD stream.
    Binary,
    /// XML text form.
    Ascii,
    /// JSON text form.
    Json,
}

impl SceneFormat {
    /// Classify a path by its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match extension {
            "ssd" => Ok(Self::Binary),
            "ssda" => Ok(Self::Ascii),
            "ssd_json" => Ok(Self::Json),
            other => Err(Error::InvalidExtension {
                expected: "ssd, ssda or ssd_json".to_string(),
                actual: other.to_string(),
            }),
        }
    }

    /// File extension of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Binary => SSD_EXTENSION,
            Self::Ascii => "ssda",
            Self::Json => "ssd_json",
        }
    }

    /// Decode a document stored in this format.
    pub fn decode(&self, data: &[u8]) -> Result<Document> {
        self.decode_with(data, &DecodeOptions::default())
    }

    /// Decode a document stored in this format with explicit limits.
    ///
    /// The JSON form relies on the parser's own recursion limit.
    pub fn decode_with(&self, data: &[u8], options: &DecodeOptions) -> Result<Document> {
        match self {
            Self::Binary => Document::parse_with(data, options),
            #[cfg(feature = "xml")]
            Self::Ascii => {
                let xml = std::str::from_utf8(data).map_err(ssd_common::Error::Utf8)?;
                Document::from_xml_with(xml, options)
            }
            #[cfg(feature = "json")]
            Self::Json => Document::from_json_slice(data),
            #[allow(unreachable_patterns)]
            other => Err(Error::UnsupportedFormat(other.extension().to_string())),
        }
    }

    /// Encode a document in this format.
    pub fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        match self {
            Self::Binary => document.to_bytes(),
            #[cfg(feature = "xml")]
            Self::Ascii => document.to_xml_string().map(String::into_bytes),
            #[cfg(feature = "json")]
            Self::Json => document.to_json_string().map(String::into_bytes),
            #[allow(unreachable_patterns)]
            other => Err(Error::UnsupportedFormat(other.extension().to_string())),
        }
    }
}

/// Append `.ssd` to a path that does not already end with it.
pub fn ensure_extension(path: impl Into<PathBuf>) -> PathBuf {
    let path = path.into();
    if path.extension().and_then(|e| e.to_str()) == Some(SSD_EXTENSION) {
        return path;
    }
    let mut name: OsString = path.into_os_string();
    name.push(".");
    name.push(SSD_EXTENSION);
    PathBuf::from(name)
}

/// Read a scene file in the format its extension names.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    let format = SceneFormat::from_path(path)?;
    let data = fs::read(path)?;
    debug!(path = %path.display(), ?format, bytes = data.len(), "reading scene file");
    format.decode(&data)
}

/// Write a scene file in the format its extension names.
pub fn write_file<P: AsRef<Path>>(path: P, document: &Document) -> Result<()> {
    let path = path.as_ref();
    let format = SceneFormat::from_path(path)?;
    let data = format.encode(document)?;
    debug!(path = %path.display(), ?format, bytes = data.len(), "writing scene file");
    fs::write(path, data)?;
    Ok(())
}
