/// Error types for the catalog, export and settings layers
///
/// "No frames for this action" is not an error anywhere in this crate;
/// the resolver reports it as `None`.

use std::path::PathBuf;
use thiserror::Error;

use crate::state::data::Category;

/// Errors raised while loading, mutating or saving the animation catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A record carried a field that could not be parsed; nothing was loaded
    #[error("malformed {record} record: attribute `{attribute}` has invalid value {value:?}")]
    Parse {
        record: String,
        attribute: &'static str,
        value: String,
    },

    /// The body is already listed (in either category)
    #[error("body {id} is already defined under {category}")]
    Duplicate { id: u32, category: Category },

    /// Type tag outside 0..=4
    #[error("invalid type {0} (expected 0:Monster, 1:Sea, 2:Animal, 3:Human, 4:Equipment)")]
    InvalidType(i64),

    /// The document has no `Graphics` root element
    #[error("catalog document has no Graphics element")]
    MissingRoot,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the export pipeline
#[derive(Debug, Error)]
pub enum ExportError {
    /// No resolved picture or animation is available
    #[error("nothing to export: no picture or animation is loaded")]
    NothingToExport,

    #[error("frame {index} out of range (animation has {count} frames)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("failed to encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading or writing the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not determine a user data directory")]
    NoDataDir,
}

/// Errors raised while opening a folder-backed archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive directory not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}
