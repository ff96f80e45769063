use crate::model::Origin;
use thiserror::Error;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{origin} is not a valid ZIP file: {source}")]
    InvalidArchiveFormat {
        origin: Origin,
        #[source]
        source: ZipError,
    },

    #[error("No PDF files found in {origin}")]
    EmptyArchive { origin: Origin },

    #[error("{origin} contains PDF files but none of them follow its naming convention")]
    NoIdentifiableFiles { origin: Origin },

    #[error("Merging produced no files")]
    EmptyMergeResult,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error writing merged archive: {0}")]
    Zip(#[from] ZipError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
