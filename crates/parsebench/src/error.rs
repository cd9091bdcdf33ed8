use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParsebenchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Failure of a single extraction attempt.
///
/// These never leave the document loader: the fallback chain logs them and
/// moves on to the next tier.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process PDF: {0}")]
    PdfProcessing(String),

    #[error("Failed to process Word document: {0}")]
    WordProcessing(String),

    #[error("Failed to process spreadsheet: {0}")]
    SpreadsheetProcessing(String),

    #[error("Failed to rasterize PDF: {0}")]
    Rasterize(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Extraction strategy '{strategy}' panicked: {message}")]
    StrategyPanicked { strategy: String, message: String },

    #[error("Extraction strategy '{strategy}' timed out after {elapsed:?}")]
    TimedOut { strategy: String, elapsed: Duration },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Directory scan failed for '{path}': {source}")]
    ScanFailed {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to read ground truth '{path}': {source}")]
    ReadGroundTruth {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write scoring artifact: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, ParsebenchError>;
