use std::path::PathBuf;

use thiserror::Error;

use super::split::SplitNotFoundError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "download")]
    #[error("curl error: {0}")]
    CurlError(#[from] curl::Error),
    #[error("md5 mismatch for {url}: expected {expected}, found {found}")]
    Md5Mismatch {
        url: String,
        expected: String,
        found: String,
    },
    #[error("{url} is not cached and the `download` feature is disabled")]
    Disabled { url: String },
}

/// Failure of a per-task loader to fetch or parse its source.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}:{line}: {source}", path.display())]
    Json {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: missing column {column:?}", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("{}: row {row} has invalid label {value}", path.display())]
    InvalidLabel {
        path: PathBuf,
        row: usize,
        value: String,
    },
    #[error("task {task} reads local files but no data directory was configured")]
    MissingDataDir { task: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("label {found} is out of range for {max} labels")]
pub struct LabelOrdinalError {
    pub found: usize,
    pub max: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("num_labels must be at least 1")]
    NoLabels,
    #[error(transparent)]
    SplitNotFound(#[from] SplitNotFoundError),
    #[error(transparent)]
    LabelOrdinal(#[from] LabelOrdinalError),
    #[error("label {label} has {available} training examples, need at least 2")]
    InsufficientData { label: usize, available: usize },
    #[error("post-processing resized the {split} split from {before} to {after} examples")]
    PostProcessResized {
        split: String,
        before: usize,
        after: usize,
    },
}
