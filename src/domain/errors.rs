use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Failed to open archive {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid or corrupt zip archive: {0}")]
    Invalid(#[from] zip::result::ZipError),

    /// Entry whose path would resolve outside the extraction directory.
    #[error("Archive entry escapes the extraction directory: {0}")]
    UnsafeEntry(String),

    #[error("IO error during extraction: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Input path not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported input type: {0} (expected a directory, .zip, .py, .jl or .txt)")]
    UnsupportedType(PathBuf),

    #[error("Uploaded file is not valid UTF-8 text: {0}")]
    NotUtf8(PathBuf),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("IO error reading input: {0}")]
    Io(#[from] io::Error),
}
