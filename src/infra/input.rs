use crate::domain::errors::InputError;
use crate::infra::archive::{ExtractedArchive, extract_archive};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const ARCHIVE_EXTENSION: &str = "zip";
const TEXT_EXTENSIONS: [&str; 3] = ["py", "jl", "txt"];

/// What the user pointed the tool at.
#[derive(Debug)]
pub enum InputSource {
    Directory { root: PathBuf, name: String },
    Archive(ExtractedArchive),
    SingleFile { name: String, text: String },
}

impl InputSource {
    pub fn name(&self) -> &str {
        match self {
            InputSource::Directory { name, .. } => name,
            InputSource::Archive(archive) => &archive.name,
            InputSource::SingleFile { name, .. } => name,
        }
    }

    /// Directory to flatten, if the input has one.
    pub fn root(&self) -> Option<&Path> {
        match self {
            InputSource::Directory { root, .. } => Some(root.as_path()),
            InputSource::Archive(archive) => Some(archive.root()),
            InputSource::SingleFile { .. } => None,
        }
    }
}

// Last component of the resolved path, so `.` or `..` name the real directory.
fn display_name(path: &Path) -> String {
    let resolved = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| resolved.to_string_lossy().into_owned())
}

pub fn resolve_input(path: &Path) -> Result<InputSource, InputError> {
    if !path.exists() {
        return Err(InputError::NotFound(path.to_path_buf()));
    }

    let name = display_name(path);

    if path.is_dir() {
        info!("Using directory input: {}", path.display());
        return Ok(InputSource::Directory {
            root: path.to_path_buf(),
            name,
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();

    if extension == ARCHIVE_EXTENSION {
        info!("Zipped directory uploaded: {}", name);
        let archive = extract_archive(path)?;
        debug!(
            "Archive {} unpacked {} files into {}",
            archive.name,
            archive.files_extracted,
            archive.root().display()
        );
        return Ok(InputSource::Archive(archive));
    }

    if TEXT_EXTENSIONS.contains(&extension) {
        info!("File uploaded: {}", name);
        let bytes = fs::read(path)?;
        debug!("Decoding {} bytes as UTF-8", bytes.len());
        let text = String::from_utf8(bytes).map_err(|_| InputError::NotUtf8(path.to_path_buf()))?;
        return Ok(InputSource::SingleFile { name, text });
    }

    Err(InputError::UnsupportedType(path.to_path_buf()))
}
