use crate::domain::errors::ArchiveError;
use log::{debug, info};
use std::fs;
use std::io::{self, Read, Seek};
use std::path::Path;
use tempfile::TempDir;

const EXTRACT_DIR_PREFIX: &str = "flatprompt-";

/// A zip archive unpacked into its own temporary directory. The directory is
/// removed when this value is dropped.
#[derive(Debug)]
pub struct ExtractedArchive {
    dir: TempDir,
    pub name: String,
    pub files_extracted: usize,
}

impl ExtractedArchive {
    pub fn root(&self) -> &Path {
        self.dir.path()
    }
}

pub fn extract_archive(archive_path: &Path) -> Result<ExtractedArchive, ArchiveError> {
    debug!("Opening archive: {}", archive_path.display());
    let file = fs::File::open(archive_path).map_err(|source| ArchiveError::Open {
        path: archive_path.to_path_buf(),
        source,
    })?;

    let name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive.zip".to_string());

    extract_archive_from_reader(file, &name)
}

pub fn extract_archive_from_reader<R: Read + Seek>(
    reader: R,
    name: &str,
) -> Result<ExtractedArchive, ArchiveError> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let dir = tempfile::Builder::new()
        .prefix(EXTRACT_DIR_PREFIX)
        .tempdir()?;
    debug!(
        "Extracting {} entries from {} into {}",
        archive.len(),
        name,
        dir.path().display()
    );

    let mut count: usize = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;

        let entry_path = match entry.enclosed_name() {
            Some(p) => p,
            None => return Err(ArchiveError::UnsafeEntry(entry.name().to_string())),
        };
        let output_path = dir.path().join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&output_path)?;
        } else {
            if let Some(parent) = output_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = fs::File::create(&output_path)?;
            io::copy(&mut entry, &mut outfile)?;
            count += 1;
        }
    }

    info!("Extracted {} files from {}", count, name);
    Ok(ExtractedArchive {
        dir,
        name: name.to_string(),
        files_extracted: count,
    })
}
