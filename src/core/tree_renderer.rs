use crate::domain::models::{DirListing, ExclusionFilters, TreeListing};
use log::{debug, warn};
use std::ffi::OsString;
use std::fs;
use std::path::Path;

const INDENT: &str = "    ";
const MARKER: &str = "|-- ";

/// Lists the immediate children of `path`, split into directories and files
/// and sorted by name. Symlinks are classified by their target.
pub fn list_dir(path: &Path) -> DirListing {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => return DirListing::Inaccessible(e),
    };

    let mut names: Vec<OsString> = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => names.push(entry.file_name()),
            Err(e) => return DirListing::Inaccessible(e),
        }
    }
    names.sort();

    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for name in names {
        let child = path.join(&name);
        let display = name.to_string_lossy().into_owned();
        if child.is_dir() {
            dirs.push(display);
        } else if child.is_file() {
            files.push(display);
        }
    }

    DirListing::Entries { dirs, files }
}

pub fn render_tree(root: &Path, filters: &ExclusionFilters, file_limit: usize) -> TreeListing {
    debug!(
        "Rendering tree for {} (file limit {})",
        root.display(),
        file_limit
    );
    let listing = render(root, filters, 0, file_limit);
    debug!(
        "Rendered {} tree lines, {} inaccessible directories",
        listing.text.lines().count(),
        listing.inaccessible.len()
    );
    listing
}

pub fn render(
    dir: &Path,
    filters: &ExclusionFilters,
    level: usize,
    file_limit: usize,
) -> TreeListing {
    let mut listing = TreeListing::default();

    let (dirs, files) = match list_dir(dir) {
        DirListing::Entries { dirs, files } => (dirs, files),
        DirListing::Inaccessible(e) => {
            warn!("Cannot list directory {}: {}", dir.display(), e);
            listing.inaccessible.push(dir.to_path_buf());
            return listing;
        }
    };

    let prefix = format!("{}{}", INDENT.repeat(level), MARKER);

    for name in &dirs {
        if filters.excludes_dir(name) {
            debug!("Skipping excluded directory: {}", dir.join(name).display());
            continue;
        }
        listing.text.push_str(&format!("{}{}/\n", prefix, name));

        let child = render(&dir.join(name), filters, level + 1, file_limit);
        listing.text.push_str(&child.text);
        listing.inaccessible.extend(child.inaccessible);
    }

    let shown: Vec<&String> = files
        .iter()
        .filter(|name| !filters.excludes_file(name))
        .collect();

    if shown.len() > file_limit * 2 {
        for name in &shown[..file_limit] {
            listing.text.push_str(&format!("{}{}\n", prefix, name));
        }
        listing.text.push_str(&format!(
            "{}... ({} more files skipped)\n",
            prefix,
            shown.len() - file_limit * 2
        ));
        for name in &shown[shown.len() - file_limit..] {
            listing.text.push_str(&format!("{}{}\n", prefix, name));
        }
    } else {
        for name in shown {
            listing.text.push_str(&format!("{}{}\n", prefix, name));
        }
    }

    listing
}
