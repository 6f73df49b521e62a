use crate::domain::models::FileContext;
use crossterm::{
    ExecutableCommand, cursor,
    terminal::{Clear, ClearType},
};
use log::{debug, info, warn};
use std::cmp::Ordering;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Component, Path};
use std::time::{Duration, Instant};
use walkdir::{DirEntry, WalkDir};

pub const READ_ERROR_PREFIX: &str = "Error reading file: ";

// Progress indicator for file scanning, drawn on stderr when it is a terminal
struct ScanProgress {
    enabled: bool,
    start_time: Instant,
    update_interval: Duration,
    last_update: Instant,
    scanned_count: usize,
    matched_count: usize,
}

impl ScanProgress {
    fn new() -> Self {
        Self {
            enabled: io::stderr().is_terminal(),
            start_time: Instant::now(),
            update_interval: Duration::from_millis(250),
            last_update: Instant::now(),
            scanned_count: 0,
            matched_count: 0,
        }
    }

    fn update(&mut self, matched: bool) -> io::Result<()> {
        self.scanned_count += 1;
        if matched {
            self.matched_count += 1;
        }

        let now = Instant::now();
        if !self.enabled || now.duration_since(self.last_update) < self.update_interval {
            return Ok(());
        }
        self.last_update = now;

        let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
        let spinner_idx = ((self.start_time.elapsed().as_millis() / 100)
            % spinner_chars.len() as u128) as usize;

        let mut stderr = io::stderr();
        stderr.execute(cursor::SavePosition)?;
        stderr.execute(Clear(ClearType::CurrentLine))?;
        write!(
            stderr,
            "{} Collecting files: {} scanned, {} matched",
            spinner_chars[spinner_idx], self.scanned_count, self.matched_count
        )?;
        stderr.flush()?;
        stderr.execute(cursor::RestorePosition)?;
        Ok(())
    }

    fn finish(&self) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let mut stderr = io::stderr();
        stderr.execute(Clear(ClearType::CurrentLine))?;
        writeln!(
            stderr,
            "✓ Scan complete: {} files scanned, {} matched in {:.1}s",
            self.scanned_count,
            self.matched_count,
            self.start_time.elapsed().as_secs_f32()
        )?;
        Ok(())
    }
}

// Files before subdirectories, each group by name, so the walk visits a
// directory's own files before descending.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// `path` relative to `base`, joined with forward slashes. Climbs out of
/// `base` with `..` when `path` is not below it.
pub fn relative_path(path: &Path, base: &Path) -> String {
    let path_parts: Vec<Component> = path
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let base_parts: Vec<Component> = base
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); base_parts.len() - common];
    parts.extend(path_parts[common..].iter().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        Component::ParentDir => Some("..".to_string()),
        _ => None,
    }));
    parts.join("/")
}

/// Every file under `root` whose name ends with `suffix`, relative to
/// `relative_base`. No exclusion filters apply here.
pub fn collect_files_by_extension(root: &Path, suffix: &str, relative_base: &Path) -> Vec<String> {
    info!("Collecting files ending with '{}' in {}", suffix, root.display());

    let mut result = Vec::new();
    let mut progress = ScanProgress::new();

    for entry in WalkDir::new(root).sort_by(files_first) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }

        let matched = entry.file_name().to_string_lossy().ends_with(suffix);
        if let Err(e) = progress.update(matched) {
            debug!("Progress display failed: {}", e);
        }

        if matched {
            debug!("Found matching file: {}", entry.path().display());
            result.push(relative_path(entry.path(), relative_base));
        }
    }

    if let Err(e) = progress.finish() {
        debug!("Progress display failed: {}", e);
    }
    info!("Found {} matching files", result.len());
    result
}

pub fn read_text(path: &Path) -> io::Result<String> {
    debug!("Reading file contents: {}", path.display());
    let contents = fs::read_to_string(path)?;
    debug!("Read {} bytes from file", contents.len());
    Ok(contents)
}

/// Reads each of `paths` under `root`. A file that cannot be read keeps its
/// slot with an error placeholder as content.
pub fn read_file_contents(root: &Path, paths: &[String]) -> Vec<FileContext> {
    paths
        .iter()
        .map(|path| {
            let content = match read_text(&root.join(path)) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Error reading file {}: {}", path, e);
                    format!("{}{}", READ_ERROR_PREFIX, e)
                }
            };
            FileContext {
                path: path.clone(),
                content,
            }
        })
        .collect()
}
