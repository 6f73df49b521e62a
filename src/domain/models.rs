use std::io;
use std::path::PathBuf;

pub const DEFAULT_PROMPT: &str =
    "Please provide code insights on the following repository structure and files:";
pub const DEFAULT_EXTENSION: &str = ".jl";
pub const DEFAULT_FILE_LIMIT: usize = 2;
pub const MIN_FILE_LIMIT: usize = 1;
pub const MAX_FILE_LIMIT: usize = 10;

pub const FILE_EXCLUDE_OPTIONS: [&str; 7] =
    [".DS_Store", ".png", ".jpg", ".git", ".ipynb", ".mp4", ".md"];
pub const DIR_EXCLUDE_OPTIONS: [&str; 6] =
    ["__MACOSX", ".git", "output", "assets", ".idea", "__pycache__"];

#[derive(Debug, Clone)]
pub struct FileContext {
    pub path: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionFilters {
    /// Suffixes matched against file names.
    pub files: Vec<String>,
    /// Directory names, matched exactly.
    pub dirs: Vec<String>,
}

impl ExclusionFilters {
    pub fn new(files: Vec<String>, dirs: Vec<String>) -> Self {
        Self { files, dirs }
    }

    pub fn excludes_file(&self, name: &str) -> bool {
        self.files.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn excludes_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|dir| dir == name)
    }
}

/// Immediate children of one directory, or the reason they could not be listed.
#[derive(Debug)]
pub enum DirListing {
    Entries { dirs: Vec<String>, files: Vec<String> },
    Inaccessible(io::Error),
}

#[derive(Debug, Default)]
pub struct TreeListing {
    pub text: String,
    /// Directories whose contents could not be listed; rendered as empty.
    pub inaccessible: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ContextConfig {
    pub input_path: String,
    pub extension: String,
    pub filters: ExclusionFilters,
    pub file_limit: usize,
    pub user_prompt: String,
    pub output_path: Option<String>,
    pub download: bool,
    pub clipboard: bool,
    pub interactive: bool,
}

#[derive(Debug)]
pub struct ContextOutput {
    pub user_prompt: String,
    pub tree: String,
    pub extension: String,
    pub file_list: Vec<String>,
    pub file_contents: Vec<FileContext>,
    pub token_count: usize,
}
