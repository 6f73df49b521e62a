use crate::core::context_generator::{build_context_output, format_output};
use crate::core::filter_form::{FormSettings, edit_filters};
use crate::core::tree_renderer::render_tree;
use crate::domain::models::{
    ContextConfig, DEFAULT_EXTENSION, DEFAULT_FILE_LIMIT, DEFAULT_PROMPT, ExclusionFilters,
    MAX_FILE_LIMIT, MIN_FILE_LIMIT,
};
use crate::infra::file_system::{collect_files_by_extension, read_file_contents};
use crate::infra::input::{InputSource, resolve_input};
use crate::infra::logger::setup_logger;
use crate::infra::output::{download_file_name, write_output};
use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{debug, info, warn};
use std::path::Path;

#[derive(Parser)]
#[command(name = "flatprompt")]
#[command(about = "Flatten a directory or zip archive into an LLM prompt", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    Generate {
        /// Directory, .zip archive, or a single .py/.jl/.txt file
        #[arg(long)]
        path: String,

        /// Suffix of the files whose contents are included
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        ext: String,

        /// Comma-separated file name suffixes hidden from the tree
        #[arg(long, default_value = ".DS_Store,.git")]
        exclude_files: String,

        /// Comma-separated directory names hidden from the tree
        #[arg(long, default_value = "__MACOSX,.git")]
        exclude_dirs: String,

        /// Files shown at the start and end of large folders
        #[arg(long, default_value_t = DEFAULT_FILE_LIMIT as u8, value_parser = clap::value_parser!(u8).range(MIN_FILE_LIMIT as i64..=MAX_FILE_LIMIT as i64))]
        file_limit: u8,

        #[arg(long, default_value = DEFAULT_PROMPT)]
        prompt: String,

        #[arg(long, conflicts_with = "download")]
        output: Option<String>,

        /// Write to llm_context_<input name>.txt in the current directory
        #[arg(long)]
        download: bool,

        #[arg(long)]
        clipboard: bool,

        /// Adjust the filters in a terminal form before generating
        #[arg(long)]
        interactive: bool,
    },
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Commands {
    pub fn into_config(self) -> ContextConfig {
        match self {
            Commands::Generate {
                path,
                ext,
                exclude_files,
                exclude_dirs,
                file_limit,
                prompt,
                output,
                download,
                clipboard,
                interactive,
            } => ContextConfig {
                input_path: path,
                extension: ext,
                filters: ExclusionFilters::new(split_list(&exclude_files), split_list(&exclude_dirs)),
                file_limit: usize::from(file_limit),
                user_prompt: prompt,
                output_path: output,
                download,
                clipboard,
                interactive,
            },
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logger(cli.verbose)?;

    info!("Starting generate command");
    let config = cli.command.into_config();
    debug!("Command parameters: {:?}", config);

    generate_context(config)
}

fn output_target(config: &ContextConfig, input: &InputSource) -> Option<String> {
    match &config.output_path {
        Some(path) => Some(path.clone()),
        None if config.download => Some(download_file_name(input.name())),
        None => None,
    }
}

fn generate_context(mut config: ContextConfig) -> anyhow::Result<()> {
    let input = resolve_input(Path::new(&config.input_path))
        .with_context(|| format!("Failed to load input {}", config.input_path))?;
    let target = output_target(&config, &input);

    let root = match &input {
        InputSource::SingleFile { text, .. } => {
            info!("Writing uploaded file text");
            return write_output(text, target, config.clipboard);
        }
        other => match other.root() {
            Some(root) => root,
            None => anyhow::bail!("Input {} has no directory to flatten", other.name()),
        },
    };

    if config.interactive {
        let current = FormSettings {
            filters: config.filters.clone(),
            file_limit: config.file_limit,
        };
        match edit_filters(&current)? {
            Some(settings) => {
                config.filters = settings.filters;
                config.file_limit = settings.file_limit;
            }
            None => {
                info!("Generation cancelled");
                return Ok(());
            }
        }
    }

    let formatted_output = flatten(root, &config);

    info!("Writing output");
    write_output(&formatted_output, target, config.clipboard)
}

/// Builds the combined artifact for the directory at `root`.
pub fn flatten(root: &Path, config: &ContextConfig) -> String {
    info!("Generating tree for {}", root.display());
    let listing = render_tree(root, &config.filters, config.file_limit);
    for dir in &listing.inaccessible {
        warn!("Directory not accessible, shown as empty: {}", dir.display());
    }

    info!("Collecting files with extension {}", config.extension);
    let files = collect_files_by_extension(root, &config.extension, root);

    info!("Reading {} files", files.len());
    let contents = read_file_contents(root, &files);

    let output = build_context_output(
        config.user_prompt.clone(),
        listing.text,
        config.extension.clone(),
        files,
        contents,
    );
    format_output(&output)
}
