#[cfg(feature = "clipboard-support")]
use clipboard::{ClipboardContext, ClipboardProvider};
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info, warn};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const PREVIEW_LENGTH: usize = 200;

pub trait OutputWriter {
    fn write(&self, content: &str) -> anyhow::Result<()>;
}

pub struct FileWriter {
    path: String,
}

impl FileWriter {
    pub fn new(path: String) -> Self {
        Self { path }
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to file: {}", self.path);
        fs::write(Path::new(&self.path), content)?;
        info!("Output written to file: {}", self.path);
        Ok(())
    }
}

pub struct ConsoleWriter;

impl OutputWriter for ConsoleWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to console");
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

pub struct ClipboardWriter;

impl OutputWriter for ClipboardWriter {
    #[cfg(feature = "clipboard-support")]
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to clipboard");

        let mut ctx: ClipboardContext = match ClipboardProvider::new() {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
                return Err(anyhow::anyhow!("Failed to access clipboard: {}", e));
            }
        };

        match ctx.set_contents(content.to_owned()) {
            Ok(_) => {
                info!("Output copied to clipboard (size: {} bytes)", content.len());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to copy to clipboard: {}", e);
                Err(anyhow::anyhow!("Failed to copy to clipboard: {}", e))
            }
        }
    }

    #[cfg(not(feature = "clipboard-support"))]
    fn write(&self, _content: &str) -> anyhow::Result<()> {
        warn!("Clipboard requested but clipboard support is not compiled in");
        Err(anyhow::anyhow!(
            "Clipboard support is disabled; rebuild with the `clipboard-support` feature"
        ))
    }
}

/// File name offered for the downloadable artifact of `input_name`.
pub fn download_file_name(input_name: &str) -> String {
    format!("llm_context_{}.txt", input_name)
}

pub fn create_writer(output_path: &Option<String>) -> Box<dyn OutputWriter> {
    match output_path {
        Some(path) => Box::new(FileWriter::new(path.clone())) as Box<dyn OutputWriter>,
        None => Box::new(ConsoleWriter) as Box<dyn OutputWriter>,
    }
}

fn preview(content: &str, length: usize) -> String {
    if content.chars().count() > length {
        let safe_substring: String = content.chars().take(length).collect();
        format!("{}...", safe_substring)
    } else {
        content.to_string()
    }
}

/// Writes the artifact to a file or stdout, then optionally copies it to the
/// clipboard. A clipboard failure is reported but does not undo the write.
pub fn write_output(
    formatted_content: &str,
    output_path: Option<String>,
    clipboard_output: bool,
) -> anyhow::Result<()> {
    let console_only = output_path.is_none();

    if !(clipboard_output && console_only) {
        create_writer(&output_path).write(formatted_content)?;
    }

    if clipboard_output {
        ClipboardWriter.write(formatted_content)?;

        let mut stdout = io::stdout();
        stdout.execute(SetForegroundColor(Color::Green))?;
        writeln!(stdout, "\n📋 Content copied to clipboard!")?;
        stdout.execute(ResetColor)?;

        if console_only {
            writeln!(stdout, "\nPreview of copied content:\n")?;
            writeln!(stdout, "{}", preview(formatted_content, PREVIEW_LENGTH))?;
        }
    }

    Ok(())
}
