use crate::domain::models::{ContextOutput, FileContext};
use log::{debug, info};

const SECTION_DELIMITER: &str = "------------";
const FOOTER: &str = "This input is designed for providing code insights with an LLM.";

fn count_tokens(content: &str) -> usize {
    content.split_whitespace().count()
}

pub fn build_context_output(
    user_prompt: String,
    tree: String,
    extension: String,
    file_list: Vec<String>,
    file_contents: Vec<FileContext>,
) -> ContextOutput {
    debug!("Building context output from {} files", file_contents.len());
    let mut total_tokens = count_tokens(&user_prompt) + count_tokens(&tree);

    for file in &file_contents {
        let tokens = count_tokens(&file.content);
        total_tokens += tokens;
        debug!("Adding file {} with {} tokens", file.path, tokens);
    }

    if file_list.is_empty() {
        info!("No files with extension {} found.", extension);
    }

    ContextOutput {
        user_prompt,
        tree,
        extension,
        file_list,
        file_contents,
        token_count: total_tokens,
    }
}

pub fn format_output(output: &ContextOutput) -> String {
    debug!(
        "Formatting context output with ~{} tokens",
        output.token_count
    );
    let mut result = String::new();

    result.push_str(&output.user_prompt);
    result.push_str("\n\n");
    result.push_str(SECTION_DELIMITER);
    result.push('\n');

    result.push_str(&output.tree);
    result.push('\n');
    result.push_str(SECTION_DELIMITER);
    result.push('\n');

    result.push_str(&format!("Files with extension {}:\n", output.extension));
    result.push_str(&output.file_list.join("\n"));
    result.push('\n');
    result.push_str(SECTION_DELIMITER);
    result.push('\n');

    result.push_str("Contents of files:\n");
    for file in &output.file_contents {
        result.push_str(&format!("\n{}:\n{}\n", file.path, file.content));
    }

    result.push('\n');
    result.push_str(SECTION_DELIMITER);
    result.push('\n');
    result.push_str(FOOTER);
    result.push('\n');

    result
}
