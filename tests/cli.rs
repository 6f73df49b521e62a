use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::tempdir;
use zip::write::SimpleFileOptions;

const FOOTER: &str = "------------\nThis input is designed for providing code insights with an LLM.\n";

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(name.to_string(), SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn flatprompt() -> Command {
    Command::cargo_bin("flatprompt").unwrap()
}

#[test]
fn generate_prints_combined_output_for_directory() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.jl"), "a = 1");
    write_file(&temp.path().join("b.jl"), "b = 2");
    write_file(&temp.path().join("c.txt"), "notes");
    write_file(&temp.path().join("sub/readme.md"), "hidden");

    let output = flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(temp.path())
        .arg("--exclude-dirs")
        .arg("sub")
        .arg("--prompt")
        .arg("Explain this code:")
        .output()
        .unwrap();

    assert!(output.status.success());
    let expected = format!(
        "Explain this code:\n\n------------\n\
         |-- a.jl\n|-- b.jl\n|-- c.txt\n\n------------\n\
         Files with extension .jl:\na.jl\nb.jl\n------------\n\
         Contents of files:\n\na.jl:\na = 1\n\nb.jl:\nb = 2\n\n{}",
        FOOTER
    );
    assert_eq!(String::from_utf8(output.stdout).unwrap(), expected);
}

#[test]
fn generate_truncates_large_folders() {
    let temp = tempdir().unwrap();
    for i in 0..10 {
        write_file(&temp.path().join(format!("f{}.txt", i)), "");
    }

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(temp.path())
        .arg("--file-limit")
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "|-- f0.txt\n|-- f1.txt\n|-- ... (6 more files skipped)\n|-- f8.txt\n|-- f9.txt\n",
        ));
}

#[test]
fn generate_from_archive_writes_output_file() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("project.zip");
    write_zip(
        &archive,
        &[
            ("project/main.jl", "main() = 0"),
            ("project/__MACOSX/junk.jl", "junk"),
        ],
    );
    let out = temp.path().join("context.txt");

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(&archive)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.contains("|-- project/\n    |-- main.jl\n"));
    assert!(!written.contains("|-- __MACOSX/"));
    assert!(written.contains("Files with extension .jl:\nproject/main.jl\nproject/__MACOSX/junk.jl\n"));
    assert!(written.contains("\nproject/main.jl:\nmain() = 0\n"));
    assert!(written.ends_with(FOOTER));
}

#[test]
fn download_names_artifact_after_input() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("repo.zip");
    write_zip(&archive, &[("x.jl", "x")]);

    flatprompt()
        .current_dir(temp.path())
        .arg("generate")
        .arg("--path")
        .arg(&archive)
        .arg("--download")
        .assert()
        .success();

    let artifact = temp.path().join("llm_context_repo.zip.txt");
    assert!(fs::read_to_string(artifact).unwrap().contains("\nx.jl:\nx\n"));
}

#[test]
fn archive_with_escaping_entry_is_rejected() {
    let temp = tempdir().unwrap();
    let archive = temp.path().join("evil.zip");
    write_zip(&archive, &[("../escape.jl", "boom")]);

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "escapes the extraction directory",
        ));

    assert!(!temp.path().parent().unwrap().join("escape.jl").exists());
}

#[test]
fn stdout_matches_output_file_byte_for_byte() {
    let temp = tempdir().unwrap();
    let project = temp.path().join("project");
    write_file(&project.join("m.jl"), "module M end\n");
    let out = temp.path().join("ctx.txt");

    let printed = flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(&project)
        .output()
        .unwrap();
    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(&project)
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(printed.stdout, fs::read(&out).unwrap());
}

#[test]
fn unreadable_file_is_reported_inline() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("bad.jl"), [0xff, 0xfe, 0x80]).unwrap();

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\nbad.jl:\nError reading file: stream did not contain valid UTF-8\n",
        ));
}

#[test]
fn interactive_form_without_terminal_leaves_stdout_clean() {
    let temp = tempdir().unwrap();
    write_file(&temp.path().join("a.jl"), "a");

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(temp.path())
        .arg("--interactive")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("needs stderr attached to a terminal"));
}

#[test]
fn single_text_file_is_echoed() {
    let temp = tempdir().unwrap();
    let script = temp.path().join("tool.py");
    write_file(&script, "print('hello')\n");

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("print('hello')\n"));
}

#[test]
fn missing_input_fails_with_message() {
    let temp = tempdir().unwrap();

    flatprompt()
        .arg("generate")
        .arg("--path")
        .arg(temp.path().join("nothing-here"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path not found"));
}
