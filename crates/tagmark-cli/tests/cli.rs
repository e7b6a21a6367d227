use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tagmark"))
}

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(bin_path()).args(args).output().expect("run")
}

fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(bin_path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("path")
}

#[test]
fn converts_a_file_with_the_default_preset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = temp_file(&dir, "note.md", "**hi** there\n");
    let output = run(&[path_arg(&input)]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "<b>hi</b> there\n");
}

#[test]
fn reads_stdin_when_no_input_is_given() {
    let output = run_with_stdin(&[], "# T\n");
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<size=2em><b>T</b></size>\n"
    );
}

#[test]
fn preset_flag_selects_html() {
    let output = run_with_stdin(&["--preset", "html"], "*x*");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "<em>x</em>\n");
}

#[test]
fn config_file_overrides_styles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = temp_file(
        &dir,
        "tagmark.toml",
        "preset = \"html\"\n\n[bold]\nindicator = \"__\"\nopen = \"<b>\"\nclose = \"</b>\"\n",
    );
    let output = run_with_stdin(&["--config", path_arg(&config)], "__a__ *b*\n");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "<b>a</b> <em>b</em>\n"
    );
}

#[test]
fn invalid_config_reports_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = temp_file(&dir, "broken.toml", "[italics]\nindicator = \"\"\n");
    let output = run_with_stdin(&["--config", path_arg(&config)], "x");

    assert!(!output.status.success(), "expected error exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.toml"), "stderr: {stderr}");
}

#[test]
fn unknown_preset_fails() {
    let output = run_with_stdin(&["--preset", "latex"], "x");
    assert!(!output.status.success(), "expected error exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("latex"), "stderr: {stderr}");
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.md");
    let output = run(&[path_arg(&missing)]);

    assert!(!output.status.success(), "expected error exit code");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absent.md"), "stderr: {stderr}");
}

#[test]
fn sanitized_output_strips_scripts() {
    let output = run_with_stdin(&["--sanitized"], "<script>x</script>**b**\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("<strong>b</strong>"), "stdout: {stdout}");
    assert!(!stdout.contains("<script"), "stdout: {stdout}");
}

#[test]
fn sanitized_conflicts_with_preset() {
    let output = run_with_stdin(&["--sanitized", "--preset", "html"], "x");
    assert!(!output.status.success(), "expected usage error");
}

#[test]
fn preset_conflicts_with_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = temp_file(&dir, "tagmark.toml", "preset = \"html\"\n");
    let output = run_with_stdin(&["--config", path_arg(&config), "--preset", "rich-text"], "*x*");

    assert!(!output.status.success(), "expected usage error");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--preset"), "stderr: {stderr}");
}
