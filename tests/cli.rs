use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

fn loxy(args: &[&str], stdin: &str) -> Output {
  let mut child = Command::new(env!("CARGO_BIN_EXE_loxy"))
    .args(["--color", "never"])
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .spawn()
    .unwrap();
  child
    .stdin
    .take()
    .unwrap()
    .write_all(stdin.as_bytes())
    .unwrap();
  child.wait_with_output().unwrap()
}

fn script(dir: &Path, text: &str) -> String {
  let path = dir.join("input.lox");
  std::fs::write(&path, text).unwrap();
  path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn file_prints_the_tree() {
  let dir = tempfile::tempdir().unwrap();
  let path = script(dir.path(), "(1 + 2) * 3\n");
  let output = loxy(&[&path], "");
  assert_eq!(output.status.code(), Some(0));
  assert_eq!(stdout(&output), "(* (group (+ 1 2)) 3)\n");
}

#[test]
fn syntax_errors_exit_with_compile_status() {
  let dir = tempfile::tempdir().unwrap();
  let path = script(dir.path(), "1 @ 2\n");
  let output = loxy(&[&path], "");
  assert_eq!(output.status.code(), Some(65));
  let err = stderr(&output);
  assert!(err.contains("error: Unexpected character '@'."));
  assert!(err.contains(&format!(" --> {path}:1:3")));
  assert!(err.contains("1 | 1 @ 2"));
}

#[test]
fn unterminated_string_is_reported_once() {
  let dir = tempfile::tempdir().unwrap();
  let path = script(dir.path(), "\"abc");
  let output = loxy(&[&path], "");
  assert_eq!(output.status.code(), Some(65));
  let err = stderr(&output);
  assert_eq!(err.matches("error: Unterminated string.").count(), 1);
  assert_eq!(err.matches("error: ").count(), 1);
}

#[test]
fn missing_file_exits_with_file_status() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("missing.lox").to_string_lossy().into_owned();
  let output = loxy(&[&path], "");
  assert_eq!(output.status.code(), Some(74));
  assert!(stderr(&output).contains("Could not find file"));
}

#[test]
fn too_many_arguments_is_a_usage_error() {
  let output = loxy(&["a.lox", "b.lox"], "");
  assert_eq!(output.status.code(), Some(64));
}

#[test]
fn prompt_reads_until_end_of_input() {
  let output = loxy(&[], "1 - 2 - 3\n\n(1\n!true\n");
  assert_eq!(output.status.code(), Some(0));
  let out = stdout(&output);
  assert!(out.contains("(- (- 1 2) 3)\n"));
  assert!(out.contains("(group 1)\n"));
  assert!(out.contains("(! true)\n"));
  assert!(stderr(&output).contains("error: Expect ')' after expression."));
}

#[test]
fn token_listing() {
  let output = loxy(&["--tokens"], "1.\n");
  let out = stdout(&output);
  assert!(out.contains("[NUMBER] \"1\"\n[DOT] \".\"\n[EOF] \"\"\n"));
  assert!(stderr(&output).contains("info: DOT"));
}
