use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Runs the binary inside `dir` with an isolated home directory.
fn filecat(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("filecat").expect("Binary exists");
    cmd.current_dir(dir).env("HOME", dir).env_remove("RUST_LOG");
    cmd
}

fn write_inputs(dir: &Path, files: &[(&str, &[u8])]) {
    for (name, content) in files {
        let path = dir.join("input").join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn write_job(dir: &Path, body: &str) -> String {
    let path = dir.join("job.toml");
    fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn includes_are_concatenated_in_declaration_order() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a.txt", b"a"), ("b.txt", b"b")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "-i", "b.txt", "a.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("concatenated 2 file(s)"));

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"ba");
}

#[test]
fn alphabetical_sort_overrides_declaration_order() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a.txt", b"a"), ("b.txt", b"b")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "--sort", "alphabetical", "-i", "b.txt", "a.txt"])
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"ab");
}

#[test]
fn divider_is_inserted_between_files_only() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a", b"a"), ("b", b"b"), ("c", b"c")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "--divider", "X", "--divider-encoding", "UTF-8"])
        .args(["-i", "a", "b", "c"])
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"aXbXc");
}

#[test]
fn divider_without_encoding_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a", b"a")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "--divider", "X"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("divider"));

    assert!(!dir.path().join("out.txt").exists());
}

fn repeated_file_job(dir: &Path, policy: &str) -> String {
    write_inputs(dir, &[("hello.txt", b"hello")]);
    write_job(
        dir,
        &format!(
            r#"
output = "build/out.txt"
repeated_file_policy = "{policy}"

[[filesets]]
directory = "input"
includes = ["hello.txt"]

[[filesets]]
directory = "input"
includes = ["*.txt"]
"#
        ),
    )
}

#[test]
fn repeat_policy_writes_file_twice() {
    let dir = TempDir::new().unwrap();
    let job = repeated_file_job(dir.path(), "repeat");

    filecat(dir.path()).args(["--job", &job]).assert().success();

    assert_eq!(fs::read(dir.path().join("build/out.txt")).unwrap(), b"hellohello");
}

#[test]
fn ignore_policy_writes_file_once() {
    let dir = TempDir::new().unwrap();
    let job = repeated_file_job(dir.path(), "ignore");

    filecat(dir.path()).args(["--job", &job]).assert().success();

    assert_eq!(fs::read(dir.path().join("build/out.txt")).unwrap(), b"hello");
}

#[test]
fn fail_policy_aborts_before_writing() {
    let dir = TempDir::new().unwrap();
    let job = repeated_file_job(dir.path(), "fail");

    filecat(dir.path())
        .args(["--job", &job])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("more than once"));

    assert!(!dir.path().join("build/out.txt").exists());
}

#[test]
fn empty_fileset_fails_by_default() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a.txt", b"a.txt"), ("b.jpg", b"b.jpg")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "-i", "**/*.png"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("fileset at index 0 did not yield any files"));
}

#[test]
fn empty_result_fails_unless_allowed() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a.txt", b"a.txt")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "--allow-empty-match", "-i", "**/*.png"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("filesets did not yield any files"));

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "--allow-empty-match", "--allow-empty-result"])
        .args(["-i", "**/*.png"])
        .assert()
        .success();

    assert_eq!(fs::metadata(dir.path().join("out.txt")).unwrap().len(), 0);
}

#[test]
fn binary_files_round_trip() {
    let dir = TempDir::new().unwrap();
    let head: Vec<u8> = (0..64u8).map(|i| i.wrapping_mul(37) ^ 0xA5).collect();
    let tail: Vec<u8> = (0..64u8).map(|i| 255 - i.wrapping_mul(11)).collect();
    write_inputs(dir.path(), &[("child/part1.bin", &head), ("child/part2.bin", &tail)]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out/output.bin", "--sort", "alphabetical", "-i", "**/*.bin"])
        .assert()
        .success();

    let expected: Vec<u8> = head.iter().chain(tail.iter()).copied().collect();
    assert_eq!(fs::read(dir.path().join("out/output.bin")).unwrap(), expected);
}

#[test]
fn implicit_includes_honour_excludes() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("input.txt", b"input.txt"), ("excluded.txt", b"excluded.txt")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "-e", "excluded.txt"])
        .assert()
        .success();

    assert_eq!(fs::read(dir.path().join("out.txt")).unwrap(), b"input.txt");
}

#[test]
fn selecting_directories_is_unsupported() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("top.txt", b"top"), ("child/deep.txt", b"deep")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "-i", "*"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("child"));
}

#[test]
fn list_prints_resolved_order_without_writing() {
    let dir = TempDir::new().unwrap();
    write_inputs(dir.path(), &[("a.txt", b"a"), ("b.txt", b"b")]);

    filecat(dir.path())
        .args(["-d", "input", "-o", "out.txt", "--list", "-i", "b.txt", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)b\.txt\n.*a\.txt\n$").unwrap());

    assert!(!dir.path().join("out.txt").exists());
}

#[test]
fn include_without_directory_is_rejected_by_parser() {
    let dir = TempDir::new().unwrap();

    filecat(dir.path())
        .args(["-o", "out.txt", "-i", "*.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--directory"));
}
