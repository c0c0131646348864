use std::{fs, path::Path, process::Command};

fn stella(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stella"));
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

const HELLO: &str = "function main() -> IO = {\n    println!(\"hi\") // greet\n}\n";

#[test]
fn tp_writes_go_next_to_the_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.stella"), HELLO).unwrap();

    let output = stella(dir.path())
        .args(["tp", "hello.stella"])
        .output()
        .expect("failed to run stella tp");
    assert!(
        output.status.success(),
        "stella tp failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let go = fs::read_to_string(dir.path().join("hello.go")).unwrap();
    assert_eq!(
        go,
        "package main\n\nimport \"fmt\"\n\nfunc main() {\n  fmt.Println(\"hi\")\n}\n"
    );
}

#[test]
fn tp_can_write_to_stdout_with_custom_indent() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("hello.stella"), HELLO).unwrap();

    let output = stella(dir.path())
        .args(["tp", "hello.stella", "-o", "-", "--tab-size", "4"])
        .output()
        .expect("failed to run stella tp");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\n    fmt.Println(\"hi\")\n"), "{stdout}");
    assert!(!dir.path().join("hello.go").exists());
}

#[test]
fn check_reports_the_error_code_and_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("bad.stella"),
        "function main() -> IO = {\n    let x: int = 1\n    x = 2\n}\n",
    )
    .unwrap();

    let output = stella(dir.path())
        .args(["check", "bad.stella"])
        .output()
        .expect("failed to run stella check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stella.immutableAssignment"), "{stderr}");
}

#[test]
fn new_scaffolds_a_package_that_transpiles() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = stella(dir.path())
        .args(["new", "demo"])
        .status()
        .expect("failed to run stella new");
    assert!(status.success());

    let root = dir.path().join("demo");
    assert!(root.join("stella.toml").is_file());
    assert_eq!(
        fs::read_to_string(root.join("tp/go.mod")).unwrap(),
        "module demo\n\ngo 1.21.1\n"
    );

    let check = stella(&root)
        .args(["check", "src/main.stella"])
        .output()
        .expect("failed to run stella check");
    assert!(check.status.success());
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = stella(dir.path())
        .args(["tp", "absent.stella"])
        .output()
        .expect("failed to run stella tp");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to access absent.stella"), "{stderr}");
}
