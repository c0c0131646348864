use super::{scaffold::go_mod, CliError, Manifest};
use crate::tools::diagnostics::emit_compile_error;
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

/// What to do with the Go module once `main.go` is written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoAction {
    Build,
    Run,
}

impl GoAction {
    fn subcommand(self) -> &'static str {
        match self {
            GoAction::Build => "build",
            GoAction::Run => "run",
        }
    }
}

pub fn read_source(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|err| CliError::io(path, err))
}

/// Compiles one Stella file, reporting compile errors as diagnostics.
#[tracing::instrument(level = "debug", skip(tab_size))]
pub fn compile_file(path: &Path, tab_size: usize) -> Result<String, CliError> {
    let source = read_source(path)?;
    tracing::debug!(bytes = source.len(), "read source");
    crate::compile(&source, tab_size).map_err(|error| {
        emit_compile_error(path, &source, &error);
        CliError::Compile {
            path: path.to_path_buf(),
            error,
        }
    })
}

/// Default output for `tp`: the input path with a `.go` extension.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension("go")
}

pub fn write_output(path: &Path, code: &str) -> Result<(), CliError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|err| CliError::io(dir, err))?;
    }
    fs::write(path, code).map_err(|err| CliError::io(path, err))
}

/// Transpiles the manifest entry of the package at `root` into
/// `<out_dir>/main.go`, creating `go.mod` when the module has none.
/// Returns the output directory.
pub fn transpile_package(root: &Path, tab_size: Option<usize>) -> Result<PathBuf, CliError> {
    let manifest = Manifest::find(root)?;
    let tab_size = tab_size.unwrap_or(manifest.build.tab_size);
    let code = compile_file(&manifest.entry_path(root), tab_size)?;
    let out_dir = manifest.out_dir(root);
    let go_mod_path = out_dir.join("go.mod");
    if !go_mod_path.exists() {
        write_output(&go_mod_path, &go_mod(&manifest.package.name))?;
    }
    write_output(&out_dir.join("main.go"), &code)?;
    tracing::info!(out_dir = %out_dir.display(), "wrote main.go");
    Ok(out_dir)
}

/// Runs `go build .` or `go run .` inside `out_dir`, inheriting stdio.
pub fn run_go(out_dir: &Path, action: GoAction) -> Result<(), CliError> {
    let command = format!("{} .", action.subcommand());
    tracing::debug!(dir = %out_dir.display(), %command, "invoking go");
    let status = Command::new("go")
        .arg(action.subcommand())
        .arg(".")
        .current_dir(out_dir)
        .status()
        .map_err(CliError::GoMissing)?;
    if !status.success() {
        return Err(CliError::GoFailed { command, status });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::scaffold::new_package;

    #[test]
    fn transpiles_the_manifest_entry_into_the_go_module() {
        let dir = tempfile::tempdir().unwrap();
        let root = new_package(dir.path(), "app").unwrap();
        fs::remove_file(root.join("tp/go.mod")).unwrap();

        let out_dir = transpile_package(&root, None).unwrap();
        let main = fs::read_to_string(out_dir.join("main.go")).unwrap();
        assert!(main.starts_with("package main\n"));
        assert!(main.contains("  fmt.Println(\"Hello, world!\")"));
        assert_eq!(
            fs::read_to_string(out_dir.join("go.mod")).unwrap(),
            go_mod("app")
        );
    }

    #[test]
    fn compile_errors_keep_the_source_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.stella");
        fs::write(&path, "function main() -> IO = {\n    let x: int = y\n}\n").unwrap();
        match compile_file(&path, 2) {
            Err(CliError::Compile { path: reported, error }) => {
                assert_eq!(reported, path);
                assert_eq!(error.line, 2);
            }
            other => panic!("expected a compile error, got {other:?}"),
        }
    }

    #[test]
    fn output_defaults_next_to_the_input() {
        assert_eq!(
            default_output(Path::new("demo/hello.stella")),
            PathBuf::from("demo/hello.go")
        );
    }
}
