pub mod build;
pub mod manifest;
pub mod scaffold;

pub use manifest::{Manifest, ManifestError, MANIFEST_FILE};

use crate::language::errors::CompileError;
use std::{path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Failures of the command-line driver, as opposed to errors in the
/// Stella program being compiled.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("{} failed to compile: {error}", path.display())]
    Compile { path: PathBuf, error: CompileError },
    #[error("could not start `go`; is the Go toolchain installed? ({0})")]
    GoMissing(std::io::Error),
    #[error("`go {command}` exited with {status}")]
    GoFailed { command: String, status: ExitStatus },
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("`{0}` is not a valid package name")]
    InvalidName(String),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.into(),
            source,
        }
    }
}
