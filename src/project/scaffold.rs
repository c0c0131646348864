use super::{CliError, Manifest, MANIFEST_FILE};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const GO_VERSION: &str = "1.21.1";

const MAIN_TEMPLATE: &str = "function main() -> IO = {\n    println!(\"Hello, world!\")\n}\n";

pub fn go_mod(name: &str) -> String {
    format!("module {name}\n\ngo {GO_VERSION}\n")
}

fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Creates `<parent>/<name>` with a manifest, an entry file and the Go module
/// the transpiled output is built in. Returns the new package root.
pub fn new_package(parent: &Path, name: &str) -> Result<PathBuf, CliError> {
    if !valid_name(name) {
        return Err(CliError::InvalidName(name.to_string()));
    }
    let root = parent.join(name);
    if root.exists() {
        return Err(CliError::AlreadyExists(root));
    }
    let manifest = Manifest::new(name);
    let entry = manifest.entry_path(&root);
    let out_dir = manifest.out_dir(&root);

    let files = [
        (root.join(MANIFEST_FILE), manifest.to_toml()?),
        (entry, MAIN_TEMPLATE.to_string()),
        (out_dir.join("go.mod"), go_mod(name)),
    ];
    for (path, contents) in files {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|err| CliError::io(dir, err))?;
        }
        fs::write(&path, contents).map_err(|err| CliError::io(&path, err))?;
        tracing::debug!(path = %path.display(), "created");
    }
    Ok(root)
}
