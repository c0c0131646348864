use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

pub const MANIFEST_FILE: &str = "stella.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub package: PackageSection,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSection {
    pub name: String,
    #[serde(default = "default_entry")]
    pub entry: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            tab_size: default_tab_size(),
        }
    }
}

fn default_entry() -> PathBuf {
    PathBuf::from("src/main.stella")
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("tp")
}

fn default_tab_size() -> usize {
    2
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("no stella.toml found in {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to serialize manifest: {0}")]
    Serialize(String),
}

impl Manifest {
    pub fn new(name: &str) -> Self {
        Self {
            package: PackageSection {
                name: name.to_string(),
                entry: default_entry(),
            },
            build: BuildSection::default(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self, ManifestError> {
        toml::from_str(content).map_err(|error| ManifestError::Parse {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    /// Loads `stella.toml` from the module root `dir`.
    pub fn find(dir: &Path) -> Result<Self, ManifestError> {
        let path = dir.join(MANIFEST_FILE);
        if !path.is_file() {
            return Err(ManifestError::Missing(dir.to_path_buf()));
        }
        let manifest = Self::load(&path)?;
        tracing::debug!(
            path = %path.display(),
            name = %manifest.package.name,
            entry = %manifest.package.entry.display(),
            "loaded manifest"
        );
        Ok(manifest)
    }

    pub fn to_toml(&self) -> Result<String, ManifestError> {
        toml::to_string_pretty(self).map_err(|error| ManifestError::Serialize(error.to_string()))
    }

    pub fn entry_path(&self, root: &Path) -> PathBuf {
        root.join(&self.package.entry)
    }

    pub fn out_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.build.out_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let manifest = Manifest::parse(Path::new("stella.toml"), "[package]\nname = \"demo\"\n").unwrap();
        assert_eq!(manifest, Manifest::new("demo"));
        assert_eq!(manifest.build.tab_size, 2);
        assert_eq!(manifest.out_dir(Path::new("/p")), PathBuf::from("/p/tp"));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let text = indoc! {r#"
            [package]
            name = "demo"
            entry = "app.stella"

            [build]
            out_dir = "go"
            tab_size = 4
        "#};
        let manifest = Manifest::parse(Path::new("stella.toml"), text).unwrap();
        assert_eq!(manifest.package.entry, PathBuf::from("app.stella"));
        assert_eq!(manifest.build.out_dir, PathBuf::from("go"));
        assert_eq!(manifest.build.tab_size, 4);
    }

    #[test]
    fn round_trips_through_toml() {
        let manifest = Manifest::new("demo");
        let text = manifest.to_toml().unwrap();
        assert_eq!(Manifest::parse(Path::new("stella.toml"), &text).unwrap(), manifest);
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = Manifest::parse(Path::new("bad/stella.toml"), "[package\n").unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert!(err.to_string().starts_with("failed to parse bad/stella.toml"));
    }
}
