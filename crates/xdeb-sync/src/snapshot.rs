use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compression;

/// A single installable package parsed from an APT index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
    /// Absolute download URL (`<provider url>/<Filename>`).
    pub url: String,
    pub sha256: String,
}

/// Normalized result of syncing one (provider, distribution, component).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    #[serde(rename = "xdeb", default)]
    pub packages: Vec<PackageEntry>,
}

impl RepositorySnapshot {
    pub fn new(packages: Vec<PackageEntry>) -> Self {
        Self { packages }
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Serialize to YAML and compress with the local codec.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        let yaml = serde_yaml_ng::to_string(self)
            .map_err(|e| SnapshotError::Serialize(e.to_string()))?;
        Ok(compression::compress(yaml.as_bytes())?)
    }

    /// Inverse of [`RepositorySnapshot::encode`].
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let yaml = compression::decompress(bytes)?;
        serde_yaml_ng::from_slice(&yaml).map_err(|e| SnapshotError::Serialize(e.to_string()))
    }

    /// Replace the snapshot at `path` wholesale.
    ///
    /// The payload lands in a sibling temporary file first and is renamed
    /// over the target, so readers see either the old or the new snapshot.
    pub fn write_to(&self, path: &Path) -> Result<(), SnapshotError> {
        let bytes = self.encode()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| SnapshotError::io(parent, e))?;
        }

        let staging = staging_path(path);
        let result = fs::write(&staging, &bytes)
            .map_err(|e| SnapshotError::io(&staging, e))
            .and_then(|()| fs::rename(&staging, path).map_err(|e| SnapshotError::io(path, e)));

        if result.is_err() {
            let _ = fs::remove_file(&staging);
        }
        result
    }

    /// Read a snapshot previously written with [`RepositorySnapshot::write_to`].
    pub fn read_from(path: &Path) -> Result<Self, SnapshotError> {
        let bytes = fs::read(path).map_err(|e| SnapshotError::io(path, e))?;
        Self::decode(&bytes)
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Errors that can occur while persisting or loading a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("serialization error: {0}")]
    Serialize(String),

    #[error(transparent)]
    Compression(#[from] compression::CompressionError),

    #[error("I/O error at {path}: {message}")]
    Io { path: PathBuf, message: String },
}

impl SnapshotError {
    fn io(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}
