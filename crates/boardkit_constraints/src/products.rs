//! Build products: the named artifacts a synthesis backend hands back.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use boardkit_common::ContentHash;
use log::debug;
use tempfile::NamedTempFile;

use crate::error::ProgramError;

/// An in-memory set of named build artifacts (bitstreams, reports, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProducts {
    artifacts: BTreeMap<String, Vec<u8>>,
}

impl BuildProducts {
    /// Creates an empty artifact set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects every regular file directly inside `dir`, keyed by file name.
    ///
    /// Subdirectories and files whose names are not valid UTF-8 are skipped.
    pub fn load_dir(dir: &Path) -> std::io::Result<Self> {
        let mut products = Self::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            products.insert(name, std::fs::read(entry.path())?);
        }
        debug!(
            "loaded {} build products from {}",
            products.len(),
            dir.display()
        );
        Ok(products)
    }

    /// Adds or replaces the artifact `name`.
    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.artifacts.insert(name.into(), bytes.into());
    }

    /// Returns the bytes of the artifact `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.artifacts.get(name).map(Vec::as_slice)
    }

    /// Returns `true` if an artifact called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.artifacts.contains_key(name)
    }

    /// Iterates over the artifact names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.keys().map(String::as_str)
    }

    /// Returns the number of artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns `true` if there are no artifacts.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Writes the artifact `name` to a temporary file.
    ///
    /// The file lives as long as the returned [`ExtractedArtifact`] and is
    /// removed when it is dropped, whichever way the caller leaves its scope.
    pub fn extract(&self, name: &str) -> Result<ExtractedArtifact, ProgramError> {
        let bytes = self
            .get(name)
            .ok_or_else(|| ProgramError::ArtifactNotFound(name.to_string()))?;
        let extract_err = |source| ProgramError::Extract {
            name: name.to_string(),
            source,
        };

        let suffix = format!("-{}", name.replace(['/', '\\'], "_"));
        let mut file = tempfile::Builder::new()
            .prefix("boardkit-")
            .suffix(&suffix)
            .tempfile()
            .map_err(extract_err)?;
        file.write_all(bytes).map_err(extract_err)?;
        file.flush().map_err(extract_err)?;
        let path = file.path().canonicalize().map_err(extract_err)?;

        debug!("extracted {name} ({} bytes) to {}", bytes.len(), path.display());
        Ok(ExtractedArtifact {
            file,
            path,
            digest: ContentHash::from_bytes(bytes),
        })
    }
}

/// A build artifact materialized at a temporary path.
#[derive(Debug)]
pub struct ExtractedArtifact {
    file: NamedTempFile,
    path: PathBuf,
    digest: ContentHash,
}

impl ExtractedArtifact {
    /// Returns the absolute path of the extracted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the digest of the artifact's bytes.
    pub fn digest(&self) -> ContentHash {
        self.digest
    }

    /// Deletes the file now, reporting any error instead of ignoring it on drop.
    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_writes_bytes_and_cleans_up() {
        let mut products = BuildProducts::new();
        products.insert("top.sof", b"bitstream".to_vec());
        let artifact = products.extract("top.sof").unwrap();
        let path = artifact.path().to_path_buf();
        assert!(path.is_absolute());
        assert!(path.to_string_lossy().ends_with("-top.sof"));
        assert_eq!(std::fs::read(&path).unwrap(), b"bitstream");
        assert_eq!(artifact.digest(), ContentHash::from_bytes(b"bitstream"));
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn extract_missing_artifact() {
        let products = BuildProducts::new();
        let err = products.extract("top.sof").unwrap_err();
        assert!(matches!(err, ProgramError::ArtifactNotFound(name) if name == "top.sof"));
    }

    #[test]
    fn load_dir_collects_files_only() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("top.sof"), b"sof").unwrap();
        std::fs::write(dir.path().join("top.rpt"), b"report").unwrap();
        std::fs::create_dir(dir.path().join("db")).unwrap();
        let products = BuildProducts::load_dir(dir.path()).unwrap();
        assert_eq!(products.names().collect::<Vec<_>>(), vec!["top.rpt", "top.sof"]);
        assert_eq!(products.get("top.sof"), Some(&b"sof"[..]));
        assert!(!products.contains("db"));
    }

    #[test]
    fn load_dir_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BuildProducts::load_dir(&dir.path().join("nope")).is_err());
    }
}
