//! Hierarchy blob on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy_folders::HierarchyBlob;
use tracing::debug;

use crate::StoreError;

/// A JSON hierarchy file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyFile {
    path: PathBuf,
}

impl HierarchyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the blob. A missing file is an empty hierarchy.
    pub fn load(&self) -> Result<HierarchyBlob, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no hierarchy file yet");
                return Ok(HierarchyBlob::default());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        Ok(HierarchyBlob::from_json(&json)?)
    }

    /// Write the blob next to the target and rename it into place.
    pub fn save(&self, blob: &HierarchyBlob) -> Result<(), StoreError> {
        let json = blob.to_json()?;
        let tmp = self.temp_path();
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        fs::write(&tmp, json).map_err(io_err)?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        debug!(
            path = %self.path.display(),
            labels = blob.hierarchy.len(),
            "hierarchy file saved"
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
