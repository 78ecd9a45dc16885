//! File-backed persistence for bevy-folders.
//!
//! This crate provides:
//! - Parsing `folders.toml` store configuration
//! - Loading and saving the JSON hierarchy file
//! - `restore` / `persist` helpers tying both to a [`FolderTree`]
//!
//! # Usage
//!
//! ```ignore
//! let mut tree = FolderTree::new();
//! let restored = bevy_folders_store::restore("folders.toml", &mut tree, items, |i| i.label())?;
//! for (item, folder) in restored.placements {
//!     tree.create_leaf(folder, &item.label(), item)?;
//! }
//! // ... later
//! bevy_folders_store::persist("folders.toml", &tree, |i| i.label())?;
//! ```
//!
//! # Drift
//!
//! When reloading finds stored paths that no longer rebuild, the tree is
//! healed in memory. With `on_drift = "rewrite"` (default) the healed
//! hierarchy is written back at once; with `on_drift = "keep"` the file is
//! left alone until the next `persist`.

mod file;
mod toml_parser;

pub use file::HierarchyFile;
pub use toml_parser::{OnDrift, StoreConfig, StoreConfigError};

use std::hash::Hash;
use std::path::{Path, PathBuf};

use bevy_folders::{FolderTree, HierarchyBlob, PersistError, Restored, TreeError};
use thiserror::Error;
use tracing::info;

/// Load the store config and hierarchy, then rebuild `tree` for `live_items`.
///
/// The tree's configuration is left as constructed; use
/// [`StoreConfig::tree`] when building it.
pub fn restore<T, I>(
    config_path: impl AsRef<Path>,
    tree: &mut FolderTree<T>,
    live_items: I,
    label_of: impl Fn(&T) -> String,
) -> Result<Restored<T>, StoreError>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let config = StoreConfig::from_file(config_path)?;
    let file = HierarchyFile::new(&config.hierarchy_file);
    let blob = file.load()?;

    let restored = tree.deserialize(&blob, live_items, &label_of);
    if restored.changed {
        match config.on_drift {
            OnDrift::Rewrite => {
                info!(path = %file.path().display(), "hierarchy drifted, rewriting");
                file.save(&healed_blob(tree, &restored, &label_of))?;
            }
            OnDrift::Keep => {
                info!(path = %file.path().display(), "hierarchy drifted, keeping file");
            }
        }
    }
    Ok(restored)
}

/// The restored skeleton as a blob. Leaves are not placed yet, so item
/// placements come from `restored` rather than the tree.
fn healed_blob<T>(
    tree: &FolderTree<T>,
    restored: &Restored<T>,
    label_of: impl Fn(&T) -> String,
) -> HierarchyBlob
where
    T: Eq + Hash + Clone,
{
    let mut blob = HierarchyBlob::default();
    for (item, &folder) in &restored.placements {
        if let Some(path) = tree.full_path(folder) {
            blob.hierarchy.insert(label_of(item), path.to_string());
        }
    }
    blob.open_folders = tree
        .open_containers()
        .into_iter()
        .filter_map(|id| tree.full_path(id).map(str::to_string))
        .collect();
    blob
}

/// Serialize `tree` and save it to the configured hierarchy file.
pub fn persist<T>(
    config_path: impl AsRef<Path>,
    tree: &FolderTree<T>,
    label_of: impl Fn(&T) -> String,
) -> Result<(), StoreError>
where
    T: Eq + Hash + Clone,
{
    let config = StoreConfig::from_file(config_path)?;
    HierarchyFile::new(config.hierarchy_file).save(&tree.serialize(label_of))
}

/// Errors from the file store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config error: {0}")]
    Config(#[from] StoreConfigError),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("hierarchy blob error: {0}")]
    Blob(#[from] PersistError),
    /// Not produced here; lets callers use `?` on tree calls such as
    /// `create_leaf` when placing restored items.
    #[error(transparent)]
    Tree(#[from] TreeError),
}
