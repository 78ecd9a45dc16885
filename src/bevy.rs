//! Bevy integration for folder trees.
//!
//! Provides:
//! - `FolderTreePlugin`: builder-pattern plugin that inserts a `FolderTree<T>` resource
//! - `FolderTreeSettings`: resource recording the configuration the tree was built with
//!
//! # Example
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_folders::bevy::*;
//! use bevy_folders::{FolderTree, ROOT_ID, TreeConfig, NameOrder};
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(FolderTreePlugin::<Entity>::new().with_config(TreeConfig {
//!             name_order: NameOrder::CaseInsensitive,
//!             ..default()
//!         }))
//!         .add_systems(Startup, setup_folders)
//!         .run();
//! }
//!
//! fn setup_folders(mut tree: ResMut<FolderTree<Entity>>) {
//!     let guild = tree.create_group(ROOT_ID, "Guild").unwrap();
//! }
//! ```

use bevy::prelude::*;
use std::hash::Hash;
use std::marker::PhantomData;

use crate::config::TreeConfig;
use crate::tree::FolderTree;

// =============================================================================
// Plugin
// =============================================================================

/// Bevy plugin inserting a [`FolderTree<T>`] resource.
///
/// ```ignore
/// App::new().add_plugins(FolderTreePlugin::<Entity>::new())
/// ```
pub struct FolderTreePlugin<T> {
    config: TreeConfig,
    _items: PhantomData<fn() -> T>,
}

impl<T> Default for FolderTreePlugin<T> {
    fn default() -> Self {
        Self {
            config: TreeConfig::default(),
            _items: PhantomData,
        }
    }
}

impl<T> FolderTreePlugin<T> {
    /// Plugin with the default configuration (ordinal names, containers
    /// created closed).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for the tree.
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }
}

impl<T> Plugin for FolderTreePlugin<T>
where
    T: Eq + Hash + Clone + Send + Sync + 'static,
{
    fn build(&self, app: &mut App) {
        app.insert_resource(FolderTree::<T>::with_config(self.config.clone()));
        app.insert_resource(FolderTreeSettings {
            config: self.config.clone(),
        });
    }
}

/// Configuration the [`FolderTree`] resource was created with.
#[derive(Resource, Clone, Debug)]
pub struct FolderTreeSettings {
    pub config: TreeConfig,
}

// =============================================================================
// Resource impl for FolderTree
// =============================================================================

impl<T: Send + Sync + 'static> Resource for FolderTree<T> {}

// =============================================================================
// Tests
// =============================================================================
