//! # Hierarchical Folder Namespace Engine (bevy-folders)
//!
//! Organizes arbitrary data items into user-defined nested groupings.
//! A tree owns three kinds of nodes below its root:
//!
//! ```text
//! Root (Group, unnamed)
//! ├── Guild                 Group   children: Groups or Folders
//! │   └── Raid              Group
//! │       └── Officers      Folder  children: Leaves only
//! │           └── Alice     Leaf    references one data item
//! └── Friends               Folder
//!     └── Bob               Leaf
//! ```
//!
//! Siblings are kept sorted under a pluggable name ordering, so lookups are
//! binary searches. The same data item may be referenced by leaves in several
//! folders; a reverse index maps each item back to its leaves.
//!
//! ## Paths
//!
//! Full paths join names with `//` between nested Groups and `/` everywhere
//! else:
//!
//! ```text
//! Guild//Raid/Officers/Alice
//! Friends/Bob
//! ```
//!
//! ## Persistence
//!
//! Only the container skeleton is persisted (label → folder path, plus the
//! open containers). On reload the skeleton is reconciled against the live
//! item set and the caller re-creates the leaves:
//!
//! ```ignore
//! use bevy_folders::{FolderTree, ROOT_ID};
//!
//! let mut tree = FolderTree::<u64>::new();
//! let guild = tree.create_group(ROOT_ID, "Guild")?.unwrap();
//! let officers = tree.create_folder(guild, "Officers")?.unwrap();
//! tree.create_leaf(officers, "Alice", 7)?;
//!
//! let blob = tree.serialize(|id| format!("user-{id}"));
//! let restored = FolderTree::<u64>::new().deserialize(&blob, [7], |id| format!("user-{id}"));
//! ```

pub mod bevy;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod node;
pub mod path;
pub mod persist;
pub mod tree;

pub use compare::{CaseInsensitive, NameComparator, NameOrder, Ordinal};
pub use config::TreeConfig;
pub use engine::Outcome;
pub use error::{PathError, PersistError, TreeError};
pub use events::{ChangeKind, ObserverId, TreeChange};
pub use node::{Kind, Node, NodeKind};
pub use path::{PathSegment, Separator, parse_path, sanitize_name};
pub use persist::{HierarchyBlob, Restored};
pub use tree::FolderTree;

/// Node identifier, assigned from a per-tree counter and never reused.
pub type NodeId = u32;

/// Root node id. The root is an unnamed Group.
pub const ROOT_ID: NodeId = 0;
