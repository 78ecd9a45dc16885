//! Hierarchy persistence: the container skeleton only.
//!
//! Leaves reference data items whose identity does not survive a restart,
//! so they are never written. The blob records, per item label, the path of
//! the folder the item was placed in, plus the list of open containers:
//!
//! ```json
//! {
//!   "hierarchy": { "user-7": "Guild//Raid/Officers" },
//!   "openFolders": ["Guild", "Guild//Raid"]
//! }
//! ```
//!
//! Reloading rebuilds the folder chains for the live items and reports the
//! folder each item belongs in; the caller creates the leaves.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::Outcome;
use crate::error::PersistError;
use crate::events::{ChangeKind, TreeChange};
use crate::node::{Kind, NodeKind};
use crate::path::{parse_path, sanitize_name};
use crate::tree::FolderTree;
use crate::{NodeId, ROOT_ID};

/// Persisted skeleton: label → folder path, and open container paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyBlob {
    #[serde(default)]
    pub hierarchy: BTreeMap<String, String>,
    #[serde(default)]
    pub open_folders: Vec<String>,
}

impl HierarchyBlob {
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.hierarchy.is_empty() && self.open_folders.is_empty()
    }
}

/// Result of reconciling a blob against live items.
#[derive(Clone, Debug)]
pub struct Restored<T> {
    /// The blob no longer matches the tree; persist again to heal it.
    pub changed: bool,
    /// Folder each live item should be placed in.
    pub placements: HashMap<T, NodeId>,
}

impl<T> Restored<T>
where
    T: Eq + Hash,
{
    #[inline]
    pub fn placement_of(&self, item: &T) -> Option<NodeId> {
        self.placements.get(item).copied()
    }
}

impl<T: Eq + Hash + Clone> FolderTree<T> {
    /// Write the skeleton.
    ///
    /// Each leaf contributes `label_of(data) → folder path`; when an item
    /// sits in several folders the first one in depth-first order wins.
    pub fn serialize(&self, label_of: impl Fn(&T) -> String) -> HierarchyBlob {
        let mut blob = HierarchyBlob::default();
        for id in self.dfs_order() {
            let node = &self.nodes[&id];
            match &node.kind {
                NodeKind::Leaf { data } => {
                    let folder = node.parent.and_then(|p| self.full_path(p));
                    if let Some(folder) = folder {
                        blob.hierarchy
                            .entry(label_of(data))
                            .or_insert_with(|| folder.to_string());
                    }
                }
                _ if node.is_open => blob.open_folders.push(node.full_path.clone()),
                _ => {}
            }
        }
        debug!(
            labels = blob.hierarchy.len(),
            open = blob.open_folders.len(),
            "hierarchy serialized"
        );
        blob
    }

    /// Rebuild the skeleton from `blob` for the given live items.
    ///
    /// 1. The tree is reset to a bare root (ids keep counting up).
    /// 2. Each item with a stored path gets that folder chain; items without
    ///    one get a root-level folder named after their label.
    /// 3. Open flags are re-applied.
    ///
    /// `changed` is set when a stored path could not be rebuilt as a folder
    /// or an open path no longer resolves. Leaves are not created.
    pub fn deserialize<I>(
        &mut self,
        blob: &HierarchyBlob,
        live_items: I,
        label_of: impl Fn(&T) -> String,
    ) -> Restored<T>
    where
        I: IntoIterator<Item = T>,
    {
        self.observers.set_muted(true);
        self.reset();

        let mut changed = false;
        let mut placements = HashMap::new();

        for item in live_items {
            let label = label_of(&item);
            let stored = blob.hierarchy.get(&label);
            let folder = match stored.map(|path| self.restore_chain(path)) {
                Some(Some(folder)) => Some(folder),
                Some(None) => {
                    warn!(label = %label, path = ?stored, "stored folder path could not be rebuilt");
                    changed = true;
                    self.root_folder(&label, &mut changed)
                }
                None => self.root_folder(&label, &mut changed),
            };
            match folder {
                Some(folder) => {
                    placements.insert(item, folder);
                }
                None => {
                    warn!(label = %label, "no folder available for item");
                    changed = true;
                }
            }
        }

        for path in &blob.open_folders {
            match self.find(path) {
                Some(id) => {
                    if let Some(node) = self.nodes.get_mut(&id) {
                        node.is_open = true;
                    }
                }
                None => {
                    warn!(path = %path, "open folder no longer resolves");
                    changed = true;
                }
            }
        }

        self.observers.set_muted(false);
        self.observers.emit(TreeChange::new(
            ChangeKind::Reloaded,
            ROOT_ID,
            None,
            None,
        ));
        debug!(
            nodes = self.len(),
            placed = placements.len(),
            changed,
            "hierarchy restored"
        );
        Restored {
            changed,
            placements,
        }
    }

    /// Rebuild a stored chain; `None` unless it ends in a Folder.
    fn restore_chain(&mut self, path: &str) -> Option<NodeId> {
        let segments = parse_path(path).ok()?;
        if segments.last().map(|s| s.kind) != Some(Kind::Folder) {
            return None;
        }
        match self.create_chain(&segments) {
            (Outcome::Success | Outcome::SuccessNothingDone, Some(id))
                if self.node(id).is_some_and(|n| n.kind() == Kind::Folder) =>
            {
                Some(id)
            }
            _ => None,
        }
    }

    /// Create, or reuse, a root-level folder named after `label`.
    ///
    /// When a Group already holds the name, the folder gets the first free
    /// `"label (n)"` name instead and `changed` is set.
    fn root_folder(&mut self, label: &str, changed: &mut bool) -> Option<NodeId> {
        let base = sanitize_name(label);
        if let Some(id) = self.root_folder_named(&base) {
            return id;
        }
        // One more candidate than there are root children always finds a free name.
        let candidates = self.children(ROOT_ID).len() + 2;
        for n in 2..=candidates {
            let name = format!("{base} ({n})");
            if let Some(id) = self.root_folder_named(&name) {
                warn!(label = %label, name = %name, "label taken by a group, using suffixed folder");
                *changed = true;
                return id;
            }
        }
        None
    }

    /// `None` when another kind holds `name`. Otherwise the free or reused
    /// folder, or `Some(None)` when no folder can be made at all.
    fn root_folder_named(&mut self, name: &str) -> Option<Option<NodeId>> {
        match self.create_node(ROOT_ID, name, NodeKind::folder()) {
            Ok(id) => Some(Some(id)),
            Err(Outcome::ItemExists) => {
                let i = self.search(ROOT_ID, name).ok()?;
                let existing = self.children(ROOT_ID)[i];
                (self.node(existing)?.kind() == Kind::Folder).then_some(Some(existing))
            }
            Err(_) => Some(None),
        }
    }
}
