//! Mutation engine: the internal operations that keep the tree's invariants.
//!
//! Every operation here reports an [`Outcome`] instead of an error; the
//! public methods on [`FolderTree`] validate requests up front and translate
//! the outcomes into their caller contracts.
//!
//! Invariants maintained after every call:
//! - sibling names are non-empty and unique under the active comparator
//! - every child list is sorted under the active comparator
//! - no Group is reachable from one of its own descendants
//! - the reverse index holds exactly the live leaf → data associations
//! - each node's cached full path matches its position

use std::hash::Hash;

use tracing::{debug, trace};

use crate::events::{ChangeKind, TreeChange};
use crate::node::{Kind, Node, NodeKind};
use crate::path::{PathSegment, join, sanitize_name};
use crate::tree::FolderTree;
use crate::{NodeId, ROOT_ID};

/// Result of an engine operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    Success,
    /// Valid request without effect (same name, same parent, existing chain).
    SuccessNothingDone,
    /// Illegal target or kind combination.
    InvalidOperation,
    /// Name taken, or the data item is already present at the destination.
    ItemExists,
    /// Bulk operation moved some but not all children.
    PartialSuccess,
    /// The request would make a Group its own descendant.
    CircularReference,
    /// Bulk operation moved none of its children.
    NoSuccess,
}

impl Outcome {
    /// `Success` or `SuccessNothingDone`.
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success | Self::SuccessNothingDone)
    }
}

impl<T: Eq + Hash + Clone> FolderTree<T> {
    /// Binary search `parent`'s children for `name`.
    ///
    /// `Ok(index)` if a sibling with that name exists, otherwise
    /// `Err(insertion point)`. Unknown parents behave as empty.
    pub(crate) fn search(&self, parent: NodeId, name: &str) -> Result<usize, usize> {
        let result = self.children(parent).binary_search_by(|child| {
            let child_name = self.nodes.get(child).map_or("", |n| n.name.as_str());
            self.comparator.compare(child_name, name)
        });
        trace!(parent, name, ?result, "sibling search");
        result
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn kind_of(&self, id: NodeId) -> Option<Kind> {
        self.nodes.get(&id).map(Node::kind)
    }

    /// Whether `folder` already holds a leaf referencing `data`.
    fn folder_holds(&self, folder: NodeId, data: &T) -> bool {
        self.reverse.get(data).is_some_and(|leaves| {
            leaves
                .iter()
                .any(|leaf| self.nodes.get(leaf).and_then(|n| n.parent) == Some(folder))
        })
    }

    fn index_leaf(&mut self, data: T, leaf: NodeId) {
        self.reverse.entry(data).or_default().insert(leaf);
    }

    fn unindex_leaf(&mut self, data: &T, leaf: NodeId) {
        if let Some(leaves) = self.reverse.get_mut(data) {
            leaves.remove(&leaf);
            if leaves.is_empty() {
                self.reverse.remove(data);
            }
        }
    }

    /// Insert `child` into its parent's sorted child list.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let Some(name) = self.nodes.get(&child).map(|n| n.name.clone()) else {
            return;
        };
        let pos = match self.search(parent, &name) {
            Ok(i) | Err(i) => i,
        };
        if let Some(children) = self.nodes.get_mut(&parent).and_then(Node::children_mut) {
            children.insert(pos, child);
        }
    }

    /// Remove `child` from its parent's child list.
    fn detach(&mut self, child: NodeId) {
        let Some((parent, name)) = self
            .nodes
            .get(&child)
            .and_then(|n| n.parent.map(|p| (p, n.name.clone())))
        else {
            return;
        };
        let pos = match self.search(parent, &name) {
            Ok(i) if self.children(parent)[i] == child => Some(i),
            _ => self.children(parent).iter().position(|&c| c == child),
        };
        if let (Some(pos), Some(children)) = (
            pos,
            self.nodes.get_mut(&parent).and_then(Node::children_mut),
        ) {
            children.remove(pos);
        }
    }

    /// Recompute cached full paths for `id` and its whole subtree.
    fn refresh_paths(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            let path = match node.parent.and_then(|p| self.nodes.get(&p)) {
                Some(parent) => join(&parent.full_path, parent.kind(), node.kind(), &node.name),
                None => String::new(),
            };
            stack.extend(node.children().iter().copied());
            if let Some(node) = self.nodes.get_mut(&current) {
                node.full_path = path;
            }
        }
    }

    /// Create a node under `parent`. `Err` carries the rejecting outcome.
    pub(crate) fn create_node(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind<T>,
    ) -> Result<NodeId, Outcome> {
        let Some((parent_path, parent_kind)) = self
            .nodes
            .get(&parent)
            .map(|n| (n.full_path.clone(), n.kind()))
        else {
            return Err(Outcome::InvalidOperation);
        };
        if !parent_kind.accepts(kind.kind()) {
            return Err(Outcome::InvalidOperation);
        }
        let name = sanitize_name(name);
        if name.is_empty() {
            return Err(Outcome::InvalidOperation);
        }
        if self.search(parent, &name).is_ok() {
            trace!(parent, name = %name, "create rejected: name taken");
            return Err(Outcome::ItemExists);
        }
        if let NodeKind::Leaf { data } = &kind
            && self.folder_holds(parent, data)
        {
            trace!(parent, name = %name, "create rejected: data already in folder");
            return Err(Outcome::ItemExists);
        }

        let id = self.alloc_id();
        let full_path = join(&parent_path, parent_kind, kind.kind(), &name);
        let leaf_data = match &kind {
            NodeKind::Leaf { data } => Some(data.clone()),
            _ => None,
        };
        let is_open = self.config.open_new_containers && leaf_data.is_none();
        debug!(id, parent, path = %full_path, kind = ?kind.kind(), "node created");

        self.nodes.insert(
            id,
            Node {
                id,
                name,
                parent: Some(parent),
                full_path,
                is_open,
                kind,
            },
        );
        self.attach(parent, id);
        if let Some(data) = leaf_data {
            self.index_leaf(data, id);
        }
        self.observers
            .emit(TreeChange::new(ChangeKind::Created, id, None, Some(parent)));
        Ok(id)
    }

    /// Rename a node in place, re-sorting its siblings.
    pub(crate) fn rename_node(&mut self, id: NodeId, new_name: &str) -> Outcome {
        if id == ROOT_ID {
            return Outcome::InvalidOperation;
        }
        let Some((parent, old_name)) = self
            .nodes
            .get(&id)
            .and_then(|n| n.parent.map(|p| (p, n.name.clone())))
        else {
            return Outcome::InvalidOperation;
        };
        let name = sanitize_name(new_name);
        if name.is_empty() {
            return Outcome::InvalidOperation;
        }
        if name == old_name {
            trace!(id, name = %name, "rename is a no-op");
            return Outcome::SuccessNothingDone;
        }
        if let Ok(i) = self.search(parent, &name)
            && self.children(parent)[i] != id
        {
            return Outcome::ItemExists;
        }

        self.detach(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name;
        }
        self.attach(parent, id);
        self.refresh_paths(id);
        debug!(id, from = %old_name, path = ?self.full_path(id), "node renamed");
        self.observers.emit(TreeChange::new(
            ChangeKind::Renamed,
            id,
            Some(parent),
            Some(parent),
        ));
        Outcome::Success
    }

    /// Move a node under `new_parent`, optionally renaming it on the way.
    pub(crate) fn relocate(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        new_name: Option<&str>,
    ) -> Outcome {
        if id == ROOT_ID {
            return Outcome::InvalidOperation;
        }
        let (Some(kind), Some(parent_kind)) = (self.kind_of(id), self.kind_of(new_parent)) else {
            return Outcome::InvalidOperation;
        };
        if !parent_kind.accepts(kind) {
            return Outcome::InvalidOperation;
        }
        let Some(old_parent) = self.parent_of(id) else {
            return Outcome::InvalidOperation;
        };

        if old_parent == new_parent {
            return match new_name {
                Some(name) => self.rename_node(id, name),
                None => Outcome::SuccessNothingDone,
            };
        }
        if kind == Kind::Group && self.is_descendant_of(new_parent, id) {
            return Outcome::CircularReference;
        }

        let name = match new_name {
            Some(name) => sanitize_name(name),
            None => self.nodes[&id].name.clone(),
        };
        if name.is_empty() {
            return Outcome::InvalidOperation;
        }
        if self.search(new_parent, &name).is_ok() {
            return Outcome::ItemExists;
        }
        if let Some(data) = self.get_leaf_data(id)
            && self.folder_holds(new_parent, data)
        {
            return Outcome::ItemExists;
        }

        self.detach(id);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name;
            node.parent = Some(new_parent);
        }
        self.attach(new_parent, id);
        self.refresh_paths(id);
        debug!(id, old_parent, new_parent, path = ?self.full_path(id), "node moved");
        self.observers.emit(TreeChange::new(
            ChangeKind::Moved,
            id,
            Some(old_parent),
            Some(new_parent),
        ));
        Outcome::Success
    }

    /// Move every child of `source` into `dest`; delete `source` only when
    /// all of them moved.
    pub(crate) fn merge_nodes(&mut self, source: NodeId, dest: NodeId) -> Outcome {
        if source == ROOT_ID {
            return Outcome::InvalidOperation;
        }
        let kinds = (self.kind_of(source), self.kind_of(dest));
        match kinds {
            (Some(Kind::Folder), Some(Kind::Folder)) if source == dest => {
                return Outcome::InvalidOperation;
            }
            (Some(Kind::Folder), Some(Kind::Folder)) => {}
            (Some(Kind::Group), Some(Kind::Group)) => {
                // Covers `dest == source` too.
                if self.is_descendant_of(dest, source) {
                    return Outcome::CircularReference;
                }
            }
            _ => return Outcome::InvalidOperation,
        }

        let total = self.children(source).len();
        let mut moved = 0;
        let mut idx = 0;
        while let Some(&child) = self.children(source).get(idx) {
            // A successful move shrinks the list, so the index only
            // advances past children that stayed.
            match self.relocate(child, dest, None) {
                Outcome::Success => moved += 1,
                _ => idx += 1,
            }
        }

        let outcome = if moved == total {
            Outcome::Success
        } else if moved > 0 {
            Outcome::PartialSuccess
        } else {
            Outcome::NoSuccess
        };
        debug!(source, dest, moved, total, ?outcome, "merge finished");

        if outcome == Outcome::Success {
            self.delete_node(source);
        }
        outcome
    }

    /// Walk the chain of container segments from the root, creating what is
    /// missing. Returns the deepest node.
    pub(crate) fn create_chain(&mut self, segments: &[PathSegment]) -> (Outcome, Option<NodeId>) {
        let mut current = ROOT_ID;
        let mut created = false;

        for segment in segments {
            if segment.kind == Kind::Leaf {
                return (Outcome::InvalidOperation, None);
            }
            match self.search(current, &segment.name) {
                Ok(i) => {
                    let existing = self.children(current)[i];
                    if self.kind_of(existing) != Some(segment.kind) {
                        return (Outcome::ItemExists, None);
                    }
                    current = existing;
                }
                Err(_) => {
                    let kind = match segment.kind {
                        Kind::Group => NodeKind::group(),
                        _ => NodeKind::folder(),
                    };
                    match self.create_node(current, &segment.name, kind) {
                        Ok(id) => {
                            current = id;
                            created = true;
                        }
                        Err(outcome) => return (outcome, None),
                    }
                }
            }
        }

        if current == ROOT_ID {
            return (Outcome::InvalidOperation, None);
        }
        let outcome = if created {
            Outcome::Success
        } else {
            Outcome::SuccessNothingDone
        };
        (outcome, Some(current))
    }

    /// Remove a node and its subtree, purging leaves from the reverse index.
    pub(crate) fn delete_node(&mut self, id: NodeId) -> Outcome {
        if id == ROOT_ID {
            return Outcome::InvalidOperation;
        }
        let Some(parent) = self.parent_of(id) else {
            return Outcome::InvalidOperation;
        };
        self.detach(id);

        let mut removed = 0usize;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.remove(&current) else {
                continue;
            };
            removed += 1;
            match node.kind {
                NodeKind::Group { children } | NodeKind::Folder { children } => {
                    stack.extend(children)
                }
                NodeKind::Leaf { data } => self.unindex_leaf(&data, current),
            }
        }
        debug!(id, parent, removed, "subtree deleted");
        self.observers
            .emit(TreeChange::new(ChangeKind::Deleted, id, Some(parent), None));
        Outcome::Success
    }

    /// Drop everything below the root. The id counter keeps running.
    pub(crate) fn reset(&mut self) {
        self.nodes.retain(|&id, _| id == ROOT_ID);
        if let Some(root) = self.nodes.get_mut(&ROOT_ID) {
            *root = Node::root();
        }
        self.reverse.clear();
    }
}
