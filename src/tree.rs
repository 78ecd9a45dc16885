//! Folder tree: the public operation surface.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

use crate::compare::NameComparator;
use crate::config::TreeConfig;
use crate::engine::Outcome;
use crate::error::{PathError, TreeError};
use crate::events::{ChangeKind, ObserverId, Observers, TreeChange};
use crate::node::{Kind, Node, NodeKind};
use crate::path::{Separator, parse_path, sanitize_name, split_steps};
use crate::{NodeId, ROOT_ID};

/// A tree of Groups, Folders and Leaves over data items `T`.
///
/// Provides:
/// - Sorted sibling lists with binary-search lookup
/// - Rename / move / merge / delete with multi-outcome results
/// - Path lookup and idempotent chain creation
/// - A reverse index from data item to the leaves referencing it
/// - Synchronous change notifications
///
/// Requests that can never be valid (touching the root, wrong node kinds,
/// unknown ids) return `Err`. Name collisions and no-ops are ordinary
/// results.
pub struct FolderTree<T> {
    pub(crate) nodes: HashMap<NodeId, Node<T>>,
    /// Next id to hand out. Only advanced on a successful creation.
    pub(crate) next_id: NodeId,
    pub(crate) comparator: Box<dyn NameComparator>,
    pub(crate) config: TreeConfig,
    pub(crate) reverse: HashMap<T, BTreeSet<NodeId>>,
    pub(crate) observers: Observers,
}

impl<T: Eq + Hash + Clone> Default for FolderTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FolderTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FolderTree")
            .field("nodes", &self.nodes.len())
            .field("next_id", &self.next_id)
            .field("indexed_items", &self.reverse.len())
            .field("config", &self.config)
            .finish()
    }
}

impl<T: Eq + Hash + Clone> FolderTree<T> {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Build a tree using the comparator selected by `config.name_order`.
    pub fn with_config(config: TreeConfig) -> Self {
        let comparator = config.name_order.comparator();
        Self::assemble(config, comparator)
    }

    /// Build a tree with a custom sibling ordering.
    ///
    /// The stored config is the default one, so `config().name_order` does
    /// not describe the custom ordering.
    pub fn with_comparator(comparator: impl NameComparator + 'static) -> Self {
        Self::assemble(TreeConfig::default(), Box::new(comparator))
    }

    fn assemble(config: TreeConfig, comparator: Box<dyn NameComparator>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(ROOT_ID, Node::root());
        Self {
            nodes,
            next_id: ROOT_ID + 1,
            comparator,
            config,
            reverse: HashMap::new(),
            observers: Observers::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[inline]
    pub fn root(&self) -> &Node<T> {
        &self.nodes[&ROOT_ID]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(&id)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of nodes below the root.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted children of `id` (empty for leaves and unknown ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children()).unwrap_or(&[])
    }

    #[inline]
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id)?.parent
    }

    #[inline]
    pub fn full_path(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(&id).map(|n| n.full_path.as_str())
    }

    /// Data referenced by a leaf.
    #[inline]
    pub fn get_leaf_data(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(&id)?.data()
    }

    /// All leaves referencing `data`, or `None` if no leaf does.
    #[inline]
    pub fn leaves_for(&self, data: &T) -> Option<&BTreeSet<NodeId>> {
        self.reverse.get(data)
    }

    /// Check if `candidate` is `ancestor` or lies below it.
    pub fn is_descendant_of(&self, candidate: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(candidate);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// All nodes below the root in depth-first order, siblings sorted.
    pub fn dfs_order(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.len());
        let mut stack: Vec<NodeId> = self.children(ROOT_ID).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        out
    }

    /// Containers whose expand flag is set, depth-first.
    pub fn open_containers(&self) -> Vec<NodeId> {
        self.dfs_order()
            .into_iter()
            .filter(|id| self.nodes[id].is_container() && self.nodes[id].is_open)
            .collect()
    }

    /// Resolve a Group or Folder by full path.
    ///
    /// Separators must match the node kinds: `//` only in front of a Group,
    /// `/` in front of anything else.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.resolve(path)
            .filter(|id| self.nodes.get(id).is_some_and(|n| n.is_container()))
    }

    /// Resolve a Leaf by full path.
    pub fn find_leaf(&self, path: &str) -> Option<NodeId> {
        self.resolve(path)
            .filter(|id| self.nodes.get(id).is_some_and(|n| !n.is_container()))
    }

    fn resolve(&self, path: &str) -> Option<NodeId> {
        let mut current = ROOT_ID;
        for step in split_steps(path) {
            let name = sanitize_name(step.name);
            let idx = self.search(current, &name).ok()?;
            let child = self.children(current)[idx];
            let is_group = self.nodes.get(&child)?.kind() == Kind::Group;
            match step.separator {
                Some(Separator::Doubled) if !is_group => return None,
                Some(Separator::Single) if is_group => return None,
                _ => {}
            }
            current = child;
        }
        (current != ROOT_ID).then_some(current)
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Create a Group under a Group (or the root).
    ///
    /// Returns `Ok(None)` if the name is already taken.
    pub fn create_group(&mut self, parent: NodeId, name: &str) -> Result<Option<NodeId>, TreeError> {
        self.expect_kind(parent, Kind::Group, "a group")?;
        self.create(parent, name, NodeKind::group(), "create_group")
    }

    /// Create a Folder under a Group (or the root).
    ///
    /// Returns `Ok(None)` if the name is already taken.
    pub fn create_folder(&mut self, parent: NodeId, name: &str) -> Result<Option<NodeId>, TreeError> {
        self.expect_kind(parent, Kind::Group, "a group")?;
        self.create(parent, name, NodeKind::folder(), "create_folder")
    }

    /// Create a Leaf referencing `data` inside a Folder.
    ///
    /// Returns `Ok(None)` if the name is taken or the folder already holds a
    /// leaf for the same data item.
    pub fn create_leaf(
        &mut self,
        folder: NodeId,
        name: &str,
        data: T,
    ) -> Result<Option<NodeId>, TreeError> {
        self.expect_kind(folder, Kind::Folder, "a folder")?;
        self.create(folder, name, NodeKind::Leaf { data }, "create_leaf")
    }

    fn create(
        &mut self,
        parent: NodeId,
        name: &str,
        kind: NodeKind<T>,
        op: &'static str,
    ) -> Result<Option<NodeId>, TreeError> {
        let name = checked_name(name)?;
        match self.create_node(parent, &name, kind) {
            Ok(id) => Ok(Some(id)),
            Err(Outcome::ItemExists) => Ok(None),
            Err(outcome) => Err(TreeError::InvalidOperation { op, outcome }),
        }
    }

    /// Walk the container chain named by `path`, creating missing Groups and
    /// Folders. Returns the deepest node of the chain.
    ///
    /// - `Success`: at least one node was created
    /// - `SuccessNothingDone`: the whole chain already existed
    /// - `ItemExists` (node `None`): a segment name is held by a node of the
    ///   wrong kind
    pub fn find_or_create_chain(
        &mut self,
        path: &str,
    ) -> Result<(Outcome, Option<NodeId>), TreeError> {
        let segments = parse_path(path)?;
        if segments.iter().any(|s| s.kind == Kind::Leaf) {
            return Err(PathError::LeafInChain(path.to_string()).into());
        }
        match self.create_chain(&segments) {
            (Outcome::InvalidOperation, _) => Err(TreeError::InvalidOperation {
                op: "find_or_create_chain",
                outcome: Outcome::InvalidOperation,
            }),
            result => Ok(result),
        }
    }

    /// Rename a node. Returns `Success`, `SuccessNothingDone` or `ItemExists`.
    pub fn rename(&mut self, id: NodeId, name: &str) -> Result<Outcome, TreeError> {
        self.expect_mutable(id)?;
        let name = checked_name(name)?;
        finish(self.rename_node(id, &name), "rename")
    }

    /// Move a node under a new parent, optionally renaming it.
    ///
    /// Leaves move between Folders; Groups and Folders move between Groups.
    /// Returns `Success`, `SuccessNothingDone`, `ItemExists` or
    /// `CircularReference`.
    pub fn move_node(
        &mut self,
        id: NodeId,
        new_parent: NodeId,
        new_name: Option<&str>,
    ) -> Result<Outcome, TreeError> {
        let kind = self.expect_mutable(id)?.kind();
        let parent_kind = self.expect_node(new_parent)?.kind();
        if !parent_kind.accepts(kind) {
            let expected = if kind == Kind::Leaf { "a folder" } else { "a group" };
            return Err(TreeError::KindMismatch {
                node: new_parent,
                expected,
                found: parent_kind,
            });
        }
        let new_name = new_name.map(checked_name).transpose()?;
        finish(self.relocate(id, new_parent, new_name.as_deref()), "move_node")
    }

    /// Merge the children of `source` into `dest` (two Groups or two Folders).
    ///
    /// Returns `Success` (source deleted), `PartialSuccess`, `NoSuccess` or
    /// `CircularReference`. Partial merges are not rolled back.
    pub fn merge(&mut self, source: NodeId, dest: NodeId) -> Result<Outcome, TreeError> {
        let source_kind = self.expect_mutable(source)?.kind();
        let dest_kind = self.expect_node(dest)?.kind();
        if source_kind != dest_kind {
            let expected = if source_kind == Kind::Folder { "a folder" } else { "a group" };
            return Err(TreeError::KindMismatch {
                node: dest,
                expected,
                found: dest_kind,
            });
        }
        if source_kind == Kind::Leaf {
            return Err(TreeError::KindMismatch {
                node: source,
                expected: "a group or folder",
                found: Kind::Leaf,
            });
        }
        finish(self.merge_nodes(source, dest), "merge")
    }

    /// Delete a node and everything below it.
    pub fn delete(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.expect_mutable(id)?;
        finish(self.delete_node(id), "delete").map(|_| ())
    }

    /// Set the persisted expand flag of a node.
    pub fn set_open_state(&mut self, id: NodeId, open: bool) -> Result<(), TreeError> {
        let node = self.nodes.get_mut(&id).ok_or(TreeError::UnknownNode(id))?;
        if node.is_open == open {
            return Ok(());
        }
        node.is_open = open;
        let parent = node.parent;
        self.observers.emit(TreeChange::new(
            ChangeKind::OpenStateChanged,
            id,
            parent,
            parent,
        ));
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Observers
    // -------------------------------------------------------------------------

    /// Register a callback invoked after every successful mutation.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&TreeChange) + Send + Sync + 'static,
    ) -> ObserverId {
        self.observers.subscribe(Box::new(observer))
    }

    /// Returns `true` if the observer was registered.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    #[inline]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn expect_node(&self, id: NodeId) -> Result<&Node<T>, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::UnknownNode(id))
    }

    fn expect_mutable(&self, id: NodeId) -> Result<&Node<T>, TreeError> {
        if id == ROOT_ID {
            return Err(TreeError::RootImmutable);
        }
        self.expect_node(id)
    }

    fn expect_kind(&self, id: NodeId, kind: Kind, expected: &'static str) -> Result<(), TreeError> {
        let found = self.expect_node(id)?.kind();
        if found != kind {
            return Err(TreeError::KindMismatch {
                node: id,
                expected,
                found,
            });
        }
        Ok(())
    }
}

fn checked_name(name: &str) -> Result<String, TreeError> {
    let name = sanitize_name(name);
    if name.is_empty() {
        return Err(TreeError::EmptyName);
    }
    Ok(name)
}

fn finish(outcome: Outcome, op: &'static str) -> Result<Outcome, TreeError> {
    match outcome {
        Outcome::InvalidOperation => Err(TreeError::InvalidOperation { op, outcome }),
        other => Ok(other),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::compare::CaseInsensitive;

    /// Guild (G) → Officers (F) → Alice ('a'), Bob ('b'); Friends (F) → Bob ('b')
    fn sample() -> (FolderTree<char>, NodeId, NodeId, NodeId) {
        let mut tree = FolderTree::new();
        let guild = tree.create_group(ROOT_ID, "Guild").unwrap().unwrap();
        let officers = tree.create_folder(guild, "Officers").unwrap().unwrap();
        let friends = tree.create_folder(ROOT_ID, "Friends").unwrap().unwrap();
        tree.create_leaf(officers, "Alice", 'a').unwrap().unwrap();
        tree.create_leaf(officers, "Bob", 'b').unwrap().unwrap();
        tree.create_leaf(friends, "Bob", 'b').unwrap().unwrap();
        (tree, guild, officers, friends)
    }

    fn names(tree: &FolderTree<char>, id: NodeId) -> Vec<String> {
        tree.children(id)
            .iter()
            .map(|c| tree.node(*c).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn fresh_tree_has_bare_root() {
        let mut tree = FolderTree::<char>::new();
        assert!(tree.is_empty());
        assert_eq!(tree.root().name(), "");
        assert!(tree.root().children().is_empty());

        assert_eq!(tree.delete(ROOT_ID), Err(TreeError::RootImmutable));
        assert_eq!(tree.rename(ROOT_ID, "x"), Err(TreeError::RootImmutable));
        assert_eq!(
            tree.move_node(ROOT_ID, ROOT_ID, None),
            Err(TreeError::RootImmutable)
        );
    }

    #[test]
    fn guild_officers_alice_scenario() {
        let mut tree = FolderTree::new();
        let guild = tree.create_group(ROOT_ID, "Guild").unwrap().unwrap();
        let officers = tree.create_folder(guild, "Officers").unwrap().unwrap();
        let alice = tree.create_leaf(officers, "Alice", 'A').unwrap().unwrap();

        assert_eq!(tree.find("Guild"), Some(guild));
        assert_eq!(tree.find("Guild/Officers"), Some(officers));
        assert_eq!(tree.full_path(alice), Some("Guild/Officers/Alice"));
        assert_eq!(tree.find_leaf("Guild/Officers/Alice"), Some(alice));
        assert_eq!(tree.leaves_for(&'A').map(|s| s.len()), Some(1));
        assert!(tree.leaves_for(&'A').unwrap().contains(&alice));
    }

    #[test]
    fn nested_groups_use_doubled_separator() {
        let mut tree = FolderTree::<char>::new();
        let guild = tree.create_group(ROOT_ID, "Guild").unwrap().unwrap();
        let raid = tree.create_group(guild, "Raid").unwrap().unwrap();
        let tanks = tree.create_folder(raid, "Tanks").unwrap().unwrap();

        assert_eq!(tree.full_path(raid), Some("Guild//Raid"));
        assert_eq!(tree.full_path(tanks), Some("Guild//Raid/Tanks"));
        assert_eq!(tree.find("Guild//Raid/Tanks"), Some(tanks));
        // Separators must match the node kinds.
        assert_eq!(tree.find("Guild/Raid/Tanks"), None);
        assert_eq!(tree.find("Guild//Raid//Tanks"), None);
    }

    #[test]
    fn ids_are_monotonic_and_not_consumed_by_collisions() {
        let mut tree = FolderTree::<char>::new();
        let a = tree.create_folder(ROOT_ID, "A").unwrap().unwrap();
        assert_eq!(tree.create_folder(ROOT_ID, "A").unwrap(), None);
        assert_eq!(tree.create_group(ROOT_ID, "A").unwrap(), None);
        let b = tree.create_folder(ROOT_ID, "B").unwrap().unwrap();
        assert_eq!(b, a + 1);

        tree.delete(a).unwrap();
        let c = tree.create_folder(ROOT_ID, "A").unwrap().unwrap();
        assert_eq!(c, b + 1);
    }

    #[test]
    fn children_stay_sorted() {
        let mut tree = FolderTree::<char>::new();
        for name in ["delta", "alpha", "Charlie", "bravo"] {
            tree.create_folder(ROOT_ID, name).unwrap();
        }
        assert_eq!(names(&tree, ROOT_ID), vec!["Charlie", "alpha", "bravo", "delta"]);
    }

    #[test]
    fn case_insensitive_names_collide() {
        let mut tree = FolderTree::<char>::with_comparator(CaseInsensitive);
        tree.create_folder(ROOT_ID, "Alpha").unwrap().unwrap();
        assert_eq!(tree.create_folder(ROOT_ID, "alpha").unwrap(), None);
        tree.create_folder(ROOT_ID, "beta").unwrap().unwrap();
        tree.create_folder(ROOT_ID, "Gamma").unwrap().unwrap();
        assert_eq!(names(&tree, ROOT_ID), vec!["Alpha", "beta", "Gamma"]);
        assert!(tree.find("ALPHA").is_some());
    }

    #[test]
    fn custom_comparator_keeps_default_config() {
        let reversed = |a: &str, b: &str| b.cmp(a);
        let mut tree = FolderTree::<char>::with_comparator(reversed);
        for name in ["a", "c", "b"] {
            tree.create_folder(ROOT_ID, name).unwrap().unwrap();
        }
        assert_eq!(names(&tree, ROOT_ID), vec!["c", "b", "a"]);
        assert_eq!(tree.config(), &TreeConfig::default());
    }

    #[test]
    fn kind_discipline_is_enforced() {
        let (mut tree, guild, officers, _) = sample();
        assert!(matches!(
            tree.create_leaf(guild, "X", 'x'),
            Err(TreeError::KindMismatch { .. })
        ));
        assert!(matches!(
            tree.create_folder(officers, "X"),
            Err(TreeError::KindMismatch { .. })
        ));
        assert_eq!(tree.create_group(99, "X"), Err(TreeError::UnknownNode(99)));
        assert_eq!(tree.create_group(ROOT_ID, " / "), Err(TreeError::EmptyName));
    }

    #[test]
    fn leaf_data_unique_per_folder() {
        let (mut tree, _, officers, _) = sample();
        assert_eq!(tree.create_leaf(officers, "Alicia", 'a').unwrap(), None);
        assert_eq!(tree.leaves_for(&'a').unwrap().len(), 1);
    }

    #[test]
    fn rename_outcomes() {
        let (mut tree, guild, officers, _) = sample();
        assert_eq!(tree.rename(officers, "Officers").unwrap(), Outcome::SuccessNothingDone);

        let recruits = tree.create_folder(guild, "Recruits").unwrap().unwrap();
        assert_eq!(tree.rename(recruits, "Officers").unwrap(), Outcome::ItemExists);

        assert_eq!(tree.rename(officers, "Admins").unwrap(), Outcome::Success);
        assert_eq!(names(&tree, guild), vec!["Admins", "Recruits"]);
        assert_eq!(tree.find("Guild/Admins"), Some(officers));

        let alice = tree.find_leaf("Guild/Admins/Alice").unwrap();
        assert_eq!(tree.full_path(alice), Some("Guild/Admins/Alice"));
    }

    #[test]
    fn rename_group_updates_descendant_paths() {
        let (mut tree, guild, _, _) = sample();
        tree.rename(guild, "Clan").unwrap();
        assert!(tree.find_leaf("Clan/Officers/Bob").is_some());
        assert!(tree.find("Guild/Officers").is_none());
    }

    #[test]
    fn move_leaf_between_folders() {
        let (mut tree, _, officers, friends) = sample();
        let alice = tree.find_leaf("Guild/Officers/Alice").unwrap();

        assert_eq!(tree.move_node(alice, friends, None).unwrap(), Outcome::Success);
        assert_eq!(tree.parent_of(alice), Some(friends));
        assert_eq!(tree.full_path(alice), Some("Friends/Alice"));
        assert_eq!(names(&tree, officers), vec!["Bob"]);

        // Same data already in the destination, under another name.
        let bob = tree.find_leaf("Guild/Officers/Bob").unwrap();
        assert_eq!(
            tree.move_node(bob, friends, Some("Robert")).unwrap(),
            Outcome::ItemExists
        );
        assert_eq!(tree.parent_of(bob), Some(officers));
    }

    #[test]
    fn move_to_current_parent_degenerates() {
        let (mut tree, guild, officers, _) = sample();
        assert_eq!(tree.move_node(officers, guild, None).unwrap(), Outcome::SuccessNothingDone);
        assert_eq!(
            tree.move_node(officers, guild, Some("Leaders")).unwrap(),
            Outcome::Success
        );
        assert_eq!(tree.find("Guild/Leaders"), Some(officers));
    }

    #[test]
    fn move_rejects_kind_mismatch_and_cycles() {
        let (mut tree, guild, officers, friends) = sample();
        assert!(matches!(
            tree.move_node(officers, friends, None),
            Err(TreeError::KindMismatch { .. })
        ));

        let raid = tree.create_group(guild, "Raid").unwrap().unwrap();
        assert_eq!(tree.move_node(guild, raid, None).unwrap(), Outcome::CircularReference);
        assert_eq!(tree.move_node(guild, guild, None).unwrap(), Outcome::CircularReference);
        assert_eq!(tree.parent_of(guild), Some(ROOT_ID));
    }

    #[test]
    fn move_group_recomputes_subtree_paths() {
        let (mut tree, guild, _, _) = sample();
        let archive = tree.create_group(ROOT_ID, "Archive").unwrap().unwrap();
        assert_eq!(tree.move_node(guild, archive, None).unwrap(), Outcome::Success);
        assert!(tree.find_leaf("Archive//Guild/Officers/Alice").is_some());
        assert!(tree.find("Guild").is_none());
    }

    #[test]
    fn delete_purges_reverse_index() {
        let (mut tree, guild, officers, friends) = sample();
        let bob_in_friends = tree.find_leaf("Friends/Bob").unwrap();

        tree.delete(guild).unwrap();
        assert!(!tree.contains(officers));
        assert_eq!(tree.leaves_for(&'a'), None);
        let bobs = tree.leaves_for(&'b').unwrap();
        assert_eq!(bobs.len(), 1);
        assert!(bobs.contains(&bob_in_friends));

        tree.delete(friends).unwrap();
        assert_eq!(tree.leaves_for(&'b'), None);
        assert!(tree.is_empty());
    }

    #[test]
    fn merge_empty_folder_deletes_source() {
        let mut tree = FolderTree::<char>::new();
        let x = tree.create_folder(ROOT_ID, "X").unwrap().unwrap();
        let y = tree.create_folder(ROOT_ID, "Y").unwrap().unwrap();
        assert_eq!(tree.merge(x, y).unwrap(), Outcome::Success);
        assert!(!tree.contains(x));
        assert!(tree.contains(y));
    }

    #[test]
    fn merge_with_all_collisions_is_no_success() {
        let mut tree = FolderTree::<char>::new();
        let x = tree.create_folder(ROOT_ID, "X").unwrap().unwrap();
        let y = tree.create_folder(ROOT_ID, "Y").unwrap().unwrap();
        tree.create_leaf(x, "Alice", 'a').unwrap();
        tree.create_leaf(x, "Bob", 'b').unwrap();
        tree.create_leaf(y, "Alice", 'z').unwrap();
        tree.create_leaf(y, "Robert", 'b').unwrap();

        let before = names(&tree, x);
        assert_eq!(tree.merge(x, y).unwrap(), Outcome::NoSuccess);
        assert!(tree.contains(x));
        assert_eq!(names(&tree, x), before);
    }

    #[test]
    fn merge_partial_keeps_source_with_leftovers() {
        let mut tree = FolderTree::<char>::new();
        let x = tree.create_folder(ROOT_ID, "X").unwrap().unwrap();
        let y = tree.create_folder(ROOT_ID, "Y").unwrap().unwrap();
        tree.create_leaf(x, "Alice", 'a').unwrap();
        tree.create_leaf(x, "Bob", 'b').unwrap();
        tree.create_leaf(x, "Carol", 'c').unwrap();
        tree.create_leaf(y, "Bob", 'q').unwrap();

        assert_eq!(tree.merge(x, y).unwrap(), Outcome::PartialSuccess);
        assert_eq!(names(&tree, x), vec!["Bob"]);
        assert_eq!(names(&tree, y), vec!["Alice", "Bob", "Carol"]);

        // Re-running is safe.
        assert_eq!(tree.merge(x, y).unwrap(), Outcome::NoSuccess);
    }

    #[test]
    fn merge_groups_and_cycle_guard() {
        let (mut tree, guild, _, _) = sample();
        let raid = tree.create_group(guild, "Raid").unwrap().unwrap();
        let snapshot: Vec<_> = tree
            .dfs_order()
            .iter()
            .map(|id| tree.full_path(*id).unwrap().to_string())
            .collect();

        assert_eq!(tree.merge(guild, raid).unwrap(), Outcome::CircularReference);
        assert_eq!(tree.merge(guild, guild).unwrap(), Outcome::CircularReference);
        let after: Vec<_> = tree
            .dfs_order()
            .iter()
            .map(|id| tree.full_path(*id).unwrap().to_string())
            .collect();
        assert_eq!(snapshot, after);

        let clan = tree.create_group(ROOT_ID, "Clan").unwrap().unwrap();
        assert_eq!(tree.merge(guild, clan).unwrap(), Outcome::Success);
        assert!(!tree.contains(guild));
        assert!(tree.find_leaf("Clan/Officers/Alice").is_some());
        assert!(tree.find("Clan//Raid").is_some());
    }

    #[test]
    fn merge_requires_matching_kinds() {
        let (mut tree, guild, officers, friends) = sample();
        assert!(matches!(
            tree.merge(officers, guild),
            Err(TreeError::KindMismatch { .. })
        ));
        assert_eq!(tree.merge(ROOT_ID, guild), Err(TreeError::RootImmutable));
        assert!(matches!(
            tree.merge(friends, friends),
            Err(TreeError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn chain_creation_is_idempotent() {
        let mut tree = FolderTree::<char>::new();
        let (outcome, first) = tree.find_or_create_chain("Guild//Raid/Tanks").unwrap();
        assert_eq!(outcome, Outcome::Success);
        let order = tree.dfs_order();

        let (outcome, second) = tree.find_or_create_chain("Guild//Raid/Tanks").unwrap();
        assert_eq!(outcome, Outcome::SuccessNothingDone);
        assert_eq!(first, second);
        assert_eq!(tree.dfs_order(), order);
        assert_eq!(tree.node(first.unwrap()).unwrap().kind(), Kind::Folder);
    }

    #[test]
    fn chain_reports_wrong_kind() {
        let mut tree = FolderTree::<char>::new();
        tree.create_folder(ROOT_ID, "Guild").unwrap();
        assert_eq!(
            tree.find_or_create_chain("Guild/Officers").unwrap(),
            (Outcome::ItemExists, None)
        );
        assert!(matches!(
            tree.find_or_create_chain("Guild/Officers/Alice"),
            Err(TreeError::InvalidPath(PathError::LeafInChain(_)))
        ));
    }

    #[test]
    fn observers_see_structural_changes() {
        let (mut tree, guild, officers, friends) = sample();
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let id = tree.subscribe(move |change| sink.lock().unwrap().push(*change));

        let alice = tree.find_leaf("Guild/Officers/Alice").unwrap();
        tree.move_node(alice, friends, None).unwrap();
        tree.rename(guild, "Clan").unwrap();
        tree.set_open_state(guild, true).unwrap();
        tree.rename(guild, "Clan").unwrap(); // no-op, no event

        let changes = log.lock().unwrap().clone();
        assert_eq!(
            changes,
            vec![
                TreeChange::new(ChangeKind::Moved, alice, Some(officers), Some(friends)),
                TreeChange::new(ChangeKind::Renamed, guild, Some(ROOT_ID), Some(ROOT_ID)),
                TreeChange::new(ChangeKind::OpenStateChanged, guild, Some(ROOT_ID), Some(ROOT_ID)),
            ]
        );

        assert!(tree.unsubscribe(id));
        tree.delete(friends).unwrap();
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[test]
    fn dfs_order_is_sorted_preorder() {
        let (tree, _, _, _) = sample();
        let paths: Vec<&str> = tree
            .dfs_order()
            .iter()
            .filter_map(|id| tree.full_path(*id))
            .collect();
        assert_eq!(
            paths,
            vec![
                "Friends",
                "Friends/Bob",
                "Guild",
                "Guild/Officers",
                "Guild/Officers/Alice",
                "Guild/Officers/Bob",
            ]
        );
    }

    #[test]
    fn descendant_check_includes_self() {
        let (tree, guild, officers, friends) = sample();
        assert!(tree.is_descendant_of(officers, guild));
        assert!(tree.is_descendant_of(guild, guild));
        assert!(tree.is_descendant_of(friends, ROOT_ID));
        assert!(!tree.is_descendant_of(guild, officers));
    }
}
