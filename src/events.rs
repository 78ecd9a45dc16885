//! Structural-change notifications.
//!
//! Observers are plain callbacks invoked synchronously, in subscription
//! order, after each successful mutation.

use crate::NodeId;

/// What happened to the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Created,
    Renamed,
    Moved,
    Deleted,
    OpenStateChanged,
    /// The whole tree was rebuilt from a hierarchy blob.
    Reloaded,
}

/// A single structural change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeChange {
    pub kind: ChangeKind,
    pub node: NodeId,
    pub old_parent: Option<NodeId>,
    pub new_parent: Option<NodeId>,
}

impl TreeChange {
    pub const fn new(
        kind: ChangeKind,
        node: NodeId,
        old_parent: Option<NodeId>,
        new_parent: Option<NodeId>,
    ) -> Self {
        Self {
            kind,
            node,
            old_parent,
            new_parent,
        }
    }
}

/// Handle returned by [`FolderTree::subscribe`](crate::FolderTree::subscribe).
pub type ObserverId = u64;

pub(crate) type Observer = Box<dyn FnMut(&TreeChange) + Send + Sync>;

/// Registered observers plus a mute switch used during bulk reloads.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: ObserverId,
    entries: Vec<(ObserverId, Observer)>,
    muted: bool,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, observer: Observer) -> ObserverId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn emit(&mut self, change: TreeChange) {
        if self.muted {
            return;
        }
        for (_, observer) in &mut self.entries {
            observer(&change);
        }
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
