//! Node model: Root, Group, Folder and Leaf.

use serde::{Deserialize, Serialize};

use crate::{NodeId, ROOT_ID};

/// Node kind discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Group,
    Folder,
    Leaf,
}

impl Kind {
    /// Whether a node of this kind may hold a child of kind `child`.
    #[inline]
    pub const fn accepts(self, child: Kind) -> bool {
        matches!(
            (self, child),
            (Kind::Group, Kind::Group) | (Kind::Group, Kind::Folder) | (Kind::Folder, Kind::Leaf)
        )
    }
}

/// Kind-specific payload of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind<T> {
    /// Children are Groups or Folders, sorted by name.
    Group { children: Vec<NodeId> },
    /// Children are Leaves, sorted by name.
    Folder { children: Vec<NodeId> },
    /// Reference to one externally owned data item.
    Leaf { data: T },
}

impl<T> NodeKind<T> {
    pub fn group() -> Self {
        Self::Group {
            children: Vec::new(),
        }
    }

    pub fn folder() -> Self {
        Self::Folder {
            children: Vec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        match self {
            Self::Group { .. } => Kind::Group,
            Self::Folder { .. } => Kind::Folder,
            Self::Leaf { .. } => Kind::Leaf,
        }
    }
}

/// A node in the arena.
///
/// `parent` is an id, not an owning edge; the arena in
/// [`FolderTree`](crate::FolderTree) owns every node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<T> {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) full_path: String,
    pub(crate) is_open: bool,
    pub(crate) kind: NodeKind<T>,
}

impl<T> Node<T> {
    pub(crate) fn root() -> Self {
        Self {
            id: ROOT_ID,
            name: String::new(),
            parent: None,
            full_path: String::new(),
            is_open: false,
            kind: NodeKind::group(),
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parent id; `None` only for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind.kind()
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        !matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Sorted child ids. Empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } | NodeKind::Folder { children } => children,
            NodeKind::Leaf { .. } => &[],
        }
    }

    /// The referenced data item, for leaves.
    pub fn data(&self) -> Option<&T> {
        match &self.kind {
            NodeKind::Leaf { data } => Some(data),
            _ => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Group { children } | NodeKind::Folder { children } => Some(children),
            NodeKind::Leaf { .. } => None,
        }
    }
}
