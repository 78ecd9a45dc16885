//! Error types for tree mutations, path parsing and persistence.

use thiserror::Error;

use crate::engine::Outcome;
use crate::node::Kind;
use crate::NodeId;

/// Programmer errors: the request itself was illegal.
///
/// Expected collisions and no-ops are not errors; they come back as
/// [`Outcome`] values or `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("the root node cannot be renamed, moved, merged or deleted")]
    RootImmutable,

    #[error("unknown node id {0}")]
    UnknownNode(NodeId),

    #[error("node {node} is a {found:?}, expected {expected}")]
    KindMismatch {
        node: NodeId,
        expected: &'static str,
        found: Kind,
    },

    #[error("name is empty after sanitizing")]
    EmptyName,

    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("{op} rejected by the engine ({outcome:?})")]
    InvalidOperation { op: &'static str, outcome: Outcome },
}

/// Path grammar violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path contains no segments")]
    Empty,

    #[error("'{segment}' follows a folder with '//', but folders cannot contain groups")]
    GroupUnderFolder { segment: String },

    #[error("'{segment}' follows a leaf, but leaves have no children")]
    ChildOfLeaf { segment: String },

    #[error("path '{0}' names a leaf where a container is required")]
    LeafInChain(String),
}

/// Hierarchy blob encoding failures.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("hierarchy JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
