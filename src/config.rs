//! Tree configuration.

use serde::{Deserialize, Serialize};

use crate::compare::NameOrder;

/// Runtime configuration for a [`FolderTree`](crate::FolderTree).
///
/// Every field has a default, so an empty table deserializes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Sibling ordering. Ignored when a custom comparator is supplied.
    pub name_order: NameOrder,
    /// Initial expand state of newly created Groups and Folders.
    pub open_new_containers: bool,
}
