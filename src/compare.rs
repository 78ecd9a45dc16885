//! Name orderings for sibling lists.
//!
//! Every Group and Folder keeps its children sorted under the tree's
//! comparator; the same comparator decides whether two sibling names collide.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A total ordering over node names.
///
/// Two names comparing `Equal` are the same name: they cannot coexist as
/// siblings.
pub trait NameComparator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

/// Byte-wise, case-sensitive ordering (the default).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ordinal;

impl NameComparator for Ordinal {
    #[inline]
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.cmp(b)
    }
}

/// Unicode lowercase-folded ordering. `"Alice"` and `"alice"` collide.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CaseInsensitive;

impl NameComparator for CaseInsensitive {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    }
}

impl<F> NameComparator for F
where
    F: Fn(&str, &str) -> Ordering + Send + Sync,
{
    #[inline]
    fn compare(&self, a: &str, b: &str) -> Ordering {
        self(a, b)
    }
}

/// Built-in orderings selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrder {
    #[default]
    Ordinal,
    CaseInsensitive,
}

impl NameOrder {
    pub fn comparator(self) -> Box<dyn NameComparator> {
        match self {
            Self::Ordinal => Box::new(Ordinal),
            Self::CaseInsensitive => Box::new(CaseInsensitive),
        }
    }
}
