//! Path grammar.
//!
//! Names are joined with `/` for a Folder-level step and `//` for a
//! Group-level step:
//!
//! ```text
//! Guild//Raid/Officers/Alice
//! ^^^^^  ^^^^ ^^^^^^^^ ^^^^^
//! Group  Group Folder  Leaf
//! ```
//!
//! The separator in front of a segment decides its kind relative to the
//! segment before it:
//!
//! | previous | `//`     | `/`    |
//! |----------|----------|--------|
//! | Group    | Group    | Folder |
//! | Folder   | error    | Leaf   |
//! | Leaf     | error    | error  |
//!
//! The first segment is a Group when more segments follow and a Folder when
//! it stands alone. A `//` after a Folder is rejected rather than turning
//! the Folder back into a Group.

use crate::error::PathError;
use crate::node::Kind;

pub const SEPARATOR: char = '/';
pub const GROUP_SEPARATOR: &str = "//";

/// Separator in front of a path step. Runs of two or more count as doubled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Separator {
    Single,
    Doubled,
}

impl Separator {
    /// Separator between a parent and a child of the given kinds.
    #[inline]
    pub const fn between(parent: Kind, child: Kind) -> Self {
        match (parent, child) {
            (Kind::Group, Kind::Group) => Self::Doubled,
            _ => Self::Single,
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Single => "/",
            Self::Doubled => GROUP_SEPARATOR,
        }
    }
}

/// A raw path step: the trimmed name and the separator in front of it.
///
/// The first step never carries a separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step<'a> {
    pub separator: Option<Separator>,
    pub name: &'a str,
}

/// A classified path segment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathSegment {
    pub name: String,
    pub kind: Kind,
}

/// Split a path into steps, dropping empty segments.
///
/// When an empty segment is dropped, the separators around it fold into one
/// (doubled wins).
pub fn split_steps(path: &str) -> Vec<Step<'_>> {
    let mut steps = Vec::new();
    let mut pending: Option<Separator> = None;
    let mut rest = path;

    loop {
        let run = rest.len() - rest.trim_start_matches(SEPARATOR).len();
        if run > 0 {
            let sep = if run == 1 {
                Separator::Single
            } else {
                Separator::Doubled
            };
            pending = Some(pending.map_or(sep, |p| p.max(sep)));
            rest = &rest[run..];
        }
        if rest.is_empty() {
            break;
        }

        let end = rest.find(SEPARATOR).unwrap_or(rest.len());
        let name = rest[..end].trim();
        rest = &rest[end..];
        if name.is_empty() {
            continue;
        }

        let separator = if steps.is_empty() { None } else { pending };
        steps.push(Step { separator, name });
        pending = None;
    }

    steps
}

/// Parse a path into classified segments.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let steps = split_steps(path);
    let total = steps.len();
    let mut segments: Vec<PathSegment> = Vec::with_capacity(total);

    for step in steps {
        let name = sanitize_name(step.name);
        if name.is_empty() {
            continue;
        }
        let kind = match (segments.last().map(|s| s.kind), step.separator) {
            (None, _) if total > 1 => Kind::Group,
            (None, _) => Kind::Folder,
            (Some(Kind::Group), Some(Separator::Doubled)) => Kind::Group,
            (Some(Kind::Group), _) => Kind::Folder,
            (Some(Kind::Folder), Some(Separator::Doubled)) => {
                return Err(PathError::GroupUnderFolder { segment: name });
            }
            (Some(Kind::Folder), _) => Kind::Leaf,
            (Some(Kind::Leaf), _) => return Err(PathError::ChildOfLeaf { segment: name }),
        };
        segments.push(PathSegment { name, kind });
    }

    if segments.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(segments)
}

/// Strip characters that cannot appear in a name: separators and control
/// characters. Surrounding whitespace is trimmed.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|&c| c != SEPARATOR && !c.is_control())
        .collect();
    cleaned.trim().to_string()
}

/// Append `name` to `parent_path` with the separator for the given kinds.
pub fn join(parent_path: &str, parent: Kind, child: Kind, name: &str) -> String {
    if parent_path.is_empty() {
        return name.to_string();
    }
    let sep = Separator::between(parent, child).as_str();
    let mut out = String::with_capacity(parent_path.len() + sep.len() + name.len());
    out.push_str(parent_path);
    out.push_str(sep);
    out.push_str(name);
    out
}
