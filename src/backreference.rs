//! Whether a backreference can have a captured text to replay.
//!
//! A backreference to a group that has not matched (yet) matches the empty
//! string. Whether that can happen depends on the paths through the pattern
//! that reach the reference: through the group, around it, or never via it.

use crate::{
    ast::{Assertion, Node, NodeId, Pattern},
    classify::is_zero_length,
    direction::matching_direction,
};

/// The three mutually exclusive ways a backreference relates to its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackreferenceReach {
    /// The reference always matches the empty string.
    AlwaysEmpty,
    /// Some paths reach the reference with the group matched, others without.
    SometimesEmpty,
    /// Every path to the reference passes through the group first, and the
    /// group always captures a non-empty string.
    AlwaysAfterGroup,
}

/// Returns `true` if the backreference always matches the empty string.
///
/// # Panics
///
/// Panics if `bref` is not a backreference.
#[must_use]
pub fn is_empty_backreference(pattern: &Pattern, bref: NodeId) -> bool {
    backreference_reach(pattern, bref) == BackreferenceReach::AlwaysEmpty
}

/// Returns `true` if every path that reaches the backreference has matched
/// its (non-empty) group before.
///
/// # Panics
///
/// Panics if `bref` is not a backreference.
#[must_use]
pub fn backreference_always_after_group(pattern: &Pattern, bref: NodeId) -> bool {
    backreference_reach(pattern, bref) == BackreferenceReach::AlwaysAfterGroup
}

/// Classifies the backreference `bref`.
///
/// # Panics
///
/// Panics if `bref` is not a backreference or the tree is malformed.
#[must_use]
pub fn backreference_reach(pattern: &Pattern, bref: NodeId) -> BackreferenceReach {
    let group = pattern.resolved_group(bref);

    let common = pattern.closest_common_ancestor(bref, group);
    if common == group {
        // The reference is inside its own group.
        return BackreferenceReach::AlwaysEmpty;
    }
    if !matches!(pattern.node(common), Node::Alternative { .. }) {
        // Group and reference are in different alternatives.
        return BackreferenceReach::AlwaysEmpty;
    }

    let path: Vec<NodeId> = std::iter::once(bref)
        .chain(pattern.ancestors(bref))
        .take_while(|&n| n != common)
        .collect();

    match walk_up(pattern, group, &path) {
        Walk::NotFound => BackreferenceReach::AlwaysEmpty,
        Walk::Found { .. } if is_zero_length(pattern, group) => BackreferenceReach::AlwaysEmpty,
        Walk::Found { strict: true } => BackreferenceReach::AlwaysAfterGroup,
        Walk::Found { strict: false } => BackreferenceReach::SometimesEmpty,
    }
}

enum Walk {
    /// No path from the group reaches the reference.
    NotFound,
    /// `strict` is `false` if some path reaches the reference without
    /// passing through the group.
    Found { strict: bool },
}

/// Moves up from `group`, at each alternative checking whether an element
/// matched later contains the reference (`path` holds the reference and its
/// ancestors below the common ancestor).
fn walk_up(pattern: &Pattern, group: NodeId, path: &[NodeId]) -> Walk {
    let mut strict = true;
    let mut current = group;

    loop {
        let Some(parent) = pattern.parent(current) else {
            return Walk::NotFound;
        };

        match pattern.node(parent) {
            Node::Quantifier(q) => {
                if q.max == 0 {
                    // The group is never entered.
                    return Walk::NotFound;
                }
                if q.min == 0 {
                    // e.g. (a)?\1
                    strict = false;
                }
                current = parent;
            }
            Node::Alternative { elements } => {
                let index = position(elements, current);
                let direction = matching_direction(pattern, current);
                if direction
                    .after(elements, index)
                    .iter()
                    .any(|e| path.contains(e))
                {
                    return Walk::Found { strict };
                }

                let Some(outer) = pattern.parent(parent) else {
                    unreachable!("an alternative always has a parent");
                };
                match pattern.node(outer) {
                    Node::Pattern { .. } => return Walk::NotFound,
                    Node::Assertion(Assertion::Lookaround { negate: true, .. }) => {
                        // Captures of a negative lookaround never survive it.
                        return Walk::NotFound;
                    }
                    node => {
                        if node.alternatives().is_some_and(|alts| alts.len() > 1) {
                            // e.g. (?:a|(b))c\1
                            strict = false;
                        }
                        current = outer;
                    }
                }
            }
            other => panic!("a {} cannot contain a group", other.kind_name()),
        }
    }
}

pub(crate) fn position(children: &[NodeId], child: NodeId) -> usize {
    children
        .iter()
        .position(|&c| c == child)
        .unwrap_or_else(|| panic!("node {child:?} is not a child of its parent"))
}
