//! Matching direction.
//!
//! The content of a lookbehind is matched right to left, so "the next
//! element" of an element inside a lookbehind is its left sibling.

use crate::ast::{Assertion, LookaroundKind, Node, NodeId, Pattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchingDirection {
    /// Left to right.
    Ltr,
    /// Right to left.
    Rtl,
}

impl MatchingDirection {
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            MatchingDirection::Ltr => MatchingDirection::Rtl,
            MatchingDirection::Rtl => MatchingDirection::Ltr,
        }
    }

    /// The direction in which the content of a lookaround is matched.
    #[must_use]
    pub const fn of_lookaround(kind: LookaroundKind) -> Self {
        match kind {
            LookaroundKind::Lookahead => MatchingDirection::Ltr,
            LookaroundKind::Lookbehind => MatchingDirection::Rtl,
        }
    }

    /// Iterates `items` in this direction.
    pub fn ordered<T>(self, items: &[T]) -> impl Iterator<Item = &T> {
        let (forward, backward) = match self {
            MatchingDirection::Ltr => (Some(items.iter()), None),
            MatchingDirection::Rtl => (None, Some(items.iter().rev())),
        };
        forward.into_iter().flatten().chain(backward.into_iter().flatten())
    }

    /// The items that are matched after `items[index]` in this direction.
    #[must_use]
    pub fn after<T>(self, items: &[T], index: usize) -> &[T] {
        match self {
            MatchingDirection::Ltr => &items[index + 1..],
            MatchingDirection::Rtl => &items[..index],
        }
    }

    /// The item matched right after `items[index]` in this direction.
    #[must_use]
    pub fn next<T>(self, items: &[T], index: usize) -> Option<&T> {
        match self {
            MatchingDirection::Ltr => items.get(index + 1),
            MatchingDirection::Rtl => index.checked_sub(1).map(|i| &items[i]),
        }
    }
}

/// The direction in which `id` is matched: right to left iff the closest
/// enclosing lookaround is a lookbehind.
#[must_use]
pub fn matching_direction(pattern: &Pattern, id: NodeId) -> MatchingDirection {
    pattern
        .ancestors(id)
        .find_map(|ancestor| match pattern.node(ancestor) {
            Node::Assertion(Assertion::Lookaround { kind, .. }) => {
                Some(MatchingDirection::of_lookaround(*kind))
            }
            _ => None,
        })
        .unwrap_or(MatchingDirection::Ltr)
}
