use super::{FirstConsumedChar, FirstLookChar, first_char_consumed_by};
use crate::{
    ast::{Flags, NodeId, Pattern},
    direction::MatchingDirection,
    follow::{FollowOperations, PathEnd, StartMode, follow_paths},
};

/// The first character consumed after an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstConsumedCharAfter {
    pub char: FirstConsumedChar,
    /// The elements that may consume that character, in the order the walk
    /// reached them.
    pub elements: Vec<NodeId>,
}

/// The first character after an element, as a look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstCharAfter {
    pub char: FirstLookChar,
    pub elements: Vec<NodeId>,
}

struct After<'a> {
    flags: &'a Flags,
}

impl FollowOperations<FirstConsumedCharAfter> for After<'_> {
    fn join(
        &self,
        states: Vec<FirstConsumedCharAfter>,
        _direction: MatchingDirection,
    ) -> FirstConsumedCharAfter {
        let chars: Vec<_> = states.iter().map(|s| s.char.clone()).collect();
        let mut elements = Vec::new();
        for element in states.into_iter().flat_map(|s| s.elements) {
            if !elements.contains(&element) {
                elements.push(element);
            }
        }
        FirstConsumedCharAfter {
            char: FirstConsumedChar::union(&chars),
            elements,
        }
    }

    fn enter(
        &self,
        pattern: &Pattern,
        element: NodeId,
        mut state: FirstConsumedCharAfter,
        direction: MatchingDirection,
    ) -> FirstConsumedCharAfter {
        let first = first_char_consumed_by(pattern, element, direction, self.flags);
        state.char = FirstConsumedChar::concat([state.char, first], self.flags);
        state.elements.push(element);
        state
    }

    fn end_path(
        &self,
        state: FirstConsumedCharAfter,
        _direction: MatchingDirection,
        reason: PathEnd,
    ) -> FirstConsumedCharAfter {
        match reason {
            PathEnd::Pattern => state,
            // What follows a lookaround's content is outside of it.
            PathEnd::Assertion => FirstConsumedCharAfter {
                char: FirstConsumedChar::concat(
                    [
                        state.char,
                        FirstConsumedChar::zero_width(
                            FirstLookChar::unknown(self.flags),
                            self.flags,
                        ),
                    ],
                    self.flags,
                ),
                elements: state.elements,
            },
        }
    }

    fn continue_into(
        &self,
        _pattern: &Pattern,
        _element: NodeId,
        _state: &FirstConsumedCharAfter,
        _direction: MatchingDirection,
    ) -> bool {
        false
    }

    fn continue_after(
        &self,
        _pattern: &Pattern,
        _element: NodeId,
        state: &FirstConsumedCharAfter,
        _direction: MatchingDirection,
    ) -> bool {
        state.char.empty()
    }
}

/// The first character consumed after `id` when matching in `direction`.
///
/// If the result can be empty, its look describes what has to hold at the
/// end of the pattern (or of the enclosing lookaround).
///
/// # Panics
///
/// Panics if `id` is not an element.
#[must_use]
pub fn first_consumed_char_after(
    pattern: &Pattern,
    id: NodeId,
    direction: MatchingDirection,
    flags: &Flags,
) -> FirstConsumedCharAfter {
    let initial = FirstConsumedCharAfter {
        char: FirstConsumedChar::empty_word(flags),
        elements: Vec::new(),
    };
    follow_paths(
        pattern,
        id,
        StartMode::Next,
        initial,
        &After { flags },
        Some(direction),
    )
}

/// The character right after `id` when matching in `direction`.
///
/// # Panics
///
/// Panics if `id` is not an element.
#[must_use]
pub fn first_char_after(
    pattern: &Pattern,
    id: NodeId,
    direction: MatchingDirection,
    flags: &Flags,
) -> FirstCharAfter {
    let after = first_consumed_char_after(pattern, id, direction, flags);
    FirstCharAfter {
        char: after.char.to_look(),
        elements: after.elements,
    }
}
