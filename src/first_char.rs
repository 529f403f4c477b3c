//! Which character can be consumed first.
//!
//! The analysis works on two value types. A [`FirstLookChar`] describes what
//! an assertion requires of the next character; a [`FirstConsumedChar`]
//! describes the first character an element consumes, plus (if the element
//! can consume nothing) the look that still has to hold at that point.
//!
//! Both are conservative: `char` always contains every possible character.
//! When `exact` is set it contains nothing else.

mod after;

pub use self::after::{
    FirstCharAfter, FirstConsumedCharAfter, first_char_after, first_consumed_char_after,
};

use crate::{
    ast::{Assertion, Flags, Node, NodeId, Pattern},
    backreference::{BackreferenceReach, backreference_reach},
    charset::{CharSet, predefined},
    direction::MatchingDirection,
    to_charset::char_set_of_element,
};

/// What must hold for the character right after a zero-length position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstLookChar {
    /// The characters that may follow.
    pub char: CharSet,
    /// Whether the position may also be the edge (start or end) of the input.
    pub edge: bool,
    pub exact: bool,
}

impl FirstLookChar {
    /// Accepts everything: any character, or the edge.
    #[must_use]
    pub fn all(flags: &Flags) -> Self {
        Self {
            char: CharSet::all(flags.maximum()),
            edge: true,
            exact: true,
        }
    }

    /// Only the edge of the input, e.g. `$` without `m`.
    #[must_use]
    pub fn edge(flags: &Flags) -> Self {
        Self {
            char: CharSet::empty(flags.maximum()),
            edge: true,
            exact: true,
        }
    }

    /// A look that cannot be resolved, e.g. `\b`.
    #[must_use]
    pub fn unknown(flags: &Flags) -> Self {
        Self {
            char: CharSet::all(flags.maximum()),
            edge: true,
            exact: false,
        }
    }

    /// Returns `true` if the look accepts every input.
    #[must_use]
    pub fn is_trivially_accepting(&self) -> bool {
        self.exact && self.edge && self.char.is_all()
    }

    /// Both looks must hold.
    #[must_use]
    pub fn intersect(&self, other: &FirstLookChar) -> FirstLookChar {
        FirstLookChar {
            char: self.char.intersect(&other.char),
            edge: self.edge && other.edge,
            exact: self.exact && other.exact,
        }
    }

    /// Either look may hold.
    ///
    /// # Panics
    ///
    /// Panics if `looks` is empty.
    #[must_use]
    pub fn union(looks: &[FirstLookChar]) -> FirstLookChar {
        assert!(!looks.is_empty(), "cannot union zero looks");
        let (char, exact) = union_chars(looks.iter().map(|l| (&l.char, l.exact)));
        FirstLookChar {
            char,
            edge: looks.iter().any(|l| l.edge),
            exact,
        }
    }
}

/// The first character consumed by an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstConsumedChar {
    /// The characters that can be consumed first.
    pub char: CharSet,
    pub exact: bool,
    /// Set iff some path consumes no character; the look is what must hold
    /// after such a path.
    pub look: Option<FirstLookChar>,
}

impl FirstConsumedChar {
    /// The empty word: consumes nothing and accepts everything after.
    #[must_use]
    pub fn empty_word(flags: &Flags) -> Self {
        Self::zero_width(FirstLookChar::all(flags), flags)
    }

    /// Consumes nothing, and requires `look` of what follows.
    #[must_use]
    pub fn zero_width(look: FirstLookChar, flags: &Flags) -> Self {
        Self {
            char: CharSet::empty(flags.maximum()),
            exact: true,
            look: Some(look),
        }
    }

    /// Always consumes one of `char`.
    #[must_use]
    pub fn consuming(char: CharSet, exact: bool) -> Self {
        Self {
            char,
            exact,
            look: None,
        }
    }

    /// Returns `true` if some path through the element consumes nothing.
    #[inline]
    #[must_use]
    pub fn empty(&self) -> bool {
        self.look.is_some()
    }

    /// What this element requires of the next character when used as the
    /// content of a lookaround.
    #[must_use]
    pub fn to_look(&self) -> FirstLookChar {
        match &self.look {
            Some(look) => FirstLookChar {
                char: self.char.union(&look.char),
                edge: look.edge,
                exact: self.exact && look.exact,
            },
            None => FirstLookChar {
                char: self.char.clone(),
                edge: false,
                exact: self.exact,
            },
        }
    }

    /// The first character of a choice between all `items`.
    ///
    /// # Panics
    ///
    /// Panics if `items` is empty.
    #[must_use]
    pub fn union(items: &[FirstConsumedChar]) -> FirstConsumedChar {
        assert!(!items.is_empty(), "cannot union zero first characters");
        let (char, exact) = union_chars(items.iter().map(|c| (&c.char, c.exact)));
        let looks: Vec<FirstLookChar> = items.iter().filter_map(|c| c.look.clone()).collect();
        FirstConsumedChar {
            char,
            exact,
            look: (!looks.is_empty()).then(|| FirstLookChar::union(&looks)),
        }
    }

    /// The first character of the sequence of `items`, in matching order.
    ///
    /// Items after the first one that always consumes a character are not
    /// pulled from the iterator.
    #[must_use]
    pub fn concat(
        items: impl IntoIterator<Item = FirstConsumedChar>,
        flags: &Flags,
    ) -> FirstConsumedChar {
        let mut char = CharSet::empty(flags.maximum());
        let mut exact = true;
        let mut look = FirstLookChar::all(flags);

        for item in items {
            // Characters of `item` are only reachable after all previous
            // items matched the empty word, so the accumulated look applies.
            let reachable = look.char.intersect(&item.char);
            if !reachable.is_empty() {
                exact = exact && look.exact && item.exact;
                char = char.union(&reachable);
            }

            match item.look {
                Some(item_look) => look = look.intersect(&item_look),
                None => return FirstConsumedChar::consuming(char, exact),
            }
        }

        FirstConsumedChar {
            char,
            exact,
            look: Some(look),
        }
    }
}

/// Unions character sets. The result is exact if every inexact set is
/// contained in the union of the exact ones.
fn union_chars<'a>(items: impl Iterator<Item = (&'a CharSet, bool)>) -> (CharSet, bool) {
    let mut exact: Option<CharSet> = None;
    let mut inexact: Option<CharSet> = None;
    for (char, is_exact) in items {
        let slot = if is_exact { &mut exact } else { &mut inexact };
        *slot = Some(match slot.take() {
            Some(acc) => acc.union(char),
            None => char.clone(),
        });
    }

    match (exact, inexact) {
        (Some(exact), Some(inexact)) => {
            let is_exact = inexact.is_subset_of(&exact);
            (exact.union(&inexact), is_exact)
        }
        (Some(exact), None) => (exact, true),
        (None, Some(inexact)) => (inexact, false),
        (None, None) => unreachable!("union of zero character sets"),
    }
}

/// The first character consumed by the element, alternative, group, or
/// whole pattern `id` when matched in `direction`.
///
/// # Panics
///
/// Panics on a character class range.
#[must_use]
pub fn first_char_consumed_by(
    pattern: &Pattern,
    id: NodeId,
    direction: MatchingDirection,
    flags: &Flags,
) -> FirstConsumedChar {
    match pattern.node(id) {
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => {
            first_char_consumed_by_alternatives(pattern, alternatives, direction, flags)
        }
        Node::Alternative { elements } => FirstConsumedChar::concat(
            direction
                .ordered(elements)
                .map(|&e| first_char_consumed_by(pattern, e, direction, flags)),
            flags,
        ),
        Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => {
            FirstConsumedChar::consuming(char_set_of_element(pattern, id, flags), true)
        }
        Node::Quantifier(q) => {
            if q.max == 0 {
                return FirstConsumedChar::empty_word(flags);
            }
            let inner = first_char_consumed_by(pattern, q.element, direction, flags);
            if q.min == 0 {
                FirstConsumedChar::union(&[FirstConsumedChar::empty_word(flags), inner])
            } else {
                inner
            }
        }
        Node::Backreference { group } => match backreference_reach(pattern, id) {
            BackreferenceReach::AlwaysEmpty => FirstConsumedChar::empty_word(flags),
            reach => {
                let mut replayed = first_char_consumed_by(pattern, *group, direction, flags);
                // The reference replays the one string the group captured,
                // so only a single possible character stays exact. A look
                // held where the group matched, not here.
                replayed.exact = replayed.exact && replayed.char.size() <= 1;
                if replayed.look.is_some() {
                    replayed.look = Some(FirstLookChar::all(flags));
                }
                if reach == BackreferenceReach::AlwaysAfterGroup {
                    replayed
                } else {
                    FirstConsumedChar::union(&[replayed, FirstConsumedChar::empty_word(flags)])
                }
            }
        },
        Node::Assertion(assertion) => first_char_of_assertion(pattern, assertion, direction, flags),
        Node::CharacterClassRange { .. } => {
            panic!("a character class range cannot be analyzed on its own")
        }
    }
}

/// The union of [`first_char_consumed_by`] over `alternatives`.
#[must_use]
pub fn first_char_consumed_by_alternatives(
    pattern: &Pattern,
    alternatives: &[NodeId],
    direction: MatchingDirection,
    flags: &Flags,
) -> FirstConsumedChar {
    let items: Vec<_> = alternatives
        .iter()
        .map(|&a| first_char_consumed_by(pattern, a, direction, flags))
        .collect();
    FirstConsumedChar::union(&items)
}

fn first_char_of_assertion(
    pattern: &Pattern,
    assertion: &Assertion,
    direction: MatchingDirection,
    flags: &Flags,
) -> FirstConsumedChar {
    let look = match assertion {
        Assertion::WordBoundary { .. } => {
            log::trace!("word boundary: next character unknown");
            FirstLookChar::unknown(flags)
        }
        Assertion::Start | Assertion::End => {
            let ahead = matches!(assertion, Assertion::End);
            if ahead == (direction == MatchingDirection::Ltr) {
                edge_look(flags)
            } else {
                log::trace!("edge assertion looks the other way: next character unknown");
                FirstLookChar::unknown(flags)
            }
        }
        Assertion::Lookaround {
            kind,
            negate,
            alternatives,
        } => {
            if MatchingDirection::of_lookaround(*kind) != direction {
                log::trace!("{kind:?} looks the other way: next character unknown");
                FirstLookChar::unknown(flags)
            } else if *negate {
                negated_look(pattern, alternatives, flags)
            } else {
                first_char_consumed_by_alternatives(pattern, alternatives, direction, flags)
                    .to_look()
            }
        }
    };
    FirstConsumedChar::zero_width(look, flags)
}

/// `^`/`$` in the direction they look: the edge, or a line terminator with
/// the `m` flag.
fn edge_look(flags: &Flags) -> FirstLookChar {
    if flags.multiline {
        FirstLookChar {
            char: predefined::from_table(flags.maximum(), predefined::LINE_TERMINATOR),
            edge: true,
            exact: true,
        }
    } else {
        FirstLookChar::edge(flags)
    }
}

/// A negative lookaround can only be turned into a look if it rejects
/// exactly one character: `(?![a])` is `(?=[^a]|$)`.
fn negated_look(pattern: &Pattern, alternatives: &[NodeId], flags: &Flags) -> FirstLookChar {
    let mut leaves = Vec::new();
    if !single_characters(pattern, alternatives, &mut leaves) {
        log::trace!("negative lookaround is not a single character: next character unknown");
        return FirstLookChar::unknown(flags);
    }

    let rejected = leaves.iter().fold(CharSet::empty(flags.maximum()), |acc, &leaf| {
        acc.union(&char_set_of_element(pattern, leaf, flags))
    });
    FirstLookChar {
        char: rejected.negate(),
        edge: true,
        exact: true,
    }
}

/// Returns `true` if every alternative is a lone character, class, or
/// predefined set, possibly wrapped in groups or `{1}`. Assertions and
/// backreferences never qualify. The character elements are pushed to
/// `leaves`.
fn single_characters(
    pattern: &Pattern,
    alternatives: &[NodeId],
    leaves: &mut Vec<NodeId>,
) -> bool {
    alternatives.iter().all(|&alt| match pattern.node(alt) {
        Node::Alternative { elements } => match elements.as_slice() {
            &[element] => single_character(pattern, element, leaves),
            _ => false,
        },
        _ => false,
    })
}

fn single_character(pattern: &Pattern, element: NodeId, leaves: &mut Vec<NodeId>) -> bool {
    match pattern.node(element) {
        Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => {
            leaves.push(element);
            true
        }
        Node::Group { alternatives } | Node::CapturingGroup { alternatives, .. } => {
            single_characters(pattern, alternatives, leaves)
        }
        Node::Quantifier(q) if q.min == 1 && q.max == 1 => {
            single_character(pattern, q.element, leaves)
        }
        _ => false,
    }
}
