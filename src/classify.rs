//! Structural classifiers over the pattern tree.
//!
//! All of these are plain recursive functions. They accept every node kind
//! that can appear outside of a character class (plus the root and
//! alternatives) and panic on class ranges, which have no meaning on their
//! own.

use crate::{
    ast::{Assertion, Flags, LenBound, Node, NodeId, Pattern},
    backreference::{BackreferenceReach, backreference_reach},
    charset::case_fold,
    to_charset::char_set_of_element,
};

/// Options for [`is_empty`] and [`is_potentially_empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyOptions {
    /// Assume that backreferences always consume at least one character.
    pub backreferences_are_non_empty: bool,
}

/// Returns `true` if every path through the element consumes no characters.
#[must_use]
pub fn is_zero_length(pattern: &Pattern, id: NodeId) -> bool {
    match pattern.node(id) {
        Node::Alternative { elements } => elements.iter().all(|&e| is_zero_length(pattern, e)),
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => {
            alternatives.iter().all(|&a| is_zero_length(pattern, a))
        }
        Node::Assertion(_) => true,
        Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => false,
        Node::Quantifier(q) => q.max == 0 || is_zero_length(pattern, q.element),
        Node::Backreference { .. } => {
            backreference_reach(pattern, id) == BackreferenceReach::AlwaysEmpty
        }
        Node::CharacterClassRange { .. } => unexpected(pattern, id),
    }
}

/// Returns `true` if at least one path through the element consumes no
/// characters.
#[must_use]
pub fn is_potentially_zero_length(pattern: &Pattern, id: NodeId) -> bool {
    match pattern.node(id) {
        Node::Alternative { elements } => elements
            .iter()
            .all(|&e| is_potentially_zero_length(pattern, e)),
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => alternatives
            .iter()
            .any(|&a| is_potentially_zero_length(pattern, a)),
        Node::Assertion(_) => true,
        Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => false,
        Node::Quantifier(q) => q.min == 0 || is_potentially_zero_length(pattern, q.element),
        Node::Backreference { group } => {
            backreference_reach(pattern, id) != BackreferenceReach::AlwaysAfterGroup
                || is_potentially_zero_length(pattern, *group)
        }
        Node::CharacterClassRange { .. } => unexpected(pattern, id),
    }
}

/// Returns `true` if the element only ever matches the empty string, in
/// every context.
///
/// Unlike [`is_zero_length`], an assertion is only empty if it trivially
/// accepts: a positive lookaround that can match the empty string.
#[must_use]
pub fn is_empty(pattern: &Pattern, id: NodeId, options: EmptyOptions) -> bool {
    match pattern.node(id) {
        Node::Alternative { elements } => elements.iter().all(|&e| is_empty(pattern, e, options)),
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => {
            alternatives.iter().all(|&a| is_empty(pattern, a, options))
        }
        Node::Assertion(assertion) => is_trivially_accepting(pattern, assertion, options),
        Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => false,
        Node::Quantifier(q) => q.max == 0 || is_empty(pattern, q.element, options),
        Node::Backreference { group } => {
            !options.backreferences_are_non_empty
                && (backreference_reach(pattern, id) == BackreferenceReach::AlwaysEmpty
                    || is_empty(pattern, *group, options))
        }
        Node::CharacterClassRange { .. } => unexpected(pattern, id),
    }
}

/// Returns `true` if at least one path through the element matches the
/// empty string, in every context.
#[must_use]
pub fn is_potentially_empty(pattern: &Pattern, id: NodeId, options: EmptyOptions) -> bool {
    match pattern.node(id) {
        Node::Alternative { elements } => elements
            .iter()
            .all(|&e| is_potentially_empty(pattern, e, options)),
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => alternatives
            .iter()
            .any(|&a| is_potentially_empty(pattern, a, options)),
        Node::Assertion(assertion) => is_trivially_accepting(pattern, assertion, options),
        Node::Character(_) | Node::CharacterClass { .. } | Node::CharacterSet(_) => false,
        Node::Quantifier(q) => q.min == 0 || is_potentially_empty(pattern, q.element, options),
        Node::Backreference { group } => {
            !options.backreferences_are_non_empty
                && (backreference_reach(pattern, id) != BackreferenceReach::AlwaysAfterGroup
                    || is_potentially_empty(pattern, *group, options))
        }
        Node::CharacterClassRange { .. } => unexpected(pattern, id),
    }
}

/// A positive lookaround that can match the empty string accepts every
/// input, so it behaves like no assertion at all.
fn is_trivially_accepting(pattern: &Pattern, assertion: &Assertion, options: EmptyOptions) -> bool {
    match assertion {
        Assertion::Lookaround {
            negate: false,
            alternatives,
            ..
        } => alternatives
            .iter()
            .any(|&a| is_potentially_empty(pattern, a, options)),
        _ => false,
    }
}

/// Returns the only string the element can match, if there is exactly one.
#[must_use]
pub fn get_constant(pattern: &Pattern, id: NodeId, flags: &Flags) -> Option<String> {
    match pattern.node(id) {
        Node::Alternative { elements } => elements
            .iter()
            .map(|&e| get_constant(pattern, e, flags))
            .collect::<Option<Vec<_>>>()
            .map(|words| words.concat()),
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => {
            same_constant(alternatives.iter().map(|&a| get_constant(pattern, a, flags)))
        }
        Node::Character(c) => constant_char(c.value, flags),
        Node::CharacterClass { negate: true, .. } | Node::CharacterSet(_) => None,
        Node::CharacterClass {
            negate: false,
            elements,
        } => same_constant(elements.iter().map(|&e| match pattern.node(e) {
            Node::Character(c) => constant_char(c.value, flags),
            Node::CharacterClassRange { min, max } if min.value == max.value => {
                constant_char(min.value, flags)
            }
            _ => None,
        })),
        Node::Quantifier(q) => {
            if q.max == 0 {
                return Some(String::new());
            }
            let word = get_constant(pattern, q.element, flags)?;
            if word.is_empty() {
                Some(word)
            } else if q.max == q.min {
                Some(word.repeat(usize::try_from(q.min).ok()?))
            } else {
                None
            }
        }
        Node::Backreference { group } => match backreference_reach(pattern, id) {
            BackreferenceReach::AlwaysEmpty => Some(String::new()),
            reach => {
                let word = get_constant(pattern, *group, flags)?;
                (word.is_empty() || reach == BackreferenceReach::AlwaysAfterGroup).then_some(word)
            }
        },
        Node::Assertion(assertion) => {
            is_trivially_accepting(pattern, assertion, EmptyOptions::default())
                .then(String::new)
        }
        Node::CharacterClassRange { .. } => unexpected(pattern, id),
    }
}

/// All items must be the same constant.
fn same_constant(mut words: impl Iterator<Item = Option<String>>) -> Option<String> {
    let first = words.next()??;
    for word in words {
        if word? != first {
            return None;
        }
    }
    Some(first)
}

fn constant_char(value: u32, flags: &Flags) -> Option<String> {
    if flags.ignore_case && !case_fold::variations(value, flags.unicode).is_empty() {
        return None;
    }
    char::from_u32(value).map(String::from)
}

/// The inclusive range of the number of characters an element can match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LengthRange {
    pub min: u32,
    pub max: LenBound,
}

impl LengthRange {
    pub const EMPTY: LengthRange = LengthRange {
        min: 0,
        max: LenBound::Finite(0),
    };

    pub const ONE: LengthRange = LengthRange {
        min: 1,
        max: LenBound::Finite(1),
    };

    fn union(self, other: LengthRange) -> LengthRange {
        LengthRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn concat(self, other: LengthRange) -> LengthRange {
        LengthRange {
            min: self.min.saturating_add(other.min),
            max: self.max.saturating_add(other.max),
        }
    }
}

/// The range of lengths of the strings the element can match, or `None` if
/// the element cannot match anything.
#[must_use]
pub fn get_length_range(pattern: &Pattern, id: NodeId, flags: &Flags) -> Option<LengthRange> {
    match pattern.node(id) {
        Node::Alternative { elements } => elements
            .iter()
            .try_fold(LengthRange::EMPTY, |acc, &e| {
                Some(acc.concat(get_length_range(pattern, e, flags)?))
            }),
        Node::Pattern { alternatives }
        | Node::Group { alternatives }
        | Node::CapturingGroup { alternatives, .. } => {
            get_length_range_of_alternatives(pattern, alternatives, flags)
        }
        Node::Assertion(_) => Some(LengthRange::EMPTY),
        Node::Character(_) | Node::CharacterSet(_) => Some(LengthRange::ONE),
        Node::CharacterClass { .. } => {
            (!char_set_of_element(pattern, id, flags).is_empty()).then_some(LengthRange::ONE)
        }
        Node::Quantifier(q) => {
            if q.max == 0 {
                return Some(LengthRange::EMPTY);
            }
            match get_length_range(pattern, q.element, flags) {
                Some(range) => Some(LengthRange {
                    min: range.min.saturating_mul(q.min),
                    max: range.max.saturating_mul(q.max),
                }),
                None => (q.min == 0).then_some(LengthRange::EMPTY),
            }
        }
        Node::Backreference { group } => match backreference_reach(pattern, id) {
            BackreferenceReach::AlwaysEmpty => Some(LengthRange::EMPTY),
            BackreferenceReach::SometimesEmpty => Some(
                get_length_range(pattern, *group, flags)
                    .map_or(LengthRange::EMPTY, |range| LengthRange { min: 0, ..range }),
            ),
            BackreferenceReach::AlwaysAfterGroup => get_length_range(pattern, *group, flags),
        },
        Node::CharacterClassRange { .. } => unexpected(pattern, id),
    }
}

/// [`get_length_range`] of a list of alternatives.
#[must_use]
pub fn get_length_range_of_alternatives(
    pattern: &Pattern,
    alternatives: &[NodeId],
    flags: &Flags,
) -> Option<LengthRange> {
    alternatives
        .iter()
        .filter_map(|&a| get_length_range(pattern, a, flags))
        .reduce(LengthRange::union)
}

fn unexpected(pattern: &Pattern, id: NodeId) -> ! {
    panic!(
        "a {} cannot be classified on its own",
        pattern.node(id).kind_name()
    )
}
