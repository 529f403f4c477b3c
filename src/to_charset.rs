//! Converts characters, classes, and character sets of a pattern into
//! [`CharSet`]s under the given flags.

use crate::{
    ast::{CharacterSetKind, Flags, Node, NodeId, Pattern},
    charset::{
        CharRange, CharSet,
        predefined::{self, DIGIT, LINE_TERMINATOR, SPACE, WORD},
    },
};

/// The union of the character sets of `elements`, which must be characters,
/// class ranges, character sets, or character classes.
#[must_use]
pub fn char_set_of(pattern: &Pattern, elements: &[NodeId], flags: &Flags) -> CharSet {
    elements
        .iter()
        .map(|&id| char_set_of_element(pattern, id, flags))
        .fold(CharSet::empty(flags.maximum()), |acc, set| acc.union(&set))
}

/// The characters a single character-consuming node can match.
///
/// # Panics
///
/// Panics if `id` is not a character, class range, character set, or
/// character class.
#[must_use]
pub fn char_set_of_element(pattern: &Pattern, id: NodeId, flags: &Flags) -> CharSet {
    let maximum = flags.maximum();
    match pattern.node(id) {
        Node::Character(c) => case_closed(CharSet::from_char(maximum, c.value), flags),
        Node::CharacterClassRange { min, max } => {
            case_closed(CharSet::from_range(maximum, min.value, max.value), flags)
        }
        Node::CharacterSet(kind) => char_set_of_kind(kind, flags),
        Node::CharacterClass { negate, elements } => {
            let set = char_set_of(pattern, elements, flags);
            if *negate { set.negate() } else { set }
        }
        other => panic!("a {} does not consume a character", other.kind_name()),
    }
}

/// The characters of `\d`, `\s`, `\w`, `.`, or a property escape.
#[must_use]
pub fn char_set_of_kind(kind: &CharacterSetKind, flags: &Flags) -> CharSet {
    let maximum = flags.maximum();
    let (positive, negate) = match kind {
        CharacterSetKind::Any => {
            return if flags.dot_all {
                CharSet::all(maximum)
            } else {
                predefined::from_table(maximum, LINE_TERMINATOR).negate()
            };
        }
        CharacterSetKind::Digit { negate } => (predefined::from_table(maximum, DIGIT), *negate),
        CharacterSetKind::Space { negate } => (predefined::from_table(maximum, SPACE), *negate),
        CharacterSetKind::Word { negate } => (predefined::from_table(maximum, WORD), *negate),
        CharacterSetKind::Property(property) => (
            CharSet::from_ranges(
                maximum,
                property
                    .ranges
                    .iter()
                    .filter(|r| r.min <= maximum)
                    .map(|r| CharRange {
                        min: r.min,
                        max: r.max.min(maximum),
                    }),
            ),
            property.negate,
        ),
    };

    // The matcher compares canonicalized characters, so the set it
    // effectively tests is closed under case folding on both sides of the
    // negation.
    let positive = case_closed(positive, flags);
    if negate {
        case_closed(positive.negate(), flags)
    } else {
        positive
    }
}

fn case_closed(set: CharSet, flags: &Flags) -> CharSet {
    if flags.ignore_case {
        set.with_case_variations(flags.unicode)
    } else {
        set
    }
}
