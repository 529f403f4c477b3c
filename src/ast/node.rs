use super::{NodeId, Quantifier};
use crate::charset::CharRange;

#[derive(Clone, PartialEq, Debug)]
pub enum Node {
    /// The root: `a|b`.
    Pattern { alternatives: Vec<NodeId> },
    /// A sequence of elements in source order.
    Alternative { elements: Vec<NodeId> },
    /// `(?:...)`
    Group { alternatives: Vec<NodeId> },
    /// `(...)` or `(?<name>...)`
    CapturingGroup {
        index: u32, // 1-based, in order of the opening parentheses
        name: Option<String>,
        alternatives: Vec<NodeId>,
    },
    Quantifier(Quantifier),
    Character(Character),
    /// `[...]` or `[^...]`. Elements are characters, ranges, and sets.
    CharacterClass { negate: bool, elements: Vec<NodeId> },
    CharacterClassRange { min: Character, max: Character },
    CharacterSet(CharacterSetKind),
    /// `\1` or `\k<name>`, resolved to its capturing group.
    Backreference { group: NodeId },
    Assertion(Assertion),
}

impl Node {
    /// A short name of the node kind, for messages.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Node::Pattern { .. } => "pattern",
            Node::Alternative { .. } => "alternative",
            Node::Group { .. } => "group",
            Node::CapturingGroup { .. } => "capturing group",
            Node::Quantifier(_) => "quantifier",
            Node::Character(_) => "character",
            Node::CharacterClass { .. } => "character class",
            Node::CharacterClassRange { .. } => "character class range",
            Node::CharacterSet(_) => "character set",
            Node::Backreference { .. } => "backreference",
            Node::Assertion(_) => "assertion",
        }
    }

    /// Returns `true` for nodes that may appear in an [`Node::Alternative`].
    #[must_use]
    pub const fn is_element(&self) -> bool {
        !matches!(
            self,
            Node::Pattern { .. } | Node::Alternative { .. } | Node::CharacterClassRange { .. }
        )
    }

    /// The alternatives of a pattern, group, or lookaround.
    #[must_use]
    pub fn alternatives(&self) -> Option<&[NodeId]> {
        match self {
            Node::Pattern { alternatives }
            | Node::Group { alternatives }
            | Node::CapturingGroup { alternatives, .. }
            | Node::Assertion(Assertion::Lookaround { alternatives, .. }) => Some(alternatives),
            _ => None,
        }
    }

    /// The direct children of this node in source order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Alternative { elements } | Node::CharacterClass { elements, .. } => elements,
            Node::Quantifier(q) => std::slice::from_ref(&q.element),
            _ => self.alternatives().unwrap_or(&[]),
        }
    }
}

/// A single code point with its surface form (e.g. `a`, `\n`, `\u{1F600}`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Character {
    pub value: u32,
    pub raw: String,
}

impl Character {
    /// Creates a character with a surface form derived from its value.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self {
            value,
            raw: escape(value),
        }
    }
}

fn escape(value: u32) -> String {
    match char::from_u32(value) {
        Some(c) if "\\^$.|?*+()[]{}-/".contains(c) => format!("\\{c}"),
        Some('\n') => r"\n".to_owned(),
        Some('\r') => r"\r".to_owned(),
        Some('\t') => r"\t".to_owned(),
        Some(c) if !c.is_control() => c.to_string(),
        _ if value <= 0xFFFF => format!("\\u{value:04X}"),
        _ => format!("\\u{{{value:X}}}"),
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum CharacterSetKind {
    /// `.`
    Any,
    /// `\d` / `\D`
    Digit { negate: bool },
    /// `\s` / `\S`
    Space { negate: bool },
    /// `\w` / `\W`
    Word { negate: bool },
    /// `\p{..}` / `\P{..}`
    Property(UnicodeProperty),
}

/// A resolved Unicode property escape.
#[derive(Clone, PartialEq, Debug)]
pub struct UnicodeProperty {
    pub key: String,
    pub value: Option<String>,
    pub negate: bool,
    /// The positive ranges of the property, before negation.
    pub ranges: Vec<CharRange>,
}

#[derive(Clone, PartialEq, Debug)]
pub enum Assertion {
    /// `^`
    Start,
    /// `$`
    End,
    /// `\b` / `\B`
    WordBoundary { negate: bool },
    /// `(?=..)`, `(?!..)`, `(?<=..)`, `(?<!..)`
    Lookaround {
        kind: LookaroundKind,
        negate: bool,
        alternatives: Vec<NodeId>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LookaroundKind {
    Lookahead,
    Lookbehind,
}
