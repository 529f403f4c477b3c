//! Semantic analysis of ECMAScript regular expression trees.
//!
//! The analyses answer questions such as "can this element match the empty
//! string?", "is this group a constant string?", or "which characters can
//! come right after this quantifier?". Every answer is sound: when a fact
//! cannot be decided exactly, the conservative answer is returned and marked
//! as such.

#![warn(clippy::pedantic, rust_2018_idioms)]
#![allow(clippy::missing_errors_doc, clippy::too_many_lines)]

pub mod ast;
pub mod backreference;
pub mod charset;
pub mod classify;
pub mod direction;
pub mod first_char;
pub mod follow;
pub mod to_charset;

pub use self::{
    ast::{Flags, LenBound, Node, NodeId, Pattern, PatternBuilder},
    backreference::{
        BackreferenceReach, backreference_always_after_group, backreference_reach,
        is_empty_backreference,
    },
    charset::CharSet,
    classify::{
        EmptyOptions, LengthRange, get_constant, get_length_range, is_empty, is_potentially_empty,
        is_potentially_zero_length, is_zero_length,
    },
    direction::{MatchingDirection, matching_direction},
    first_char::{
        FirstCharAfter, FirstConsumedChar, FirstConsumedCharAfter, FirstLookChar,
        first_char_after, first_char_consumed_by, first_consumed_char_after,
    },
    follow::{FollowOperations, PathEnd, StartMode, follow_paths},
    to_charset::{char_set_of, char_set_of_element},
};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An invalid character range was given.
    #[error(transparent)]
    CharSet(#[from] charset::Error),

    /// A Unicode property escape names an unknown property or value.
    #[error("unknown Unicode property '{name}'")]
    UnknownProperty { name: String },

    /// A quantifier with `min > max`.
    #[error("numbers out of order in quantifier ({{{min},{max}}})")]
    InvalidQuantifier { min: u32, max: LenBound },

    /// A backreference names a group index that does not exist.
    #[error("backreference \\{0} has no capturing group")]
    UnresolvedBackreference(u32),

    /// A named backreference names a group that does not exist.
    #[error("backreference \\k<{0}> has no capturing group")]
    UnknownGroupName(String),

    /// The same node was given to more than one parent.
    #[error("node {index} has more than one parent")]
    NodeReused { index: usize },

    /// A node was created but never attached to the tree.
    #[error("node {index} is not part of the pattern")]
    DetachedNode { index: usize },

    /// A pattern, group, or lookaround was given no alternatives.
    #[error("a {kind} needs at least one alternative")]
    MissingAlternatives { kind: &'static str },

    /// A node was attached to a parent that cannot contain it.
    #[error("a {kind} cannot be a child of a {parent}")]
    UnexpectedNode {
        kind: &'static str,
        parent: &'static str,
    },

    /// A flags string contains an unknown flag.
    #[error("invalid flag '{flag}' at {pos}")]
    UnknownFlag { pos: usize, flag: char },

    /// A flags string contains the same flag twice.
    #[error("duplicate flag '{flag}' at {pos}")]
    DuplicateFlag { pos: usize, flag: char },
}

pub type Result<T> = std::result::Result<T, Error>;
