//! The character sets behind `\d`, `\s`, `\w`, `.`, and `\p{..}`.

use super::{CharRange, CharSet};
use crate::{Error, Result};
use regex_syntax::{
    ParserBuilder,
    hir::{Class, HirKind},
};

/// `\d`.
pub const DIGIT: &[(u32, u32)] = &[(0x30, 0x39)];

/// `\s`: white space and line terminators.
pub const SPACE: &[(u32, u32)] = &[
    (0x09, 0x0D),
    (0x20, 0x20),
    (0xA0, 0xA0),
    (0x1680, 0x1680),
    (0x2000, 0x200A),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x205F, 0x205F),
    (0x3000, 0x3000),
    (0xFEFF, 0xFEFF),
];

/// `\w` without case folding.
pub const WORD: &[(u32, u32)] = &[(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)];

/// The characters `.` does not match unless the `s` flag is set.
pub const LINE_TERMINATOR: &[(u32, u32)] = &[(0x0A, 0x0A), (0x0D, 0x0D), (0x2028, 0x2029)];

/// Builds a set from one of the tables of this module.
#[must_use]
pub fn from_table(maximum: u32, table: &[(u32, u32)]) -> CharSet {
    CharSet::from_ranges(
        maximum,
        table
            .iter()
            .filter(|&&(min, _)| min <= maximum)
            .map(|&(min, max)| CharRange {
                min,
                max: max.min(maximum),
            }),
    )
}

/// Resolves a Unicode property escape such as `\p{Script=Greek}` or
/// `\p{Lu}` to its code point ranges.
///
/// # Errors
///
/// If the property name or value is not known, an [`Error`] is returned.
pub fn resolve_property(key: &str, value: Option<&str>) -> Result<Vec<CharRange>> {
    let name = match value {
        Some(value) => format!("{key}={value}"),
        None => key.to_owned(),
    };
    let unknown = || Error::UnknownProperty { name: name.clone() };

    let hir = ParserBuilder::new()
        .build()
        .parse(&format!(r"\p{{{name}}}"))
        .map_err(|_| unknown())?;

    match hir.kind() {
        HirKind::Class(Class::Unicode(class)) => Ok(class
            .ranges()
            .iter()
            .map(|r| CharRange {
                min: u32::from(r.start()),
                max: u32::from(r.end()),
            })
            .collect()),
        _ => Err(unknown()),
    }
}
