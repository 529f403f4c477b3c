//! Case folding tables for the `i` flag.
//!
//! Both tables are computed once from the whole code point space the first
//! time they are needed and are read-only afterwards.

use super::{CharSet, MAX_UNICODE, MAX_UTF16};
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet};

static UNICODE: Lazy<CaseFolding> = Lazy::new(|| CaseFolding::build(MAX_UNICODE, simple_fold));
static LEGACY: Lazy<CaseFolding> = Lazy::new(|| CaseFolding::build(MAX_UTF16, canonicalize));

/// Maps every code point that has case variations to all of its variations.
struct CaseFolding {
    /// Sorted by code point. Code points without variations are absent.
    entries: Vec<(u32, Box<[u32]>)>,
}

impl CaseFolding {
    fn build(maximum: u32, key: fn(u32) -> u32) -> Self {
        log::debug!("building case folding table up to {maximum:#x}");

        let mut classes: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for c in 0..=maximum {
            let k = key(c);
            if k != c && k <= maximum {
                classes.entry(k).or_default().push(c);
            }
        }

        let mut variations: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
        for (k, mut members) in classes {
            members.push(k);
            for &member in &members {
                variations
                    .entry(member)
                    .or_default()
                    .extend(members.iter().copied().filter(|&m| m != member));
            }
        }

        let entries = variations
            .into_iter()
            .map(|(c, others)| (c, others.into_iter().collect()))
            .collect::<Vec<_>>();
        log::debug!("case folding table has {} entries", entries.len());

        Self { entries }
    }

    fn variations(&self, c: u32) -> &[u32] {
        self.entries
            .binary_search_by_key(&c, |(k, _)| *k)
            .map_or(&[], |index| &self.entries[index].1)
    }

    fn entries_in(&self, min: u32, max: u32) -> &[(u32, Box<[u32]>)] {
        let start = self.entries.partition_point(|(c, _)| *c < min);
        let end = self.entries.partition_point(|(c, _)| *c <= max);
        &self.entries[start..end]
    }
}

fn table(unicode: bool) -> &'static CaseFolding {
    if unicode { &UNICODE } else { &LEGACY }
}

/// Returns all code points that match `c` case-insensitively, excluding `c`.
#[must_use]
pub fn variations(c: u32, unicode: bool) -> &'static [u32] {
    table(unicode).variations(c)
}

/// Returns `set` together with every case variation of its members.
#[must_use]
pub fn with_case_variations(set: &CharSet, unicode: bool) -> CharSet {
    let table = table(unicode);
    let maximum = set.maximum();

    let extra = set
        .ranges()
        .iter()
        .flat_map(|range| table.entries_in(range.min, range.max))
        .flat_map(|(_, others)| others.iter().copied())
        .filter(|&c| c <= maximum)
        .collect::<Vec<_>>();

    if extra.is_empty() {
        set.clone()
    } else {
        set.union(&CharSet::from_code_points(maximum, extra))
    }
}

/// Single-character case mapping, or `None` if the mapping expands.
fn single(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}

/// Unicode simple case folding, as used with the `u` flag.
fn simple_fold(c: u32) -> u32 {
    // Dotted and dotless i only fold under Turkic rules.
    if matches!(c, 0x0130 | 0x0131) {
        return c;
    }
    let Some(ch) = char::from_u32(c) else {
        return c;
    };
    let upper = single(ch.to_uppercase()).unwrap_or(ch);
    single(upper.to_lowercase()).map_or(c, u32::from)
}

/// The `Canonicalize` operation used without the `u` flag: upper-case
/// mapping, except that nothing outside ASCII maps into ASCII.
fn canonicalize(c: u32) -> u32 {
    let Some(ch) = char::from_u32(c) else {
        return c;
    };
    let Some(upper) = single(ch.to_uppercase()) else {
        return c;
    };
    let upper = u32::from(upper);
    if upper > MAX_UTF16 || (c >= 128 && upper < 128) {
        c
    } else {
        upper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_variations() {
        assert_eq!(variations(u32::from('a'), false), &[u32::from('A')]);
        assert_eq!(variations(u32::from('A'), true), &[u32::from('a')]);
        assert!(variations(u32::from('1'), true).is_empty());
    }

    #[test]
    fn test_kelvin_sign_only_folds_with_unicode() {
        let k = u32::from('k');
        assert_eq!(variations(k, true), &[u32::from('K'), 0x212A]);
        assert_eq!(variations(k, false), &[u32::from('K')]);
        assert!(variations(0x212A, false).is_empty());
    }

    #[test]
    fn test_sigma_class() {
        assert_eq!(variations(0x03C2, true), &[0x03A3, 0x03C3]);
        assert_eq!(variations(0x03C2, false), &[0x03A3, 0x03C3]);
    }

    #[test]
    fn test_long_s() {
        let s = u32::from('s');
        assert_eq!(variations(0x017F, true), &[u32::from('S'), s]);
        assert!(variations(0x017F, false).is_empty());
    }
}
