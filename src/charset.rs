//! Immutable code point set types.

use std::fmt;

pub mod case_fold;
pub mod predefined;

/// The largest code point of a pattern without the `u` flag.
pub const MAX_UTF16: u32 = 0xFFFF;

/// The largest code point of a pattern with the `u` flag.
pub const MAX_UNICODE: u32 = 0x10_FFFF;

/// The error type used by [`CharSet`].
#[derive(Debug, Eq, thiserror::Error, PartialEq)]
pub enum Error {
    /// An invalid range was given.
    #[error("invalid range ({0:#x} > {1:#x})")]
    Range(u32, u32),
    /// A code point above the maximum of the set was given.
    #[error("code point {value:#x} exceeds maximum {maximum:#x}")]
    OutOfBounds { value: u32, maximum: u32 },
}

/// An inclusive range of code points.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CharRange {
    pub min: u32,
    pub max: u32,
}

impl CharRange {
    /// Creates a new range.
    ///
    /// # Errors
    ///
    /// If `min > max`, an [`Error`] is returned.
    pub const fn new(min: u32, max: u32) -> Result<Self, Error> {
        if min <= max {
            Ok(Self { min, max })
        } else {
            Err(Error::Range(min, max))
        }
    }

    /// A range containing a single code point.
    #[must_use]
    pub const fn single(c: u32) -> Self {
        Self { min: c, max: c }
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, c: u32) -> bool {
        self.min <= c && c <= self.max
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> u64 {
        (self.max - self.min) as u64 + 1
    }
}

/// A set of code points.
///
/// The set is stored as a list of ranges that are sorted, pairwise disjoint,
/// and pairwise non-adjacent. Every operation preserves this, so two sets are
/// equal exactly when their range lists are equal.
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct CharSet {
    maximum: u32,
    ranges: Vec<CharRange>,
}

impl CharSet {
    /// Creates the empty set.
    #[must_use]
    pub const fn empty(maximum: u32) -> Self {
        Self {
            maximum,
            ranges: Vec::new(),
        }
    }

    /// Creates the set of all code points `0..=maximum`.
    #[must_use]
    pub fn all(maximum: u32) -> Self {
        Self {
            maximum,
            ranges: vec![CharRange { min: 0, max: maximum }],
        }
    }

    /// Creates a set with a single code point.
    ///
    /// # Panics
    ///
    /// Panics if `c > maximum`.
    #[must_use]
    pub fn from_char(maximum: u32, c: u32) -> Self {
        Self::from_range(maximum, c, c)
    }

    /// Creates a set from a single inclusive range.
    ///
    /// # Panics
    ///
    /// Panics if `min > max` or `max > maximum`.
    #[must_use]
    pub fn from_range(maximum: u32, min: u32, max: u32) -> Self {
        Self::try_from_ranges(maximum, [(min, max)]).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a set from any number of ranges, which may be unsorted and
    /// may overlap.
    ///
    /// # Panics
    ///
    /// Panics if any range is inverted or exceeds `maximum`.
    #[must_use]
    pub fn from_ranges(maximum: u32, ranges: impl IntoIterator<Item = CharRange>) -> Self {
        Self::try_from_ranges(maximum, ranges.into_iter().map(|r| (r.min, r.max)))
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a set from any number of `(min, max)` pairs.
    ///
    /// # Errors
    ///
    /// If any pair is inverted or exceeds `maximum`, an [`Error`] is returned.
    pub fn try_from_ranges(
        maximum: u32,
        ranges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self, Error> {
        let mut list = Vec::new();
        for (min, max) in ranges {
            let range = CharRange::new(min, max)?;
            if max > maximum {
                return Err(Error::OutOfBounds {
                    value: max,
                    maximum,
                });
            }
            list.push(range);
        }
        Ok(Self {
            maximum,
            ranges: normalize(list),
        })
    }

    /// Creates a set from loose code points.
    ///
    /// # Panics
    ///
    /// Panics if any code point exceeds `maximum`.
    #[must_use]
    pub fn from_code_points(maximum: u32, chars: impl IntoIterator<Item = u32>) -> Self {
        Self::from_ranges(maximum, chars.into_iter().map(CharRange::single))
    }

    #[inline]
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    #[inline]
    #[must_use]
    pub fn ranges(&self) -> &[CharRange] {
        &self.ranges
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self.ranges[..], [CharRange { min: 0, max }] if max == self.maximum)
    }

    /// Returns the number of code points in the set.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.ranges.iter().map(CharRange::size).sum()
    }

    /// Returns the only code point of the set, if the set has exactly one.
    #[must_use]
    pub fn single(&self) -> Option<u32> {
        match self.ranges[..] {
            [CharRange { min, max }] if min == max => Some(min),
            _ => None,
        }
    }

    /// Returns `true` if the set contains the given code point.
    #[must_use]
    pub fn has(&self, c: u32) -> bool {
        let index = self.ranges.partition_point(|r| r.max < c);
        self.ranges.get(index).is_some_and(|r| r.contains(c))
    }

    /// Returns the union of both sets.
    #[must_use]
    pub fn union(&self, other: &CharSet) -> CharSet {
        self.check_compatible(other);
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }

        let mut merged = Vec::with_capacity(self.ranges.len() + other.ranges.len());
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() || j < other.ranges.len() {
            let take_left = match (self.ranges.get(i), other.ranges.get(j)) {
                (Some(x), Some(y)) => x.min <= y.min,
                (left, _) => left.is_some(),
            };
            if take_left {
                push_merged(&mut merged, self.ranges[i]);
                i += 1;
            } else {
                push_merged(&mut merged, other.ranges[j]);
                j += 1;
            }
        }

        CharSet {
            maximum: self.maximum,
            ranges: merged,
        }
    }

    /// Returns the union of this set with all of `others`.
    #[must_use]
    pub fn union_all<'a>(&self, others: impl IntoIterator<Item = &'a CharSet>) -> CharSet {
        others
            .into_iter()
            .fold(self.clone(), |acc, other| acc.union(other))
    }

    /// Returns the intersection of both sets.
    #[must_use]
    pub fn intersect(&self, other: &CharSet) -> CharSet {
        self.check_compatible(other);

        let mut ranges = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (x, y) = (self.ranges[i], other.ranges[j]);
            let min = x.min.max(y.min);
            let max = x.max.min(y.max);
            if min <= max {
                ranges.push(CharRange { min, max });
            }
            if x.max < y.max {
                i += 1;
            } else {
                j += 1;
            }
        }

        CharSet {
            maximum: self.maximum,
            ranges,
        }
    }

    /// Returns all code points of this set that are not in `other`.
    #[must_use]
    pub fn without(&self, other: &CharSet) -> CharSet {
        self.intersect(&other.negate())
    }

    /// Returns the complement of this set within `0..=maximum`.
    #[must_use]
    pub fn negate(&self) -> CharSet {
        let mut ranges = Vec::with_capacity(self.ranges.len() + 1);
        let mut next = 0u32;
        let mut done = false;
        for range in &self.ranges {
            if range.min > next {
                ranges.push(CharRange {
                    min: next,
                    max: range.min - 1,
                });
            }
            if range.max == self.maximum {
                done = true;
                break;
            }
            next = range.max + 1;
        }
        if !done {
            ranges.push(CharRange {
                min: next,
                max: self.maximum,
            });
        }

        CharSet {
            maximum: self.maximum,
            ranges,
        }
    }

    #[must_use]
    pub fn is_subset_of(&self, other: &CharSet) -> bool {
        self.check_compatible(other);
        let mut j = 0;
        for range in &self.ranges {
            j += other.ranges[j..].partition_point(|r| r.max < range.min);
            match other.ranges.get(j) {
                Some(r) if r.min <= range.min && range.max <= r.max => {}
                _ => return false,
            }
        }
        true
    }

    #[inline]
    #[must_use]
    pub fn is_superset_of(&self, other: &CharSet) -> bool {
        other.is_subset_of(self)
    }

    #[must_use]
    pub fn is_disjoint_with(&self, other: &CharSet) -> bool {
        self.check_compatible(other);
        let (mut i, mut j) = (0, 0);
        while i < self.ranges.len() && j < other.ranges.len() {
            let (x, y) = (self.ranges[i], other.ranges[j]);
            if x.max < y.min {
                i += 1;
            } else if y.max < x.min {
                j += 1;
            } else {
                return false;
            }
        }
        true
    }

    /// Returns this set closed under the case folding used by the `i` flag.
    #[must_use]
    pub fn with_case_variations(&self, unicode: bool) -> CharSet {
        case_fold::with_case_variations(self, unicode)
    }

    #[inline]
    fn check_compatible(&self, other: &CharSet) {
        assert_eq!(
            self.maximum, other.maximum,
            "cannot combine character sets with different maximums"
        );
    }
}

impl fmt::Debug for CharSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CharSet({:#x})[", self.maximum)?;
        for (i, range) in self.ranges.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if range.min == range.max {
                write!(f, "{:#x}", range.min)?;
            } else {
                write!(f, "{:#x}..={:#x}", range.min, range.max)?;
            }
        }
        f.write_str("]")
    }
}

fn normalize(mut ranges: Vec<CharRange>) -> Vec<CharRange> {
    ranges.sort_unstable_by_key(|r| r.min);
    let mut merged: Vec<CharRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        push_merged(&mut merged, range);
    }
    merged
}

/// Appends `range`, whose `min` must not be below the last pushed `min`,
/// merging it with the tail if they overlap or touch.
#[inline]
fn push_merged(ranges: &mut Vec<CharRange>, range: CharRange) {
    if let Some(last) = ranges.last_mut()
        && range.min <= last.max.saturating_add(1)
    {
        last.max = last.max.max(range.max);
    } else {
        ranges.push(range);
    }
}
