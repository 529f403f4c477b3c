use super::NodeId;
use std::fmt;

/// An upper bound that may be unbounded. `Finite` sorts below `Infinite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LenBound {
    Finite(u32),
    Infinite,
}

impl LenBound {
    #[must_use]
    pub const fn is_finite(self) -> bool {
        matches!(self, LenBound::Finite(_))
    }

    /// Multiplies two bounds. `0 * ∞` is `0`; a finite overflow is `∞`.
    #[must_use]
    pub fn saturating_mul(self, other: LenBound) -> LenBound {
        match (self, other) {
            (LenBound::Finite(0), _) | (_, LenBound::Finite(0)) => LenBound::Finite(0),
            (LenBound::Finite(a), LenBound::Finite(b)) => {
                a.checked_mul(b).map_or(LenBound::Infinite, LenBound::Finite)
            }
            _ => LenBound::Infinite,
        }
    }

    /// Adds two bounds. A finite overflow is `∞`.
    #[must_use]
    pub fn saturating_add(self, other: LenBound) -> LenBound {
        match (self, other) {
            (LenBound::Finite(a), LenBound::Finite(b)) => {
                a.checked_add(b).map_or(LenBound::Infinite, LenBound::Finite)
            }
            _ => LenBound::Infinite,
        }
    }
}

impl PartialEq<u32> for LenBound {
    fn eq(&self, other: &u32) -> bool {
        *self == LenBound::Finite(*other)
    }
}

impl PartialOrd<u32> for LenBound {
    fn partial_cmp(&self, other: &u32) -> Option<std::cmp::Ordering> {
        Some(self.cmp(&LenBound::Finite(*other)))
    }
}

impl fmt::Display for LenBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LenBound::Finite(n) => write!(f, "{n}"),
            LenBound::Infinite => f.write_str("∞"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantifier {
    pub min: u32,
    pub max: LenBound,
    pub greedy: bool,
    pub element: NodeId,
}

impl Quantifier {
    /// The source form of the quantifier, e.g. `*`, `{2,}`, `+?`.
    #[must_use]
    pub fn suffix(&self) -> String {
        let mut s = match (self.min, self.max) {
            (0, LenBound::Infinite) => "*".to_owned(),
            (1, LenBound::Infinite) => "+".to_owned(),
            (0, LenBound::Finite(1)) => "?".to_owned(),
            (min, LenBound::Infinite) => format!("{{{min},}}"),
            (min, LenBound::Finite(max)) if min == max => format!("{{{min}}}"),
            (min, LenBound::Finite(max)) => format!("{{{min},{max}}}"),
        };
        if !self.greedy {
            s.push('?');
        }
        s
    }
}
