use crate::{
    Error, Result,
    charset::{MAX_UNICODE, MAX_UTF16},
};
use std::{fmt, str::FromStr};

/// The flags of a regular expression literal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multiline: bool,
    /// `s`
    pub dot_all: bool,
    /// `u`
    pub unicode: bool,
    /// `g`
    pub global: bool,
    /// `y`
    pub sticky: bool,
}

impl Flags {
    /// Parses a flags string like `"gimsuy"`, in any order.
    ///
    /// # Errors
    ///
    /// If the string contains an unknown or repeated flag, an [`Error`] is
    /// returned.
    pub fn parse(flags: &str) -> Result<Self> {
        let mut parsed = Flags::default();
        for (pos, c) in flags.char_indices() {
            let flag = match c {
                'g' => &mut parsed.global,
                'i' => &mut parsed.ignore_case,
                'm' => &mut parsed.multiline,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                'y' => &mut parsed.sticky,
                _ => return Err(Error::UnknownFlag { pos, flag: c }),
            };
            if *flag {
                return Err(Error::DuplicateFlag { pos, flag: c });
            }
            *flag = true;
        }
        Ok(parsed)
    }

    /// The largest code point a pattern with these flags can match.
    #[inline]
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        if self.unicode { MAX_UNICODE } else { MAX_UTF16 }
    }
}

impl FromStr for Flags {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (on, c) in [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multiline, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ] {
            if on {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}
