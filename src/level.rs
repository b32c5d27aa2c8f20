// SPDX-License-Identifier: MIT OR Apache-2.0

//! Severities and the bitmask that enables them.
//!
//! Each [`Level`] owns one bit. A [`LevelMask`] is the OR of the enabled bits, and
//! a log call proceeds only when `mask & bit == bit`. This keeps a disabled call
//! down to a single bitwise test before anything is formatted or allocated.
//!
//! ```
//! use logwire::{Level, LevelMask};
//!
//! let mask = LevelMask::parse(["WARN", "ERROR"]).unwrap();
//! assert!(mask.contains(Level::Error));
//! assert!(!mask.contains(Level::Debug));
//! ```

use crate::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Detailed diagnostics for developers
    Debug,
    /// Normal operational messages
    Info,
    /// Suspicious condition
    Warn,
    /// Runtime error
    Error,
    /// Unrecoverable condition. Always written synchronously and echoed to the console.
    Fatal,
}

impl Level {
    /// Every level, in ascending severity.
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// The bit this level occupies in a [`LevelMask`].
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// The case-sensitive name used in configuration and in the rendered tag.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.name() == s)
            .ok_or_else(|| Error::InvalidLogLevel(s.to_string()))
    }
}

/**
A set of enabled levels.

The default mask enables nothing; a logger only writes what its configuration names.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LevelMask(u8);

impl LevelMask {
    pub const NONE: LevelMask = LevelMask(0);
    pub const ALL: LevelMask = LevelMask(0b1_1111);

    /**
    Builds a mask from level names.

    Names are case-sensitive. If any name is unrecognized the whole call fails with
    [`Error::InvalidLogLevel`] and no mask is produced, so bits named before the bad
    entry are never retained.
    */
    pub fn parse<I, S>(names: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mask = LevelMask::NONE;
        for name in names {
            mask = mask.with(name.as_ref().parse()?);
        }
        Ok(mask)
    }

    /// Returns a copy of this mask with `level` enabled.
    #[inline]
    pub const fn with(self, level: Level) -> Self {
        LevelMask(self.0 | level.bit())
    }

    #[inline]
    pub const fn contains(self, level: Level) -> bool {
        self.0 & level.bit() == level.bit()
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Level> for LevelMask {
    fn from_iter<T: IntoIterator<Item = Level>>(iter: T) -> Self {
        iter.into_iter().fold(LevelMask::NONE, LevelMask::with)
    }
}

impl Display for LevelMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for level in Level::ALL.into_iter().filter(|l| self.contains(*l)) {
            if !first {
                f.write_str("|")?;
            }
            f.write_str(level.name())?;
            first = false;
        }
        Ok(())
    }
}
