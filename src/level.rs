// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log levels and their textual names.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// An enum representing the available verbosity levels of the logger.
///
/// Levels are ordered from the most verbose to the most severe. [`Level::None`] sorts above every
/// level a record can carry, so using it as a threshold disables all output.
#[repr(u8)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String"))]
pub enum Level {
    /// Designates lower priority information.
    Debug = 1,
    /// Designates useful information.
    #[default]
    Info = 2,
    /// Designates hazardous situations.
    Warn = 3,
    /// Designates very serious errors.
    Error = 4,
    /// Designates errors after which the process terminates.
    Fatal = 5,
    /// Disables all levels when used as a threshold.
    None = 6,
}

const LEVELS: [Level; 6] = [
    Level::Debug,
    Level::Info,
    Level::Warn,
    Level::Error,
    Level::Fatal,
    Level::None,
];

impl Level {
    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub const fn name(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::None => "NONE",
        }
    }

    /// Return the ordinal of the `Level`, from `1` (`DEBUG`) to `6` (`NONE`).
    pub const fn value(&self) -> u8 {
        *self as u8
    }

    /// Map an ordinal back to its `Level`, falling back to [`Level::Info`] when out of range.
    pub fn from_value(value: u8) -> Level {
        LEVELS
            .into_iter()
            .find(|level| level.value() == value)
            .unwrap_or(Level::Info)
    }

    /// Parse a level name, falling back to [`Level::Info`] for unrecognized input.
    ///
    /// Matching ignores ASCII case. Use the [`FromStr`] implementation to reject unknown names
    /// instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::Level;
    ///
    /// assert_eq!(Level::from_name("warn"), Level::Warn);
    /// assert_eq!(Level::from_name("verbose"), Level::Info);
    /// ```
    pub fn from_name(name: &str) -> Level {
        name.parse().unwrap_or(Level::Info)
    }

    /// Whether a record at this level passes the given threshold.
    ///
    /// [`Level::None`] is a threshold only; a record carrying it never passes.
    pub fn passes(&self, threshold: Level) -> bool {
        *self != Level::None && *self >= threshold
    }
}

/// Map a level name to its ordinal. Unknown names map to the ordinal of `INFO`.
pub fn level_value(name: &str) -> u8 {
    Level::from_name(name).value()
}

/// Map an ordinal to its level name. Out-of-range values map to `"INFO"`.
pub fn level_name(value: u8) -> &'static str {
    Level::from_value(value).name()
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for level in LEVELS {
            if s.eq_ignore_ascii_case(level.name()) {
                return Ok(level);
            }
        }

        Err(Error::new(format!("malformed level: {s:?}")))
    }
}

impl From<String> for Level {
    fn from(name: String) -> Self {
        Level::from_name(&name)
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Level::Error,
            log::Level::Warn => Level::Warn,
            log::Level::Info => Level::Info,
            log::Level::Debug | log::Level::Trace => Level::Debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_value_and_name() {
        assert_eq!(level_value("DEBUG"), 1);
        assert_eq!(level_value("INFO"), 2);
        assert_eq!(level_value("WARN"), 3);
        assert_eq!(level_value("ERROR"), 4);
        assert_eq!(level_value("FATAL"), 5);
        assert_eq!(level_value("NONE"), 6);

        for value in 1..=6 {
            assert_eq!(level_value(level_name(value)), value);
        }
    }

    #[test]
    fn test_unknown_input_maps_to_info() {
        assert_eq!(level_value("TRACE"), Level::Info.value());
        assert_eq!(level_value(""), Level::Info.value());
        assert_eq!(level_name(0), "INFO");
        assert_eq!(level_name(7), "INFO");
        assert_eq!(level_name(u8::MAX), "INFO");
        assert!("TRACE".parse::<Level>().is_err());
    }

    #[test]
    fn test_threshold_comparison() {
        assert!(Level::Error.passes(Level::Warn));
        assert!(Level::Warn.passes(Level::Warn));
        assert!(!Level::Info.passes(Level::Warn));
        for level in LEVELS.into_iter().take(5) {
            assert!(!level.passes(Level::None));
        }
        for threshold in LEVELS {
            assert!(!Level::None.passes(threshold), "threshold {threshold}");
        }
        assert_eq!(format!("[{:>5}]", Level::Warn), "[ WARN]");
    }
}
