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

//! Capture of the source location that emitted a record.
//!
//! Every public entry point that may capture a call site is annotated with `#[track_caller]`,
//! down to [`CallSite::capture`]. Each wrapping layer therefore contributes zero frames, and the
//! captured location is always the first frame outside this crate: the line that called
//! `Logger::info`, the line that expanded `daylog::info!`, and so on. Adding a wrapper of your own
//! keeps this contract only if the wrapper is `#[track_caller]` too.

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::path::Path;

const UNKNOWN_FILE: &str = "???";
const UNKNOWN_LINE: u32 = 1;

/// The basename of a source file and a line within it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite<'a> {
    file: Cow<'a, str>,
    line: u32,
}

impl CallSite<'static> {
    /// Capture the location of the caller.
    #[track_caller]
    pub fn capture() -> CallSite<'static> {
        CallSite::from_location(Location::caller())
    }

    /// The site used when the caller cannot be determined.
    pub fn placeholder() -> CallSite<'static> {
        CallSite {
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: UNKNOWN_LINE,
        }
    }

    fn from_location(location: &'static Location<'static>) -> CallSite<'static> {
        CallSite::new(Some(location.file()), Some(location.line()))
    }
}

impl<'a> CallSite<'a> {
    /// Build a call site from an optional file path and line, substituting the placeholder if
    /// either is missing.
    pub fn new(file: Option<&'a str>, line: Option<u32>) -> CallSite<'a> {
        match (file.and_then(basename), line) {
            (Some(file), Some(line)) => CallSite { file, line },
            _ => CallSite {
                file: Cow::Borrowed(UNKNOWN_FILE),
                line: UNKNOWN_LINE,
            },
        }
    }

    /// The basename of the source file.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// The line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for CallSite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file:{} line:{}", self.file, self.line)
    }
}

// `file!()` uses the host separator, while paths from the `log` crate may use either
fn basename(path: &str) -> Option<Cow<'_, str>> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if name.is_empty() {
        return Path::new(path)
            .file_name()
            .map(|name| Cow::Owned(name.to_string_lossy().into_owned()));
    }
    Some(Cow::Borrowed(name))
}
