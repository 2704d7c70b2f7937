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

//! A file sink that rotates by calendar day and by size.
//!
//! The active file is named `{app}-{YYYY-MM-DD}.log`. When it grows past the size limit it is
//! shifted down a chain of generations `{app}-{YYYY-MM-DD}.log.1` (newest) through
//! `{app}-{YYYY-MM-DD}.log.9` (oldest); the oldest generation is deleted before the shift, so at
//! most [`MAX_GENERATIONS`] files exist per day.
//!
//! # Example
//!
//! ```
//! use daylog::Logger;
//! use daylog::sink::RollingFileSink;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let sink = RollingFileSink::builder(dir.path(), "my_app").build().unwrap();
//!
//! // retention sweeps the logger's configured directory, so keep the two in step
//! let logger = Logger::builder()
//!     .log_dir(dir.path())
//!     .app_name("my_app")
//!     .sink(sink)
//!     .build()
//!     .unwrap();
//! logger.info("This line will be written to my_app-{today}.log.");
//! ```

pub use self::rolling::RollingFileSink;
pub use self::rolling::RollingFileSinkBuilder;

mod clock;
mod rolling;

/// The size in bytes past which the active file is rotated.
pub const MAX_FILE_SIZE: usize = 1024 * 1024 * 1024;

/// The default capacity of the write buffer in front of the active file.
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// The number of files kept per day: the active file plus the rotated generations.
pub const MAX_GENERATIONS: usize = 10;

/// The `strftime` format of the date tag embedded in every file name.
///
/// The format is fixed-width and zero-padded, so date tags order lexicographically. Retention
/// relies on this.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The name of a log file for the given day and generation.
///
/// Generation `0` is the active file and carries no numeric suffix.
///
/// # Examples
///
/// ```
/// use daylog::sink::rolling::file_name;
///
/// assert_eq!(file_name("app", "2024-08-10", 0), "app-2024-08-10.log");
/// assert_eq!(file_name("app", "2024-08-10", 3), "app-2024-08-10.log.3");
/// ```
pub fn file_name(app_name: &str, date: &str, generation: usize) -> String {
    if generation == 0 {
        format!("{app_name}-{date}.log")
    } else {
        format!("{app_name}-{date}.log.{generation}")
    }
}
