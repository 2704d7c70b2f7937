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

//! The process-wide default logger.
//!
//! The default logger is installed once, through [`init`] or [`LoggerBuilder::try_apply`], and
//! lives until the process exits. The [`debug!`](crate::debug) family of macros write to it when
//! no explicit logger is given.
//!
//! Records emitted before a default logger is installed are refused: a short diagnostic goes to
//! standard error instead.

use std::fmt;
use std::io;
use std::io::Write;
use std::sync::OnceLock;

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::logger::Config;
use crate::logger::FATAL_EXIT_CODE;
use crate::logger::LoggerBuilder;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

const UNINITIALIZED: &str = "ERROR: logging before daylog::init\n";

/// The default logger, if one has been installed.
pub fn default_logger() -> Option<&'static Logger> {
    DEFAULT_LOGGER.get()
}

/// Whether a default logger has been installed.
pub fn is_initialized() -> bool {
    DEFAULT_LOGGER.get().is_some()
}

/// Install a default logger built from `config`.
///
/// # Errors
///
/// Return an error if the logger cannot be built or a default logger is already installed.
///
/// # Examples
///
/// ```
/// use daylog::Config;
/// use daylog::Level;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = Config {
///     level: Level::Debug,
///     log_dir: Some(dir.path().to_path_buf()),
///     app_name: Some("my_app".to_string()),
///     ..Config::default()
/// };
///
/// daylog::init(config).unwrap();
/// daylog::debug!("started with pid {}", std::process::id());
/// daylog::global::shutdown();
/// ```
pub fn init(config: Config) -> Result<(), Error> {
    LoggerBuilder::new().config(config).try_apply()
}

pub(crate) fn set_default_logger(logger: Logger) -> Result<(), Error> {
    // dropping a rejected logger stops its maintenance thread
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| Error::new("the default logger has already been installed"))
}

/// Flush the default logger, if installed.
pub fn flush() {
    if let Some(logger) = default_logger() {
        logger.flush();
    }
}

/// Stop the default logger's maintenance thread and flush it.
///
/// The default logger is never dropped, so call this before the process exits to make sure
/// buffered records reach the file.
pub fn shutdown() {
    if let Some(logger) = default_logger() {
        logger.shutdown();
    }
}

pub(crate) fn refuse() {
    let _ = io::stderr().write_all(UNINITIALIZED.as_bytes());
}

#[doc(hidden)]
#[track_caller]
pub fn emit_fmt(level: Level, args: fmt::Arguments<'_>) {
    match default_logger() {
        Some(logger) => logger.emit_fmt(level, args),
        None => refuse(),
    }
}

#[doc(hidden)]
#[track_caller]
pub fn fatal_fmt(args: fmt::Arguments<'_>) -> ! {
    match default_logger() {
        Some(logger) => logger.fatal_fmt(args),
        None => {
            refuse();
            std::process::exit(FATAL_EXIT_CODE)
        }
    }
}
