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

//! A bridge to forward records from the `log` crate to daylog.
//!
//! Every [`Logger`] implements [`log::Log`] directly, so it can also be installed by hand with
//! [`log::set_boxed_logger`]. [`log::Level::Trace`] records are written at [`Level::Debug`].

use crate::CallSite;
use crate::Level;
use crate::Logger;
use crate::global::default_logger;
use crate::global::refuse;

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.enabled(Level::from(metadata.level()))
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        if self.enabled(level) {
            let site = CallSite::new(record.file(), record.line());
            self.emit_at(level, site, record.args());
        }
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}

struct LogCrateLogger(());

impl log::Log for LogCrateLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        let Some(logger) = default_logger() else {
            return false;
        };

        log::Log::enabled(logger, metadata)
    }

    fn log(&self, record: &log::Record) {
        match default_logger() {
            Some(logger) => log::Log::log(logger, record),
            None => refuse(),
        }
    }

    fn flush(&self) {
        if let Some(logger) = default_logger() {
            Logger::flush(logger);
        }
    }
}

/// Set up the log crate global logger.
///
/// This function calls [`log::set_logger`] to set up a proxy, and all records from the log crate
/// will be forwarded to daylog's [default logger](crate::global::default_logger). Records
/// arriving before the default logger is installed are refused like those of
/// [`info!`](crate::info).
///
/// This function will set the global maximum log level to `Trace`. To override this, call
/// [`log::set_max_level`] after this function.
///
/// # Errors
///
/// Return an error if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// if let Err(err) = daylog::bridge::try_setup_log_crate() {
///     eprintln!("failed to setup log crate: {err}");
/// }
/// ```
pub fn try_setup_log_crate() -> Result<(), log::SetLoggerError> {
    static LOGGER: LogCrateLogger = LogCrateLogger(());
    log::set_logger(&LOGGER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Set up the log crate global logger.
///
/// See [`try_setup_log_crate`] for details.
///
/// # Panics
///
/// Panic if the log crate global logger has already been set.
///
/// # Examples
///
/// ```
/// daylog::bridge::setup_log_crate();
/// ```
pub fn setup_log_crate() {
    try_setup_log_crate().expect(
        "daylog::bridge::setup_log_crate must be called before the log crate global logger initialized",
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use log::Log;

    use super::*;
    use crate::sink::Memory;

    #[test]
    fn test_log_records_keep_their_call_site() {
        let memory = Memory::default();
        let logger = Logger::builder()
            .level(Level::Debug)
            .flush_interval(Duration::ZERO)
            .sink(memory.clone())
            .build()
            .unwrap();

        logger.log(
            &log::Record::builder()
                .level(log::Level::Trace)
                .args(format_args!("from {}", "log"))
                .file(Some("src/net/conn.rs"))
                .line(Some(77))
                .build(),
        );
        logger.log(
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("no location"))
                .build(),
        );

        let lines = memory.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[DEBUG]["));
        assert!(lines[0].ends_with("[file:conn.rs line:77] from log"));
        assert!(lines[1].starts_with("[WARN]["));
        assert!(lines[1].ends_with("[file:??? line:1] no location"));
    }

    #[test]
    fn test_log_enabled_follows_threshold() {
        let logger = Logger::builder()
            .level(Level::Error)
            .flush_interval(Duration::ZERO)
            .sink(Memory::default())
            .build()
            .unwrap();

        let warn = log::Metadata::builder().level(log::Level::Warn).build();
        let error = log::Metadata::builder().level(log::Level::Error).build();
        assert!(!Log::enabled(&logger, &warn));
        assert!(Log::enabled(&logger, &error));
    }
}
