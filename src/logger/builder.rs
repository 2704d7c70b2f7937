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

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::Error;
use crate::Level;
use crate::Logger;
use crate::Trap;
use crate::logger::Config;
use crate::logger::HeaderMode;
use crate::sink::SharedSink;
use crate::sink::Sink;
use crate::trap::DefaultTrap;

/// A builder for configuring a [`Logger`].
///
/// Without an explicit [`sink`](LoggerBuilder::sink), the logger writes to a
/// [`RollingFileSink`](crate::sink::RollingFileSink) built from the configured directory, app
/// name, and buffer size when the first record arrives.
///
/// # Examples
///
/// ```
/// use daylog::HeaderMode;
/// use daylog::Level;
/// use daylog::Logger;
///
/// let dir = tempfile::tempdir().unwrap();
/// let logger = Logger::builder()
///     .level(Level::Debug)
///     .log_dir(dir.path())
///     .app_name("my_app")
///     .header_mode(HeaderMode::WithoutFileLine)
///     .build()
///     .unwrap();
///
/// logger.debug("ready");
/// ```
#[must_use = "call `build` to construct a logger or `try_apply` to install the default logger"]
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
    sink: Option<Box<dyn Sink>>,
    mirrors: Vec<SharedSink>,
    trap: Arc<dyn Trap>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Create a builder starting from [`Config::default`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            sink: None,
            mirrors: vec![],
            trap: Arc::new(DefaultTrap::default()),
        }
    }

    /// Replace every setting with `config`.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the threshold.
    pub fn level(mut self, level: Level) -> Self {
        self.config.level = level;
        self
    }

    /// Mirror every record to standard error.
    pub fn log_to_stderr(mut self, enabled: bool) -> Self {
        self.config.log_to_stderr = enabled;
        self
    }

    /// Set the maintenance interval; zero disables background maintenance.
    pub fn flush_interval(mut self, interval: Duration) -> Self {
        self.config.flush_interval = interval;
        self
    }

    /// Set how many days of log files survive the retention sweep.
    pub fn retention_days(mut self, days: u32) -> Self {
        self.config.retention_days = days;
        self
    }

    /// Set the log directory.
    pub fn log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = Some(log_dir.into());
        self
    }

    /// Set whether headers carry the call site.
    pub fn header_mode(mut self, mode: HeaderMode) -> Self {
        self.config.header_mode = mode;
        self
    }

    /// Set the write buffer capacity of the rolling file sink.
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    /// Set the prefix of every log file name.
    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.config.app_name = Some(app_name.into());
        self
    }

    /// Write records to `sink` instead of the default rolling file sink.
    pub fn sink(mut self, sink: impl Into<Box<dyn Sink>>) -> Self {
        self.sink = Some(sink.into());
        self
    }

    /// Register a side-channel mirror. The caller keeps its own handle to it.
    pub fn mirror(mut self, mirror: SharedSink) -> Self {
        self.mirrors.push(mirror);
        self
    }

    /// Set the trap receiving errors raised while logging.
    ///
    /// Default to [`DefaultTrap`].
    pub fn trap(mut self, trap: impl Trap) -> Self {
        self.trap = Arc::new(trap);
        self
    }

    /// Build the [`Logger`] and start its background maintenance.
    ///
    /// # Errors
    ///
    /// Return an error if the maintenance thread cannot be spawned.
    pub fn build(self) -> Result<Logger, Error> {
        let LoggerBuilder {
            config,
            sink,
            mirrors,
            trap,
        } = self;
        Logger::new(config, sink, mirrors, trap)
    }

    /// Build the [`Logger`] and install it as the process-wide default.
    ///
    /// # Errors
    ///
    /// Return an error if the logger cannot be built or a default logger is already installed.
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::Logger;
    /// use daylog::sink::Memory;
    ///
    /// if let Err(err) = Logger::builder().sink(Memory::default()).try_apply() {
    ///     eprintln!("failed to install logger: {err}");
    /// }
    /// daylog::info!("installed");
    /// ```
    pub fn try_apply(self) -> Result<(), Error> {
        crate::global::set_default_logger(self.build()?)
    }
}
