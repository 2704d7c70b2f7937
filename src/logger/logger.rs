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

use std::fmt;
use std::io;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::time::Duration;

use jiff::Zoned;

use crate::CallSite;
use crate::Error;
use crate::Level;
use crate::Trap;
use crate::logger::Config;
use crate::logger::HeaderMode;
use crate::logger::LoggerBuilder;
use crate::logger::maintenance::Maintenance;
use crate::logger::maintenance::sweep_expired;
use crate::sink::RollingFileSink;
use crate::sink::SharedSink;
use crate::sink::Sink;
use crate::sink::Stderr;

/// The exit status of the process after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 0;

const HEADER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A leveled logger writing to one sink, optionally mirrored to standard error and to shared
/// side-channel sinks.
///
/// All writes are serialized by one lock, held while the header is formatted and while the line
/// is written to the sink and every mirror, so records from concurrent threads never interleave.
/// A background maintenance thread takes the same lock to flush the sink periodically, then
/// sweeps expired log files. Dropping the logger (or calling [`Logger::shutdown`]) stops that
/// thread and flushes.
///
/// # Examples
///
/// ```
/// use daylog::Level;
/// use daylog::Logger;
/// use daylog::sink::Memory;
///
/// let memory = Memory::default();
/// let logger = Logger::builder()
///     .level(Level::Warn)
///     .sink(memory.clone())
///     .build()
///     .unwrap();
///
/// logger.info("dropped");
/// daylog::error!(logger: logger, "disk {} is full", "/dev/sda1");
///
/// let lines = memory.lines();
/// assert_eq!(lines.len(), 1);
/// assert!(lines[0].starts_with("[ERROR]["));
/// assert!(lines[0].ends_with(" disk /dev/sda1 is full"));
/// ```
#[derive(Debug)]
pub struct Logger {
    shared: Arc<Shared>,
    maintenance: Mutex<Option<Maintenance>>,
}

impl Logger {
    /// Create a new [`LoggerBuilder`] with the default [`Config`].
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub(super) fn new(
        config: Config,
        sink: Option<Box<dyn Sink>>,
        mirrors: Vec<SharedSink>,
        trap: Arc<dyn Trap>,
    ) -> Result<Logger, Error> {
        let flush_interval = config.flush_interval;
        let shared = Arc::new(Shared {
            threshold: AtomicU8::new(config.level.value()),
            state: Mutex::new(State {
                config,
                sink,
                sink_is_default: false,
                mirrors,
                stderr: Stderr::default(),
                trap,
            }),
        });

        let maintenance = if flush_interval.is_zero() {
            None
        } else {
            Some(Maintenance::spawn(shared.clone(), flush_interval)?)
        };

        Ok(Logger {
            shared,
            maintenance: Mutex::new(maintenance),
        })
    }

    /// Whether a record at `level` would be written.
    pub fn enabled(&self, level: Level) -> bool {
        level.passes(Level::from_value(self.shared.threshold.load(Ordering::Relaxed)))
    }

    /// Write a record at `level`.
    ///
    /// The message is formatted before the logger lock is taken. Records below the threshold
    /// are discarded before the message is formatted.
    #[track_caller]
    pub fn emit(&self, level: Level, msg: impl fmt::Display) {
        if self.enabled(level) {
            self.emit_at(level, CallSite::capture(), &msg);
        }
    }

    /// Write a record at `level` from preformatted arguments.
    ///
    /// This is the primitive behind the [`debug!`](crate::debug) family of macros.
    #[track_caller]
    pub fn emit_fmt(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.emit_at(level, CallSite::capture(), &args);
        }
    }

    /// Write a record at `level` attributed to an explicit call site.
    pub fn emit_at(&self, level: Level, site: CallSite<'_>, msg: &dyn fmt::Display) {
        let body = msg.to_string();
        let mut state = self.shared.state();
        if level.passes(state.config.level) {
            state.write_record(level, &site, &body);
        }
    }

    /// Write a record at [`Level::Debug`].
    #[track_caller]
    pub fn debug(&self, msg: impl fmt::Display) {
        self.emit(Level::Debug, msg)
    }

    /// Write a record at [`Level::Info`].
    #[track_caller]
    pub fn info(&self, msg: impl fmt::Display) {
        self.emit(Level::Info, msg)
    }

    /// Write a record at [`Level::Warn`].
    #[track_caller]
    pub fn warn(&self, msg: impl fmt::Display) {
        self.emit(Level::Warn, msg)
    }

    /// Write a record at [`Level::Error`].
    #[track_caller]
    pub fn error(&self, msg: impl fmt::Display) {
        self.emit(Level::Error, msg)
    }

    /// Write a record at [`Level::Info`], like [`Logger::info`]. The formatted counterpart is
    /// [`info!`](crate::info).
    #[track_caller]
    pub fn println(&self, msg: impl fmt::Display) {
        self.emit(Level::Info, msg)
    }

    /// Write a record at [`Level::Fatal`], flush, and terminate the process.
    ///
    /// The process exits with [`FATAL_EXIT_CODE`]. Destructors of other threads' values do not
    /// run, so anything not yet flushed through this logger is lost.
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) -> ! {
        self.emit(Level::Fatal, msg);
        self.terminate()
    }

    /// Write a record at [`Level::Fatal`] from preformatted arguments, flush, and terminate the
    /// process.
    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.emit_fmt(Level::Fatal, args);
        self.terminate()
    }

    fn terminate(&self) -> ! {
        self.flush();
        let _ = io::stderr().flush();
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Flush the sink.
    pub fn flush(&self) {
        self.shared.flush();
    }

    /// Stop the background maintenance thread, wait for it to exit, and flush the sink.
    ///
    /// The logger keeps accepting records afterwards, but nothing flushes them until the next
    /// explicit [`Logger::flush`] or until the logger is dropped.
    pub fn shutdown(&self) {
        let maintenance = self
            .maintenance
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(maintenance) = maintenance {
            maintenance.stop();
        }
        self.flush();
    }

    /// The current threshold.
    pub fn level(&self) -> Level {
        self.shared.state().config.level
    }

    /// Set the threshold.
    pub fn set_level(&self, level: Level) {
        let mut state = self.shared.state();
        state.config.level = level;
        self.shared.threshold.store(level.value(), Ordering::Relaxed);
    }

    /// Set the threshold by name; unrecognized names select [`Level::Info`].
    pub fn set_level_name(&self, name: &str) {
        self.set_level(Level::from_name(name))
    }

    /// Whether headers carry the call site.
    pub fn header_mode(&self) -> HeaderMode {
        self.shared.state().config.header_mode
    }

    /// Set whether headers carry the call site.
    pub fn set_header_mode(&self, mode: HeaderMode) {
        self.shared.state().config.header_mode = mode;
    }

    /// Whether records are mirrored to standard error.
    pub fn log_to_stderr(&self) -> bool {
        self.shared.state().config.log_to_stderr
    }

    /// Set whether records are mirrored to standard error.
    pub fn set_log_to_stderr(&self, enabled: bool) {
        self.shared.state().config.log_to_stderr = enabled;
    }

    /// The configured log directory, `None` meaning the working directory.
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.shared.state().config.log_dir.clone()
    }

    /// Set the log directory.
    ///
    /// If the current sink is the rolling file sink built from the configuration, it is flushed
    /// and closed; the next record opens a file in the new directory. A sink supplied through
    /// [`LoggerBuilder::sink`] or [`Logger::set_sink`] is kept.
    pub fn set_log_dir(&self, log_dir: impl Into<PathBuf>) {
        let mut state = self.shared.state();
        state.config.log_dir = Some(log_dir.into());
        state.discard_default_sink();
    }

    /// Capacity of the write buffer used by the rolling file sink built from the configuration.
    pub fn buffer_size(&self) -> usize {
        self.shared.state().config.buffer_size
    }

    /// Set the write buffer capacity, reopening the configured rolling file sink like
    /// [`Logger::set_log_dir`] does.
    pub fn set_buffer_size(&self, buffer_size: usize) {
        let mut state = self.shared.state();
        state.config.buffer_size = buffer_size;
        state.discard_default_sink();
    }

    /// The interval of the background maintenance.
    pub fn flush_interval(&self) -> Duration {
        self.shared.state().config.flush_interval
    }

    /// How many days of rotated files are kept.
    pub fn retention_days(&self) -> u32 {
        self.shared.state().config.retention_days
    }

    /// The prefix of every log file name.
    pub fn app_name(&self) -> String {
        self.shared.state().config.resolved_app_name()
    }

    /// Replace the sink, flushing the previous one.
    pub fn set_sink(&self, sink: impl Into<Box<dyn Sink>>) {
        let mut state = self.shared.state();
        state.flush_sink();
        state.sink = Some(sink.into());
        state.sink_is_default = false;
    }

    /// Register one more side-channel mirror.
    pub fn add_mirror(&self, mirror: SharedSink) {
        self.shared.state().mirrors.push(mirror);
    }

    /// Replace all side-channel mirrors with `mirror`, or remove them all with `None`.
    pub fn set_mirror(&self, mirror: Option<SharedSink>) {
        let mut state = self.shared.state();
        state.mirrors.clear();
        state.mirrors.extend(mirror);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug)]
pub(super) struct Shared {
    // mirrors `State::config.level` so rejected records skip the lock
    threshold: AtomicU8,
    state: Mutex<State>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(super) fn flush(&self) {
        self.state().flush_sink();
    }

    /// Delete expired files from the configured directory.
    pub(super) fn sweep(&self) -> Result<usize, Error> {
        let (log_dir, app_name, retention_days) = {
            let state = self.state();
            let config = &state.config;
            (
                config.log_dir.clone(),
                config.resolved_app_name(),
                config.retention_days,
            )
        };

        let log_dir = match log_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => std::env::current_dir().map_err(|err| {
                Error::new("failed to resolve the working directory").with_source(err)
            })?,
        };

        sweep_expired(&log_dir, &app_name, retention_days, Zoned::now().date())
    }
}

#[derive(Debug)]
struct State {
    config: Config,
    sink: Option<Box<dyn Sink>>,
    // the sink was built lazily from `config` and follows its changes
    sink_is_default: bool,
    mirrors: Vec<SharedSink>,
    stderr: Stderr,
    trap: Arc<dyn Trap>,
}

impl State {
    fn write_record(&mut self, level: Level, site: &CallSite<'_>, body: &str) {
        if self.sink.is_none() {
            match self.build_default_sink() {
                Ok(sink) => {
                    self.sink = Some(Box::new(sink));
                    self.sink_is_default = true;
                }
                Err(err) => {
                    let err = Error::new("failed to create log sink").with_source(err);
                    self.trap.trap(&err);
                    return;
                }
            }
        }

        let header = format_header(level, self.config.header_mode, site, &Zoned::now());
        let line = format!("{header} {body}\n");
        let bytes = line.as_bytes();

        // sinks surface their own failures
        if let Some(sink) = self.sink.as_mut() {
            let _ = sink.write(bytes);
        }
        if self.config.log_to_stderr {
            let _ = self.stderr.write(bytes);
        }
        for mirror in &self.mirrors {
            let mut mirror = mirror.lock().unwrap_or_else(|e| e.into_inner());
            let _ = mirror.write(bytes);
        }
    }

    fn build_default_sink(&self) -> Result<RollingFileSink, Error> {
        RollingFileSink::builder(
            self.config.log_dir_or_empty(),
            self.config.resolved_app_name(),
        )
        .buffer_size(self.config.buffer_size)
        .trap(self.trap.clone())
        .build()
    }

    fn flush_sink(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            if let Err(err) = sink.flush() {
                let err = Error::new("failed to flush log sink").with_source(err);
                self.trap.trap(&err);
            }
        }
    }

    fn discard_default_sink(&mut self) {
        if self.sink_is_default {
            self.flush_sink();
            self.sink = None;
            self.sink_is_default = false;
        }
    }
}

fn format_header(level: Level, mode: HeaderMode, site: &CallSite<'_>, now: &Zoned) -> String {
    let time = now.strftime(HEADER_TIME_FORMAT);
    match mode {
        HeaderMode::WithFileLine => format!("[{level}][{time}][{site}]"),
        HeaderMode::WithoutFileLine => format!("[{level}][{time}]"),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::str::FromStr;
    use std::sync::Arc;
    use std::time::Duration;
    use std::time::Instant;

    use jiff::Zoned;
    use jiff::civil::DateTime;
    use tempfile::TempDir;

    use super::*;
    use crate::sink;
    use crate::sink::Memory;
    use crate::sink::rolling::file_name;
    use crate::trap::testing::CollectTrap;

    const LEVELS: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    fn memory_logger(level: Level) -> (Logger, Memory) {
        let memory = Memory::default();
        let logger = Logger::builder()
            .level(level)
            .flush_interval(Duration::ZERO)
            .sink(memory.clone())
            .build()
            .unwrap();
        (logger, memory)
    }

    #[test]
    fn test_format_header() {
        let now = Zoned::from_str("2024-08-10T17:12:52+08[+08]").unwrap();
        let site = CallSite::new(Some("src/server/main.rs"), Some(24));
        assert_eq!(
            format_header(Level::Warn, HeaderMode::WithFileLine, &site, &now),
            "[WARN][2024-08-10 17:12:52][file:main.rs line:24]"
        );
        assert_eq!(
            format_header(Level::Warn, HeaderMode::WithoutFileLine, &site, &now),
            "[WARN][2024-08-10 17:12:52]"
        );
        assert_eq!(
            format_header(Level::Info, HeaderMode::WithFileLine, &CallSite::placeholder(), &now),
            "[INFO][2024-08-10 17:12:52][file:??? line:1]"
        );
    }

    #[test]
    fn test_threshold_drops_lower_levels() {
        let (logger, memory) = memory_logger(Level::Warn);
        logger.info("x");
        logger.error("y");

        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[ERROR]["));
        assert!(lines[0].ends_with(" y"));
    }

    #[test]
    fn test_below_threshold_reaches_no_sink_or_mirror() {
        for threshold in LEVELS.into_iter().chain([Level::None]) {
            let (logger, memory) = memory_logger(threshold);
            let mirror = sink::shared(Memory::default());
            logger.add_mirror(mirror.clone());

            for level in LEVELS.into_iter().filter(|level| *level < threshold) {
                logger.emit(level, "dropped");
                logger.emit_fmt(level, format_args!("dropped {}", level));
            }

            assert_eq!(memory.contents(), "", "threshold {threshold}");
            assert_eq!(mirror.lock().unwrap().contents(), "", "threshold {threshold}");
        }
    }

    #[test]
    fn test_none_is_never_a_record_level() {
        for threshold in LEVELS.into_iter().chain([Level::None]) {
            let (logger, memory) = memory_logger(threshold);
            let mirror = sink::shared(Memory::default());
            logger.add_mirror(mirror.clone());

            assert!(!logger.enabled(Level::None));
            logger.emit(Level::None, "silent");
            logger.emit_fmt(Level::None, format_args!("silent {}", 2));
            crate::emit!(logger: logger, Level::None, "silent {}", 3);

            assert_eq!(memory.contents(), "", "threshold {threshold}");
            assert_eq!(mirror.lock().unwrap().contents(), "", "threshold {threshold}");
        }
    }

    #[test]
    fn test_record_layout() {
        let (logger, memory) = memory_logger(Level::Debug);
        logger.set_header_mode(HeaderMode::WithoutFileLine);
        logger.debug(format_args!("{} + {} = {}", 1, 2, 3));

        let contents = memory.contents();
        let line = contents.strip_suffix('\n').unwrap();
        let rest = line.strip_prefix("[DEBUG][").unwrap();
        let (time, rest) = rest.split_at(19);
        DateTime::strptime(HEADER_TIME_FORMAT, time).unwrap();
        assert_eq!(rest, "] 1 + 2 = 3");
    }

    #[test]
    fn test_call_site_is_the_caller() {
        let (logger, memory) = memory_logger(Level::Debug);

        let line = line!() + 1;
        logger.warn("here");
        crate::info!(logger: logger, "and {}", "there");

        let lines = memory.lines();
        assert!(lines[0].ends_with(&format!("[file:logger.rs line:{line}] here")));
        assert!(lines[1].ends_with(&format!("[file:logger.rs line:{}] and there", line + 1)));
    }

    #[test]
    fn test_println_writes_at_info() {
        let (logger, memory) = memory_logger(Level::Info);
        let line = line!() + 1;
        logger.println("plain");

        let lines = memory.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("[INFO]["));
        assert!(lines[0].ends_with(&format!("[file:logger.rs line:{line}] plain")));

        logger.set_level(Level::Warn);
        logger.println("dropped");
        assert_eq!(memory.lines().len(), 1);
    }

    #[test]
    fn test_mirrors_receive_every_record() {
        let (logger, memory) = memory_logger(Level::Info);
        let mirror = sink::shared(Memory::default());
        logger.set_mirror(Some(mirror.clone()));

        logger.info("plain");
        logger.emit_fmt(Level::Warn, format_args!("formatted {}", 42));
        assert_eq!(mirror.lock().unwrap().contents(), memory.contents());
        assert_eq!(memory.lines().len(), 2);

        logger.set_mirror(None);
        logger.info("unmirrored");
        assert_eq!(mirror.lock().unwrap().lines().len(), 2);
        assert_eq!(memory.lines().len(), 3);
    }

    #[test]
    fn test_concurrent_records_never_interleave() {
        let (logger, memory) = memory_logger(Level::Info);
        logger.set_header_mode(HeaderMode::WithoutFileLine);

        let threads = 8;
        let records = 200;
        std::thread::scope(|s| {
            for t in 0..threads {
                let logger = &logger;
                s.spawn(move || {
                    for i in 0..records {
                        crate::info!(logger: logger, "thread-{t} record-{i} {}", "x".repeat(64));
                    }
                });
            }
        });

        let lines = memory.lines();
        assert_eq!(lines.len(), threads * records);
        for line in &lines {
            assert!(line.starts_with("[INFO]["), "{line}");
            assert_eq!(line.matches("[INFO]").count(), 1, "{line}");
            assert!(line.ends_with(&"x".repeat(64)), "{line}");
        }
        for t in 0..threads {
            let prefix = format!("thread-{t} record-");
            assert_eq!(lines.iter().filter(|l| l.contains(&prefix)).count(), records);
        }
    }

    #[test]
    fn test_default_sink_is_built_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let logger = Logger::builder()
            .log_dir(temp_dir.path())
            .app_name("app")
            .flush_interval(Duration::ZERO)
            .build()
            .unwrap();
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);

        logger.info("first");
        logger.flush();

        let today = Zoned::now().strftime("%Y-%m-%d").to_string();
        let path = temp_dir.path().join(file_name("app", &today, 0));
        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.ends_with(" first\n"));
    }

    #[test]
    fn test_file_open_failure_is_trapped() {
        let temp_dir = TempDir::new().unwrap();
        let blocked = temp_dir.path().join("blocked");
        fs::write(&blocked, b"").unwrap();

        let trap = CollectTrap::default();
        let mirror = sink::shared(Memory::default());
        let logger = Logger::builder()
            .log_dir(&blocked)
            .app_name("app")
            .flush_interval(Duration::ZERO)
            .mirror(mirror.clone())
            .trap(trap.clone())
            .build()
            .unwrap();

        logger.info("lost");
        assert_eq!(trap.errors().len(), 1);
        assert!(trap.errors()[0].contains("failed to create log directory"));
        // the mirror still gets the line, only the file write failed
        assert_eq!(mirror.lock().unwrap().lines().len(), 1);

        let moved = temp_dir.path().join("moved");
        logger.set_log_dir(&moved);
        logger.info("kept");
        logger.flush();

        let today = Zoned::now().strftime("%Y-%m-%d").to_string();
        let contents = fs::read_to_string(moved.join(file_name("app", &today, 0))).unwrap();
        assert!(contents.ends_with(" kept\n"));
        assert_eq!(trap.errors().len(), 1);
    }

    #[test]
    fn test_runtime_settings() {
        let (logger, memory) = memory_logger(Level::Info);
        assert_eq!(logger.level(), Level::Info);

        logger.set_level_name("error");
        assert_eq!(logger.level(), Level::Error);
        assert!(!logger.enabled(Level::Warn));

        logger.set_level_name("bogus");
        assert_eq!(logger.level(), Level::Info);
        assert!(logger.enabled(Level::Info));

        logger.set_log_to_stderr(true);
        assert!(logger.log_to_stderr());
        logger.set_log_to_stderr(false);

        logger.set_buffer_size(4096);
        assert_eq!(logger.buffer_size(), 4096);
        assert_eq!(logger.retention_days(), 7);
        assert_eq!(logger.flush_interval(), Duration::ZERO);

        // a user-supplied sink survives directory changes
        logger.set_log_dir("elsewhere");
        assert_eq!(logger.log_dir(), Some(PathBuf::from("elsewhere")));
        logger.info("still in memory");
        assert_eq!(memory.lines().len(), 1);
    }

    #[test]
    fn test_flush_and_shutdown() {
        let (logger, memory) = memory_logger(Level::Info);
        logger.info("x");
        logger.flush();
        assert_eq!(memory.flush_count(), 1);

        let replacement = Memory::default();
        logger.set_sink(replacement.clone());
        assert_eq!(memory.flush_count(), 2);
        logger.info("y");
        assert_eq!(replacement.lines().len(), 1);

        logger.shutdown();
        assert_eq!(replacement.flush_count(), 1);
    }

    #[test]
    fn test_maintenance_flushes_periodically() {
        let temp_dir = TempDir::new().unwrap();
        let memory = Memory::default();
        let logger = Arc::new(
            Logger::builder()
                .log_dir(temp_dir.path())
                .app_name("app")
                .flush_interval(Duration::from_millis(20))
                .sink(memory.clone())
                .build()
                .unwrap(),
        );
        logger.info("tick");

        let deadline = Instant::now() + Duration::from_secs(5);
        while memory.flush_count() < 2 && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(memory.flush_count() >= 2);

        logger.shutdown();
        let after_shutdown = memory.flush_count();
        std::thread::sleep(Duration::from_millis(100));
        assert_eq!(memory.flush_count(), after_shutdown);
    }
}
