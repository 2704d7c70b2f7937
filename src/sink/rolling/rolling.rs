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

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::Error;
use crate::sink::Sink;
use crate::sink::rolling::DATE_FORMAT;
use crate::sink::rolling::DEFAULT_BUFFER_SIZE;
use crate::sink::rolling::MAX_FILE_SIZE;
use crate::sink::rolling::MAX_GENERATIONS;
use crate::sink::rolling::clock::Clock;
use crate::sink::rolling::file_name;
use crate::trap::DefaultTrap;
use crate::trap::Trap;

/// A sink writing to `{app}-{YYYY-MM-DD}.log`, rotated on day change and on size.
///
/// The file is opened lazily on the first write. Before every write the sink checks, in order:
///
/// 1. whether the calendar day changed since the file was opened, in which case the file is
///    flushed and closed;
/// 2. whether the bytes written since the file was opened reached the size limit, in which case
///    the file is closed and the generation chain is shifted by one;
/// 3. whether a file is open, opening (or creating) the active file for today if not.
///
/// A failure in any step aborts the write, reports the error to the trap, and leaves no file
/// open, so the next write starts over from step 3.
#[derive(Debug)]
pub struct RollingFileSink {
    state: State,
    writer: Option<BufWriter<File>>,
}

impl RollingFileSink {
    /// Creates a new [`RollingFileSinkBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use daylog::sink::RollingFileSink;
    ///
    /// let builder = RollingFileSink::builder("logs", "my_app");
    /// ```
    #[must_use]
    pub fn builder(
        basedir: impl Into<PathBuf>,
        app_name: impl Into<String>,
    ) -> RollingFileSinkBuilder {
        RollingFileSinkBuilder::new(basedir, app_name)
    }

    /// The directory the log files live in.
    pub fn log_dir(&self) -> &Path {
        &self.state.log_dir
    }

    /// The application name every file name starts with.
    pub fn app_name(&self) -> &str {
        &self.state.app_name
    }

    /// The path of the active file, if one is open.
    pub fn active_file(&self) -> Option<PathBuf> {
        self.writer
            .as_ref()
            .map(|_| self.state.generation_path(0))
    }

    fn rotate(&mut self) -> Result<(), Error> {
        let today = self.state.clock.now().strftime(DATE_FORMAT).to_string();

        if self.writer.is_none() || self.state.current_date != today {
            if let Some(writer) = self.writer.take() {
                self.state.close(writer)?;
            }
            self.state.current_date = today;
        }

        if self.state.should_rollover_on_size() {
            if let Some(writer) = self.writer.take() {
                self.state.close(writer)?;
            }
            self.state.shift_generations()?;
            self.state.current_filesize = 0;
        }

        if self.writer.is_none() {
            let file = self.state.open()?;
            self.state.current_filesize = 0;
            self.writer = Some(BufWriter::with_capacity(self.state.buffer_size, file));
        }

        Ok(())
    }

    fn try_write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.rotate()?;

        let Some(writer) = self.writer.as_mut() else {
            return Err(Error::new("no log file is open"));
        };
        writer.write_all(buf).map_err(|err| {
            Error::from_path_io(
                "failed to write log file",
                &self.state.generation_path(0),
                err,
            )
        })?;
        self.state.current_filesize += buf.len();
        Ok(buf.len())
    }
}

impl Sink for RollingFileSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.try_write(buf).inspect_err(|err| self.state.trap.trap(err))
    }

    fn flush(&mut self) -> Result<(), Error> {
        match self.writer.as_mut() {
            None => Ok(()),
            Some(writer) => writer.flush().map_err(|err| {
                Error::from_path_io(
                    "failed to flush log file",
                    &self.state.generation_path(0),
                    err,
                )
            }),
        }
    }
}

impl Drop for RollingFileSink {
    fn drop(&mut self) {
        if let Err(err) = self.flush() {
            let err = Error::new("failed to flush log file on drop").with_source(err);
            self.state.trap.trap(&err);
        }
    }
}

/// A builder for configuring [`RollingFileSink`].
#[derive(Debug)]
pub struct RollingFileSinkBuilder {
    // required
    basedir: PathBuf,
    app_name: String,

    // has default
    buffer_size: usize,
    max_size: usize,
    max_generations: usize,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl RollingFileSinkBuilder {
    /// Creates a new [`RollingFileSinkBuilder`].
    ///
    /// An empty `basedir` stands for the process working directory.
    #[must_use]
    pub fn new(basedir: impl Into<PathBuf>, app_name: impl Into<String>) -> Self {
        Self {
            basedir: basedir.into(),
            app_name: app_name.into(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_size: MAX_FILE_SIZE,
            max_generations: MAX_GENERATIONS,
            clock: Clock::DefaultClock,
            trap: Box::new(DefaultTrap::default()),
        }
    }

    /// Set the capacity of the write buffer in bytes.
    ///
    /// Default to [`DEFAULT_BUFFER_SIZE`].
    #[must_use]
    pub fn buffer_size(mut self, n: usize) -> Self {
        self.buffer_size = n;
        self
    }

    /// Set the trap that receives errors raised while writing.
    ///
    /// Default to [`DefaultTrap`].
    #[must_use]
    pub fn trap(mut self, trap: impl Into<Box<dyn Trap>>) -> Self {
        self.trap = trap.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn max_file_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }

    #[cfg(test)]
    pub(crate) fn max_generations(mut self, n: usize) -> Self {
        assert!(n >= 2, "at least one rotated generation is required");
        self.max_generations = n;
        self
    }

    #[cfg(test)]
    pub(crate) fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileSink`].
    ///
    /// No file is touched until the first write.
    ///
    /// # Errors
    ///
    /// Return an error if either:
    ///
    /// * The app name is empty.
    /// * The base directory is empty and the working directory cannot be determined.
    pub fn build(self) -> Result<RollingFileSink, Error> {
        let Self {
            basedir,
            app_name,
            buffer_size,
            max_size,
            max_generations,
            clock,
            trap,
        } = self;

        if app_name.is_empty() {
            return Err(Error::new("app name must not be empty"));
        }

        let log_dir = if basedir.as_os_str().is_empty() {
            std::env::current_dir().map_err(|err| {
                Error::new("failed to resolve the working directory").with_source(err)
            })?
        } else {
            basedir
        };

        let state = State {
            log_dir,
            app_name,
            current_date: String::new(),
            current_filesize: 0,
            buffer_size,
            max_size,
            max_generations,
            clock,
            trap,
        };

        Ok(RollingFileSink {
            state,
            writer: None,
        })
    }
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    app_name: String,
    current_date: String,
    current_filesize: usize,
    buffer_size: usize,
    max_size: usize,
    max_generations: usize,
    clock: Clock,
    trap: Box<dyn Trap>,
}

impl State {
    fn generation_path(&self, generation: usize) -> PathBuf {
        self.log_dir
            .join(file_name(&self.app_name, &self.current_date, generation))
    }

    fn should_rollover_on_size(&self) -> bool {
        self.current_filesize >= self.max_size
    }

    fn open(&self) -> Result<File, Error> {
        fs::create_dir_all(&self.log_dir).map_err(|err| {
            Error::from_path_io("failed to create log directory", &self.log_dir, err)
        })?;

        let filepath = self.generation_path(0);
        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&filepath)
            .map_err(|err| Error::from_path_io("failed to open log file", &filepath, err))
    }

    fn close(&self, writer: BufWriter<File>) -> Result<(), Error> {
        // the file handle is released even if the final flush fails
        writer.into_inner().map(drop).map_err(|err| {
            Error::from_path_io(
                "failed to flush log file before closing",
                &self.generation_path(0),
                err.into_error(),
            )
        })
    }

    fn shift_generations(&self) -> Result<(), Error> {
        let last = self.max_generations.saturating_sub(1);

        let oldest = self.generation_path(last);
        if fs::exists(&oldest).is_ok_and(|ok| ok) {
            fs::remove_file(&oldest)
                .map_err(|err| Error::from_path_io("failed to remove oldest log", &oldest, err))?;
        }

        for generation in (0..last).rev() {
            let filepath = self.generation_path(generation);
            if fs::exists(&filepath).is_ok_and(|ok| ok) {
                let next = self.generation_path(generation + 1);
                fs::rename(&filepath, &next).map_err(|err| {
                    Error::from_path_io("failed to rotate log", &filepath, err)
                        .with_context("target", next.display())
                })?;
            }
        }

        Ok(())
    }
}
