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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::Level;
use crate::sink::rolling::DEFAULT_BUFFER_SIZE;

/// Whether a record header names the source file and line that emitted it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeaderMode {
    /// `[INFO][2024-08-10 17:12:52][file:main.rs line:24]`
    #[default]
    WithFileLine,
    /// `[INFO][2024-08-10 17:12:52]`
    WithoutFileLine,
}

/// The settings a [`Logger`](crate::Logger) starts with.
///
/// With the `serde` feature enabled, a `Config` can be deserialized from any serde format.
/// Missing fields take their default, and the flush interval is read from `flush_interval_secs`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Records below this level are discarded. Default to [`Level::Info`].
    pub level: Level,
    /// Mirror every record to standard error. Default to `false`.
    pub log_to_stderr: bool,
    /// How often buffered output is flushed and expired files are swept. Default to 3 seconds.
    ///
    /// A zero interval disables the background maintenance entirely.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "flush_interval_secs", deserialize_with = "deserialize_secs")
    )]
    pub flush_interval: Duration,
    /// Rotated files older than this many days are deleted. Default to 7.
    pub retention_days: u32,
    /// Where log files are written. Default to the process working directory.
    pub log_dir: Option<PathBuf>,
    /// Whether headers carry the call site. Default to [`HeaderMode::WithFileLine`].
    pub header_mode: HeaderMode,
    /// Capacity of the write buffer in front of the log file. Default to 1 MiB.
    pub buffer_size: usize,
    /// The prefix of every log file name. Default to the basename of the running executable.
    pub app_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Info,
            log_to_stderr: false,
            flush_interval: Duration::from_secs(3),
            retention_days: 7,
            log_dir: None,
            header_mode: HeaderMode::WithFileLine,
            buffer_size: DEFAULT_BUFFER_SIZE,
            app_name: None,
        }
    }
}

impl Config {
    /// The app name, falling back to [`default_app_name`].
    pub fn resolved_app_name(&self) -> String {
        match self.app_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => default_app_name(),
        }
    }

    /// The configured log directory; empty stands for the working directory.
    pub(crate) fn log_dir_or_empty(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_default()
    }
}

/// The basename of `argv[0]`, or `"daylog"` if the process has no usable name.
pub fn default_app_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "daylog".to_owned())
}

#[cfg(feature = "serde")]
fn deserialize_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let secs = <u64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}
