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
use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::Receiver;
use crossbeam_channel::RecvTimeoutError;
use crossbeam_channel::Sender;
use crossbeam_channel::bounded;
use jiff::Span;
use jiff::civil::Date;

use crate::Error;
use crate::logger::logger::Shared;
use crate::sink::rolling::DATE_FORMAT;

const THREAD_NAME: &str = "daylog-maintenance";

/// The background thread flushing a logger and sweeping its expired files.
///
/// The thread wakes every interval until [`Maintenance::stop`] is called or the handle is
/// dropped.
#[derive(Debug)]
pub(super) struct Maintenance {
    handle: Option<JoinHandle<()>>,
    shutdown: Sender<()>,
}

impl Maintenance {
    pub(super) fn spawn(shared: Arc<Shared>, interval: Duration) -> Result<Maintenance, Error> {
        let (shutdown, receiver) = bounded(1);
        let handle = std::thread::Builder::new()
            .name(THREAD_NAME.to_owned())
            .spawn(move || run(&shared, &receiver, interval))
            .map_err(|err| Error::new("failed to spawn the maintenance thread").with_source(err))?;

        Ok(Maintenance {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the thread and wait for it to exit.
    pub(super) fn stop(mut self) {
        self.join();
    }

    fn join(&mut self) {
        let _ = self.shutdown.try_send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Maintenance {
    fn drop(&mut self) {
        self.join();
    }
}

fn run(shared: &Shared, shutdown: &Receiver<()>, interval: Duration) {
    loop {
        match shutdown.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                shared.flush();
                // best effort; the next tick tries again
                let _ = shared.sweep();
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Delete the log files of `app_name` in `log_dir` that are older than `retention_days` days
/// before `today`, returning how many were deleted.
///
/// A file is considered if its name starts with `{app_name}-` and contains `.log`. It is deleted
/// if its name sorts lexicographically before `{app_name}-{cutoff}`, where the cutoff is
/// `today - retention_days` formatted as `YYYY-MM-DD`. Because the date format is fixed-width
/// and zero-padded, this orders files by the day embedded in their names.
///
/// Files that cannot be deleted are skipped.
///
/// # Errors
///
/// Return an error if the cutoff date is out of range or the directory cannot be read.
///
/// # Examples
///
/// ```
/// use daylog::logger::sweep_expired;
/// use jiff::civil::date;
///
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::write(dir.path().join("app-2024-08-01.log"), b"old").unwrap();
/// std::fs::write(dir.path().join("app-2024-08-10.log"), b"new").unwrap();
///
/// let removed = sweep_expired(dir.path(), "app", 7, date(2024, 8, 10)).unwrap();
/// assert_eq!(removed, 1);
/// ```
pub fn sweep_expired(
    log_dir: &Path,
    app_name: &str,
    retention_days: u32,
    today: Date,
) -> Result<usize, Error> {
    let retention = Span::new()
        .try_days(i64::from(retention_days))
        .map_err(|err| Error::new("retention window is out of range").with_source(err))?;
    let cutoff = today
        .checked_sub(retention)
        .map_err(|err| Error::new("retention cutoff is out of range").with_source(err))?;

    let prefix = format!("{app_name}-");
    let boundary = format!("{app_name}-{}", cutoff.strftime(DATE_FORMAT));

    let read_dir = fs::read_dir(log_dir)
        .map_err(|err| Error::from_path_io("failed to read log dir", log_dir, err))?;

    let mut removed = 0;
    for entry in read_dir.flatten() {
        // only files are ever written, so never delete a dir or symlink
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let filename = entry.file_name();
        let Some(filename) = filename.to_str() else {
            continue;
        };

        if filename.starts_with(&prefix)
            && filename.contains(".log")
            && filename < boundary.as_str()
            && fs::remove_file(entry.path()).is_ok()
        {
            removed += 1;
        }
    }

    Ok(removed)
}
