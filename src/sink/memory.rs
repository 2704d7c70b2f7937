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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Error;
use crate::sink::Sink;

/// A sink that keeps every line in memory, for tests and in-process inspection.
///
/// Clones share the same buffer, so one handle can be given to a logger while another is kept to
/// read what was written.
///
/// # Examples
///
/// ```
/// use daylog::Logger;
/// use daylog::sink::Memory;
///
/// let memory = Memory::default();
/// let logger = Logger::builder().sink(memory.clone()).build().unwrap();
/// logger.info("hello");
/// assert!(memory.contents().ends_with("hello\n"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Memory {
    buf: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<AtomicUsize>,
}

impl Memory {
    fn buf(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf()).into_owned()
    }

    /// Everything written so far, split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// How many times the sink was flushed.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::Acquire)
    }

    /// Drop everything written so far.
    pub fn clear(&self) {
        self.buf().clear();
    }
}

impl Sink for Memory {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        self.buf().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        self.flushes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}
