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

//! Destinations for formatted log lines.

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;

use crate::Error;

mod memory;
pub mod rolling;
mod stderr;

pub use self::memory::Memory;
pub use self::rolling::RollingFileSink;
pub use self::stderr::Stderr;

/// A destination that accepts formatted log bytes.
///
/// The logger serializes all calls into a sink, so implementations need no locking of their own.
/// A sink whose write fails is responsible for surfacing the failure (for example through a
/// [`Trap`](crate::Trap)); the logger does not report sink errors a second time.
pub trait Sink: fmt::Debug + Send + 'static {
    /// Write a complete log line, returning the number of bytes accepted.
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error>;

    /// Flush any buffered bytes.
    ///
    /// Default to a no-op.
    fn flush(&mut self) -> Result<(), Error> {
        Ok(())
    }
}

impl<T: Sink> From<T> for Box<dyn Sink> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

/// A sink shared between the logger and its owner.
///
/// Mirrors are held by reference: the caller keeps its own handle and decides how long the
/// destination lives.
pub type SharedSink = Arc<Mutex<dyn Sink>>;

/// Wrap a sink so it can be registered as a mirror and still be reached by its owner.
pub fn shared<S: Sink>(sink: S) -> Arc<Mutex<S>> {
    Arc::new(Mutex::new(sink))
}
