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

use std::io;
use std::io::Write;

use crate::Error;
use crate::sink::Sink;

/// A sink that writes log lines to standard error.
///
/// # Examples
///
/// ```
/// use daylog::sink::Stderr;
///
/// let stderr = Stderr::default();
/// ```
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct Stderr {}

impl Sink for Stderr {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Error> {
        io::stderr().write_all(buf).map_err(Error::from_io_error)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Error> {
        io::stderr().flush().map_err(Error::from_io_error)
    }
}
