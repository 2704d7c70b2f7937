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
use crate::trap::Trap;

/// The trap used unless another is configured: each error becomes one line on standard error.
///
/// The line is written with a single call, so errors trapped by concurrent threads do not
/// interleave. Failures to write to standard error are ignored.
#[derive(Debug, Default)]
#[non_exhaustive]
pub struct DefaultTrap {}

impl DefaultTrap {
    fn write_line(mut out: impl Write, err: &Error) -> io::Result<()> {
        out.write_all(format!("{err}\n").as_bytes())
    }
}

impl Trap for DefaultTrap {
    fn trap(&self, err: &Error) {
        let _ = DefaultTrap::write_line(io::stderr().lock(), err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_becomes_one_line() {
        let err = Error::new("failed to rotate log")
            .with_context("path", "logs/app-2024-08-10.log")
            .with_source(io::Error::other("permission denied"));

        let mut out = Vec::new();
        DefaultTrap::write_line(&mut out, &err).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "failed to rotate log, context: { path: logs/app-2024-08-10.log }, \
             sources: [permission denied]\n"
        );
    }
}
