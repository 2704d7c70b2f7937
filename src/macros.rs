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

/// Write a formatted record at the given level.
///
/// Write to the [default logger](crate::global::default_logger) unless a logger is given with
/// `logger:`. The record is attributed to the line of the macro invocation.
///
/// # Examples
///
/// ```
/// use daylog::Level;
/// use daylog::Logger;
/// use daylog::sink::Memory;
///
/// let memory = Memory::default();
/// let logger = Logger::builder().sink(memory.clone()).build().unwrap();
///
/// daylog::emit!(logger: logger, Level::Warn, "retry {} of {}", 1, 3);
/// assert!(memory.contents().ends_with(" retry 1 of 3\n"));
/// ```
#[macro_export]
macro_rules! emit {
    (logger: $logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit_fmt($level, ::std::format_args!($($arg)+))
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::global::emit_fmt($level, ::std::format_args!($($arg)+))
    };
}

/// Write a formatted record at [`Level::Debug`](crate::Level::Debug).
#[macro_export]
macro_rules! debug {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::emit!(logger: $logger, $crate::Level::Debug, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::emit!($crate::Level::Debug, $($arg)+)
    };
}

/// Write a formatted record at [`Level::Info`](crate::Level::Info).
#[macro_export]
macro_rules! info {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::emit!(logger: $logger, $crate::Level::Info, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::emit!($crate::Level::Info, $($arg)+)
    };
}

/// Write a formatted record at [`Level::Warn`](crate::Level::Warn).
#[macro_export]
macro_rules! warn {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::emit!(logger: $logger, $crate::Level::Warn, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::emit!($crate::Level::Warn, $($arg)+)
    };
}

/// Write a formatted record at [`Level::Error`](crate::Level::Error).
#[macro_export]
macro_rules! error {
    (logger: $logger:expr, $($arg:tt)+) => {
        $crate::emit!(logger: $logger, $crate::Level::Error, $($arg)+)
    };
    ($($arg:tt)+) => {
        $crate::emit!($crate::Level::Error, $($arg)+)
    };
}

/// Write a formatted record at [`Level::Fatal`](crate::Level::Fatal), flush, and terminate the
/// process with [`FATAL_EXIT_CODE`](crate::logger::FATAL_EXIT_CODE).
///
/// Without a default logger the record is refused, but the process still terminates.
#[macro_export]
macro_rules! fatal {
    (logger: $logger:expr, $($arg:tt)+) => {
        $logger.fatal_fmt(::std::format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        $crate::global::fatal_fmt(::std::format_args!($($arg)+))
    };
}
