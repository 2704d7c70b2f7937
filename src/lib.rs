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

//! Daylog is an embedded leveled logger that writes one line per record to a daily log file.
//!
//! # Overview
//!
//! Each record is a single line: a header carrying the level, the local time, and optionally
//! the file and line of the call site, then the message.
//!
//! ```text
//! [WARN][2024-08-10 17:12:52][file:main.rs line:24] disk almost full
//! ```
//!
//! Records below the configured [`Level`] are discarded. The rest are serialized through one
//! lock and written to a [`Sink`]; by default a [`RollingFileSink`](sink::RollingFileSink)
//! that starts a new file every day, rotates the day's file into numbered generations once it
//! exceeds 1 GiB, and buffers writes. A background thread flushes the buffer periodically and
//! deletes files older than the retention window.
//!
//! # Examples
//!
//! Install the default logger and write through the macros:
//!
//! ```
//! use daylog::Config;
//! use daylog::Level;
//!
//! let dir = tempfile::tempdir().unwrap();
//! daylog::init(Config {
//!     level: Level::Debug,
//!     log_dir: Some(dir.path().to_path_buf()),
//!     app_name: Some("my_app".to_string()),
//!     ..Config::default()
//! })
//! .unwrap();
//!
//! daylog::info!("listening on {}", "0.0.0.0:8080");
//! daylog::global::shutdown();
//! ```
//!
//! Use a standalone logger with an in-memory sink:
//!
//! ```
//! use daylog::HeaderMode;
//! use daylog::Logger;
//! use daylog::sink::Memory;
//!
//! let memory = Memory::default();
//! let logger = Logger::builder()
//!     .header_mode(HeaderMode::WithoutFileLine)
//!     .sink(memory.clone())
//!     .build()
//!     .unwrap();
//!
//! logger.warn("disk almost full");
//! assert!(memory.contents().starts_with("[WARN]["));
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod macros;

pub mod bridge;
pub mod callsite;
pub mod global;
pub mod level;
pub mod logger;
pub mod sink;
pub mod trap;

mod error;
pub use self::error::Error;

pub use self::callsite::CallSite;
pub use self::global::default_logger;
pub use self::global::init;
pub use self::level::Level;
pub use self::logger::Config;
pub use self::logger::HeaderMode;
pub use self::logger::Logger;
pub use self::logger::LoggerBuilder;
pub use self::sink::Sink;
pub use self::trap::Trap;
