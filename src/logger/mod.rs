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

//! The dispatcher: threshold filtering, header formatting, and serialized writes to a sink.

mod builder;
pub use self::builder::LoggerBuilder;

mod config;
pub use self::config::Config;
pub use self::config::HeaderMode;
pub use self::config::default_app_name;

#[allow(clippy::module_inception)]
mod logger;
pub use self::logger::FATAL_EXIT_CODE;
pub use self::logger::Logger;

mod maintenance;
pub use self::maintenance::sweep_expired;
