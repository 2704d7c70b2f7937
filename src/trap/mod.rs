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

//! Traps for errors that have no caller to return to.
//!
//! A failed rotation inside a write or a failed flush on drop cannot be propagated through the
//! logging call that triggered it. Such errors are handed to a [`Trap`] instead.

use std::fmt;
use std::sync::Arc;

use crate::Error;

mod default;

pub use self::default::DefaultTrap;

/// A trap that receives errors raised while logging.
pub trait Trap: fmt::Debug + Send + Sync + 'static {
    /// Handle an error that cannot be returned to the caller.
    fn trap(&self, err: &Error);
}

impl<T: Trap> From<T> for Box<dyn Trap> {
    fn from(value: T) -> Self {
        Box::new(value)
    }
}

impl<T: Trap + ?Sized> Trap for Arc<T> {
    fn trap(&self, err: &Error) {
        (**self).trap(err)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::sync::Mutex;

    use crate::Error;
    use crate::trap::Trap;

    /// Remembers every trapped error instead of printing it.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct CollectTrap {
        errors: Arc<Mutex<Vec<String>>>,
    }

    impl CollectTrap {
        pub(crate) fn errors(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }
    }

    impl Trap for CollectTrap {
        fn trap(&self, err: &Error) {
            self.errors.lock().unwrap().push(err.to_string());
        }
    }
}
