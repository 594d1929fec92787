//! Errors carrying a message, the call stack of their creation and an
//! optional cause.
//!
//! ```
//! use causa::prelude::*;
//!
//! let a = Error::new("disk full");
//! let b = Error::wrap(a, "save failed");
//! let c = errorf!("request {} failed", 5);
//! assert_eq!(b.to_string(), "save failed");
//! assert_eq!(c.to_string(), "request 5 failed");
//!
//! // `{:?}` also prints stacks and every cause.
//! assert!(format!("{b:?}").contains("\nCaused by: disk full"));
//! ```

#![warn(rust_2018_idioms, unreachable_pub)]

pub use causa_core::*;
pub use causa_core::{errorf, wrapf};

#[cfg(feature = "test-util")]
pub use causa_test as test;

pub mod prelude {
    //! Common imports.
    pub use super::{errorf, wrapf, Error, OptionExt, ResultExt};
}
