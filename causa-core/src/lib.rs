//! Errors carrying a message, a snapshot of the call stack taken at creation
//! and an optional cause, forming a causal chain.
//!
//! `{}` renders only the message, `{:?}` renders the message, the stack and
//! every cause down the chain.

#![warn(rust_2018_idioms, unreachable_pub)]

#[macro_use]
extern crate static_assertions;

pub use causa_utils::{Frame, Stack};

pub use crate::{
    chain::Chain,
    config::{configure, stack_config, Capture, StackConfig},
    error::{wrap, Error},
    ext::{OptionExt, ResultExt},
    format::{verbose, Mode, Verbose},
};

pub mod config;

mod chain;
mod error;
mod ext;
mod format;
mod macros;

#[doc(hidden)]
pub mod _priv {
    pub use std::format;
}
