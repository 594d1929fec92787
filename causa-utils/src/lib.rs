//! A collection of utilities to share among causa-* crates.

pub use self::stack::{Frame, Stack};

pub mod stack;
