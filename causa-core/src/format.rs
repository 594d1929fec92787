use std::{error::Error as StdError, fmt};

use derive_more::IsVariant;

use crate::{chain::Chain, error::Error};

/// Selects how [`Error::format()`] renders an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Mode {
    /// Only the message, the same as `Display`.
    Plain,
    /// The message and the stack, then `"\nCaused by: "` and the verbose form
    /// of the cause, transitively. The same as `Debug`.
    Verbose,
}

/// Renders an error in the verbose form via `Display`.
///
/// Every link of the chain is rendered after a `"\nCaused by: "` line.
/// Causa errors are rendered with their stacks (or the creation location if
/// the stack is empty), other errors by their `Display` implementation.
#[derive(Clone, Copy)]
pub struct Verbose<'a>(&'a (dyn StdError + 'static));

impl<'a> Verbose<'a> {
    pub(crate) fn new(error: &'a (dyn StdError + 'static)) -> Self {
        Self(error)
    }
}

/// Renders any error in the verbose form.
///
/// Useful if the outermost error isn't a causa one, but causa errors are
/// somewhere down the chain.
pub fn verbose<'a>(error: &'a (dyn StdError + 'static)) -> Verbose<'a> {
    Verbose::new(error)
}

impl fmt::Display for Verbose<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut chain = Chain::new(self.0);

        if let Some(head) = chain.next() {
            write_link(f, head)?;
        }

        for cause in chain {
            f.write_str("\nCaused by: ")?;
            write_link(f, cause)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Verbose<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn write_link(f: &mut fmt::Formatter<'_>, link: &(dyn StdError + 'static)) -> fmt::Result {
    let Some(error) = link.downcast_ref::<Error>() else {
        return write!(f, "{link}");
    };

    f.write_str(error.message())?;

    if error.stack().is_empty() {
        write!(f, "\n    at {}", error.location())
    } else {
        write!(f, "{}", error.stack())
    }
}
