use std::{borrow::Cow, error::Error as StdError};

use sealed::sealed;

use crate::error::Error;

/// Annotates errors of `Result` with a message.
///
/// `Ok` values pass through untouched, so results can be wrapped
/// unconditionally.
#[sealed]
pub trait ResultExt {
    /// The success type.
    type Value;

    /// Wraps the error, if any, into [`Error`] with the provided message.
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<Self::Value, Error>;

    /// The same as [`ResultExt::wrap()`], but the message is built only on
    /// errors.
    fn wrap_with<M, F>(self, f: F) -> Result<Self::Value, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M;
}

#[sealed]
impl<T, E> ResultExt for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    type Value = T;

    // `map_err()` isn't used, closures lose the caller location.
    #[track_caller]
    fn wrap(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::wrap(error, message)),
        }
    }

    #[track_caller]
    fn wrap_with<M, F>(self, f: F) -> Result<T, Error>
    where
        M: Into<Cow<'static, str>>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(error) => Err(Error::wrap(error, f())),
        }
    }
}

/// Converts `None` into a root [`Error`].
#[sealed]
pub trait OptionExt {
    /// The type inside `Some`.
    type Value;

    /// Returns the value or a new [`Error`] with the provided message.
    fn ok_or_error(self, message: impl Into<Cow<'static, str>>) -> Result<Self::Value, Error>;
}

#[sealed]
impl<T> OptionExt for Option<T> {
    type Value = T;

    #[track_caller]
    fn ok_or_error(self, message: impl Into<Cow<'static, str>>) -> Result<T, Error> {
        match self {
            Some(value) => Ok(value),
            None => Err(Error::new(message)),
        }
    }
}
