use std::{borrow::Cow, error::Error as StdError, fmt, panic::Location};

use causa_utils::Stack;

use crate::{
    chain::Chain,
    config,
    format::{Mode, Verbose},
};

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// An error with a message, the call stack of its creation and an optional
/// cause.
///
/// Immutable once created. `Display` renders only the message, `Debug`
/// renders the verbose form (see [`Mode::Verbose`]), `{:#?}` renders the
/// structure. Unlike the other forms, `{:#?}` nests causes recursively, so
/// it is limited by the stack depth.
pub struct Error {
    message: Cow<'static, str>,
    location: &'static Location<'static>,
    stack: Stack,
    cause: Option<Cause>,
}

assert_impl_all!(Error: Send, Sync);

enum Cause {
    Causa(Box<Error>),
    Foreign(BoxedError),
}

impl Cause {
    fn new(error: BoxedError) -> Self {
        match error.downcast::<Error>() {
            Ok(error) => Self::Causa(error),
            Err(error) => Self::Foreign(error),
        }
    }

    fn as_dyn(&self) -> &(dyn StdError + Send + Sync + 'static) {
        match self {
            Self::Causa(error) => &**error,
            Self::Foreign(error) => &**error,
        }
    }
}

impl Error {
    /// Creates a root error with the provided message.
    ///
    /// Use [`errorf!`](crate::errorf) to format the message.
    #[track_caller]
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self::build(message.into(), None)
    }

    /// Creates an error annotating `error` with the provided message.
    ///
    /// The stack is captured here, not where `error` was created.
    #[track_caller]
    pub fn wrap<E>(error: E, message: impl Into<Cow<'static, str>>) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::wrap_boxed(Box::new(error), message)
    }

    /// The same as [`Error::wrap()`], but for already boxed errors.
    #[track_caller]
    pub fn wrap_boxed(error: BoxedError, message: impl Into<Cow<'static, str>>) -> Self {
        Self::build(message.into(), Some(Cause::new(error)))
    }

    #[track_caller]
    fn build(message: Cow<'static, str>, cause: Option<Cause>) -> Self {
        Self {
            message,
            location: Location::caller(),
            stack: config::capture_stack(),
            cause,
        }
    }

    /// Returns the message, never including the cause or the stack.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns where the error was created.
    #[inline]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Returns the call stack captured on creation.
    ///
    /// Empty if capturing is disabled, see [`StackConfig`](crate::StackConfig).
    #[inline]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Returns the wrapped error or `None` for root errors.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_ref().map(Cause::as_dyn)
    }

    /// Returns whether the error has no cause.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.cause.is_none()
    }

    /// Iterates over this error and then every cause down the chain.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Returns the innermost error of the chain, `self` for root errors.
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        self.chain().last().unwrap_or(self)
    }

    /// Renders the error according to the provided mode.
    pub fn format(&self, mode: Mode) -> String {
        match mode {
            Mode::Plain => self.message.to_string(),
            Mode::Verbose => self.verbose().to_string(),
        }
    }

    /// Returns a wrapper rendering the verbose form via `Display`.
    pub fn verbose(&self) -> Verbose<'_> {
        Verbose::new(self)
    }
}

/// Annotates `error` with the provided message if there is an error.
///
/// Wrapping nothing yields nothing, so the result of an operation that may or
/// may not have failed can be annotated unconditionally.
#[track_caller]
pub fn wrap<E>(error: Option<E>, message: impl Into<Cow<'static, str>>) -> Option<Error>
where
    E: StdError + Send + Sync + 'static,
{
    let Some(error) = error else {
        return None;
    };

    Some(Error::wrap(error, message))
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Drop for Error {
    fn drop(&mut self) {
        // Unlink the chain here, nested drops would recurse through every cause.
        let mut next = self.cause.take();
        while let Some(Cause::Causa(mut error)) = next {
            next = error.cause.take();
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.debug_struct("Error")
                .field("message", &self.message)
                .field("location", &self.location)
                .field("stack", &self.stack)
                .field("cause", &self.cause())
                .finish()
        } else {
            fmt::Display::fmt(&self.verbose(), f)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use proptest::prelude::*;

    use causa_utils::{stack::with_stack_mock, Frame};

    use super::*;

    fn disk_full() -> io::Error {
        io::Error::new(io::ErrorKind::StorageFull, "disk full")
    }

    #[test]
    fn root() {
        let error = Error::new("disk full");
        assert_eq!(error.message(), "disk full");
        assert_eq!(error.to_string(), "disk full");
        assert!(error.is_root());
        assert!(error.cause().is_none());
        assert!(error.source().is_none());
        assert_eq!(error.root_cause().to_string(), "disk full");
    }

    #[test]
    fn owned_message() {
        let id = 5;
        let error = Error::new(format!("no entry {id}"));
        assert_eq!(error.message(), "no entry 5");
    }

    #[test]
    fn wrap_foreign() {
        let error = Error::wrap(disk_full(), "save failed");
        assert_eq!(error.message(), "save failed");
        assert!(!error.is_root());

        let cause = error.cause().unwrap();
        let io = cause.downcast_ref::<io::Error>().unwrap();
        assert_eq!(io.kind(), io::ErrorKind::StorageFull);
        assert_eq!(io.to_string(), "disk full");
    }

    #[test]
    fn wrap_boxed() {
        let boxed: BoxedError = Box::new(Error::new("disk full"));
        let error = Error::wrap_boxed(boxed, "save failed");
        assert!(matches!(error.cause, Some(Cause::Causa(_))));
        assert_eq!(error.cause().unwrap().to_string(), "disk full");

        let boxed: BoxedError = "disk full".into();
        let error = Error::wrap_boxed(boxed, "save failed");
        assert!(matches!(error.cause, Some(Cause::Foreign(_))));
    }

    #[test]
    fn absorbing_none() {
        assert!(wrap(None::<io::Error>, "x").is_none());

        let error = wrap(Some(disk_full()), "save failed").unwrap();
        assert_eq!(error.message(), "save failed");
        assert_eq!(error.cause().unwrap().to_string(), "disk full");
    }

    #[test]
    fn chain() {
        let a = Error::new("disk full");
        let b = Error::wrap(a, "save failed");
        let c = Error::wrap(b, "request failed");

        assert_eq!(c.to_string(), "request failed");
        let b = c.cause().unwrap();
        assert_eq!(b.to_string(), "save failed");
        let a = b.source().unwrap();
        assert_eq!(a.to_string(), "disk full");
        assert!(a.source().is_none());

        let messages = c.chain().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(messages, ["request failed", "save failed", "disk full"]);
        assert_eq!(c.root_cause().to_string(), "disk full");

        // Nested causa errors are kept as they are.
        let b = c.cause().unwrap().downcast_ref::<Error>().unwrap();
        assert_eq!(b.cause().unwrap().to_string(), "disk full");
    }

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    #[display("storage unavailable")]
    struct StorageError {
        source: Error,
    }

    #[test]
    fn chain_through_foreign() {
        let storage = StorageError {
            source: Error::new("disk full"),
        };
        let error = Error::wrap(storage, "save failed");

        let messages = error.chain().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(messages, ["save failed", "storage unavailable", "disk full"]);
        assert!(error.root_cause().is::<Error>());
    }

    #[test]
    fn location() {
        let line = line!() + 1;
        let error = Error::new("disk full");
        assert_eq!(error.location().file(), file!());
        assert_eq!(error.location().line(), line);

        let line = line!() + 1;
        let error = Error::wrap(error, "save failed");
        assert_eq!(error.location().line(), line);

        let line = line!() + 1;
        let error = wrap(Some(error), "request failed").unwrap();
        assert_eq!(error.location().line(), line);
    }

    #[test]
    fn stack_is_captured_at_each_site() {
        let inner = with_stack_mock(vec![Frame::new(Some("app::read".into()), None, None)], || {
            Error::new("disk full")
        });
        let outer = with_stack_mock(vec![Frame::new(Some("app::save".into()), None, None)], || {
            Error::wrap(inner, "save failed")
        });

        assert_eq!(outer.stack().frames()[0].function(), Some("app::save"));
        let inner = outer.cause().unwrap().downcast_ref::<Error>().unwrap();
        assert_eq!(inner.stack().frames()[0].function(), Some("app::read"));
    }

    #[test]
    fn real_stack_is_captured() {
        let error = Error::new("disk full");
        assert!(!error.stack().is_empty());
    }

    #[test]
    fn plain_format() {
        let error = with_stack_mock(vec![Frame::new(Some("app::save".into()), None, None)], || {
            Error::wrap(Error::new("disk full"), "save failed")
        });
        assert_eq!(error.format(Mode::Plain), "save failed");
        assert_eq!(format!("{error}"), "save failed");
    }

    #[test]
    fn alternate_debug() {
        let error = with_stack_mock(vec![], || Error::wrap(disk_full(), "save failed"));
        let debug = format!("{error:#?}");
        assert!(debug.starts_with("Error {"));
        assert!(debug.contains("message: \"save failed\""));
        assert!(debug.contains("location: "));
        assert!(debug.contains("stack: []"));
        assert!(debug.contains("cause: Some("));
    }

    #[test]
    fn deep_chain_drop() {
        let error = with_stack_mock(vec![], || {
            (0..200_000).fold(Error::new("root"), |error, i| {
                Error::wrap(error, format!("level {i}"))
            })
        });

        assert_eq!(error.chain().count(), 200_001);
        assert_eq!(error.root_cause().to_string(), "root");
        drop(error);
    }

    proptest! {
        #[test]
        fn message_is_kept(message in ".*") {
            let error = Error::new(message.clone());
            prop_assert_eq!(error.message(), message.as_str());
            prop_assert_eq!(error.format(Mode::Plain), message);
        }

        #[test]
        fn wrap_keeps_cause(inner in ".*", outer in ".*") {
            let error = Error::wrap(Error::new(inner.clone()), outer.clone());
            prop_assert_eq!(error.to_string(), outer);
            prop_assert_eq!(error.cause().unwrap().to_string(), inner);
        }

        #[test]
        fn plain_excludes_causes(messages in prop::collection::vec("[a-z]{1,8}", 1..8)) {
            let mut iter = messages.iter();
            let first = iter.next().unwrap();
            let mut error = Error::new(first.clone());
            for message in iter {
                error = Error::wrap(error, message.clone());
            }

            prop_assert_eq!(error.format(Mode::Plain), messages.last().unwrap().clone());
            prop_assert_eq!(error.chain().count(), messages.len());
        }
    }
}
