/// Creates an [`Error`](crate::Error) with a formatted message.
///
/// Accepts the same arguments as [`format!`].
///
/// # Example
/// ```
/// let error = causa_core::errorf!("no entry {}", 5);
/// assert_eq!(error.to_string(), "no entry 5");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::Error::new($crate::_priv::format!($($arg)+))
    };
}

/// Annotates an `Option` of an error with a formatted message.
///
/// Returns `None` for `None` without formatting anything, see
/// [`wrap()`](crate::wrap).
///
/// # Example
/// ```
/// use std::io;
///
/// let none = causa_core::wrapf!(None::<io::Error>, "x={}", 5);
/// assert!(none.is_none());
///
/// let error = causa_core::wrapf!(Some(io::Error::other("disk full")), "x={}", 5).unwrap();
/// assert_eq!(error.to_string(), "x=5");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($error:expr, $($arg:tt)+) => {
        match $error {
            ::std::option::Option::Some(error) => ::std::option::Option::Some(
                $crate::Error::wrap(error, $crate::_priv::format!($($arg)+)),
            ),
            ::std::option::Option::None => ::std::option::Option::None,
        }
    };
}
