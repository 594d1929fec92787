use std::{error::Error as StdError, iter::FusedIterator};

/// An iterator over an error and its causes, see [`Error::chain()`].
///
/// Follows [`std::error::Error::source()`], so foreign errors in the chain are
/// walked through as well.
///
/// [`Error::chain()`]: crate::Error::chain
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Starts a chain from the provided error.
    pub fn new(head: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}
