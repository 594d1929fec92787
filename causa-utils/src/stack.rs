//! Provides the [`Stack`] type, a snapshot of the call stack.
//!
//! The main purpose of this module is to abstract over the `backtrace` crate.
//!
//! Another purpose is to provide a way to mock captured stacks in tests.

use std::fmt;

use backtrace::Backtrace;
use once_cell::sync::OnceCell;

pub use self::frame::Frame;

mod frame;

/// Frames of these crates belong to the capture machinery and are trimmed.
const INTERNAL_PREFIXES: &[&str] = &["backtrace::", "causa_utils::", "causa_core::"];

/// A snapshot of the call stack taken at some point.
///
/// Capturing is cheap: only instruction pointers are collected. Symbols are
/// resolved on the first access to [`Stack::frames()`] and cached, so a stack
/// can be shared and rendered from any number of threads.
///
/// Renders every frame on its own line prefixed with `"\n    at "`. An empty
/// stack renders as an empty string.
pub struct Stack(Inner);

enum Inner {
    Empty,
    Unresolved {
        raw: Backtrace,
        limit: usize,
        frames: OnceCell<Vec<Frame>>,
    },
    Resolved(Vec<Frame>),
}

impl Stack {
    /// Returns a stack without frames.
    #[inline]
    pub const fn empty() -> Self {
        Self(Inner::Empty)
    }

    /// Captures the current call stack keeping at most `limit` frames.
    ///
    /// Leading frames of the capture machinery are dropped, so the first frame
    /// is the caller of the first non-causa function.
    #[inline(never)]
    pub fn capture(limit: usize) -> Self {
        #[cfg(any(test, feature = "test-util"))]
        if let Some(frames) = mock::frames() {
            return Self::from_frames(frames.into_iter().take(limit).collect());
        }

        Self(Inner::Unresolved {
            raw: Backtrace::new_unresolved(),
            limit,
            frames: OnceCell::new(),
        })
    }

    /// Builds a stack from already resolved frames.
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self(Inner::Resolved(frames))
    }

    /// Returns frames, resolving symbols if it hasn't been done yet.
    pub fn frames(&self) -> &[Frame] {
        match &self.0 {
            Inner::Empty => &[],
            Inner::Unresolved { raw, limit, frames } => {
                frames.get_or_init(|| resolve(raw, *limit)).as_slice()
            }
            Inner::Resolved(frames) => frames.as_slice(),
        }
    }

    /// Returns whether the stack has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    /// Renders the stack in the same form as `Display` does.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames() {
            write!(f, "\n    at {frame}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.frames()).finish()
    }
}

fn resolve(raw: &Backtrace, limit: usize) -> Vec<Frame> {
    let mut raw = raw.clone();
    raw.resolve();

    // One frame can contain several symbols because of inlining.
    let frames = raw
        .frames()
        .iter()
        .flat_map(|frame| match frame.symbols() {
            [] => vec![Frame::unknown()],
            symbols => symbols.iter().map(Frame::from).collect(),
        })
        .collect::<Vec<_>>();

    let skip = internal_prefix_len(&frames);
    frames.into_iter().skip(skip).take(limit).collect()
}

fn internal_prefix_len(frames: &[Frame]) -> usize {
    let len = frames
        .iter()
        .take_while(|frame| frame.function().map_or(true, is_internal))
        .count();

    // Nothing is resolved, keep everything rather than nothing.
    if len == frames.len() {
        0
    } else {
        len
    }
}

fn is_internal(function: &str) -> bool {
    if function.contains("::tests::") {
        return false;
    }

    // Trait impls are named like `<T as causa_core::ResultExt<T>>::wrap`.
    INTERNAL_PREFIXES.iter().any(|prefix| {
        function
            .match_indices(prefix)
            .any(|(idx, _)| idx == 0 || matches!(function.as_bytes()[idx - 1], b'<' | b' '))
    })
}

#[cfg(any(test, feature = "test-util"))]
pub use mock::with_stack_mock;

#[cfg(any(test, feature = "test-util"))]
mod mock {
    use std::cell::RefCell;

    use super::Frame;

    thread_local! {
        static FRAMES: RefCell<Option<Vec<Frame>>> = const { RefCell::new(None) };
    }

    /// Makes every [`Stack::capture()`](super::Stack::capture) on the current
    /// thread return `frames` instead of the real call stack.
    ///
    /// Mocks can be nested. The previous mock is restored on return and on
    /// panic.
    pub fn with_stack_mock<R>(frames: Vec<Frame>, f: impl FnOnce() -> R) -> R {
        let previous = FRAMES.with(|c| c.borrow_mut().replace(frames));
        let _guard = Restore(previous);
        f()
    }

    struct Restore(Option<Vec<Frame>>);

    impl Drop for Restore {
        fn drop(&mut self) {
            let previous = self.0.take();
            FRAMES.with(|c| *c.borrow_mut() = previous);
        }
    }

    pub(super) fn frames() -> Option<Vec<Frame>> {
        FRAMES.with(|c| c.borrow().clone())
    }
}
