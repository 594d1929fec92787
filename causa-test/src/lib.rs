//! Utils for testing code producing causa errors.

use std::error::Error as StdError;

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use causa_core::{Chain, Frame};

pub use causa_utils::stack::with_stack_mock;

/// Builds a frame of the form `function (file:line)`.
pub fn frame(function: &str, file: &str, line: u32) -> Frame {
    Frame::new(Some(function.into()), Some(file.into()), Some(line))
}

/// Builds frames with the provided function names located in `src/lib.rs`.
pub fn frames(functions: &[&str]) -> Vec<Frame> {
    functions
        .iter()
        .zip(1..)
        .map(|(function, line)| frame(function, "src/lib.rs", line))
        .collect()
}

/// Returns messages of the error and all its causes, outermost first.
pub fn messages(error: &(dyn StdError + 'static)) -> Vec<String> {
    Chain::new(error).map(|error| error.to_string()).collect()
}

/// Installs a `tracing` subscriber printing into the test output.
///
/// Respects `RUST_LOG`. Can be called many times.
pub fn init_logging() {
    static INIT: OnceCell<()> = OnceCell::new();

    INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
