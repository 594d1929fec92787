use std::{
    fmt,
    path::{Path, PathBuf},
};

use backtrace::BacktraceSymbol;
use derive_more::Constructor;

/// A single resolved entry of a [`Stack`](super::Stack).
///
/// Renders as `function (file:line)`. Unknown parts are omitted, an unknown
/// function is rendered as `<unknown>`.
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct Frame {
    function: Option<String>,
    file: Option<PathBuf>,
    line: Option<u32>,
}

impl Frame {
    pub(crate) fn unknown() -> Self {
        Self::new(None, None, None)
    }

    /// Returns the demangled function name without the trailing hash.
    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Returns the source file if debug info is available.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Returns the line in [`Frame::file()`].
    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl From<&BacktraceSymbol> for Frame {
    fn from(symbol: &BacktraceSymbol) -> Self {
        Self {
            // `{:#}` strips the hash suffix of legacy mangled names.
            function: symbol.name().map(|name| format!("{name:#}")),
            file: symbol.filename().map(Path::to_path_buf),
            line: symbol.lineno(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function().unwrap_or("<unknown>"))?;

        if let Some(file) = &self.file {
            write!(f, " ({}", file.display())?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
            f.write_str(")")?;
        }

        Ok(())
    }
}
