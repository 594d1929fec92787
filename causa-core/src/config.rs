//! [Config].
//!
//! [Config]: StackConfig

use std::{env, sync::Arc};

use arc_swap::ArcSwap;
use derive_more::IsVariant;
use once_cell::sync::{Lazy, OnceCell};
use serde::Deserialize;

use causa_utils::Stack;

/// Stack capture configuration.
///
/// # Example
/// ```toml
/// [errors]
/// capture = "Env"
/// max_frames = 32
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Whether to capture the call stack when an error is created.
    ///
    /// `Always` by default.
    pub capture: Capture,
    /// Maximum number of frames kept per error.
    ///
    /// `64` by default.
    pub max_frames: usize,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            capture: Capture::default(),
            max_frames: 64,
        }
    }
}

impl StackConfig {
    pub(crate) fn capture_stack(&self) -> Stack {
        if self.capture.is_enabled() {
            Stack::capture(self.max_frames)
        } else {
            Stack::empty()
        }
    }
}

/// When the call stack is captured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, IsVariant, Deserialize)]
pub enum Capture {
    /// On every error creation.
    #[default]
    Always,
    /// Never, only the creation location is recorded.
    Never,
    /// Only if `RUST_LIB_BACKTRACE` or, if unset, `RUST_BACKTRACE` is set
    /// to something other than `0`. The environment is read once.
    Env,
}

impl Capture {
    fn is_enabled(self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Env => env_enabled(),
        }
    }
}

static CONFIG: Lazy<ArcSwap<StackConfig>> =
    Lazy::new(|| ArcSwap::from_pointee(StackConfig::default()));

/// Installs the process-wide stack capture configuration.
///
/// Affects only errors created afterwards.
pub fn configure(config: StackConfig) {
    tracing::debug!(?config, "stack capture configured");
    CONFIG.store(Arc::new(config));
}

/// Returns the current process-wide stack capture configuration.
pub fn stack_config() -> Arc<StackConfig> {
    CONFIG.load_full()
}

pub(crate) fn capture_stack() -> Stack {
    CONFIG.load().capture_stack()
}

fn env_enabled() -> bool {
    static ENABLED: OnceCell<bool> = OnceCell::new();

    *ENABLED.get_or_init(|| {
        let lib = env::var("RUST_LIB_BACKTRACE").ok();
        let global = env::var("RUST_BACKTRACE").ok();
        let enabled = backtrace_enabled(lib.as_deref(), global.as_deref());
        tracing::debug!(enabled, "stack capture resolved from the environment");
        enabled
    })
}

fn backtrace_enabled(lib: Option<&str>, global: Option<&str>) -> bool {
    lib.or(global).is_some_and(|value| value != "0")
}
