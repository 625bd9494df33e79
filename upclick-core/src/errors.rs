//! Error types for `upclick_core`.
//!
//! All failures funnel through [`UpclickError`], one variant per subsystem.
//! The worker loop catches every variant at the per-event boundary and
//! degrades to "do nothing"; nothing here is ever allowed to abort the
//! process or cross back into the mouse-hook thread.

use thiserror::Error;

/// Top-level error type for the `upclick_core` library.
#[derive(Debug, Error)]
pub enum UpclickError {
    /// COM apartment or UIAutomation infrastructure failure.
    #[error("ComError: {0}")]
    ComError(String),

    /// Low-level mouse hook install/teardown failure.
    #[error("HookError: {0}")]
    HookError(String),

    /// UIA element lookup or ancestry walk failure.
    #[error("TreeError: {0}")]
    TreeError(String),

    /// Key synthesis failure (SendInput injected fewer events than asked).
    #[error("InputError: {0}")]
    InputError(String),
}

/// Fold `windows::core::Error` (COM / Win32 HRESULT failures) into
/// [`UpclickError::ComError`].
#[cfg(windows)]
impl From<windows::core::Error> for UpclickError {
    fn from(err: windows::core::Error) -> Self {
        UpclickError::ComError(format!("Windows COM error: {err}"))
    }
}
