//! Error types for `screengrab_core`.
//!
//! All failures are funnelled through [`ScreengrabError`], which uses
//! `thiserror` for `Display` and `Error` derives.  Exit-code mapping is
//! handled by the CLI crate, keeping this crate exit-code-free.

use thiserror::Error;

/// Top-level error type for the `screengrab_core` library.
///
/// Each variant corresponds to a distinct failure kind the CLI maps to
/// its own exit code and message.
#[derive(Debug, Error)]
pub enum ScreengrabError {
    /// Output filename carries no `.extension` at all.
    #[error("ExtensionMissingError: no extension in {0}")]
    ExtensionMissing(String),

    /// Output filename extension does not name a known codec.
    #[error("ExtensionUnsupportedError: {0}")]
    ExtensionUnsupported(String),

    /// No visible window title begins with the requested filter.
    #[error("WindowNotFoundError: no window like {0}")]
    WindowNotFound(String),

    /// A coordinate token on the command line is not a base-10 integer.
    #[error("InvalidCoordinateError: {0}")]
    InvalidCoordinate(String),

    /// Screen capture failure (window rect query / GDI primitive).
    #[error("CaptureError: {0}")]
    Capture(String),

    /// Image encoding or output file write failure.
    #[error("EncodeError: {0}")]
    Encode(String),
}

/// Convert a `windows::core::Error` (Win32 HRESULT failure) into a
/// `ScreengrabError::Capture`.
#[cfg(windows)]
impl From<windows::core::Error> for ScreengrabError {
    fn from(err: windows::core::Error) -> Self {
        ScreengrabError::Capture(format!("Windows API error: {err}"))
    }
}
