//! `screengrab_core` -- capture pipeline library for the screengrab CLI.
//!
//! All logic lives here; the `screengrab-cli` crate is a thin driver
//! that wires the modules into one linear pipeline per invocation:
//! parse -> (optionally) activate window -> capture -> encode.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `ScreengrabError` enum via `thiserror` |
//! | [`config`] | `CaptureConfig` and positional argument parsing |
//! | [`window`] | Window enumeration, activation, rect queries (Windows only) |
//! | [`capture`] | GDI `BitBlt` capture into an owned BGRA frame |
//! | [`encode`] | Extension-keyed codec dispatch via the `image` crate |

pub mod capture;
pub mod config;
pub mod encode;
pub mod errors;
#[cfg(windows)]
pub mod window;
