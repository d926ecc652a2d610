//! Window location and activation via Win32 API.
//!
//! Finds the window to capture: either the desktop, the current
//! foreground window, or a window matched by a title prefix and brought
//! to the foreground first.  All functions take and return plain
//! `isize` handles, never raw `HWND`s.

use std::ffi::OsString;
use std::os::windows::ffi::OsStringExt;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT, TRUE};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetDesktopWindow, GetForegroundWindow, GetWindowLongW, GetWindowRect,
    GetWindowTextLengthW, GetWindowTextW, IsIconic, IsWindowVisible, SetForegroundWindow,
    ShowWindow, GWL_EXSTYLE, GWL_STYLE, SW_RESTORE, WS_EX_NOACTIVATE, WS_EX_TOOLWINDOW,
    WS_VISIBLE,
};

use crate::config::Rect;
use crate::errors::ScreengrabError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read the window title.
fn read_window_title(hwnd: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(hwnd) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; (len + 1) as usize];
    let copied = unsafe { GetWindowTextW(hwnd, &mut buf) };
    if copied <= 0 {
        return String::new();
    }
    OsString::from_wide(&buf[..copied as usize])
        .to_string_lossy()
        .into_owned()
}

/// Check if a window is a normal top-level application window (not a
/// tool window or otherwise excluded from the Alt+Tab list).
fn is_alt_tab_window(hwnd: HWND) -> bool {
    let style = unsafe { GetWindowLongW(hwnd, GWL_STYLE) } as u32;
    let ex_style = unsafe { GetWindowLongW(hwnd, GWL_EXSTYLE) } as u32;

    if style & WS_VISIBLE.0 == 0 {
        return false;
    }
    if ex_style & WS_EX_TOOLWINDOW.0 != 0 {
        return false;
    }
    if ex_style & WS_EX_NOACTIVATE.0 != 0 {
        return false;
    }

    true
}

/// Callback for EnumWindows that collects visible, titled window handles.
unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<HWND>) };

    if unsafe { IsWindowVisible(hwnd) }.as_bool() && is_alt_tab_window(hwnd) {
        let title_len = unsafe { GetWindowTextLengthW(hwnd) };
        if title_len > 0 {
            handles.push(hwnd);
        }
    }

    TRUE // continue enumeration
}

/// Enumerate all visible, titled, Alt+Tab-eligible top-level windows.
fn enumerate_visible_windows() -> Result<Vec<HWND>, ScreengrabError> {
    let mut handles: Vec<HWND> = Vec::with_capacity(64);
    let result = unsafe {
        EnumWindows(
            Some(enum_callback),
            LPARAM(&mut handles as *mut Vec<HWND> as isize),
        )
    };

    result
        .map_err(|e| ScreengrabError::Capture(format!("EnumWindows failed: {e}")))?;

    Ok(handles)
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Get the foreground (active) window handle.
pub fn foreground_hwnd() -> isize {
    let hwnd = unsafe { GetForegroundWindow() };
    hwnd.0 as isize
}

/// Get the desktop window handle.
pub fn desktop_hwnd() -> isize {
    let hwnd = unsafe { GetDesktopWindow() };
    hwnd.0 as isize
}

/// Get a window's bounding rectangle in screen coordinates.
pub fn window_rect(handle: isize) -> Result<Rect, ScreengrabError> {
    let hwnd = HWND(handle as *mut core::ffi::c_void);
    let mut raw = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut raw) }
        .map_err(|e| ScreengrabError::Capture(format!("GetWindowRect failed: {e}")))?;
    Ok(Rect {
        left: raw.left,
        top: raw.top,
        right: raw.right,
        bottom: raw.bottom,
    })
}

/// Bring the first window whose title starts with `title` to the
/// foreground, restoring it first if it is minimized.
///
/// Matching is a case-insensitive prefix test over the Alt+Tab-eligible
/// windows, so the caller can pass only the first few characters of the
/// title.  No match, and a matched window that refuses to come to the
/// foreground, are both a [`ScreengrabError::WindowNotFound`]; there is
/// no fuzzy retry.
pub fn activate(title: &str) -> Result<(), ScreengrabError> {
    let needle = title.to_ascii_lowercase();

    for hwnd in enumerate_visible_windows()? {
        let window_title = read_window_title(hwnd);
        if !window_title.to_ascii_lowercase().starts_with(&needle) {
            continue;
        }

        log::debug!("activating {window_title:?} (hwnd {:#x})", hwnd.0 as isize);
        unsafe {
            if IsIconic(hwnd).as_bool() {
                let _ = ShowWindow(hwnd, SW_RESTORE);
            }
            if !SetForegroundWindow(hwnd).as_bool() {
                log::warn!("SetForegroundWindow failed for {window_title:?}");
                return Err(ScreengrabError::WindowNotFound(title.to_string()));
            }
        }
        return Ok(());
    }

    Err(ScreengrabError::WindowNotFound(title.to_string()))
}
