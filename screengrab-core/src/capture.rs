//! Screen and window capture via GDI `BitBlt`.
//!
//! The engine acquires the target window's device context, blits the
//! requested rectangle into a compatible off-screen bitmap, and reads
//! the pixels back as a top-down 32-bit BGRA buffer.  Every GDI handle
//! is held by an RAII guard so nothing leaks on early returns, and the
//! bitmap selection is undone before its memory DC is deleted.

use crate::errors::ScreengrabError;

// ---------------------------------------------------------------------------
// Captured frame
// ---------------------------------------------------------------------------

/// Owned pixel buffer produced by one capture.
///
/// Pixels are stored row-major, left-to-right, top-to-bottom.  Each
/// pixel is 4 bytes in BGRA order with the alpha byte forced to 255;
/// `data.len() == width * height * 4`.  The frame has a single owner
/// and is consumed exactly once by the encoder.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// Width of the captured frame in pixels.
    pub width: u32,
    /// Height of the captured frame in pixels.
    pub height: u32,
    /// Raw pixel bytes in BGRA order.
    pub data: Vec<u8>,
}

impl CapturedImage {
    /// Consume the frame and return its pixels in RGBA byte order.
    pub fn into_rgba(self) -> Vec<u8> {
        self.data
            .chunks_exact(4)
            .flat_map(|px| [px[2], px[1], px[0], px[3]])
            .collect()
    }
}

#[cfg(windows)]
pub use gdi::capture;

// ---------------------------------------------------------------------------
// GDI engine
// ---------------------------------------------------------------------------

#[cfg(windows)]
mod gdi {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject,
        GetDIBits, GetWindowDC, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER,
        BI_RGB, DIB_RGB_COLORS, HBITMAP, HDC, HGDIOBJ, SRCCOPY,
    };

    use super::CapturedImage;
    use crate::config::Rect;
    use crate::errors::ScreengrabError;

    /// Window device context, released on drop.
    struct WindowDc {
        hwnd: HWND,
        hdc: HDC,
    }

    impl WindowDc {
        fn acquire(hwnd: HWND) -> Result<Self, ScreengrabError> {
            let hdc = unsafe { GetWindowDC(hwnd) };
            if hdc.is_invalid() {
                return Err(ScreengrabError::Capture(
                    "GetWindowDC failed for the target window".into(),
                ));
            }
            Ok(Self { hwnd, hdc })
        }
    }

    impl Drop for WindowDc {
        fn drop(&mut self) {
            unsafe {
                ReleaseDC(self.hwnd, self.hdc);
            }
        }
    }

    /// Off-screen memory device context, deleted on drop.
    struct MemoryDc(HDC);

    impl MemoryDc {
        fn compatible_with(source: &WindowDc) -> Result<Self, ScreengrabError> {
            let hdc = unsafe { CreateCompatibleDC(source.hdc) };
            if hdc.is_invalid() {
                return Err(ScreengrabError::Capture(
                    "CreateCompatibleDC failed".into(),
                ));
            }
            Ok(Self(hdc))
        }
    }

    impl Drop for MemoryDc {
        fn drop(&mut self) {
            unsafe {
                let _ = DeleteDC(self.0);
            }
        }
    }

    /// Destination bitmap, deleted on drop.
    struct CompatibleBitmap(HBITMAP);

    impl CompatibleBitmap {
        fn create(
            source: &WindowDc,
            width: u32,
            height: u32,
        ) -> Result<Self, ScreengrabError> {
            let bitmap =
                unsafe { CreateCompatibleBitmap(source.hdc, width as i32, height as i32) };
            if bitmap.is_invalid() {
                return Err(ScreengrabError::Capture(format!(
                    "CreateCompatibleBitmap failed for {width}x{height}"
                )));
            }
            Ok(Self(bitmap))
        }
    }

    impl Drop for CompatibleBitmap {
        fn drop(&mut self) {
            unsafe {
                let _ = DeleteObject(self.0);
            }
        }
    }

    /// Bitmap selection into a DC, restored on drop.
    ///
    /// Must be dropped before the memory DC it selects into, which the
    /// declaration order in [`capture`] guarantees.
    struct Selection {
        dc: HDC,
        previous: HGDIOBJ,
    }

    impl Selection {
        fn select(dc: &MemoryDc, bitmap: &CompatibleBitmap) -> Self {
            let previous = unsafe { SelectObject(dc.0, bitmap.0) };
            Self { dc: dc.0, previous }
        }
    }

    impl Drop for Selection {
        fn drop(&mut self) {
            unsafe {
                SelectObject(self.dc, self.previous);
            }
        }
    }

    /// Capture `region` of the window behind `handle`, or its whole
    /// bounding rectangle when no region is given.
    ///
    /// The region is taken verbatim in absolute screen coordinates; the
    /// caller is responsible for it matching the target window's screen
    /// location.  The blit is a straight `SRCCOPY` with no scaling,
    /// color-space conversion, or alpha handling.
    pub fn capture(
        handle: isize,
        region: Option<Rect>,
    ) -> Result<CapturedImage, ScreengrabError> {
        let hwnd = HWND(handle as *mut core::ffi::c_void);

        let rect = match region {
            Some(rect) => rect,
            None => crate::window::window_rect(handle)?,
        };
        let (width, height) = rect.dimensions()?;
        log::debug!(
            "capturing {width}x{height} at ({}, {}) from hwnd {handle:#x}",
            rect.left,
            rect.top
        );

        let source = WindowDc::acquire(hwnd)?;
        let memory = MemoryDc::compatible_with(&source)?;
        let bitmap = CompatibleBitmap::create(&source, width, height)?;

        {
            let _selected = Selection::select(&memory, &bitmap);
            unsafe {
                BitBlt(
                    memory.0,
                    0,
                    0,
                    width as i32,
                    height as i32,
                    source.hdc,
                    rect.left,
                    rect.top,
                    SRCCOPY,
                )
            }
            .map_err(|e| ScreengrabError::Capture(format!("BitBlt failed: {e}")))?;
        }

        // Read back in 32-bit top-down BGRA (negative height = row 0 at top).
        // The buffer size is computed in usize; `u32` arithmetic could
        // overflow for very large regions.
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        let bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width as i32,
                biHeight: -(height as i32),
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [Default::default()],
        };

        let lines = unsafe {
            GetDIBits(
                memory.0,
                bitmap.0,
                0,
                height,
                Some(pixels.as_mut_ptr() as *mut _),
                &bmi as *const _ as *mut _,
                DIB_RGB_COLORS,
            )
        };
        if lines == 0 {
            return Err(ScreengrabError::Capture("GetDIBits failed".into()));
        }

        // GDI leaves the alpha byte at 0; force fully opaque.
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }

        Ok(CapturedImage {
            width,
            height,
            data: pixels,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_rgba_swaps_blue_and_red() {
        let frame = CapturedImage {
            width: 2,
            height: 1,
            data: vec![1, 2, 3, 255, 10, 20, 30, 255],
        };
        assert_eq!(frame.into_rgba(), vec![3, 2, 1, 255, 30, 20, 10, 255]);
    }

    #[test]
    fn test_into_rgba_preserves_length() {
        let frame = CapturedImage {
            width: 3,
            height: 2,
            data: vec![0u8; 24],
        };
        assert_eq!(frame.into_rgba().len(), 24);
    }
}
