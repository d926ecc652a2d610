//! Output format resolution and image encoding.
//!
//! The codec is chosen purely by the lowercase filename extension.  All
//! raster formats go through the `image` crate in a single encode call,
//! so no partially-written file is ever left behind by a codec failure
//! that precedes the write.

use crate::capture::CapturedImage;
use crate::errors::ScreengrabError;

// ---------------------------------------------------------------------------
// Format resolution
// ---------------------------------------------------------------------------

/// Image format selected by the output filename extension.
///
/// Every extension the tool accepts resolves to a variant here.  `Emf`
/// and `Wmf` are Windows vector metafile formats: they resolve during
/// parsing but carry no raster encoder, so [`save`] rejects them at
/// write time with a descriptive error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Bmp,
    Emf,
    Exif,
    Jpeg,
    Gif,
    Png,
    Tiff,
    Wmf,
}

impl OutputFormat {
    /// Resolve a lowercase extension to a format.  `jpg` and `jpeg`
    /// both map to the JPEG codec.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "bmp" => Some(Self::Bmp),
            "emf" => Some(Self::Emf),
            "exif" => Some(Self::Exif),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "gif" => Some(Self::Gif),
            "png" => Some(Self::Png),
            "tiff" => Some(Self::Tiff),
            "wmf" => Some(Self::Wmf),
            _ => None,
        }
    }

    /// Resolve the format from a filename.
    ///
    /// The extension is the substring after the last `.`, lowercased.
    /// A name without any `.` is an [`ScreengrabError::ExtensionMissing`]
    /// error; a trailing `.` yields the empty extension, which is
    /// unsupported like any other unknown one.
    pub fn from_path(path: &str) -> Result<Self, ScreengrabError> {
        let dot = path
            .rfind('.')
            .ok_or_else(|| ScreengrabError::ExtensionMissing(path.to_string()))?;
        let ext = path[dot + 1..].to_ascii_lowercase();
        Self::from_extension(&ext).ok_or(ScreengrabError::ExtensionUnsupported(ext))
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `frame` to `path` with the codec selected by `format`.
///
/// The BGRA capture buffer is converted to the RGBA layout the `image`
/// crate expects.  JPEG (and Exif, which is the JPEG container format)
/// carries no alpha channel, and BMP alpha handling differs between
/// readers, so those formats are written as RGB; captures are fully
/// opaque either way.
pub fn save(
    frame: CapturedImage,
    path: &str,
    format: OutputFormat,
) -> Result<(), ScreengrabError> {
    let target = match format {
        OutputFormat::Bmp => image::ImageFormat::Bmp,
        OutputFormat::Jpeg | OutputFormat::Exif => image::ImageFormat::Jpeg,
        OutputFormat::Gif => image::ImageFormat::Gif,
        OutputFormat::Png => image::ImageFormat::Png,
        OutputFormat::Tiff => image::ImageFormat::Tiff,
        OutputFormat::Emf | OutputFormat::Wmf => {
            return Err(ScreengrabError::Encode(format!(
                "no raster encoder for the {format:?} metafile format"
            )));
        }
    };

    let (width, height) = (frame.width, frame.height);
    let rgba = image::RgbaImage::from_raw(width, height, frame.into_rgba())
        .ok_or_else(|| {
            ScreengrabError::Encode(
                "pixel buffer size does not match the capture dimensions".into(),
            )
        })?;

    let result = match target {
        image::ImageFormat::Jpeg | image::ImageFormat::Bmp => {
            image::DynamicImage::ImageRgba8(rgba)
                .to_rgb8()
                .save_with_format(path, target)
        }
        _ => rgba.save_with_format(path, target),
    };

    result.map_err(|e| ScreengrabError::Encode(format!("could not write {path}: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
