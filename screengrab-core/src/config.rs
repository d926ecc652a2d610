//! Capture configuration and command-line argument parsing.
//!
//! The CLI grammar is positional and count-driven: the number of
//! arguments after the program name selects the capture mode, and
//! `/h` / `/help` as the first argument always shows the help text.
//! Parsing produces an immutable [`CaptureConfig`]; nothing downstream
//! mutates it.

use crate::encode::OutputFormat;
use crate::errors::ScreengrabError;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// Rectangle in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Pixel dimensions of the rectangle, validated to be positive.
    ///
    /// A zero or negative extent would otherwise surface much later as
    /// an opaque GDI allocation failure, so it is rejected here.  The
    /// extents are computed in `i64`: the parser accepts any `i32`
    /// coordinates, so the raw `i32` differences could overflow.
    pub fn dimensions(&self) -> Result<(u32, u32), ScreengrabError> {
        let width = i64::from(self.right) - i64::from(self.left);
        let height = i64::from(self.bottom) - i64::from(self.top);
        if width <= 0 || height <= 0 {
            return Err(ScreengrabError::Capture(format!(
                "degenerate capture rectangle {width}x{height} \
                 (left {}, top {}, right {}, bottom {})",
                self.left, self.top, self.right, self.bottom
            )));
        }
        Ok((width as u32, height as u32))
    }
}

/// What the capture targets: the whole desktop or the active window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    FullScreen,
    ActiveWindow,
}

/// Immutable capture configuration, built once from the argument list.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub target: TargetMode,
    /// Title prefix of the window to activate before capturing.
    /// `Some("")` means "capture the current foreground window without
    /// changing focus"; `None` means full-screen mode.
    pub window_title: Option<String>,
    /// Optional capture rectangle in screen coordinates.  Either all
    /// four coordinates are present or none is.
    pub region: Option<Rect>,
    pub output_path: String,
    pub format: OutputFormat,
}

/// Outcome of argument parsing.
#[derive(Debug, Clone)]
pub enum Command {
    /// Show the help text and exit successfully.
    Help,
    /// Run the capture pipeline with this configuration.
    Capture(CaptureConfig),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse the raw argument list (element 0 is the program name).
///
/// Argument counts after the program name select the mode:
///
/// | count | meaning |
/// |-------|---------|
/// | 1 | `filename` -- full-screen capture |
/// | 2 | `filename windowTitle` -- active-window capture |
/// | 5 | `filename x0 y0 x1 y1` -- full-screen capture of a rectangle |
/// | 6 | `filename windowTitle x0 y0 x1 y1` -- window capture of a rectangle |
///
/// Any other count shows the help text.  An empty `windowTitle` keeps
/// the current focus and captures whatever window is active.
pub fn parse_args(args: &[String]) -> Result<Command, ScreengrabError> {
    let extra = args.get(1..).unwrap_or_default();

    if let Some(first) = extra.first() {
        let switch = first.to_ascii_lowercase();
        if switch == "/h" || switch == "/help" {
            return Ok(Command::Help);
        }
    }

    match extra {
        [filename] => build_config(filename, None, None),
        [filename, title] => build_config(filename, Some(title), None),
        [filename, coords @ ..] if coords.len() == 4 => {
            build_config(filename, None, Some(parse_region(coords)?))
        }
        [filename, title, coords @ ..] if coords.len() == 4 => {
            build_config(filename, Some(title), Some(parse_region(coords)?))
        }
        _ => Ok(Command::Help),
    }
}

fn build_config(
    filename: &str,
    title: Option<&String>,
    region: Option<Rect>,
) -> Result<Command, ScreengrabError> {
    let format = OutputFormat::from_path(filename)?;
    let target = match title {
        Some(_) => TargetMode::ActiveWindow,
        None => TargetMode::FullScreen,
    };
    Ok(Command::Capture(CaptureConfig {
        target,
        window_title: title.cloned(),
        region,
        output_path: filename.to_string(),
        format,
    }))
}

/// Parse four coordinate tokens `x0 y0 x1 y1` into a [`Rect`].
fn parse_region(coords: &[String]) -> Result<Rect, ScreengrabError> {
    debug_assert_eq!(coords.len(), 4);
    let mut parsed = [0i32; 4];
    for (slot, token) in parsed.iter_mut().zip(coords) {
        *slot = token.parse::<i32>().map_err(|_| {
            ScreengrabError::InvalidCoordinate(format!(
                "invalid coordinate {token:?}, expected a base-10 integer"
            ))
        })?;
    }
    Ok(Rect {
        left: parsed[0],
        top: parsed[1],
        right: parsed[2],
        bottom: parsed[3],
    })
}

// ---------------------------------------------------------------------------
// Help text
// ---------------------------------------------------------------------------

/// Human-readable usage text for the CLI.
pub fn help_text(program: &str) -> String {
    format!(
        "{program} captures the screen or the active window and saves it to a file.\n\
         \n\
         Usage:\n \
         {program} filename [WindowTitle] [origin X] [origin Y] [end X] [end Y]\n\
         \n\
         filename - the file where the screen capture will be saved\n     \
         allowed file extensions are - Bmp,Emf,Exif,Gif,Jpeg,Png,Tiff,Wmf.\n\
         WindowTitle - instead of capturing the whole screen you can point to a window\n     \
         with a title which will be put on focus and captured.\n     \
         For WindowTitle you can pass only the first few characters.\n     \
         If you don't want to change the current active window pass only \"\"\n\
         Coordinates - capture a rectangle of screen\n"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> Vec<String> {
        let mut args = vec!["screengrab".to_string()];
        args.extend(tokens.iter().map(|t| t.to_string()));
        args
    }

    #[test]
    fn test_no_arguments_shows_help() {
        assert!(matches!(parse_args(&argv(&[])).unwrap(), Command::Help));
    }

    #[test]
    fn test_help_switch_is_case_insensitive() {
        for switch in ["/h", "/H", "/help", "/HELP", "/Help"] {
            assert!(matches!(
                parse_args(&argv(&[switch])).unwrap(),
                Command::Help
            ));
        }
    }

    #[test]
    fn test_help_switch_wins_regardless_of_other_arguments() {
        let cmd = parse_args(&argv(&["/h", "shot.png", "0", "0"])).unwrap();
        assert!(matches!(cmd, Command::Help));
    }

    #[test]
    fn test_unexpected_argument_count_shows_help() {
        for extra in [
            vec!["shot.png", "Notepad", "10"],
            vec!["shot.png", "Notepad", "10", "20"],
            vec!["shot.png", "a", "b", "c", "d", "e", "f"],
        ] {
            assert!(matches!(parse_args(&argv(&extra)).unwrap(), Command::Help));
        }
    }

    #[test]
    fn test_single_argument_is_fullscreen() {
        let cmd = parse_args(&argv(&["shot.png"])).unwrap();
        let Command::Capture(config) = cmd else {
            panic!("expected a capture command");
        };
        assert_eq!(config.target, TargetMode::FullScreen);
        assert!(config.window_title.is_none());
        assert!(config.region.is_none());
        assert_eq!(config.output_path, "shot.png");
        assert_eq!(config.format, OutputFormat::Png);
    }

    #[test]
    fn test_two_arguments_target_the_named_window() {
        let Command::Capture(config) =
            parse_args(&argv(&["shot.jpg", "Notepad"])).unwrap()
        else {
            panic!("expected a capture command");
        };
        assert_eq!(config.target, TargetMode::ActiveWindow);
        assert_eq!(config.window_title.as_deref(), Some("Notepad"));
        assert!(config.region.is_none());
        assert_eq!(config.format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_empty_title_keeps_current_focus() {
        let Command::Capture(config) = parse_args(&argv(&["shot.bmp", ""])).unwrap()
        else {
            panic!("expected a capture command");
        };
        assert_eq!(config.target, TargetMode::ActiveWindow);
        assert_eq!(config.window_title.as_deref(), Some(""));
    }

    #[test]
    fn test_five_arguments_crop_the_screen() {
        let Command::Capture(config) =
            parse_args(&argv(&["shot.png", "10", "-20", "110", "80"])).unwrap()
        else {
            panic!("expected a capture command");
        };
        assert_eq!(config.target, TargetMode::FullScreen);
        assert_eq!(
            config.region,
            Some(Rect {
                left: 10,
                top: -20,
                right: 110,
                bottom: 80
            })
        );
    }

    #[test]
    fn test_six_arguments_crop_the_named_window() {
        let Command::Capture(config) = parse_args(&argv(&[
            "shot.bmp", "Notepad", "0", "0", "100", "50",
        ]))
        .unwrap()
        else {
            panic!("expected a capture command");
        };
        assert_eq!(config.target, TargetMode::ActiveWindow);
        assert_eq!(config.window_title.as_deref(), Some("Notepad"));
        assert_eq!(
            config.region,
            Some(Rect {
                left: 0,
                top: 0,
                right: 100,
                bottom: 50
            })
        );
        assert_eq!(config.format, OutputFormat::Bmp);
    }

    #[test]
    fn test_non_numeric_coordinate_is_rejected() {
        let err = parse_args(&argv(&["shot.png", "0", "0", "ten", "50"])).unwrap_err();
        assert!(matches!(err, ScreengrabError::InvalidCoordinate(_)));
        assert!(err.to_string().contains("ten"));
    }

    #[test]
    fn test_filename_without_extension_is_rejected() {
        let err = parse_args(&argv(&["shot"])).unwrap_err();
        assert!(matches!(err, ScreengrabError::ExtensionMissing(_)));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = parse_args(&argv(&["shot.xyz"])).unwrap_err();
        assert!(matches!(err, ScreengrabError::ExtensionUnsupported(_)));
    }

    #[test]
    fn test_uppercase_extension_is_accepted() {
        let Command::Capture(config) = parse_args(&argv(&["shot.PNG"])).unwrap()
        else {
            panic!("expected a capture command");
        };
        assert_eq!(config.format, OutputFormat::Png);
    }

    #[test]
    fn test_rect_dimensions() {
        let rect = Rect {
            left: -10,
            top: 5,
            right: 90,
            bottom: 55,
        };
        assert_eq!(rect.dimensions().unwrap(), (100, 50));
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let rect = Rect {
            left: i32::MIN,
            top: 0,
            right: i32::MAX,
            bottom: 100,
        };
        assert_eq!(rect.dimensions().unwrap(), (u32::MAX, 100));

        let inverted = Rect {
            left: i32::MAX,
            top: 0,
            right: i32::MIN,
            bottom: 100,
        };
        let err = inverted.dimensions().unwrap_err();
        assert!(matches!(err, ScreengrabError::Capture(_)));
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn test_degenerate_rect_is_rejected() {
        for rect in [
            Rect { left: 0, top: 0, right: 0, bottom: 10 },
            Rect { left: 0, top: 0, right: 10, bottom: 0 },
            Rect { left: 50, top: 0, right: 10, bottom: 10 },
        ] {
            let err = rect.dimensions().unwrap_err();
            assert!(matches!(err, ScreengrabError::Capture(_)));
            assert!(err.to_string().contains("degenerate"));
        }
    }
}
