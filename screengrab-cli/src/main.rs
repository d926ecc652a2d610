//! Command-line driver for screengrab.
//!
//! Runs one linear pipeline per invocation: DPI awareness switch ->
//! argument parsing -> optional window activation -> capture -> encode.
//! All user-facing diagnostics go to stdout; this is the single place
//! where error kinds are mapped to messages and process exit codes.

use screengrab_core::config::{self, CaptureConfig, Command};
use screengrab_core::errors::ScreengrabError;

fn main() {
    env_logger::init();
    set_dpi_aware();

    let args: Vec<String> = std::env::args().collect();
    let program = args
        .first()
        .map(String::as_str)
        .unwrap_or("screengrab")
        .to_string();

    let command = match config::parse_args(&args) {
        Ok(command) => command,
        Err(err) => {
            print_failure(&err, None);
            std::process::exit(exit_code(&err));
        }
    };

    match command {
        Command::Help => print!("{}", config::help_text(&program)),
        Command::Capture(capture_config) => {
            if let Err(err) = run(&capture_config) {
                print_failure(&err, Some(&capture_config));
                std::process::exit(exit_code(&err));
            }
        }
    }
}

/// Activate the target window if asked to, announce the capture, then
/// capture and encode.
#[cfg(windows)]
fn run(capture_config: &CaptureConfig) -> Result<(), ScreengrabError> {
    use screengrab_core::config::TargetMode;
    use screengrab_core::{capture, encode, window};

    if let Some(title) = capture_config.window_title.as_deref() {
        // An empty title means "capture whatever is active right now".
        if !title.is_empty() {
            window::activate(title)?;
            println!("setting {title} on focus");
        }
    }

    let handle = match capture_config.target {
        TargetMode::FullScreen => {
            println!(
                "Taking a capture of the whole screen to {}",
                capture_config.output_path
            );
            window::desktop_hwnd()
        }
        TargetMode::ActiveWindow => {
            println!(
                "Taking a capture of the active window to {}",
                capture_config.output_path
            );
            window::foreground_hwnd()
        }
    };

    let frame = capture::capture(handle, capture_config.region)?;
    encode::save(frame, &capture_config.output_path, capture_config.format)
}

#[cfg(not(windows))]
fn run(_capture_config: &CaptureConfig) -> Result<(), ScreengrabError> {
    Err(ScreengrabError::Capture(
        "screen capture is only supported on Windows".into(),
    ))
}

/// Opt in to physical pixel coordinates before any rect is queried.
#[cfg(windows)]
fn set_dpi_aware() {
    let ok = unsafe { windows::Win32::UI::HiDpi::SetProcessDPIAware() };
    if !ok.as_bool() {
        log::warn!("SetProcessDPIAware failed; coordinates may be DPI-virtualized");
    }
}

#[cfg(not(windows))]
fn set_dpi_aware() {}

/// Print the human-readable line for a failure, followed by the
/// underlying diagnostic.
fn print_failure(err: &ScreengrabError, capture_config: Option<&CaptureConfig>) {
    match err {
        ScreengrabError::ExtensionMissing(_) => {
            println!("Invalid file name - no extension");
        }
        ScreengrabError::ExtensionUnsupported(ext) => {
            println!("Probably wrong file format: {ext}");
        }
        ScreengrabError::WindowNotFound(title) => {
            println!("Probably there's no window like {title}");
        }
        ScreengrabError::InvalidCoordinate(_) => {
            println!("Invalid coordinates - expected four base-10 integers");
        }
        ScreengrabError::Capture(_) => {
            println!("Could not capture the screen");
        }
        ScreengrabError::Encode(_) => {
            if let Some(capture_config) = capture_config {
                println!("Check if file path is valid {}", capture_config.output_path);
            }
        }
    }
    println!("{err}");
}

/// Map an error kind to the process exit code.
fn exit_code(err: &ScreengrabError) -> i32 {
    match err {
        ScreengrabError::ExtensionMissing(_) => 7,
        ScreengrabError::ExtensionUnsupported(_) => 8,
        ScreengrabError::WindowNotFound(_) => 9,
        ScreengrabError::InvalidCoordinate(_) => 10,
        ScreengrabError::Capture(_) => 11,
        ScreengrabError::Encode(_) => 12,
    }
}
