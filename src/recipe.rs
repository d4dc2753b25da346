//! The recipe module contains some prelude functions that construct a [Builder] for
//! convenience use. Please click to the description and source for reference.

use crate::*;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// {level} {category} {file}:{line} {message}, without time, for comparing output in tests.
pub const LOG_FORMAT_PLAIN: &'static str = "{level} {category} {file}:{line} {message}";

/// [{timestamp}][{level}][{category}] {message}
pub const LOG_FORMAT_PROD: &'static str = "[{timestamp}][{level}][{category}] {message}";

fn with_panic_policy(mut config: Builder) -> Builder {
    config.panic = true;
    // panic on debugging
    #[cfg(debug_assertions)]
    {
        config.continue_when_panic = false;
    }
    // do not panic on release
    #[cfg(not(debug_assertions))]
    {
        config.continue_when_panic = true;
    }
    config
}

/// Output to console only, with colors, dynamic=true.
pub fn console_logger(target: ConsoleTarget, max_level: LogLevel) -> Builder {
    Builder::default()
        .level(max_level)
        .console(Some(target))
        .no_file()
        .ansi_colors(true)
        .test()
}

/// Output to stderr with DEFAULT_FORMAT, with dynamic=true.
#[inline]
pub fn stderr_logger(max_level: LogLevel) -> Builder {
    console_logger(ConsoleTarget::Stderr, max_level)
}

/// One log file written on the caller's thread, plus stderr, with the default rotation
/// (10MB or one day, keep 5 archives).
///
/// The type of file_path can be &str / String / &OsStr / OsString / Path / PathBuf
pub fn file_logger<P: Into<PathBuf>>(file_path: P, max_level: LogLevel) -> Builder {
    let config = Builder::default()
        .level(max_level)
        .file(file_path)
        .signal(signal_hook::consts::SIGUSR1);
    with_panic_policy(config)
}

/// Like [file_logger], written by a background thread.
///
/// **When your program shutting down, should call flush to ensure the log is written to disk.**
///
/// ``` rust
/// log::logger().flush();
/// ```
/// On panic, our panic hook will call `flush()` explicitly.
pub fn async_file_logger<P: Into<PathBuf>>(file_path: P, max_level: LogLevel) -> Builder {
    file_logger(file_path, max_level).asynchronous(true)
}

/// One log file with custom rotation and no console output.
pub fn rotated_file_logger<P: Into<PathBuf>>(
    file_path: P, max_level: LogLevel, rotation: Rotation,
) -> Builder {
    file_logger(file_path, max_level).console(None).rotation(rotation)
}

/// Configure dynamic file/console logger from environment.
///
/// # Arguments:
///
///   - file_env_name:
///
///     If valid as stdout/stderr/1/2, output to console target;
///
///     When a file path is configured, create a file_logger();
///
///     For empty string, default output to Stderr.
///
///   - level_env_name: configure the log level, default to Info.
///
/// Rotation reads `{file_env_name}_MAX_SIZE` (bytes), `{file_env_name}_MAX_AGE` (seconds) and
/// `{file_env_name}_MAX_FILES`, `{file_env_name}_ASYNC` turns on the background writer.
///
/// # Example:
///
/// ``` rust
/// use logbook::recipe;
/// let _ = recipe::env_logger("LOG_FILE", "LOG_LEVEL").build();
/// ```
pub fn env_logger(file_env_name: &str, level_env_name: &str) -> Builder {
    let level: LogLevel = env_or(level_env_name, LogLevel::Info).into();
    let mut console: Option<ConsoleTarget> = None;
    if let Ok(file_path) = std::env::var(file_env_name) {
        if let Ok(target) = ConsoleTarget::from_str(file_path.as_str()) {
            console = Some(target);
        } else if file_path.len() > 0 {
            let default = Rotation::default();
            let max_size: u64 =
                env_or(&format!("{}_MAX_SIZE", file_env_name), default.max_size).into();
            let max_age: u64 =
                env_or(&format!("{}_MAX_AGE", file_env_name), default.max_age.as_secs()).into();
            let max_files: usize =
                env_or(&format!("{}_MAX_FILES", file_env_name), default.max_files).into();
            let asynchronous: bool =
                env_or(&format!("{}_ASYNC", file_env_name), false).into();
            let rotation = Rotation { max_size, max_age: Duration::from_secs(max_age), max_files };
            return file_logger(file_path, level)
                .rotation(rotation)
                .asynchronous(asynchronous)
                .test();
        }
    }
    console_logger(console.unwrap_or(ConsoleTarget::Stderr), level)
}
