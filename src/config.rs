use crate::console_impl::{ConsoleTarget, StreamSink};
use crate::error::{Error, Result};
use crate::formatter::LogFormat;
use crate::level::LogLevel;
use crate::log_impl::{setup_log, Logger};
use crate::rotation::Rotation;
use crate::side_channel::SideChannel;
use std::path::PathBuf;
use std::time::Duration;

/// Settings read by the logger on every call.
///
/// A [Logger] keeps the current Config behind an `ArcSwap`, so it can be replaced on the fly
/// with [Logger::reconfigure] while other threads are logging.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Events below this level are discarded.
    pub level: LogLevel,

    /// Console output, None to disable.
    pub console: Option<ConsoleTarget>,

    pub log_to_file: bool,

    /// The active log file, archives are created next to it.
    pub file_path: PathBuf,

    pub format: LogFormat,

    /// Write the file from a background thread instead of the caller's.
    pub asynchronous: bool,

    pub rotation: Rotation,

    /// Colorize console output by level.
    pub ansi_colors: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            console: Some(ConsoleTarget::Stderr),
            log_to_file: true,
            file_path: PathBuf::from("logs/app.log"),
            format: LogFormat::default(),
            asynchronous: false,
            rotation: Rotation::default(),
            ansi_colors: false,
        }
    }
}

impl Config {
    #[inline]
    pub fn level_width(&self) -> usize {
        self.format.level_width()
    }

    #[inline]
    pub fn category_width(&self) -> usize {
        self.format.category_width()
    }

    #[inline]
    pub fn max_file_size(&self) -> u64 {
        self.rotation.max_size
    }

    #[inline]
    pub fn max_age(&self) -> Duration {
        self.rotation.max_age
    }

    #[inline]
    pub fn max_rotated_files(&self) -> usize {
        self.rotation.max_files
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.log_to_file && self.file_path.file_name().is_none() {
            return Err(Error::Config(format!(
                "file_path {:?} does not name a file",
                self.file_path
            )));
        }
        Ok(())
    }
}

/// Setup a [Logger], or the global logger.
/// See crate::recipe for usage
#[derive(Default)]
pub struct Builder {
    /// When dynamic==true,
    ///   Can safely re-initialize the global logger even it exists,
    ///   useful to setup different types of logger in test suits.
    /// When dynamic==false,
    ///   Only initialize once, the logger cannot be replaced afterwards.
    pub dynamic: bool,

    /// Signals which make the file sink reopen its file, for external log-rotate.
    /// NOTE: Once logger started to listen signal, does not support dynamic reconfigure.
    pub rotation_signals: Vec<i32>,

    /// Hookup to log a fault when panic
    pub panic: bool,

    /// Whether to exit program after panic
    pub continue_when_panic: bool,

    pub config: Config,

    /// Replace the console output, for example with a [MemorySink](crate::MemorySink).
    pub(crate) sink: Option<StreamSink>,

    pub(crate) side_channel: SideChannel,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// For test cases, set dynamic=true and turn Off signal.
    /// Call this with pre-set recipe for convenient.
    pub fn test(mut self) -> Self {
        self.dynamic = true;
        self.rotation_signals.clear();
        self
    }

    /// Add log-rotate signal
    pub fn signal(mut self, signal: i32) -> Self {
        self.rotation_signals.push(signal);
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    pub fn file<P: Into<PathBuf>>(mut self, file_path: P) -> Self {
        self.config.log_to_file = true;
        self.config.file_path = file_path.into();
        self
    }

    pub fn no_file(mut self) -> Self {
        self.config.log_to_file = false;
        self
    }

    pub fn console(mut self, target: Option<ConsoleTarget>) -> Self {
        self.config.console = target;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.config.rotation = rotation;
        self
    }

    pub fn asynchronous(mut self, asynchronous: bool) -> Self {
        self.config.asynchronous = asynchronous;
        self
    }

    pub fn ansi_colors(mut self, enable: bool) -> Self {
        self.config.ansi_colors = enable;
        self
    }

    pub fn sink<S: Into<StreamSink>>(mut self, sink: S) -> Self {
        self.sink = Some(sink.into());
        self
    }

    /// Where the logger reports its own failures, default to stderr.
    pub fn side_channel(mut self, side: SideChannel) -> Self {
        self.side_channel = side;
        self
    }

    /// Build a standalone logger, not touching the global one.
    pub fn build_logger(&self) -> Result<Logger> {
        Logger::new(self.config.clone(), self.sink.clone(), self.side_channel.clone())
    }

    /// Setup global logger.
    /// Equals to setup_log(builder)
    pub fn build(self) -> Result<()> {
        setup_log(self)
    }
}
