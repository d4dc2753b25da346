use std::fmt;
use std::str::FromStr;

/// Display color of a level, rendered as ANSI escape when the console has colors enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Gray,
    Green,
    Yellow,
    Red,
    Magenta,
}

impl Color {
    #[inline]
    pub fn ansi_code(&self) -> &'static str {
        match self {
            Self::Gray => "\x1b[90m",
            Self::Green => "\x1b[32m",
            Self::Yellow => "\x1b[33m",
            Self::Red => "\x1b[31m",
            Self::Magenta => "\x1b[35m",
        }
    }
}

pub const ANSI_RESET: &str = "\x1b[0m";

/// Severity of a log event, ordered from the least to the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Fault = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] =
        [Self::Debug, Self::Info, Self::Warning, Self::Error, Self::Fault];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fault => "FAULT",
        }
    }

    #[inline]
    pub fn color(&self) -> Color {
        match self {
            Self::Debug => Color::Gray,
            Self::Info => Color::Green,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
            Self::Fault => Color::Magenta,
        }
    }

    /// The most verbose `log` crate filter that still reaches this threshold.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Debug => log::LevelFilter::Trace,
            Self::Info => log::LevelFilter::Info,
            Self::Warning => log::LevelFilter::Warn,
            Self::Error | Self::Fault => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so that width specifiers like {:<7} apply
        f.pad(self.name())
    }
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace | log::Level::Debug => Self::Debug,
            log::Level::Info => Self::Info,
            log::Level::Warn => Self::Warning,
            log::Level::Error => Self::Error,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error | LogLevel::Fault => log::Level::Error,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        let s = s.trim();
        for (names, level) in [
            (&["trace", "debug"][..], Self::Debug),
            (&["info"][..], Self::Info),
            (&["warn", "warning"][..], Self::Warning),
            (&["error"][..], Self::Error),
            (&["fault", "fatal", "critical"][..], Self::Fault),
        ] {
            if names.iter().any(|n| n.eq_ignore_ascii_case(s)) {
                return Ok(level);
            }
        }
        Err(())
    }
}
