use std::fmt::Write;

use crate::level::LogLevel;
use crate::time::{Timer, ISO_TIME};

/// Template used when the host does not configure one.
pub const DEFAULT_FORMAT: &'static str =
    "{timestamp} - {level} - {category} - {file}:{line} - {message}";

/// One log call, consumed immediately by the formatter.
#[derive(Debug, Clone, Copy)]
pub struct LogEvent<'a> {
    pub level: LogLevel,
    pub category: &'a str,
    pub message: &'a str,
    /// Full path of the source file, only the basename is printed.
    pub file: &'a str,
    pub line: u32,
}

impl<'a> LogEvent<'a> {
    pub fn new(level: LogLevel, category: &'a str, message: &'a str) -> Self {
        Self { level, category, message, file: "<none>", line: 0 }
    }

    pub fn location(mut self, file: &'a str, line: u32) -> Self {
        self.file = file;
        self.line = line;
        self
    }
}

/// A line template with the recognized tokens:
/// `{timestamp}`, `{level}`, `{category}`, `{file}`, `{line}`, `{message}`.
///
/// Anything else in braces is copied to the output as-is.
///
/// # Example
/// ```
/// use logbook::{LogEvent, LogFormat, LogLevel};
/// let format = LogFormat::new("{level} {category} {file}:{line} {message}", 5, 5);
/// let event = LogEvent::new(LogLevel::Info, "Net", "ok").location("/a/b/X.swift", 7);
/// assert_eq!(format.render_now(&event), "INFO  Net   X.swift:7 ok");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    template: String,
    level_width: usize,
    category_width: usize,
    time_fmt: String,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, 7, 0)
    }
}

impl LogFormat {
    pub fn new(template: &str, level_width: usize, category_width: usize) -> Self {
        Self {
            template: template.to_string(),
            level_width,
            category_width,
            time_fmt: ISO_TIME.to_string(),
        }
    }

    /// Change the strftime format of `{timestamp}`, refer to chrono::format::strftime.
    pub fn time_fmt(mut self, time_fmt: &str) -> Self {
        self.time_fmt = time_fmt.to_string();
        self
    }

    #[inline]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[inline]
    pub fn level_width(&self) -> usize {
        self.level_width
    }

    #[inline]
    pub fn category_width(&self) -> usize {
        self.category_width
    }

    /// Render with the current time.
    #[inline]
    pub fn render_now(&self, event: &LogEvent) -> String {
        self.render(event, &Timer::new())
    }

    /// Substitute the tokens in one left-to-right pass. Substituted text is never rescanned.
    pub fn render(&self, event: &LogEvent, now: &Timer) -> String {
        let mut out = String::with_capacity(self.template.len() + event.message.len() + 32);
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            match tail.find('}') {
                Some(end) => {
                    if self.push_token(&mut out, &tail[1..end], event, now) {
                        rest = &tail[end + 1..];
                    } else {
                        // "{{level}" still substitutes the inner token
                        out.push('{');
                        rest = &tail[1..];
                    }
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn push_token(&self, out: &mut String, token: &str, event: &LogEvent, now: &Timer) -> bool {
        match token {
            "timestamp" => {
                let mut ts = String::new();
                // chrono reports an invalid strftime item as fmt::Error
                if write!(ts, "{}", now.format(&self.time_fmt)).is_err() {
                    ts.clear();
                    let _ = write!(ts, "{}", now.format(ISO_TIME));
                }
                out.push_str(&ts);
            }
            "level" => pad_into(out, event.level.name(), self.level_width),
            "category" => pad_into(out, event.category, self.category_width),
            "file" => out.push_str(basename(event.file)),
            "line" => {
                let _ = write!(out, "{}", event.line);
            }
            "message" => out.push_str(event.message),
            _ => return false,
        }
        true
    }
}

/// Right-pad `s` with spaces to `width` characters, never truncating.
pub fn pad(s: &str, width: usize) -> String {
    let mut out = String::with_capacity(width.max(s.len()));
    pad_into(&mut out, s, width);
    out
}

#[inline]
fn pad_into(out: &mut String, s: &str, width: usize) {
    out.push_str(s);
    let len = s.chars().count();
    for _ in len..width {
        out.push(' ');
    }
}

/// Last component of a source path, accepting both separators.
#[inline]
pub fn basename(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path)
}
