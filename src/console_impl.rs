use crate::level::{LogLevel, ANSI_RESET};
use parking_lot::Mutex;
use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ConsoleTarget {
    Stdout = 1,
    Stderr = 2,
}

impl FromStr for ConsoleTarget {
    type Err = ();

    /// accepts case-insensitive: stdout, stderr, out, err, 1, 2
    fn from_str(s: &str) -> Result<Self, ()> {
        let v = s.to_lowercase();
        match v.as_str() {
            "stdout" | "out" | "1" => Ok(ConsoleTarget::Stdout),
            "stderr" | "err" | "2" => Ok(ConsoleTarget::Stderr),
            _ => Err(()),
        }
    }
}

/// Consumer of formatted lines other than the log file.
#[enum_dispatch]
pub(crate) trait StreamSinkTrait {
    /// `line` has no trailing newline.
    fn emit(&self, level: LogLevel, line: &str, colors: bool);
}

/// The console side of the logger, replaceable for tests.
#[enum_dispatch(StreamSinkTrait)]
#[derive(Clone)]
pub enum StreamSink {
    Console(ConsoleSink),
    Memory(MemorySink),
}

#[derive(Clone, Copy)]
pub struct ConsoleSink {
    target: ConsoleTarget,
}

impl ConsoleSink {
    pub fn new(target: ConsoleTarget) -> Self {
        Self { target }
    }
}

impl StreamSinkTrait for ConsoleSink {
    #[inline]
    fn emit(&self, level: LogLevel, line: &str, colors: bool) {
        // Build the whole line first, so concurrent callers do not interleave
        let buf = if colors {
            format!("{}{}{}\n", level.color().ansi_code(), line, ANSI_RESET)
        } else {
            format!("{}\n", line)
        };
        let _ = match self.target {
            ConsoleTarget::Stdout => std::io::stdout().lock().write_all(buf.as_bytes()),
            ConsoleTarget::Stderr => std::io::stderr().lock().write_all(buf.as_bytes()),
        };
    }
}

/// Captures emitted lines in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl StreamSinkTrait for MemorySink {
    fn emit(&self, level: LogLevel, line: &str, colors: bool) {
        let line = if colors {
            format!("{}{}{}", level.color().ansi_code(), line, ANSI_RESET)
        } else {
            line.to_string()
        };
        self.lines.lock().push((level, line));
    }
}
