use parking_lot::Mutex;
use std::sync::Arc;

/// Where the logger reports its own failures (rotation, cleanup, write errors).
///
/// Never routed back into a [Logger](crate::Logger), so a broken log file can not cause
/// recursive logging.
#[derive(Clone)]
pub enum SideChannel {
    /// Print to stderr with a `logbook:` prefix.
    Stderr,
    /// Keep the diagnostics in memory, for tests.
    Memory(Arc<Mutex<Vec<String>>>),
}

impl Default for SideChannel {
    fn default() -> Self {
        Self::Stderr
    }
}

impl SideChannel {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(Mutex::new(Vec::new())))
    }

    pub fn report(&self, msg: &str) {
        match self {
            Self::Stderr => eprintln!("logbook: {}", msg),
            Self::Memory(buf) => buf.lock().push(msg.to_string()),
        }
    }

    /// Captured diagnostics, empty for [SideChannel::Stderr].
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Stderr => Vec::new(),
            Self::Memory(buf) => buf.lock().clone(),
        }
    }
}
