use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures inside the logger.
///
/// The logging entry points never return these to the caller, they are reported on the
/// [SideChannel](crate::SideChannel) instead. Setup functions do return them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to create log directory {path:?}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    #[error("failed to rotate {from:?} to {to:?}: {source}")]
    Rotation { from: PathBuf, to: PathBuf, source: io::Error },

    #[error("failed to write {path:?}: append: {append}, fallback: {fallback}")]
    Write { path: PathBuf, append: io::Error, fallback: Box<Error> },

    #[error("invalid config: {0}")]
    Config(String),

    #[error("global logger cannot be initialized twice when dynamic is false")]
    AlreadyInitialized,

    #[error("log writer thread has exited")]
    ChannelClosed,
}
