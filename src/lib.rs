//! A leveled and categorized logger for applications.
//!
//! Every event is rendered through a line template, printed to the console and appended to a
//! log file. Before each write the file is checked against a size and an age limit; when
//! either is reached it is renamed to `{base}_{YYYY-MM-DDTHH-MM-SSZ}.log` next to it, and the
//! oldest archives beyond a configured count are deleted.
//!
//! Logging never fails the caller. Problems with the log file itself are reported on a
//! [SideChannel], never on the log.
//!
//! # Example
//!
//! ``` rust
//! use logbook::*;
//! use std::time::Duration;
//!
//! let logger = Builder::new()
//!     .level(LogLevel::Debug)
//!     .file("/tmp/logbook_doc/app.log")
//!     .console(None)
//!     .format(LogFormat::new("{timestamp} {level} {category} {message}", 7, 6))
//!     .rotation(Rotation { max_size: 5_000_000, max_age: Duration::from_secs(86400), max_files: 5 })
//!     .build_logger()
//!     .expect("logger");
//! logger.log(&LogEvent::new(LogLevel::Info, "Net", "connected").location(file!(), line!()));
//! ```
//!
//! Use [Builder::build()] instead to install it for the `log` crate macros, the `target` of a
//! record becomes its category.

extern crate log;
extern crate signal_hook;

#[macro_use]
extern crate enum_dispatch;

mod async_file_impl;
mod config;
mod console_impl;
mod env;
mod error;
mod file_impl;
mod formatter;
mod level;
mod log_impl;
mod parser;
mod retention;
mod rotation;
mod side_channel;
mod time;

pub mod macros;
pub mod recipe;

pub use self::{
    config::{Builder, Config},
    console_impl::{ConsoleSink, ConsoleTarget, MemorySink, StreamSink},
    env::{env_or, EnvVarDefault},
    error::{Error, Result},
    formatter::{basename, pad, LogEvent, LogFormat, DEFAULT_FORMAT},
    level::{Color, LogLevel},
    log_impl::{__private_api_log, global, log_panic, reconfigure, setup_log, Logger},
    parser::{parse_log, LogParser},
    retention::{cleanup, list_archives},
    rotation::{FileMeta, Rotation},
    side_channel::SideChannel,
    time::{Timer, ARCHIVE_TIME, ISO_TIME},
};

#[cfg(test)]
mod tests;
