use crate::{
    async_file_impl::AsyncFileSink,
    config::{Builder, Config},
    console_impl::{ConsoleSink, StreamSink, StreamSinkTrait},
    error::{Error, Result},
    file_impl::SyncFileSink,
    formatter::LogEvent,
    level::LogLevel,
    side_channel::SideChannel,
    time::Timer,
};
use arc_swap::{ArcSwap, ArcSwapOption};
use backtrace::Backtrace;
use lazy_static::lazy_static;
use log::{Log, Metadata, Record};
use parking_lot::{Mutex, RwLock};
use signal_hook::iterator::Signals;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::thread;

#[enum_dispatch]
pub(crate) trait FileSinkTrait {
    fn write(&self, line: String, config: &Arc<Config>);

    fn reopen(&self);

    fn flush(&self);
}

#[enum_dispatch(FileSinkTrait)]
pub(crate) enum FileSink {
    Sync(SyncFileSink),
    Async(AsyncFileSink),
}

fn build_file_sink(config: &Config, side: &SideChannel) -> FileSink {
    if config.asynchronous {
        match AsyncFileSink::new(side.clone()) {
            Ok(sink) => return sink.into(),
            Err(e) => {
                side.report(&format!("cannot start log writer thread, write synchronously: {}", e))
            }
        }
    }
    SyncFileSink::new(side.clone()).into()
}

/// Formats events and sends them to the console and the log file.
///
/// Calls never fail: problems with the log file are reported on the [SideChannel] and the
/// message may be lost.
pub struct Logger {
    config: ArcSwap<Config>,
    file: ArcSwap<FileSink>,
    sink: Option<StreamSink>,
    side: SideChannel,
    reconfig_lock: Mutex<()>,
    // Held shared around each file write, exclusive while the file sink is replaced.
    sink_switch: RwLock<()>,
}

impl Logger {
    pub fn new(config: Config, sink: Option<StreamSink>, side: SideChannel) -> Result<Self> {
        config.validate()?;
        let file = build_file_sink(&config, &side);
        Ok(Self {
            config: ArcSwap::new(Arc::new(config)),
            file: ArcSwap::new(Arc::new(file)),
            sink,
            side,
            reconfig_lock: Mutex::new(()),
            sink_switch: RwLock::new(()),
        })
    }

    /// Snapshot of the current config.
    #[inline]
    pub fn config(&self) -> Arc<Config> {
        self.config.load_full()
    }

    #[inline]
    pub fn side_channel(&self) -> &SideChannel {
        &self.side
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.config.load().level
    }

    /// Replace the config. Lines already queued keep the config they were logged with.
    pub fn reconfigure(&self, config: Config) -> Result<()> {
        config.validate()?;
        let _guard = self.reconfig_lock.lock();
        let old = self.config.load_full();
        if old.asynchronous != config.asynchronous {
            let new_file = build_file_sink(&config, &self.side);
            // Writers wait until the old sink is drained, so a thread's lines stay in order
            // across the switch.
            let _switch = self.sink_switch.write();
            let old_file = self.file.swap(Arc::new(new_file));
            old_file.flush();
        }
        self.config.store(Arc::new(config));
        Ok(())
    }

    pub fn log(&self, event: &LogEvent) {
        let config = self.config.load_full();
        if event.level < config.level {
            return;
        }
        let line = config.format.render(event, &Timer::new());
        self.dispatch(event.level, line, &config);
    }

    /// Log a line which is already formatted, for producers like a crash handler.
    pub fn log_line(&self, level: LogLevel, line: &str) {
        let config = self.config.load_full();
        if level < config.level {
            return;
        }
        self.dispatch(level, line.to_string(), &config);
    }

    #[inline]
    fn dispatch(&self, level: LogLevel, line: String, config: &Arc<Config>) {
        if let Some(sink) = self.sink.as_ref() {
            sink.emit(level, &line, config.ansi_colors);
        } else if let Some(target) = config.console {
            ConsoleSink::new(target).emit(level, &line, config.ansi_colors);
        }
        if config.log_to_file {
            let _switch = self.sink_switch.read();
            self.file.load().write(line, config);
        }
    }

    /// Wait for the background writer to catch up. No-op in synchronous mode.
    pub fn flush(&self) {
        self.file.load().flush();
    }

    /// Close the log file, the next write opens the configured path again.
    pub fn reopen(&self) {
        self.file.load().reopen();
    }
}

/// Global static structure to hold the logger
struct GlobalLogger {
    inner: ArcSwapOption<Logger>,
}

#[derive(Default)]
struct SetupState {
    // set_logger() succeeded
    registered: bool,
    // a logger with dynamic==false is installed
    locked: bool,
    signals_started: bool,
}

lazy_static! {
    static ref GLOBAL_LOGGER: GlobalLogger = GlobalLogger { inner: ArcSwapOption::new(None) };
    // Only locked on setup, logging goes through the ArcSwap.
    static ref SETUP_STATE: Mutex<SetupState> = Mutex::new(SetupState::default());
}

impl Log for GlobalLogger {
    fn enabled(&self, m: &Metadata) -> bool {
        match self.inner.load().as_ref() {
            Some(logger) => logger.enabled(m.level().into()),
            None => false,
        }
    }

    fn log(&self, r: &Record) {
        let guard = self.inner.load();
        if let Some(logger) = guard.as_ref() {
            let level: LogLevel = r.level().into();
            if !logger.enabled(level) {
                return;
            }
            let msg = match r.args().as_str() {
                Some(s) => Cow::Borrowed(s),
                None => Cow::Owned(r.args().to_string()),
            };
            let event = LogEvent {
                level,
                category: r.target(),
                message: &msg,
                file: r.file().unwrap_or("<none>"),
                line: r.line().unwrap_or(0),
            };
            logger.log(&event);
        }
    }

    fn flush(&self) {
        if let Some(logger) = self.inner.load().as_ref() {
            logger.flush();
        }
    }
}

/// The installed global logger, if any.
pub fn global() -> Option<Arc<Logger>> {
    GLOBAL_LOGGER.inner.load_full()
}

/// Replace the config of the global logger, and the `log` crate's max level with it.
pub fn reconfigure(config: Config) -> Result<()> {
    match global() {
        Some(logger) => {
            let max_level = config.level.to_level_filter();
            logger.reconfigure(config)?;
            log::set_max_level(max_level);
            Ok(())
        }
        None => Err(Error::Config("global logger is not setup".to_string())),
    }
}

#[doc(hidden)]
pub fn __private_api_log(
    level: LogLevel, category: &str, args: fmt::Arguments, file: &str, line: u32,
) {
    if let Some(logger) = GLOBAL_LOGGER.inner.load().as_ref() {
        if !logger.enabled(level) {
            return;
        }
        let msg = match args.as_str() {
            Some(s) => Cow::Borrowed(s),
            None => Cow::Owned(args.to_string()),
        };
        logger.log(&LogEvent { level, category, message: &msg, file, line });
    }
}

/// log handle for panic hook
#[doc(hidden)]
pub fn log_panic(info: &std::panic::PanicHookInfo) {
    let bt = Backtrace::new();
    let msg = format!("panic occur: {}\ntrace: {:?}", info, bt);
    let (file, line) = match info.location() {
        Some(loc) => (loc.file(), loc.line()),
        None => ("<none>", 0),
    };
    if let Some(logger) = global() {
        logger.log(&LogEvent { level: LogLevel::Fault, category: "panic", message: &msg, file, line });
        logger.flush();
    }
    eprint!("panic occur: {} at {:?}\ntrace: {:?}", info, info.location(), bt);
}

fn panic_and_exit_hook(info: &std::panic::PanicHookInfo) {
    log_panic(info);
    std::process::exit(exitcode::IOERR);
}

fn panic_no_exit_hook(info: &std::panic::PanicHookInfo) {
    log_panic(info);
    eprint!("not debug version, so don't exit process");
}

/// Initialize global logger from Builder
pub fn setup_log(builder: Builder) -> Result<()> {
    let mut state = SETUP_STATE.lock();
    if state.locked {
        return Err(Error::AlreadyInitialized);
    }
    let logger = builder.build_logger()?;
    if !state.registered {
        if log::set_logger(&*GLOBAL_LOGGER).is_err() {
            return Err(Error::Config("another logger is installed for the log crate".to_string()));
        }
        state.registered = true;
    }
    if let Some(old) = GLOBAL_LOGGER.inner.swap(Some(Arc::new(logger))) {
        old.flush();
    }
    log::set_max_level(builder.config.level.to_level_filter());
    if !builder.dynamic {
        state.locked = true;
    }
    if builder.panic {
        if builder.continue_when_panic {
            std::panic::set_hook(Box::new(panic_no_exit_hook));
        } else {
            std::panic::set_hook(Box::new(panic_and_exit_hook));
        }
    }
    if builder.rotation_signals.len() > 0 && !state.signals_started {
        let mut signals = Signals::new(&builder.rotation_signals)?;
        thread::spawn(move || {
            for _sig in signals.forever() {
                if let Some(logger) = global() {
                    logger.reopen();
                }
            }
        });
        state.signals_started = true;
    }
    Ok(())
}
