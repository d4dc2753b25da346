//! The `log` crate has no level above error, [fault!()](crate::fault!()) fills the gap. Other
//! levels go through the usual `log::debug!()` .. `log::error!()`, with `target:` as category.

/// Log at any [LogLevel](crate::LogLevel) through the global logger.
///
/// # Examples:
///
/// ```
/// use logbook::*;
/// log_event!(LogLevel::Warning, "Net", "retry {} of {}", 1, 3);
/// ```
#[macro_export]
macro_rules! log_event {
    ($level:expr, $category:expr, $($arg:tt)+) => (
        $crate::__private_api_log(
            $level,
            $category,
            std::format_args!($($arg)+),
            std::file!(),
            std::line!(),
        )
    )
}

/// Log at [LogLevel::Fault](crate::LogLevel::Fault), for errors the process can not recover
/// from. The category defaults to the module path, like `log::error!()`.
///
/// # Examples:
///
/// ```
/// use logbook::*;
/// fault!("disk {} is gone", "/dev/sda");
/// fault!(target: "Storage", "journal corrupted");
/// ```
#[macro_export]
macro_rules! fault {
    (target: $target:expr, $($arg:tt)+) => (
        $crate::log_event!($crate::LogLevel::Fault, $target, $($arg)+)
    );
    ($($arg:tt)+) => (
        $crate::log_event!($crate::LogLevel::Fault, std::module_path!(), $($arg)+)
    )
}
