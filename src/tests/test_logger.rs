use super::utils::*;
use crate::recipe::LOG_FORMAT_PLAIN;
use crate::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn plain_builder(path: &Path) -> Builder {
    Builder::new()
        .level(LogLevel::Debug)
        .file(path)
        .console(None)
        .format(LogFormat::new(LOG_FORMAT_PLAIN, 7, 0))
        .rotation(Rotation::disabled())
}

/// Archives oldest first, then the active file.
fn all_lines(dir: &Path, base: &str, active: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for archive in list_archives(dir, base) {
        lines.extend(read_lines(archive));
    }
    if active.exists() {
        lines.extend(read_lines(active));
    }
    lines
}

#[test]
fn test_logger_level_threshold() {
    let dir = test_dir("logger_threshold");
    let path = dir.join("app.log");
    let mem = MemorySink::new();
    let logger = plain_builder(&path).level(LogLevel::Warning).sink(mem.clone()).build_logger().unwrap();

    for level in LogLevel::ALL {
        logger.log(&LogEvent::new(level, "Core", level.name()).location("src/core.rs", 3));
    }
    let expected = vec![
        "WARNING Core core.rs:3 WARNING",
        "ERROR   Core core.rs:3 ERROR",
        "FAULT   Core core.rs:3 FAULT",
    ];
    assert_eq!(read_lines(&path), expected);
    let console: Vec<String> = mem.lines().into_iter().map(|(_, line)| line).collect();
    assert_eq!(console, expected);
    assert!(logger.enabled(LogLevel::Error));
    assert!(!logger.enabled(LogLevel::Info));
}

#[test]
fn test_logger_log_line_preformatted() {
    let dir = test_dir("logger_log_line");
    let path = dir.join("app.log");
    let logger = plain_builder(&path).level(LogLevel::Info).build_logger().unwrap();

    logger.log_line(LogLevel::Fault, "fatal signal 11");
    logger.log_line(LogLevel::Debug, "filtered");
    assert_eq!(read_lines(&path), vec!["fatal signal 11"]);
}

#[test]
fn test_logger_console_only() {
    let dir = test_dir("logger_console_only");
    let path = dir.join("app.log");
    let mem = MemorySink::new();
    let logger = plain_builder(&path).no_file().sink(mem.clone()).ansi_colors(true).build_logger().unwrap();

    logger.log(&LogEvent::new(LogLevel::Warning, "Ui", "careful"));
    assert!(!path.exists());
    assert_eq!(mem.lines(), vec![(LogLevel::Warning, "\x1b[33mWARNING Ui <none>:0 careful\x1b[0m".to_string())]);
}

#[test]
fn test_logger_async_keeps_order() {
    let dir = test_dir("logger_async_order");
    let path = dir.join("app.log");
    let logger = plain_builder(&path).asynchronous(true).build_logger().unwrap();

    for i in 0..1000 {
        logger.log(&LogEvent::new(LogLevel::Info, "Seq", &format!("msg {}", i)));
    }
    logger.flush();
    let lines = read_lines(&path);
    assert_eq!(lines.len(), 1000);
    for (i, line) in lines.iter().enumerate() {
        assert_eq!(line, &format!("INFO    Seq <none>:0 msg {}", i));
    }
}

#[test]
fn test_logger_async_drains_on_drop() {
    let dir = test_dir("logger_async_drop");
    let path = dir.join("app.log");
    {
        let logger = plain_builder(&path).asynchronous(true).build_logger().unwrap();
        for i in 0..100 {
            logger.log(&LogEvent::new(LogLevel::Info, "Seq", &format!("msg {}", i)));
        }
    }
    assert_eq!(read_lines(&path).len(), 100);
}

fn run_concurrent(name: &str, asynchronous: bool) {
    const THREADS: usize = 8;
    const LINES: usize = 200;
    let dir = test_dir(name);
    let path = dir.join("app.log");
    let logger = Arc::new(
        plain_builder(&path)
            .asynchronous(asynchronous)
            .rotation(Rotation::by_size(4096, 10_000))
            .build_logger()
            .unwrap(),
    );

    let mut ths = Vec::new();
    for t in 0..THREADS {
        let logger = logger.clone();
        ths.push(thread::spawn(move || {
            let category = format!("T{}", t);
            for i in 0..LINES {
                logger.log(&LogEvent::new(LogLevel::Info, &category, &format!("{}", i)));
            }
        }));
    }
    for th in ths {
        th.join().unwrap();
    }
    logger.flush();

    assert!(list_archives(&dir, "app").len() > 1);
    assert!(logger.side_channel().messages().is_empty());
    let re = regex::Regex::new(r"^INFO    (T\d+) <none>:0 (\d+)$").unwrap();
    let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
    let mut total = 0;
    for file in list_archives(&dir, "app").iter().chain(std::iter::once(&path)) {
        // lines of one thread keep their order inside every file
        let mut last: HashMap<String, usize> = HashMap::new();
        for line in read_lines(file) {
            let caps = re.captures(&line).unwrap_or_else(|| panic!("broken line {:?}", line));
            let i: usize = caps[2].parse().unwrap();
            if let Some(prev) = last.insert(caps[1].to_string(), i) {
                assert!(prev < i);
            }
            seen.entry(caps[1].to_string()).or_default().push(i);
            total += 1;
        }
    }
    assert_eq!(total, THREADS * LINES);
    for (_, mut numbers) in seen {
        numbers.sort();
        assert_eq!(numbers, (0..LINES).collect::<Vec<_>>());
    }
}

#[test]
fn test_logger_concurrent_sync_rotation() {
    run_concurrent("logger_concurrent_sync", false);
}

#[test]
fn test_logger_concurrent_async_rotation() {
    run_concurrent("logger_concurrent_async", true);
}

#[test]
fn test_logger_retention() {
    let dir = test_dir("logger_retention");
    let path = dir.join("app.log");
    let logger = plain_builder(&path).rotation(Rotation::by_size(100, 3)).build_logger().unwrap();

    for i in 0..200 {
        logger.log(&LogEvent::new(LogLevel::Info, "R", &format!("{}", i)));
    }
    assert_eq!(list_archives(&dir, "app").len(), 3);
    let lines = all_lines(&dir, "app", &path);
    assert_eq!(lines.last().unwrap(), "INFO    R <none>:0 199");
}

#[test]
fn test_logger_reconfigure() {
    let dir = test_dir("logger_reconfigure");
    let first = dir.join("first.log");
    let second = dir.join("second.log");
    let logger = plain_builder(&first).build_logger().unwrap();

    logger.log(&LogEvent::new(LogLevel::Debug, "C", "one"));
    let mut config = (*logger.config()).clone();
    config.file_path = second.clone();
    config.asynchronous = true;
    config.level = LogLevel::Info;
    logger.reconfigure(config).unwrap();
    logger.log(&LogEvent::new(LogLevel::Debug, "C", "filtered"));
    logger.log(&LogEvent::new(LogLevel::Info, "C", "two"));
    logger.flush();

    assert_eq!(read_lines(&first), vec!["DEBUG   C <none>:0 one"]);
    assert_eq!(read_lines(&second), vec!["INFO    C <none>:0 two"]);
    assert!(logger.config().asynchronous);

    let mut bad = (*logger.config()).clone();
    bad.file_path = "".into();
    assert!(matches!(logger.reconfigure(bad), Err(Error::Config(_))));
    assert_eq!(logger.config().file_path, second);
}

#[test]
fn test_logger_write_failure_not_logged() {
    let dir = test_dir("logger_no_recursion");
    let blocker = dir.join("blocker");
    fs::write(&blocker, "").unwrap();
    let side = SideChannel::memory();
    let mem = MemorySink::new();
    let logger = plain_builder(&blocker.join("app.log"))
        .sink(mem.clone())
        .side_channel(side.clone())
        .build_logger()
        .unwrap();

    logger.log(&LogEvent::new(LogLevel::Error, "Disk", "first"));
    logger.log(&LogEvent::new(LogLevel::Error, "Disk", "second"));

    // the messages are lost, the diagnostics only reach the side channel
    assert_eq!(side.messages().len(), 2);
    let console: Vec<String> = mem.lines().into_iter().map(|(_, line)| line).collect();
    assert_eq!(console, vec!["ERROR   Disk <none>:0 first", "ERROR   Disk <none>:0 second"]);
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "");
}

#[test]
fn test_logger_invalid_config() {
    let result = Builder::new().file("").build_logger();
    assert!(matches!(result, Err(Error::Config(_))));
    // no file name needed when the file is off
    assert!(Builder::new().file("").no_file().console(None).build_logger().is_ok());
}

#[test]
fn test_logger_retention_spares_sibling_logs() {
    let dir = test_dir("logger_sibling");
    let server = plain_builder(&dir.join("app_server.log")).build_logger().unwrap();
    let app = plain_builder(&dir.join("app.log")).rotation(Rotation::by_size(1, 1)).build_logger().unwrap();

    server.log(&LogEvent::new(LogLevel::Info, "S", "up"));
    for i in 0..3 {
        app.log(&LogEvent::new(LogLevel::Info, "A", &format!("{}", i)));
    }
    assert_eq!(read_lines(dir.join("app_server.log")), vec!["INFO    S <none>:0 up"]);
    assert_eq!(list_archives(&dir, "app").len(), 1);
    assert_eq!(read_lines(dir.join("app.log")), vec!["INFO    A <none>:0 2"]);
}

#[test]
fn test_logger_mode_switch_keeps_order() {
    let dir = test_dir("logger_mode_switch");
    let path = dir.join("app.log");
    let logger =
        Arc::new(plain_builder(&path).format(LogFormat::new("{message}", 0, 0)).build_logger().unwrap());
    let stop = Arc::new(AtomicBool::new(false));

    let th = {
        let logger = logger.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            let mut i = 0usize;
            while i < 2000 || !stop.load(Ordering::Acquire) {
                logger.log(&LogEvent::new(LogLevel::Info, "S", &i.to_string()));
                i += 1;
            }
            i
        })
    };
    for n in 0..20 {
        let mut config = (*logger.config()).clone();
        config.asynchronous = n % 2 == 0;
        logger.reconfigure(config).unwrap();
        thread::sleep(Duration::from_millis(2));
    }
    stop.store(true, Ordering::Release);
    let total = th.join().unwrap();
    logger.flush();

    let lines = read_lines(&path);
    assert_eq!(lines, (0..total).map(|i| i.to_string()).collect::<Vec<_>>());
}
