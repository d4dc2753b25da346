use std::fs;
use std::path::{Path, PathBuf};

pub const TEST_LOCK_FILE: &str = "/tmp/logbook_test_lock";

pub const TEST_ROOT: &str = "/tmp/logbook_test";

macro_rules! lock_file {
    () => {
        // NOTE: use one {} to expose the guard into context
        let lock_fd = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .open(&TEST_LOCK_FILE)
            .unwrap();
        let _guard = fmutex::lock_exclusive(&lock_fd).unwrap();
    };
}
pub(super) use lock_file;

/// A fresh empty directory for one test.
pub fn test_dir(name: &str) -> PathBuf {
    let dir = Path::new(TEST_ROOT).join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create test dir");
    dir
}

/// Sorted file names in `dir`.
pub fn file_names<P: AsRef<Path>>(dir: P) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn read_lines<P: AsRef<Path>>(path: P) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(|l| l.to_string()).collect()
}
