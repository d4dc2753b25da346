#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const TEST_LOCK_FILE: &str = "/tmp/logbook_test_lock";

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
#[allow(unused_imports)]
pub(crate) use lock_file;

pub fn test_dir(name: &str) -> PathBuf {
    let dir = Path::new("/tmp/logbook_it").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create test dir");
    dir
}

pub fn read_lines<P: AsRef<Path>>(path: P) -> Vec<String> {
    fs::read_to_string(path).unwrap().lines().map(|l| l.to_string()).collect()
}
