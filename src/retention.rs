use crate::side_channel::SideChannel;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

struct Archive {
    path: PathBuf,
    name: String,
    created: SystemTime,
}

/// Archived logs of `base` in `dir`, named `{base}_{YYYY-MM-DDTHH-MM-SSZ}.log` with an
/// optional `_{n}` before the extension. Other logs sharing the prefix are left alone.
///
/// Sorted oldest first by creation time. Posix filesystems may lack a birth time, so mtime is
/// the fallback, and UNIX_EPOCH when neither is readable. Ties are ordered by name.
pub fn list_archives(dir: &Path, base: &str) -> Vec<PathBuf> {
    scan(dir, base).into_iter().map(|a| a.path).collect()
}

fn scan(dir: &Path, base: &str) -> Vec<Archive> {
    let re = match archive_pattern(base) {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut archives: Vec<Archive> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !re.is_match(&name) {
                return None;
            }
            let created = entry
                .metadata()
                .ok()
                .and_then(|mt| mt.created().or_else(|_| mt.modified()).ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            Some(Archive { path: entry.path(), name, created })
        })
        .collect();
    archives.sort_by(|a, b| a.created.cmp(&b.created).then_with(|| a.name.cmp(&b.name)));
    archives
}

fn archive_pattern(base: &str) -> Result<Regex, regex::Error> {
    let pattern = format!(
        r"^{}_\d{{4}}-\d{{2}}-\d{{2}}T\d{{2}}-\d{{2}}-\d{{2}}Z(_\d+)?\.log$",
        regex::escape(base)
    );
    Regex::new(&pattern)
}

/// Delete the oldest archives of `base` so that at most `max_files` remain.
///
/// A file that can not be removed is skipped, and noted on the side channel.
/// Returns the number of files removed.
pub fn cleanup(dir: &Path, base: &str, max_files: usize, side: &SideChannel) -> usize {
    let archives = scan(dir, base);
    if archives.len() <= max_files {
        return 0;
    }
    let excess = archives.len() - max_files;
    let mut removed = 0;
    for archive in archives.iter().take(excess) {
        match fs::remove_file(&archive.path) {
            Ok(_) => removed += 1,
            Err(e) => {
                side.report(&format!("note: cannot remove old log {:?}: {}", archive.path, e));
            }
        }
    }
    removed
}
