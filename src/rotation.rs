use crate::error::{Error, Result};
use crate::retention;
use crate::side_channel::SideChannel;
use crate::time::{Timer, ARCHIVE_TIME};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Log rotation configuration.
///
/// `max_size` and `max_age` are independent triggers, the log rotates as soon as either one is
/// reached. A value of zero disables that trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation {
    /// Rotate when the active file has at least this many bytes.
    pub max_size: u64,
    /// Rotate when the active file was created at least this long ago.
    pub max_age: Duration,
    /// How many archived logs survive a cleanup.
    pub max_files: usize,
}

impl Default for Rotation {
    fn default() -> Self {
        Self { max_size: 10 * 1024 * 1024, max_age: Duration::from_secs(24 * 60 * 60), max_files: 5 }
    }
}

impl Rotation {
    pub fn by_size(size_limit: u64, max_files: usize) -> Self {
        Self { max_size: size_limit, max_age: Duration::ZERO, max_files }
    }

    pub fn by_age(age: Duration, max_files: usize) -> Self {
        Self { max_size: 0, max_age: age, max_files }
    }

    /// Never rotate.
    pub fn disabled() -> Self {
        Self { max_size: 0, max_age: Duration::ZERO, max_files: 0 }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.max_size > 0 || !self.max_age.is_zero()
    }

    /// Whether a file with this metadata must be rotated before the next write.
    ///
    /// Missing metadata never triggers its criterion.
    pub fn should_rotate(&self, meta: &FileMeta, now: SystemTime) -> bool {
        if !meta.exists {
            return false;
        }
        if self.max_size > 0 {
            if let Some(size) = meta.size {
                if size >= self.max_size {
                    return true;
                }
            }
        }
        if !self.max_age.is_zero() {
            if let Some(created) = meta.created {
                // A creation time in the future (clock stepped back) counts as age zero
                let age = now.duration_since(created).unwrap_or(Duration::ZERO);
                if age >= self.max_age {
                    return true;
                }
            }
        }
        false
    }
}

/// What the rotation check needs to know about the active file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileMeta {
    pub exists: bool,
    pub size: Option<u64>,
    pub created: Option<SystemTime>,
}

impl FileMeta {
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn new(size: u64, created: SystemTime) -> Self {
        Self { exists: true, size: Some(size), created: Some(created) }
    }

    /// Fill in a missing creation time, for filesystems without birth time.
    ///
    /// Only applies when the rest of the metadata was readable.
    pub fn or_created(mut self, hint: Option<SystemTime>) -> Self {
        if self.exists && self.size.is_some() && self.created.is_none() {
            self.created = hint;
        }
        self
    }

    /// Stat `path`. Any error other than NotFound leaves both criteria unknown.
    pub fn stat(path: &Path) -> Self {
        match fs::metadata(path) {
            Ok(mt) => Self { exists: true, size: Some(mt.len()), created: mt.created().ok() },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::missing(),
            Err(_) => Self { exists: true, size: None, created: None },
        }
    }
}

pub(crate) type RenameFn = fn(&Path, &Path) -> io::Result<()>;

pub(crate) type StatFn = fn(&Path) -> FileMeta;

fn fs_rename(from: &Path, to: &Path) -> io::Result<()> {
    fs::rename(from, to)
}

/// Retires the active log by renaming it to `{base}_{time}.log` next to it, then enforces the
/// retention count. The next write recreates the active file.
pub(crate) struct Rotator {
    rename: RenameFn,
    stat: StatFn,
}

impl Default for Rotator {
    fn default() -> Self {
        Self { rename: fs_rename, stat: FileMeta::stat }
    }
}

impl Rotator {
    #[cfg(test)]
    pub(crate) fn with_rename(rename: RenameFn) -> Self {
        Self { rename, ..Default::default() }
    }

    #[cfg(test)]
    pub(crate) fn with_stat(stat: StatFn) -> Self {
        Self { stat, ..Default::default() }
    }

    /// Rotate `path` if `rotation` says so. Returns the archive path when rotated.
    pub fn check_rotate(
        &self, path: &Path, created_hint: Option<SystemTime>, rotation: &Rotation,
        side: &SideChannel,
    ) -> Result<Option<PathBuf>> {
        if !rotation.is_enabled() {
            return Ok(None);
        }
        let meta = (self.stat)(path).or_created(created_hint);
        if !rotation.should_rotate(&meta, SystemTime::now()) {
            return Ok(None);
        }
        self.rotate(path, &Timer::new(), rotation.max_files, side).map(Some)
    }

    pub fn rotate(
        &self, path: &Path, now: &Timer, max_files: usize, side: &SideChannel,
    ) -> Result<PathBuf> {
        let archive = archive_path(path, now);
        if let Err(e) = (self.rename)(path, &archive) {
            return Err(Error::Rotation { from: path.to_path_buf(), to: archive, source: e });
        }
        let (dir, base) = split_log_path(path);
        retention::cleanup(&dir, &base, max_files, side);
        Ok(archive)
    }
}

/// Directory and base name (file stem) of the active log.
pub(crate) fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let base = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "log".to_string());
    (dir, base)
}

/// First free name of `{base}_{time}.log`, then `{base}_{time}_{n}.log` for n = 1, 2, ...
pub(crate) fn archive_path(path: &Path, now: &Timer) -> PathBuf {
    let (dir, base) = split_log_path(path);
    let stamp = now.format(ARCHIVE_TIME).to_string();
    let mut candidate = dir.join(format!("{}_{}.log", base, stamp));
    let mut n = 1;
    while fs::symlink_metadata(&candidate).is_ok() {
        candidate = dir.join(format!("{}_{}_{}.log", base, stamp, n));
        n += 1;
    }
    candidate
}
