use crate::{
    config::Config,
    error::{Error, Result},
    log_impl::FileSinkTrait,
    rotation::Rotator,
    side_channel::SideChannel,
};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

lazy_static! {
    // One lock per target path, shared by every writer in the process.
    static ref PATH_LOCKS: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>> = Mutex::new(HashMap::new());
}

/// The lock serializing rotate and write on `path`.
pub(crate) fn path_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    PATH_LOCKS.lock().entry(key).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
}

pub(crate) fn open_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().append(true).create(true).open(path)
}

/// Whether the open handle `f` is still the file found at `path`.
pub(crate) fn is_same_file(f: &File, path: &Path) -> bool {
    match (f.metadata(), fs::metadata(path)) {
        (Ok(a), Ok(b)) => same_inode(&a, &b),
        _ => false,
    }
}

#[cfg(unix)]
#[inline]
fn same_inode(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
#[inline]
fn same_inode(_a: &fs::Metadata, _b: &fs::Metadata) -> bool {
    true
}

/// Replace `path` with its current content plus `buf`, through a temp file and a rename.
/// Creates missing parent directories.
pub(crate) fn atomic_append(path: &Path, buf: &[u8]) -> Result<()> {
    let file_name = match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => return Err(Error::Config(format!("log path {:?} has no file name", path))),
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if let Err(e) = fs::create_dir_all(&dir) {
        return Err(Error::CreateDirectory { path: dir, source: e });
    }
    let mut content = match fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e.into()),
    };
    content.extend_from_slice(buf);
    let tmp = dir.join(format!(".{}.{}.tmp", file_name, std::process::id()));
    if let Err(e) = fs::write(&tmp, &content) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

/// Appends lines to the configured log file, rotating it first when needed.
///
/// Keeps the append handle open between writes. The handle is dropped when the path changes,
/// the file is rotated or removed, or on [FileWriter::reopen].
pub(crate) struct FileWriter {
    path: Option<PathBuf>,
    f: Option<File>,
    // when we created the active file, for filesystems without birth time
    birth: Option<SystemTime>,
    rotator: Rotator,
    side: SideChannel,
}

impl FileWriter {
    pub fn new(side: SideChannel) -> Self {
        Self { path: None, f: None, birth: None, rotator: Rotator::default(), side }
    }

    #[cfg(test)]
    pub(crate) fn with_rotator(side: SideChannel, rotator: Rotator) -> Self {
        Self { path: None, f: None, birth: None, rotator, side }
    }

    pub fn reopen(&mut self) {
        self.f = None;
    }

    /// Rotate if needed, then append `line` and a newline to `config.file_path`.
    ///
    /// Never fails: rotation errors are reported and the line goes to the unrotated file, write
    /// errors are reported and the line is dropped.
    pub fn write_line(&mut self, line: &str, config: &Config) {
        let path = config.file_path.as_path();
        let lock = path_lock(path);
        let _guard = lock.lock();

        if self.path.as_deref() != Some(path) {
            self.f = None;
            self.birth = None;
            self.path = Some(path.to_path_buf());
        }
        match self.rotator.check_rotate(path, self.birth, &config.rotation, &self.side) {
            Ok(Some(_archive)) => {
                self.f = None;
                self.birth = None;
            }
            Ok(None) => {}
            Err(e) => self.side.report(&e.to_string()),
        }
        if let Some(f) = self.f.as_ref() {
            // removed, or rotated and recreated by another writer of the same path
            if !is_same_file(f, path) {
                self.f = None;
                self.birth = None;
            }
        }

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        if let Err(append_err) = self.append(path, buf.as_bytes()) {
            self.f = None;
            let existed = path.exists();
            match atomic_append(path, buf.as_bytes()) {
                Ok(()) => {
                    if !existed {
                        self.birth = Some(SystemTime::now());
                    }
                }
                Err(fallback_err) => {
                    let e = Error::Write {
                        path: path.to_path_buf(),
                        append: append_err,
                        fallback: Box::new(fallback_err),
                    };
                    self.side.report(&format!("{}, message dropped", e));
                }
            }
        }
    }

    fn append(&mut self, path: &Path, buf: &[u8]) -> io::Result<()> {
        let f = match self.f.take() {
            Some(f) => f,
            None => {
                let existed = path.exists();
                let f = open_file(path)?;
                if !existed {
                    self.birth = Some(SystemTime::now());
                }
                f
            }
        };
        self.f.insert(f).write_all(buf)
    }
}

/// File sink writing on the caller's thread.
pub(crate) struct SyncFileSink {
    writer: Mutex<FileWriter>,
}

impl SyncFileSink {
    pub fn new(side: SideChannel) -> Self {
        Self { writer: Mutex::new(FileWriter::new(side)) }
    }
}

impl FileSinkTrait for SyncFileSink {
    #[inline]
    fn write(&self, line: String, config: &Arc<Config>) {
        self.writer.lock().write_line(&line, config);
    }

    fn reopen(&self) {
        self.writer.lock().reopen();
    }

    fn flush(&self) {}
}
