//! Transactional byte sinks.
//!
//! A sink collects bytes for one destination path. Nothing is visible at
//! that path until [`Sink::commit`] succeeds; dropping an uncommitted sink
//! throws the staged bytes away.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::{debug, warn};

pub trait Sink: Write {
    /// Publish the staged bytes at the destination path.
    fn commit(self) -> io::Result<()>;
}

/// Opens sinks by destination path.
pub trait SinkProvider {
    type Sink: Sink;

    fn open(&self, path: &Path) -> io::Result<Self::Sink>;
}

// ─────────────────────────────────────────────────────
// Files: stage next to the target, rename on commit
// ─────────────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct FileSinks;

pub struct FileSink {
    target: PathBuf,
    staging: PathBuf,
    file: Option<BufWriter<File>>,
    committed: bool,
}

/// Hidden sibling of `target` used while writing.
pub fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

impl SinkProvider for FileSinks {
    type Sink = FileSink;

    fn open(&self, path: &Path) -> io::Result<FileSink> {
        let staging = staging_path(path);
        let file = File::create(&staging)?;
        debug!("staging {} in {}", path.display(), staging.display());
        Ok(FileSink {
            target: path.to_path_buf(),
            staging,
            file: Some(BufWriter::new(file)),
            committed: false,
        })
    }
}

fn already_committed() -> io::Error {
    io::Error::other("sink already committed")
}

impl Write for FileSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.as_mut().ok_or_else(already_committed)?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.as_mut().ok_or_else(already_committed)?.flush()
    }
}

impl Sink for FileSink {
    fn commit(mut self) -> io::Result<()> {
        let writer = self.file.take().ok_or_else(already_committed)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        // on failure the staging file is left to Drop
        fs::rename(&self.staging, &self.target)?;
        self.committed = true;
        debug!("published {}", self.target.display());
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file = None;
        if let Err(e) = fs::remove_file(&self.staging) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("could not remove {}: {e}", self.staging.display());
            }
        }
    }
}

// ─────────────────────────────────────────────────────
// Memory: for embedding hosts and tests
// ─────────────────────────────────────────────────────

/// Keeps committed outputs in memory, keyed by path.
#[derive(Debug, Default, Clone)]
pub struct MemorySinks {
    files: Rc<RefCell<BTreeMap<PathBuf, Vec<u8>>>>,
    fail_on: Option<PathBuf>,
}

impl MemorySinks {
    /// A provider whose `open` fails for `path`, to exercise error paths.
    pub fn failing_on(path: impl Into<PathBuf>) -> Self {
        Self {
            fail_on: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }
}

pub struct MemorySink {
    path: PathBuf,
    buf: Vec<u8>,
    files: Rc<RefCell<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl SinkProvider for MemorySinks {
    type Sink = MemorySink;

    fn open(&self, path: &Path) -> io::Result<MemorySink> {
        if self.fail_on.as_deref() == Some(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "refused by test provider",
            ));
        }
        Ok(MemorySink {
            path: path.to_path_buf(),
            buf: Vec::new(),
            files: Rc::clone(&self.files),
        })
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink for MemorySink {
    fn commit(self) -> io::Result<()> {
        self.files.borrow_mut().insert(self.path, self.buf);
        Ok(())
    }
}
