//! Local destinations for received files.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Opens the writable sink for a requested filename.
pub trait SinkProvider {
    type Sink: Write;

    /// Where the sink for `name` lives.
    fn locate(&self, name: &str) -> PathBuf;

    /// Creates (or truncates) the sink at `path`.
    fn create(&self, path: &Path) -> io::Result<Self::Sink>;
}

/// Files written into a single directory, named after the request.
#[derive(Debug, Clone)]
pub struct DirSinks {
    dir: PathBuf,
}

impl DirSinks {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Sinks placed next to the running executable.
    pub fn beside_executable() -> io::Result<Self> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(dir))
    }

    #[allow(dead_code)]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SinkProvider for DirSinks {
    type Sink = File;

    fn locate(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn create(&self, path: &Path) -> io::Result<File> {
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
    }
}
