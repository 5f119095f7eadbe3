//! File-level optimizer errors.
//!
//! Expression-level failures never surface here; only I/O does.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl OptimizeError {
    /// The file the failed operation touched.
    pub fn path(&self) -> &Path {
        match self {
            OptimizeError::Read { path, .. } | OptimizeError::Write { path, .. } => path,
        }
    }
}
