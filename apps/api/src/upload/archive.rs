//! Zip extraction into a scratch directory that never outlives the request.

use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::upload::materializer::MaterializeError;

const SCRATCH_PREFIX: &str = "extract-";
const EXTRACT_SUBDIR: &str = "extracted";

/// A uniquely named directory under the scratch root, removed when dropped.
///
/// Unlike a bare `TempDir`, removal failures are logged instead of swallowed.
pub struct ScratchDir {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchDir {
    pub fn create_in(root: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(root)?;
        debug!("Created scratch directory {}", dir.path().display());
        Ok(Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => debug!("Removed scratch directory {}", self.path.display()),
                Err(e) => warn!(
                    "Failed to remove scratch directory {}: {e}",
                    self.path.display()
                ),
            }
        }
    }
}

/// Unpacks `buffer` under `scratch` and returns the regular files at the top
/// level of the archive, sorted by path.
pub fn extract_archive(buffer: &[u8], scratch: &ScratchDir) -> Result<Vec<PathBuf>, MaterializeError> {
    let mut archive = ZipArchive::new(Cursor::new(buffer))?;

    let extract_dir = scratch.path().join(EXTRACT_SUBDIR);
    fs::create_dir_all(&extract_dir)?;
    archive.extract(&extract_dir)?;

    let mut files = Vec::new();
    for entry in fs::read_dir(&extract_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();

    debug!("Extracted {} top-level files", files.len());
    Ok(files)
}

/// First path whose file name ends with `suffix`.
pub fn first_with_suffix<'a>(files: &'a [PathBuf], suffix: &str) -> Option<&'a Path> {
    files
        .iter()
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(suffix))
        })
        .map(PathBuf::as_path)
}
