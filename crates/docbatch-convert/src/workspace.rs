//! Staging directories for conversion output.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Staging area for one conversion.
///
/// Tools write into a hidden temporary directory created inside the output
/// directory, so finalizing is a same-filesystem rename and a failed
/// conversion never leaves partial files behind.
///
/// # Example
///
/// ```no_run
/// use docbatch_convert::Workspace;
///
/// let workspace = Workspace::new("/out")?;
/// // let a tool write workspace.temp_file("letter.pdf") ...
/// workspace.finalize("letter.pdf", "/out/letter.pdf")?;
/// # Ok::<(), docbatch_convert::Error>(())
/// ```
pub struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    /// Create a staging directory inside `output_dir`.
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let temp_dir = tempfile::Builder::new()
            .prefix(".docbatch-")
            .tempdir_in(output_dir.as_ref())
            .map_err(|e| Error::Workspace(e.to_string()))?;

        Ok(Self { temp_dir })
    }

    /// Get the temp directory path.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a temp file path with the given name.
    pub fn temp_file(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Move a staged file to its final destination, replacing any existing file.
    pub fn finalize(&self, name: &str, destination: impl AsRef<Path>) -> Result<PathBuf> {
        let staged = self.temp_file(name);
        let dest = destination.as_ref();

        if !staged.exists() {
            return Err(Error::MissingOutput { path: staged });
        }

        if dest.exists() {
            std::fs::remove_file(dest).map_err(|e| {
                Error::Workspace(format!("Failed to replace existing {:?}: {}", dest, e))
            })?;
        }

        std::fs::rename(&staged, dest).map_err(|e| {
            Error::Workspace(format!("Failed to move output to destination: {}", e))
        })?;

        Ok(dest.to_path_buf())
    }
}
