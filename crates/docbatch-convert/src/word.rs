//! Word to PDF export through LibreOffice.

use crate::tools::{self, SOFFICE};
use crate::{Converter, Error, Result, Workspace};
use docbatch_common::paths;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Exports Word documents as PDF into a fixed output directory.
///
/// LibreOffice is not safe to run concurrently against one user profile, so
/// every conversion gets a throwaway profile inside its staging directory.
/// Batches still run Word conversions one at a time by default.
#[derive(Debug, Clone)]
pub struct WordToPdf {
    soffice: PathBuf,
    output_dir: PathBuf,
}

impl WordToPdf {
    /// Create a converter writing into `output_dir`, finding `soffice` on PATH.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_tool(output_dir, None)
    }

    /// Create a converter with an optional explicit `soffice` path.
    pub fn with_tool(output_dir: impl Into<PathBuf>, soffice: Option<&Path>) -> Result<Self> {
        Ok(Self {
            soffice: tools::get_tool_path(SOFFICE, soffice)?,
            output_dir: output_dir.into(),
        })
    }

    /// Output directory of this converter.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Where the PDF for `source` is written.
    pub fn output_path(&self, source: &Path) -> Result<PathBuf> {
        let stem = paths::file_stem(source)
            .ok_or_else(|| Error::InvalidInput(format!("no file name in {:?}", source)))?;
        Ok(self.output_dir.join(format!("{}.pdf", stem)))
    }
}

impl Converter for WordToPdf {
    fn name(&self) -> &str {
        "word-to-pdf"
    }

    fn convert(&self, source: &Path) -> Result<()> {
        if !source.exists() {
            return Err(Error::file_not_found(source));
        }

        // Office lock files and other hidden documents are left alone.
        if paths::is_hidden(source) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Skipping hidden file {:?}", source);
            return Ok(());
        }

        let destination = self.output_path(source)?;
        let staged_name = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidInput(format!("no file name in {:?}", destination)))?;

        let workspace = Workspace::new(&self.output_dir)?;
        let profile = workspace.temp_file("profile");

        let mut cmd = Command::new(&self.soffice);
        cmd.arg(format!("-env:UserInstallation={}", file_url(&profile)))
            .args(["--headless", "--norestore", "--nologo", "--convert-to", "pdf"])
            .arg("--outdir")
            .arg(workspace.temp_dir())
            .arg(source);
        tools::run(SOFFICE, &mut cmd)?;

        workspace.finalize(&staged_name, &destination)?;

        #[cfg(feature = "tracing")]
        tracing::info!("Exported {:?} -> {:?}", source, destination);

        Ok(())
    }
}

/// `file://` URL for a local path, the form LibreOffice expects for
/// `-env:UserInstallation`.
pub(crate) fn file_url(path: &Path) -> String {
    let raw = path.to_string_lossy().replace('\\', "/");
    if raw.starts_with('/') {
        format!("file://{}", raw)
    } else {
        format!("file:///{}", raw)
    }
}
