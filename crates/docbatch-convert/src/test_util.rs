//! Shell-script stand-ins for `soffice`, `pdfinfo` and `pdftoppm`.
//!
//! The scripts honour the parts of each tool's command line the converters
//! rely on, so conversions can run end to end without LibreOffice or poppler
//! installed. Unix only.

use crate::tools::ToolPaths;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

const SOFFICE_SCRIPT: &str = r#"#!/bin/sh
case "$1" in --version) echo "LibreOffice 0.0 stub"; exit 0;; esac
outdir=
while [ $# -gt 1 ]; do
  if [ "$1" = "--outdir" ]; then outdir=$2; fi
  shift
done
name=$(basename "$1")
printf 'pdf of %s' "$name" > "$outdir/${name%.*}.pdf"
"#;

/// Write an executable script `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> std::io::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, body)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// A set of stub tools installed in one directory.
#[derive(Debug, Clone)]
pub struct StubTools {
    pub soffice: PathBuf,
    pub pdfinfo: PathBuf,
    pub pdftoppm: PathBuf,
    pdftoppm_log: PathBuf,
}

impl StubTools {
    /// Install the stubs into `dir`. `pdfinfo` reports `pages` pages for
    /// every existing file.
    pub fn install(dir: &Path, pages: u32) -> std::io::Result<Self> {
        let pdftoppm_log = dir.join("pdftoppm.log");

        let pdfinfo = format!(
            r#"#!/bin/sh
case "$1" in -v) echo "pdfinfo version 0.0 stub" >&2; exit 0;; esac
[ -f "$1" ] || {{ echo "I/O Error: Couldn't open file '$1'" >&2; exit 1; }}
echo "Producer:        stub"
echo "Pages:           {pages}"
"#
        );

        let pdftoppm = format!(
            r#"#!/bin/sh
case "$1" in -v) echo "pdftoppm version 0.0 stub" >&2; exit 0;; esac
printf '%s\n' "$*" >> "{log}"
page=
while [ $# -gt 2 ]; do
  if [ "$1" = "-f" ]; then page=$2; fi
  shift
done
printf 'page %s of %s' "$page" "$(basename "$1")" > "$2.jpg"
"#,
            log = pdftoppm_log.display()
        );

        Ok(Self {
            soffice: write_script(dir, "soffice", SOFFICE_SCRIPT)?,
            pdfinfo: write_script(dir, "pdfinfo", &pdfinfo)?,
            pdftoppm: write_script(dir, "pdftoppm", &pdftoppm)?,
            pdftoppm_log,
        })
    }

    /// The stubs as configured tool paths.
    pub fn paths(&self) -> ToolPaths {
        ToolPaths {
            soffice: Some(self.soffice.clone()),
            pdfinfo: Some(self.pdfinfo.clone()),
            pdftoppm: Some(self.pdftoppm.clone()),
        }
    }

    /// Arguments of every `pdftoppm` render call so far, one line per call.
    pub fn pdftoppm_calls(&self) -> Vec<String> {
        std::fs::read_to_string(&self.pdftoppm_log)
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
