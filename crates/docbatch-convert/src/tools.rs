//! External tool detection and management.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// LibreOffice command-line entry point.
pub const SOFFICE: &str = "soffice";
/// Poppler PDF metadata tool.
pub const PDFINFO: &str = "pdfinfo";
/// Poppler PDF rasterizer.
pub const PDFTOPPM: &str = "pdftoppm";

/// Information about an external tool.
#[derive(Debug, Clone)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Explicit tool locations, usually from the `[tools]` config section.
///
/// A path that is set but does not exist is ignored and the tool is looked
/// up on PATH instead, the same rule the converters follow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolPaths {
    pub soffice: Option<PathBuf>,
    pub pdfinfo: Option<PathBuf>,
    pub pdftoppm: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use docbatch_convert::check_tool;
///
/// let info = check_tool("soffice");
/// if info.available {
///     println!("soffice version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str) -> ToolInfo {
    check_tool_with_arg(name, "--version")
}

/// Check if a tool is available using a custom version argument.
pub fn check_tool_with_arg(name: &str, version_arg: &str) -> ToolInfo {
    check_tool_at(name, None, version_arg)
}

/// Check the tool a converter would actually run: `configured` when it
/// exists, otherwise `name` on PATH.
///
/// Poppler tools print their version on stderr and some releases exit
/// non-zero for `-v`, so any successful spawn counts as available and the
/// version is taken from whichever stream has text.
pub fn check_tool_at(name: &str, configured: Option<&Path>, version_arg: &str) -> ToolInfo {
    let missing = ToolInfo {
        name: name.to_string(),
        available: false,
        version: None,
        path: None,
    };

    let Ok(path) = get_tool_path(name, configured) else {
        return missing;
    };

    match Command::new(&path).arg(version_arg).output() {
        Ok(output) => ToolInfo {
            name: name.to_string(),
            available: true,
            version: first_line(&output.stdout).or_else(|| first_line(&output.stderr)),
            path: Some(path),
        },
        Err(_) => missing,
    }
}

fn first_line(bytes: &[u8]) -> Option<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(|s| s.to_string())
}

/// Check all tools used by the converters.
///
/// Returns information about soffice, pdfinfo and pdftoppm, resolved the way
/// the converters resolve them.
pub fn check_tools(paths: &ToolPaths) -> Vec<ToolInfo> {
    vec![
        check_tool_at(SOFFICE, paths.soffice.as_deref(), "--version"),
        check_tool_at(PDFINFO, paths.pdfinfo.as_deref(), "-v"),
        check_tool_at(PDFTOPPM, paths.pdftoppm.as_deref(), "-v"),
    ]
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(
            "Configured path for {} does not exist: {:?}, falling back to PATH",
            name,
            path
        );
    }

    require_tool(name)
}

/// Run a prepared command and turn a non-zero exit into [`Error::ToolExited`].
pub(crate) fn run(tool: &str, cmd: &mut Command) -> Result<Output> {
    #[cfg(feature = "tracing")]
    tracing::debug!("Running {:?}", cmd);

    let output = cmd
        .output()
        .map_err(|e| Error::tool_failed(tool, e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::tool_exited(tool, output.status.code(), stderr.trim()));
    }

    Ok(output)
}
