//! Conversion errors.
//!
//! Every variant names the tool or file involved, because the runner only
//! keeps the rendered message on the job.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Neither the configured path nor PATH has the executable.
    #[error("{tool} not found (configure [tools].{tool} or add it to PATH)")]
    ToolNotFound { tool: String },

    /// The tool could not be started at all.
    #[error("could not run {tool}: {message}")]
    ToolFailed { tool: String, message: String },

    /// The tool ran and exited unsuccessfully. `code` is `None` when it was
    /// killed by a signal.
    #[error("{tool} exited with {}: {stderr}", exit_label(.code))]
    ToolExited {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The tool's output did not have the expected shape.
    #[error("unexpected {tool} output: {message}")]
    ParseError { tool: String, message: String },

    #[error("source document not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// The tool reported success but left no file where it should have.
    #[error("{} was not produced", path.display())]
    MissingOutput { path: PathBuf },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Staging directory could not be created or its file moved into place.
    #[error("staging failed: {0}")]
    Workspace(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

impl Error {
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    pub fn tool_failed(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn tool_exited(
        tool: impl Into<String>,
        code: Option<i32>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ToolExited {
            tool: tool.into(),
            code,
            stderr: stderr.into(),
        }
    }

    pub fn parse_error(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status_in_message() {
        let err = Error::tool_exited(
            "pdftoppm",
            Some(99),
            "Syntax Error: Couldn't read xref table",
        );
        assert_eq!(
            err.to_string(),
            "pdftoppm exited with status 99: Syntax Error: Couldn't read xref table"
        );

        let err = Error::tool_exited("soffice", None, "");
        assert!(err.to_string().starts_with("soffice exited with a signal"));
    }

    #[test]
    fn test_not_found_mentions_config_key() {
        let err = Error::tool_not_found("pdfinfo");
        assert!(err.to_string().contains("[tools].pdfinfo"));
    }
}
