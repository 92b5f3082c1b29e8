//! Core type definitions for conversion batches.
//!
//! All enums serialize in kebab-case so they read naturally in TOML config
//! files and CLI arguments.

use crate::paths;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Conversion operation applied to every file of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Export Word documents (`.doc`, `.docx`) as PDF.
    WordToPdf,
    /// Rasterize every page of a PDF to JPEG images.
    #[serde(rename = "pdf-to-jpg", alias = "pdf-to-image")]
    PdfToImage,
}

impl Operation {
    /// All operations, in menu order.
    pub const ALL: [Operation; 2] = [Operation::WordToPdf, Operation::PdfToImage];

    /// Human readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::WordToPdf => "Word to PDF",
            Self::PdfToImage => "PDF to JPG",
        }
    }

    /// Input file extensions accepted by this operation.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::WordToPdf => paths::word_extensions(),
            Self::PdfToImage => paths::pdf_extensions(),
        }
    }

    /// Check whether `path` is a valid input for this operation.
    pub fn accepts(&self, path: &Path) -> bool {
        paths::has_extension(path, self.extensions())
    }

    /// Default number of files converted at the same time.
    ///
    /// The office engine is not reentrant, so Word conversions run one at a
    /// time. PDF rasterization uses every logical CPU.
    pub fn default_max_concurrency(&self) -> usize {
        match self {
            Self::WordToPdf => 1,
            Self::PdfToImage => num_cpus::get().max(1),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordToPdf => write!(f, "word-to-pdf"),
            Self::PdfToImage => write!(f, "pdf-to-jpg"),
        }
    }
}

impl std::str::FromStr for Operation {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "word-to-pdf" | "word2pdf" | "word转pdf" => Ok(Self::WordToPdf),
            "pdf-to-jpg" | "pdf-to-image" | "pdf2jpg" | "pdf转jpg" => Ok(Self::PdfToImage),
            _ => Err(crate::Error::UnknownOperation(s.to_string())),
        }
    }
}

/// Status of one conversion job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting for a worker.
    #[default]
    Pending,
    /// A worker is running the conversion.
    Processing,
    /// The conversion returned.
    Succeeded,
    /// The conversion raised an error.
    Failed,
}

impl JobStatus {
    /// Whether no further transition follows this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Label shown in the status grid.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// How a conversion error is reflected in a job's terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReporting {
    /// Every job ends `Succeeded`; a failure is only recorded as the job's
    /// error message. Matches the behaviour users of the desktop tool know.
    #[default]
    Legacy,
    /// A job whose conversion errors ends `Failed`.
    Strict,
}

impl FailureReporting {
    /// Terminal status for a job whose conversion returned `failed`.
    pub fn terminal_status(&self, failed: bool) -> JobStatus {
        match (self, failed) {
            (Self::Strict, true) => JobStatus::Failed,
            _ => JobStatus::Succeeded,
        }
    }
}

impl fmt::Display for FailureReporting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl std::str::FromStr for FailureReporting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "strict" => Ok(Self::Strict),
            _ => Err(format!("Invalid failure reporting policy: {}", s)),
        }
    }
}
