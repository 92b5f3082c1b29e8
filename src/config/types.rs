use docbatch_common::FailureReporting;
use docbatch_convert::ToolPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolsConfig,

    #[serde(default)]
    pub conversion: ConversionConfig,

    #[serde(default)]
    pub image: ImageConfig,
}

/// Explicit tool locations. Unset tools are looked up on PATH.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub soffice: Option<PathBuf>,

    #[serde(default)]
    pub pdfinfo: Option<PathBuf>,

    #[serde(default)]
    pub pdftoppm: Option<PathBuf>,
}

impl ToolsConfig {
    pub fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            soffice: self.soffice.clone(),
            pdfinfo: self.pdfinfo.clone(),
            pdftoppm: self.pdftoppm.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Default output directory (`~` is expanded). Falls back to the desktop.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Whether a failed conversion shows as `failed` (strict) or, as the
    /// desktop tool always did, `succeeded` (legacy).
    #[serde(default)]
    pub failure_reporting: FailureReporting,

    /// Override for Word to PDF parallelism (default: 1)
    #[serde(default)]
    pub word_max_concurrency: Option<usize>,

    /// Override for PDF to JPG parallelism (default: CPU count)
    #[serde(default)]
    pub pdf_max_concurrency: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImageConfig {
    #[serde(default = "default_dpi")]
    pub dpi: u32,

    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

fn default_dpi() -> u32 {
    300
}
fn default_jpeg_quality() -> u8 {
    100
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}
