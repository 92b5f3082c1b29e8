//! PDF to JPEG rasterization through poppler.

use crate::tools::{self, PDFINFO, PDFTOPPM};
use crate::{Converter, Error, Result, Workspace};
use docbatch_common::paths;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Rendering parameters for page images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSettings {
    /// Resolution in dots per inch (default: 300).
    pub dpi: u32,
    /// JPEG quality, 1-100 (default: 100).
    pub jpeg_quality: u8,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            dpi: 300,
            jpeg_quality: 100,
        }
    }
}

/// Extract the page count from `pdfinfo` output.
///
/// Looks for the `Pages:` line, e.g. `Pages:          12`.
pub fn parse_page_count(pdfinfo_output: &str) -> Option<u32> {
    pdfinfo_output
        .lines()
        .find_map(|line| line.trim_start().strip_prefix("Pages:"))
        .and_then(|value| value.trim().parse().ok())
}

/// File name of one rendered page.
///
/// The page number is zero-padded to the digit width of the page count, so a
/// 120 page `manual.pdf` yields `manual_001.jpg` .. `manual_120.jpg`.
///
/// ```
/// use docbatch_convert::page_file_name;
///
/// assert_eq!(page_file_name("manual", 7, 120), "manual_007.jpg");
/// assert_eq!(page_file_name("flyer", 1, 1), "flyer_1.jpg");
/// ```
pub fn page_file_name(stem: &str, page: u32, page_count: u32) -> String {
    let width = page_count.to_string().len();
    format!("{}_{:0width$}.jpg", stem, page, width = width)
}

/// Rasterizes PDFs into one sub-directory per document.
///
/// `/out/manual.pdf` with 12 pages produces `/out/manual/manual_01.jpg` ..
/// `/out/manual/manual_12.jpg`.
#[derive(Debug, Clone)]
pub struct PdfToImage {
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
    output_dir: PathBuf,
    settings: RenderSettings,
}

impl PdfToImage {
    /// Create a converter writing into `output_dir` with default settings,
    /// finding the poppler tools on PATH.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_tools(output_dir, RenderSettings::default(), None, None)
    }

    /// Create a converter with explicit settings and optional tool paths.
    pub fn with_tools(
        output_dir: impl Into<PathBuf>,
        settings: RenderSettings,
        pdfinfo: Option<&Path>,
        pdftoppm: Option<&Path>,
    ) -> Result<Self> {
        if settings.dpi == 0 {
            return Err(Error::InvalidInput("dpi must be greater than 0".into()));
        }
        if !(1..=100).contains(&settings.jpeg_quality) {
            return Err(Error::InvalidInput(format!(
                "jpeg quality must be between 1 and 100, got {}",
                settings.jpeg_quality
            )));
        }

        Ok(Self {
            pdfinfo: tools::get_tool_path(PDFINFO, pdfinfo)?,
            pdftoppm: tools::get_tool_path(PDFTOPPM, pdftoppm)?,
            output_dir: output_dir.into(),
            settings,
        })
    }

    /// Rendering settings in use.
    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    /// Directory that receives the pages of `source`.
    pub fn page_dir(&self, source: &Path) -> Result<PathBuf> {
        let stem = paths::file_stem(source)
            .ok_or_else(|| Error::InvalidInput(format!("no file name in {:?}", source)))?;
        Ok(self.output_dir.join(stem))
    }

    /// Number of pages in `source`, as reported by `pdfinfo`.
    pub fn page_count(&self, source: &Path) -> Result<u32> {
        let mut cmd = Command::new(&self.pdfinfo);
        cmd.arg(source);
        let output = tools::run(PDFINFO, &mut cmd)?;
        let stdout = String::from_utf8_lossy(&output.stdout);

        parse_page_count(&stdout).ok_or_else(|| Error::parse_error(PDFINFO, "no Pages: line"))
    }

    fn render_page(&self, source: &Path, page: u32, prefix: &Path) -> Result<()> {
        let mut cmd = Command::new(&self.pdftoppm);
        cmd.arg("-jpeg")
            .arg("-jpegopt")
            .arg(format!("quality={}", self.settings.jpeg_quality))
            .arg("-r")
            .arg(self.settings.dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-singlefile")
            .arg(source)
            .arg(prefix);
        tools::run(PDFTOPPM, &mut cmd)?;
        Ok(())
    }
}

impl Converter for PdfToImage {
    fn name(&self) -> &str {
        "pdf-to-jpg"
    }

    fn convert(&self, source: &Path) -> Result<()> {
        if !source.exists() {
            return Err(Error::file_not_found(source));
        }

        let page_dir = self.page_dir(source)?;
        let stem = paths::file_stem(source)
            .ok_or_else(|| Error::InvalidInput(format!("no file name in {:?}", source)))?;
        std::fs::create_dir_all(&page_dir)?;

        let page_count = self.page_count(source)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Rendering {} pages of {:?}", page_count, source);

        let workspace = Workspace::new(&page_dir)?;
        for page in 1..=page_count {
            let name = page_file_name(&stem, page, page_count);
            // pdftoppm appends the extension to the prefix itself.
            let prefix = workspace.temp_file(name.trim_end_matches(".jpg"));
            self.render_page(source, page, &prefix)?;
            workspace.finalize(&name, page_dir.join(&name))?;
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Rendered {} pages of {:?} into {:?}", page_count, source, page_dir);

        Ok(())
    }
}
