//! Document conversion.
//!
//! Maps an [`Operation`] to the converter that performs it:
//!
//! - Word to PDF through LibreOffice, one file at a time
//! - PDF to JPG through poppler, one file per CPU
//!
//! Tool paths, render settings and parallelism come from [`Config`].

use crate::config::{Config, ConversionConfig};
use anyhow::{Context, Result};
use docbatch_common::Operation;
use docbatch_convert::{Converter, PdfToImage, RenderSettings, WordToPdf};
use std::path::Path;

/// Build the converter for `operation`, writing into `output_dir`.
pub fn build_converter(
    operation: Operation,
    output_dir: &Path,
    config: &Config,
) -> Result<Box<dyn Converter>> {
    let converter: Box<dyn Converter> = match operation {
        Operation::WordToPdf => Box::new(
            WordToPdf::with_tool(output_dir, config.tools.soffice.as_deref())
                .context("Word to PDF needs LibreOffice (soffice)")?,
        ),
        Operation::PdfToImage => {
            let settings = RenderSettings {
                dpi: config.image.dpi,
                jpeg_quality: config.image.jpeg_quality,
            };
            Box::new(
                PdfToImage::with_tools(
                    output_dir,
                    settings,
                    config.tools.pdfinfo.as_deref(),
                    config.tools.pdftoppm.as_deref(),
                )
                .context("PDF to JPG needs poppler (pdfinfo, pdftoppm)")?,
            )
        }
    };

    tracing::debug!("Using {} converter", converter.name());
    Ok(converter)
}

/// Parallelism for `operation`: command line, then config, then the
/// operation's default.
pub fn max_concurrency(
    operation: Operation,
    config: &ConversionConfig,
    cli_override: Option<usize>,
) -> usize {
    let configured = match operation {
        Operation::WordToPdf => config.word_max_concurrency,
        Operation::PdfToImage => config.pdf_max_concurrency,
    };

    cli_override
        .or(configured)
        .unwrap_or_else(|| operation.default_max_concurrency())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_concurrency_precedence() {
        let mut config = ConversionConfig::default();
        assert_eq!(max_concurrency(Operation::WordToPdf, &config, None), 1);
        assert_eq!(
            max_concurrency(Operation::PdfToImage, &config, None),
            Operation::PdfToImage.default_max_concurrency()
        );

        config.pdf_max_concurrency = Some(2);
        assert_eq!(max_concurrency(Operation::PdfToImage, &config, None), 2);
        assert_eq!(max_concurrency(Operation::PdfToImage, &config, Some(5)), 5);
        assert_eq!(max_concurrency(Operation::WordToPdf, &config, None), 1);
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let mut config = Config::default();
        config.tools.soffice = Some("/nonexistent/soffice".into());
        if docbatch_convert::require_tool("soffice").is_ok() {
            return;
        }
        let err = build_converter(Operation::WordToPdf, Path::new("/tmp"), &config)
            .err()
            .expect("soffice should be missing");
        assert!(format!("{:#}", err).contains("soffice"));
    }
}
