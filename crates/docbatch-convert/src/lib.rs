//! # docbatch-convert
//!
//! Document conversion backends for docbatch.
//!
//! The actual document work is delegated to external engines; this crate
//! locates them, drives them and stages their output:
//!
//! - [`WordToPdf`] exports `.doc`/`.docx` files to PDF through LibreOffice
//!   running headless (`soffice`).
//! - [`PdfToImage`] rasterizes every page of a PDF to JPEG through poppler
//!   (`pdfinfo` for the page count, `pdftoppm` for rendering).
//!
//! Both implement [`Converter`], as does any `Fn(&Path) -> Result<()>`
//! closure, which is what the batch runner accepts.
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//! - `test-util` - Stub `soffice`/`pdfinfo`/`pdftoppm` scripts for tests (Unix)
//!
//! ## Example
//!
//! ```no_run
//! use docbatch_convert::{Converter, PdfToImage};
//! use std::path::Path;
//!
//! let converter = PdfToImage::new("/tmp/out")?;
//! converter.convert(Path::new("/docs/manual.pdf"))?;
//! # Ok::<(), docbatch_convert::Error>(())
//! ```

mod error;
pub mod pdf;
pub mod tools;
pub mod word;
pub mod workspace;

#[cfg(all(unix, any(test, feature = "test-util")))]
pub mod test_util;

use std::path::Path;

// Re-exports
pub use error::{Error, Result};
pub use pdf::{page_file_name, parse_page_count, PdfToImage, RenderSettings};
pub use tools::{
    check_tool, check_tool_at, check_tools, get_tool_path, require_tool, ToolInfo, ToolPaths,
};
pub use word::WordToPdf;
pub use workspace::Workspace;

/// A conversion function applied to one source file.
///
/// The output location is part of the converter itself; callers only hand
/// over the source path.
pub trait Converter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Convert `source`, writing the result wherever this converter writes.
    fn convert(&self, source: &Path) -> Result<()>;
}

impl<F> Converter for F
where
    F: Fn(&Path) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        "custom"
    }

    fn convert(&self, source: &Path) -> Result<()> {
        self(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_is_converter() {
        let converter = |path: &Path| {
            if path.ends_with("bad.pdf") {
                Err(Error::InvalidInput("bad".into()))
            } else {
                Ok(())
            }
        };

        let dynamic: &dyn Converter = &converter;
        assert_eq!(dynamic.name(), "custom");
        assert!(dynamic.convert(Path::new("good.pdf")).is_ok());
        assert!(dynamic.convert(Path::new("bad.pdf")).is_err());
    }
}
