//! Path utilities for detecting document types by extension.
//!
//! These back the input filters of each conversion operation and the
//! hidden-file check the Word converter performs before touching a file.

use std::path::Path;

/// Word-processing document extensions.
const WORD_EXTENSIONS: &[&str] = &["doc", "docx"];

/// PDF document extensions.
const PDF_EXTENSIONS: &[&str] = &["pdf"];

#[cfg(windows)]
const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

/// Check if a path's extension is one of `extensions` (case-insensitive).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Check if a path has a Word document extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use docbatch_common::paths::is_word_file;
///
/// assert!(is_word_file(Path::new("letter.docx")));
/// assert!(is_word_file(Path::new("/path/to/old.DOC")));
/// assert!(!is_word_file(Path::new("report.pdf")));
/// ```
pub fn is_word_file(path: &Path) -> bool {
    has_extension(path, WORD_EXTENSIONS)
}

/// Check if a path has a PDF extension.
pub fn is_pdf_file(path: &Path) -> bool {
    has_extension(path, PDF_EXTENSIONS)
}

/// Get the list of Word document extensions.
#[must_use]
pub fn word_extensions() -> &'static [&'static str] {
    WORD_EXTENSIONS
}

/// Get the list of PDF extensions.
#[must_use]
pub fn pdf_extensions() -> &'static [&'static str] {
    PDF_EXTENSIONS
}

/// File name without its extension, used to name conversion outputs.
///
/// Returns `None` for paths without a file name (e.g. `/` or `..`).
pub fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().into_owned())
}

/// Check whether a file is hidden.
///
/// On Windows this reads the hidden file attribute. Elsewhere a file is
/// hidden when its name starts with a dot. Unreadable metadata counts as
/// not hidden so the conversion itself reports the real error.
pub fn is_hidden(path: &Path) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        std::fs::metadata(path)
            .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
            .unwrap_or(false)
    }

    #[cfg(not(windows))]
    {
        path.file_name()
            .map(|name| name.to_string_lossy().starts_with('.'))
            .unwrap_or(false)
    }
}
