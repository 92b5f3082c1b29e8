//! Docbatch-Common: shared types, constants and utilities.
//!
//! This crate provides common functionality used across docbatch:
//!
//! - **Core Types**: conversion operations, job status and failure reporting policy
//! - **Path Utilities**: document type detection by extension, hidden-file checks
//! - **Error Handling**: common error types and result aliases
//!
//! # Examples
//!
//! ```
//! use docbatch_common::{JobStatus, Operation};
//! use docbatch_common::paths::is_pdf_file;
//! use std::path::Path;
//!
//! let op: Operation = "pdf-to-jpg".parse().unwrap();
//! assert_eq!(op, Operation::PdfToImage);
//! assert!(op.accepts(Path::new("report.PDF")));
//! assert!(is_pdf_file(Path::new("report.pdf")));
//! assert_eq!(JobStatus::default(), JobStatus::Pending);
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
