//! Docbatch - batch document conversion
//!
//! This library crate exposes the core functionality for integration testing.

pub mod browse;
pub mod config;
pub mod conversion;
pub mod grid;
pub mod runner;
pub mod selection;
