//! Shared test utilities for parsebench integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated runs with temp input/output/config directories
//! - Fake OCR and rasterizer collaborators
//! - Builders for fixture PDFs, Word files, ground truth and configs

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
