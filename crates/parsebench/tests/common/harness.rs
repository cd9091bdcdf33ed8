//! Test harness for isolated test execution.
//!
//! The `TestHarness` struct provides temp input/output/config directories and
//! a `DocumentLoader` wired to fake OCR collaborators, so scanned-document
//! paths can be exercised without Tesseract or poppler installed.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use parsebench::config::Config;
use parsebench::error::ProcessError;
use parsebench::processor::{DocumentLoader, OcrEngine, OcrTools, PageRasterizer};
use parsebench::scoring::Scorer;

/// OCR engine that reads image bytes as UTF-8 text and counts its calls.
#[derive(Default)]
pub struct FakeOcr {
    calls: AtomicUsize,
}

impl FakeOcr {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for FakeOcr {
    fn recognize(&self, image_data: &[u8]) -> Result<String, ProcessError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        String::from_utf8(image_data.to_vec())
            .map_err(|e| ProcessError::OcrFailed(format!("not text: {}", e)))
    }
}

/// Rasterizer that renders every page of any PDF as fixed text bytes.
pub struct FakeRasterizer {
    pub pages: usize,
    pub page_text: String,
}

impl PageRasterizer for FakeRasterizer {
    fn page_count(&self, _pdf_path: &Path) -> Result<usize, ProcessError> {
        Ok(self.pages)
    }

    fn render_page(&self, _pdf_path: &Path, page_num: usize) -> Result<Vec<u8>, ProcessError> {
        Ok(format!("{} {}\n", self.page_text, page_num).into_bytes())
    }
}

/// Test harness providing an isolated execution environment.
pub struct TestHarness {
    temp_dir: TempDir,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config_dir: PathBuf,
    pub ocr: Arc<FakeOcr>,
    scanned_text: String,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let input_dir = base.join("input");
        let output_dir = base.join("output");
        let config_dir = base.join("config");

        std::fs::create_dir_all(&input_dir).expect("Failed to create input dir");
        std::fs::create_dir_all(&output_dir).expect("Failed to create output dir");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            input_dir,
            output_dir,
            config_dir,
            ocr: Arc::new(FakeOcr::default()),
            scanned_text: "scanned page".to_string(),
        }
    }

    /// Text the fake rasterizer "renders" for each PDF page.
    pub fn with_scanned_text(mut self, text: &str) -> Self {
        self.scanned_text = text.to_string();
        self
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_input(&self, filename: &str, content: &[u8]) -> PathBuf {
        let path = self.input_dir.join(filename);
        std::fs::write(&path, content).expect("Failed to write input file");
        path
    }

    pub fn write_text_input(&self, filename: &str, content: &str) -> PathBuf {
        self.write_input(filename, content.as_bytes())
    }

    pub fn write_config(&self, filename: &str, config: &Config) -> PathBuf {
        let path = self.config_dir.join(filename);
        let json = serde_json::to_string_pretty(config).expect("Failed to serialize config");
        std::fs::write(&path, json).expect("Failed to write config file");
        path
    }

    pub fn read_output(&self, filename: &str) -> String {
        std::fs::read_to_string(self.output_dir.join(filename))
            .unwrap_or_else(|e| panic!("Failed to read output {}: {}", filename, e))
    }

    /// Loader with the standard chains and the fake OCR collaborators.
    pub fn loader(&self) -> DocumentLoader {
        DocumentLoader::with_engines(Some(self.ocr_tools(1)), None)
    }

    /// Loader with the standard chains and no OCR tiers.
    pub fn loader_without_ocr(&self) -> DocumentLoader {
        DocumentLoader::with_engines(None, None)
    }

    pub fn ocr_tools(&self, pages: usize) -> OcrTools {
        OcrTools {
            engine: self.ocr.clone(),
            rasterizer: Arc::new(FakeRasterizer {
                pages,
                page_text: self.scanned_text.clone(),
            }),
        }
    }

    pub fn scorer(&self) -> Scorer {
        Scorer::new(self.loader(), &self.input_dir, &self.output_dir)
    }
}
