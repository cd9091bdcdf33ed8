use std::path::Path;
use std::sync::Arc;

use crate::error::ProcessError;
use crate::processor::ocr::OcrEngine;
use crate::processor::raster::PageRasterizer;
use crate::processor::{read_file, Document, ExtractionStrategy};

/// Marker lopdf emits for CID fonts it cannot decode.
const IDENTITY_H_PATTERN: &str = "?Identity-H Unimplemented?";

/// Tier 1: structured parse with lopdf, one document per page.
pub struct NativePdfStrategy;

impl NativePdfStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativePdfStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for NativePdfStrategy {
    fn name(&self) -> &'static str {
        "native"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.pdf.native").entered();

        let pdf_bytes = read_file(path)?;
        let doc = lopdf::Document::load_mem(&pdf_bytes)
            .map_err(|e| ProcessError::PdfProcessing(format!("Failed to load PDF: {}", e)))?;

        let mut documents = Vec::new();
        let mut last_error = None;

        for (index, page_num) in doc.get_pages().keys().enumerate() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    documents.push(
                        Document::new(clean_native_text(&page_text), path, self.name())
                            .with_page(index),
                    );
                }
                Err(e) => last_error = Some(e),
            }
        }

        if documents.is_empty() {
            if let Some(e) = last_error {
                return Err(ProcessError::PdfProcessing(format!(
                    "No page text could be extracted: {}",
                    e
                )));
            }
        }

        Ok(documents)
    }
}

/// Drops undecodable-font markers so a page made only of them counts as empty,
/// and the line break lopdf appends after each text object.
fn clean_native_text(text: &str) -> String {
    text.replace(IDENTITY_H_PATTERN, "").trim_end().to_string()
}

/// Tier 2: whole-document layout parse with pdf-extract.
pub struct UnstructuredPdfStrategy;

impl UnstructuredPdfStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnstructuredPdfStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for UnstructuredPdfStrategy {
    fn name(&self) -> &'static str {
        "unstructured"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.pdf.unstructured").entered();

        let pdf_bytes = read_file(path)?;
        let text = pdf_extract::extract_text_from_mem(&pdf_bytes)
            .map_err(|e| ProcessError::PdfProcessing(format!("pdf-extract failed: {:?}", e)))?;

        Ok(vec![Document::new(text, path, self.name())])
    }
}

/// Tier 3: rasterize every page and OCR it.
///
/// Page texts are concatenated without a delimiter into a single document.
pub struct OcrPdfStrategy {
    ocr: Arc<dyn OcrEngine>,
    rasterizer: Arc<dyn PageRasterizer>,
}

impl OcrPdfStrategy {
    pub fn new(ocr: Arc<dyn OcrEngine>, rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self { ocr, rasterizer }
    }
}

impl ExtractionStrategy for OcrPdfStrategy {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.pdf.ocr").entered();

        let page_count = self.rasterizer.page_count(path)?;
        if page_count == 0 {
            return Err(ProcessError::Rasterize("PDF has no pages".to_string()));
        }

        let mut all_text = String::new();
        let mut recognized_pages = 0;
        let mut last_error = None;

        for page_num in 1..=page_count {
            let page_text = self
                .rasterizer
                .render_page(path, page_num)
                .and_then(|image_data| self.ocr.recognize(&image_data));

            match page_text {
                Ok(text) => {
                    all_text.push_str(&text);
                    recognized_pages += 1;
                }
                Err(e) => last_error = Some(e),
            }
        }

        if recognized_pages == 0 {
            if let Some(e) = last_error {
                return Err(e);
            }
        }

        Ok(vec![Document::new(all_text, path, self.name())])
    }
}
