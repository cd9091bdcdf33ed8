use std::path::Path;
use std::sync::Arc;

use crate::error::ProcessError;
use crate::processor::ocr::OcrEngine;
use crate::processor::{read_file, Document, ExtractionStrategy};

/// OCR of a raster image file as a whole.
pub struct OcrImageStrategy {
    ocr: Arc<dyn OcrEngine>,
}

impl OcrImageStrategy {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }
}

impl ExtractionStrategy for OcrImageStrategy {
    fn name(&self) -> &'static str {
        "ocr_image"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.image.ocr").entered();

        let image_data = read_file(path)?;
        let text = self.ocr.recognize(&image_data)?;

        Ok(vec![Document::new(text, path, self.name())])
    }
}
