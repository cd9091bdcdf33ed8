use std::io::Cursor;
use std::sync::Arc;

use crate::error::ProcessError;

/// Turns an encoded raster image into text.
///
/// Injected into the OCR strategies so tests can substitute a fake engine.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_data: &[u8]) -> Result<String, ProcessError>;
}

/// Tesseract-backed engine (via leptess).
#[derive(Clone)]
pub struct TesseractOcr {
    inner: Arc<TesseractOcrInner>,
}

struct TesseractOcrInner {
    languages: String,
}

impl TesseractOcr {
    pub fn new(languages: &[String]) -> Self {
        let lang_str = if languages.is_empty() {
            "eng".to_string()
        } else {
            languages.join("+")
        };

        Self {
            inner: Arc::new(TesseractOcrInner {
                languages: lang_str,
            }),
        }
    }

    pub fn languages(&self) -> &str {
        &self.inner.languages
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image_data: &[u8]) -> Result<String, ProcessError> {
        let _span = tracing::info_span!("extract.ocr.recognize").entered();

        let img = image::load_from_memory(image_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to load image: {}", e)))?;

        // leptess reads PNG reliably regardless of the source encoding
        let mut png_data = Vec::new();
        let mut cursor = Cursor::new(&mut png_data);
        img.write_to(&mut cursor, image::ImageFormat::Png)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to convert image: {}", e)))?;

        let mut lt = leptess::LepTess::new(None, &self.inner.languages).map_err(|e| {
            ProcessError::OcrFailed(format!("Failed to initialize Tesseract: {}", e))
        })?;

        lt.set_image_from_mem(&png_data)
            .map_err(|e| ProcessError::OcrFailed(format!("Failed to set image for OCR: {}", e)))?;

        lt.get_utf8_text()
            .map_err(|e| ProcessError::OcrFailed(format!("OCR failed: {}", e)))
    }
}
