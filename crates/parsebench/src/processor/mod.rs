pub mod chain;
pub mod excel;
pub mod image;
pub mod loader;
pub mod ocr;
pub mod pdf;
pub mod raster;
pub mod word;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProcessError;

pub use chain::FallbackChain;
pub use loader::{DocumentLoader, OcrTools};
pub use ocr::{OcrEngine, TesseractOcr};
pub use raster::{PageRasterizer, PopplerRasterizer};

/// Extracted text plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub method: String,
    /// Zero-based page index, set by strategies that split per page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

impl Document {
    pub fn new(content: impl Into<String>, source: &Path, method: &str) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.to_string_lossy().into_owned(),
                method: method.to_string(),
                page: None,
            },
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.metadata.page = Some(page);
        self
    }

    /// True when the content holds anything besides whitespace.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }
}

/// A single extraction technique for one kind of file.
///
/// Implementations report failures through `Err`; they do not log. The
/// [`FallbackChain`] running them decides what a failure means.
pub trait ExtractionStrategy: Send + Sync {
    /// Short stable identifier, also used as `metadata.method`.
    fn name(&self) -> &'static str;

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError>;
}

/// A strategy succeeded only if at least one document has non-blank content.
pub fn is_successful(documents: &[Document]) -> bool {
    documents.iter().any(Document::has_content)
}

/// Text for an entity or character reference inside XML character data.
pub(crate) fn xml_reference_text(reference: &quick_xml::events::BytesRef) -> Option<String> {
    if let Ok(Some(ch)) = reference.resolve_char_ref() {
        return Some(ch.to_string());
    }
    let name = reference.decode().ok()?;
    quick_xml::escape::resolve_predefined_entity(&name).map(str::to_string)
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>, ProcessError> {
    std::fs::read(path).map_err(|e| ProcessError::ReadDocument {
        path: path.to_path_buf(),
        source: e,
    })
}
