use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, DocumentFormat};
use crate::processor::chain::FallbackChain;
use crate::processor::excel::LayoutExcelStrategy;
use crate::processor::image::OcrImageStrategy;
use crate::processor::ocr::{OcrEngine, TesseractOcr};
use crate::processor::pdf::{NativePdfStrategy, OcrPdfStrategy, UnstructuredPdfStrategy};
use crate::processor::raster::{PageRasterizer, PopplerRasterizer};
use crate::processor::word::{LayoutWordStrategy, PlainWordStrategy};
use crate::processor::{Document, ExtractionStrategy};
use crate::sanitize;

/// OCR collaborators shared by the PDF and image chains.
#[derive(Clone)]
pub struct OcrTools {
    pub engine: Arc<dyn OcrEngine>,
    pub rasterizer: Arc<dyn PageRasterizer>,
}

/// Routes files to the fallback chain for their format.
pub struct DocumentLoader {
    chains: HashMap<DocumentFormat, FallbackChain>,
}

impl DocumentLoader {
    /// Builds the standard chains with Tesseract and poppler when OCR is
    /// enabled.
    pub fn from_config(config: &Config) -> Self {
        let ocr = config.ocr.enabled.then(|| OcrTools {
            engine: Arc::new(TesseractOcr::new(&config.ocr.languages)) as Arc<dyn OcrEngine>,
            rasterizer: Arc::new(PopplerRasterizer::new(config.ocr.dpi)) as Arc<dyn PageRasterizer>,
        });
        let timeout = config.extraction.attempt_timeout_secs.map(Duration::from_secs);

        Self::with_engines(ocr, timeout)
    }

    /// Builds the standard chains around the given OCR collaborators.
    pub fn with_engines(ocr: Option<OcrTools>, attempt_timeout: Option<Duration>) -> Self {
        let chains = [
            pdf_chain(ocr.as_ref()),
            word_chain(),
            excel_chain(),
            image_chain(ocr.as_ref()),
        ]
        .into_iter()
        .map(|chain| {
            let chain = chain.with_timeout(attempt_timeout);
            (chain.format(), chain)
        })
        .collect();

        Self { chains }
    }

    /// A loader with only the given chains.
    pub fn with_chains(chains: Vec<FallbackChain>) -> Self {
        Self {
            chains: chains.into_iter().map(|c| (c.format(), c)).collect(),
        }
    }

    pub fn chain(&self, format: DocumentFormat) -> Option<&FallbackChain> {
        self.chains.get(&format)
    }

    /// Extracts every path in order, skipping unsupported files and dropping
    /// documents whose content is blank.
    ///
    /// Never fails. A file whose chain is exhausted contributes nothing.
    pub fn load_documents<P: AsRef<Path>>(&self, paths: &[P]) -> Vec<Document> {
        let mut documents = Vec::new();

        for path in paths {
            let path = path.as_ref();

            let Some(format) = DocumentFormat::from_path(path) else {
                log::warn!(
                    "Skipping {}: unsupported file type",
                    sanitize::redact_path(path)
                );
                continue;
            };

            let Some(chain) = self.chains.get(&format) else {
                log::warn!(
                    "Skipping {}: no {} extraction configured",
                    sanitize::redact_path(path),
                    format.name()
                );
                continue;
            };

            documents.extend(chain.extract(path));
        }

        documents.retain(Document::has_content);
        documents
    }

    /// Text of a single file, its documents joined by newlines.
    pub fn file_to_text(&self, path: &Path) -> String {
        self.load_documents(&[path])
            .iter()
            .map(|doc| doc.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn pdf_chain(ocr: Option<&OcrTools>) -> FallbackChain {
    let mut strategies: Vec<Arc<dyn ExtractionStrategy>> = vec![
        Arc::new(NativePdfStrategy::new()),
        Arc::new(UnstructuredPdfStrategy::new()),
    ];
    if let Some(tools) = ocr {
        strategies.push(Arc::new(OcrPdfStrategy::new(
            Arc::clone(&tools.engine),
            Arc::clone(&tools.rasterizer),
        )));
    }
    FallbackChain::new(DocumentFormat::Pdf, strategies)
}

pub fn word_chain() -> FallbackChain {
    let strategies: Vec<Arc<dyn ExtractionStrategy>> = vec![
        Arc::new(LayoutWordStrategy::new()),
        Arc::new(PlainWordStrategy::new()),
    ];
    FallbackChain::new(DocumentFormat::Word, strategies)
}

pub fn excel_chain() -> FallbackChain {
    let strategies: Vec<Arc<dyn ExtractionStrategy>> = vec![Arc::new(LayoutExcelStrategy::new())];
    FallbackChain::new(DocumentFormat::Excel, strategies)
}

pub fn image_chain(ocr: Option<&OcrTools>) -> FallbackChain {
    let strategies: Vec<Arc<dyn ExtractionStrategy>> = match ocr {
        Some(tools) => vec![Arc::new(OcrImageStrategy::new(Arc::clone(&tools.engine)))],
        None => Vec::new(),
    };
    FallbackChain::new(DocumentFormat::Image, strategies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::chain::tests::{Outcome, ScriptedStrategy};
    use crate::processor::pdf::tests::{build_text_pdf, write_temp_pdf, EchoOcr, FakeRasterizer};
    use crate::processor::word::tests::{build_docx, document_xml};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fake_tools(pages: usize) -> OcrTools {
        OcrTools {
            engine: Arc::new(EchoOcr::default()),
            rasterizer: Arc::new(FakeRasterizer {
                pages,
                fail_pages: vec![],
            }),
        }
    }

    #[test]
    fn test_standard_chain_layout() {
        let loader = DocumentLoader::with_engines(Some(fake_tools(1)), None);

        assert_eq!(
            loader.chain(DocumentFormat::Pdf).unwrap().strategy_names(),
            vec!["native", "unstructured", "ocr"]
        );
        assert_eq!(
            loader.chain(DocumentFormat::Word).unwrap().strategy_names(),
            vec!["layout", "plain"]
        );
        assert_eq!(
            loader.chain(DocumentFormat::Excel).unwrap().strategy_names(),
            vec!["layout"]
        );
        assert_eq!(
            loader.chain(DocumentFormat::Image).unwrap().strategy_names(),
            vec!["ocr_image"]
        );
    }

    #[test]
    fn test_ocr_disabled_drops_ocr_tiers() {
        let mut config = Config::default();
        config.ocr.enabled = false;
        let loader = DocumentLoader::from_config(&config);

        assert_eq!(
            loader.chain(DocumentFormat::Pdf).unwrap().strategy_names(),
            vec!["native", "unstructured"]
        );
        assert!(loader
            .chain(DocumentFormat::Image)
            .unwrap()
            .strategy_names()
            .is_empty());
    }

    #[test]
    fn test_unsupported_extension_is_skipped() {
        let loader = DocumentLoader::with_engines(None, None);
        let mut file = NamedTempFile::with_suffix(".xyz").unwrap();
        file.write_all(b"whatever").unwrap();

        assert!(loader.load_documents(&[file.path()]).is_empty());
        assert!(loader
            .load_documents(&[Path::new("/tmp/no_extension")])
            .is_empty());
    }

    #[test]
    fn test_corrupted_pdf_yields_nothing() {
        let loader = DocumentLoader::with_engines(None, None);
        let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
        file.write_all(b"%PDF-1.4 truncated garbage").unwrap();

        assert!(loader.load_documents(&[file.path()]).is_empty());
    }

    #[test]
    fn test_whitespace_pdf_yields_nothing() {
        let loader = DocumentLoader::with_engines(None, None);
        let file = write_temp_pdf(&build_text_pdf(&["   "]));

        assert!(loader.load_documents(&[file.path()]).is_empty());
    }

    #[test]
    fn test_documents_keep_input_order_and_source() {
        let loader = DocumentLoader::with_engines(None, None);
        let pdf = write_temp_pdf(&build_text_pdf(&["Alpha page"]));
        let docx = build_docx(&[("word/document.xml", &document_xml(&["Beta paragraph"]))]);

        let docs = loader.load_documents(&[pdf.path(), docx.path()]);

        assert_eq!(docs.len(), 2);
        assert!(docs[0].content.contains("Alpha page"));
        assert!(docs[1].content.contains("Beta paragraph"));
        assert!(docs[0]
            .metadata
            .source
            .ends_with(&*pdf.path().to_string_lossy()));
        assert!(docs[1]
            .metadata
            .source
            .ends_with(&*docx.path().to_string_lossy()));
        assert!(docs.iter().all(Document::has_content));
    }

    #[test]
    fn test_blank_pages_are_filtered_from_successful_tier() {
        let loader = DocumentLoader::with_engines(None, None);
        let file = write_temp_pdf(&build_text_pdf(&["Cover", " "]));

        let docs = loader.load_documents(&[file.path()]);

        assert_eq!(docs.len(), 1);
        assert!(docs[0].content.contains("Cover"));
    }

    #[test]
    fn test_image_routed_through_ocr() {
        let loader = DocumentLoader::with_engines(Some(fake_tools(1)), None);
        let mut file = NamedTempFile::with_suffix(".JPG").unwrap();
        file.write_all(b"invoice").unwrap();

        let docs = loader.load_documents(&[file.path()]);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "invoice text\n");
        assert_eq!(docs[0].metadata.method, "ocr_image");
    }

    #[test]
    fn test_legacy_formats_yield_nothing() {
        let loader = DocumentLoader::with_engines(None, None);
        let mut doc = NamedTempFile::with_suffix(".doc").unwrap();
        doc.write_all(b"\xD0\xCF\x11\xE0 binary").unwrap();
        let mut xls = NamedTempFile::with_suffix(".xls").unwrap();
        xls.write_all(b"\xD0\xCF\x11\xE0 binary").unwrap();

        assert!(loader.load_documents(&[doc.path(), xls.path()]).is_empty());
    }

    #[test]
    fn test_custom_chain_fallback_counts() {
        let native = ScriptedStrategy::new("native", Outcome::Text(""));
        let unstructured = ScriptedStrategy::new("unstructured", Outcome::Text("Hello"));
        let ocr = ScriptedStrategy::new("ocr", Outcome::Text("never"));
        let loader = DocumentLoader::with_chains(vec![FallbackChain::new(
            DocumentFormat::Pdf,
            vec![
                native.clone() as Arc<dyn ExtractionStrategy>,
                unstructured.clone(),
                ocr.clone(),
            ],
        )]);

        let docs = loader.load_documents(&[Path::new("paper.pdf")]);

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "Hello");
        assert_eq!(ocr.calls(), 0);
        assert!(loader.load_documents(&[Path::new("memo.docx")]).is_empty());
    }

    #[test]
    fn test_file_to_text_joins_documents() {
        let loader = DocumentLoader::with_engines(None, None);
        let file = write_temp_pdf(&build_text_pdf(&["One", "Two"]));

        let text = loader.file_to_text(file.path());

        let one = text.find("One").unwrap();
        let two = text.find("Two").unwrap();
        assert!(one < two);
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_file_to_text_of_missing_file_is_empty() {
        let loader = DocumentLoader::with_engines(None, None);
        assert_eq!(loader.file_to_text(Path::new("/nonexistent/a.pdf")), "");
    }
}
