//! Builders for fixture documents and configurations.

#![allow(dead_code)]

use std::io::Write;

use lopdf::{dictionary, Object, Stream};
use zip::write::SimpleFileOptions;

use parsebench::config::{Config, ExtractionConfig, OcrConfig, ScoringConfig};

/// Builds a PDF whose pages each show one line of text in Courier.
pub struct PdfBuilder {
    pages: Vec<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    pub fn page(mut self, text: &str) -> Self {
        self.pages.push(text.to_string());
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in &self.pages {
            let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("Failed to serialize PDF");
        bytes
    }
}

/// Builds a minimal .docx archive with one paragraph per entry.
pub fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
        .collect();
    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );
    zip_bytes(&[("word/document.xml", &xml)])
}

/// Builds a minimal .xlsx archive with inline-string cells.
pub fn xlsx_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let rows_xml: String = rows
        .iter()
        .map(|cells| {
            let cells_xml: String = cells
                .iter()
                .map(|c| format!(r#"<c t="inlineStr"><is><t>{}</t></is></c>"#, c))
                .collect();
            format!("<row>{}</row>", cells_xml)
        })
        .collect();
    let sheet = format!(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        rows_xml
    );
    zip_bytes(&[("xl/worksheets/sheet1.xml", &sheet)])
}

fn zip_bytes(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in parts {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("Failed to start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("Failed to write zip entry");
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// DocBank-style annotation file: one tab-separated row per token.
pub fn ground_truth(tokens: &[&str]) -> String {
    tokens
        .iter()
        .map(|t| format!("{}\t72\t720\t110\t732\t0\t0\t0\tCourier\tparagraph\n", t))
        .collect()
}

/// Builder for `Config` instances.
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Defaults with OCR disabled so tests never need Tesseract.
    pub fn new() -> Self {
        Self {
            config: Config {
                version: "1.0".to_string(),
                ocr: OcrConfig {
                    enabled: false,
                    languages: vec!["eng".to_string()],
                    dpi: 300,
                },
                extraction: ExtractionConfig::default(),
                scoring: ScoringConfig::default(),
            },
        }
    }

    pub fn ocr(mut self, enabled: bool) -> Self {
        self.config.ocr.enabled = enabled;
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.ocr.dpi = dpi;
        self
    }

    pub fn attempt_timeout_secs(mut self, secs: u64) -> Self {
        self.config.extraction.attempt_timeout_secs = Some(secs);
        self
    }

    pub fn input_directory(mut self, path: &str) -> Self {
        self.config.scoring.input_directory = path.to_string();
        self
    }

    pub fn output_directory(mut self, path: &str) -> Self {
        self.config.scoring.output_directory = path.to_string();
        self
    }

    pub fn scores_filename(mut self, name: &str) -> Self {
        self.config.scoring.scores_filename = name.to_string();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
