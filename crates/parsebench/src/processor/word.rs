use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::ProcessError;
use crate::processor::{xml_reference_text, Document, ExtractionStrategy};

const DOCUMENT_PART: &str = "word/document.xml";

static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</w:p>|<w:br\s*/>|<w:cr\s*/>").unwrap());
static TAB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<w:tab\s*/>").unwrap());
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Tier 1: paragraph-aware walk of the main document part.
pub struct LayoutWordStrategy;

impl LayoutWordStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LayoutWordStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for LayoutWordStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.word.layout").entered();

        let mut archive = open_archive(path)?;
        let xml_content = read_part(&mut archive, DOCUMENT_PART)?;
        let text = parse_document_xml(&xml_content)?;

        Ok(vec![Document::new(text, path, self.name())])
    }
}

/// Tier 2: tag-stripping scan of the body plus headers and footers.
///
/// Tolerates XML the layout walk rejects.
pub struct PlainWordStrategy;

impl PlainWordStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainWordStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for PlainWordStrategy {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.word.plain").entered();

        let mut archive = open_archive(path)?;

        let mut part_names: Vec<String> = archive
            .file_names()
            .filter(|name| is_text_part(name))
            .map(str::to_string)
            .collect();
        // body first, then headers and footers in a stable order
        part_names.sort_by_key(|name| (name != DOCUMENT_PART, name.clone()));

        if !part_names.iter().any(|name| name == DOCUMENT_PART) {
            return Err(ProcessError::WordProcessing(format!(
                "Archive has no {}",
                DOCUMENT_PART
            )));
        }

        let mut text = String::new();
        for name in &part_names {
            let xml = read_part(&mut archive, name)?;
            text.push_str(&strip_markup(&xml));
            text.push('\n');
        }

        Ok(vec![Document::new(text, path, self.name())])
    }
}

fn is_text_part(name: &str) -> bool {
    name == DOCUMENT_PART
        || (name.starts_with("word/header") && name.ends_with(".xml"))
        || (name.starts_with("word/footer") && name.ends_with(".xml"))
}

fn open_archive(path: &Path) -> Result<zip::ZipArchive<File>, ProcessError> {
    let file = File::open(path).map_err(|e| ProcessError::ReadDocument {
        path: path.to_path_buf(),
        source: e,
    })?;

    zip::ZipArchive::new(file)
        .map_err(|e| ProcessError::WordProcessing(format!("Failed to open archive: {}", e)))
}

fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<String, ProcessError> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| ProcessError::WordProcessing(format!("Failed to find {}: {}", name, e)))?;

    let mut xml_content = String::new();
    part.read_to_string(&mut xml_content)
        .map_err(|e| ProcessError::WordProcessing(format!("Failed to read {}: {}", name, e)))?;

    Ok(xml_content)
}

fn parse_document_xml(xml: &str) -> Result<String, ProcessError> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut in_text_element = false;
    let mut in_paragraph = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = true,
                b"p" => in_paragraph = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" if in_paragraph => text.push('\t'),
                b"br" | b"cr" if in_paragraph => text.push('\n'),
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"p" => {
                    if in_paragraph {
                        text.push('\n');
                        in_paragraph = false;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text_element {
                    let decoded = e.decode().unwrap_or_default();
                    text.push_str(&decoded);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if in_text_element {
                    text.extend(xml_reference_text(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ProcessError::WordProcessing(format!(
                    "XML parsing error: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(text)
}

fn strip_markup(xml: &str) -> String {
    let with_breaks = PARAGRAPH_END.replace_all(xml, "\n");
    let with_tabs = TAB.replace_all(&with_breaks, "\t");
    let bare = TAG.replace_all(&with_tabs, "");

    match quick_xml::escape::unescape(&bare) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => bare.into_owned(),
    }
}
