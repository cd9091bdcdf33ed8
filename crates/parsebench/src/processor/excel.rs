use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ProcessError;
use crate::processor::{xml_reference_text, Document, ExtractionStrategy};

const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";

/// Sheet-by-sheet, row-by-row rendering of an xlsx workbook.
///
/// Cells are tab-separated, rows end with a newline, and sheets are
/// separated by a blank line.
pub struct LayoutExcelStrategy;

impl LayoutExcelStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LayoutExcelStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionStrategy for LayoutExcelStrategy {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn attempt(&self, path: &Path) -> Result<Vec<Document>, ProcessError> {
        let _span = tracing::info_span!("extract.excel.layout").entered();

        let file = File::open(path).map_err(|e| ProcessError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut archive = zip::ZipArchive::new(file).map_err(|e| {
            ProcessError::SpreadsheetProcessing(format!("Failed to open workbook: {}", e))
        })?;

        let shared_strings = if archive.file_names().any(|n| n == SHARED_STRINGS_PART) {
            parse_shared_strings(&read_part(&mut archive, SHARED_STRINGS_PART)?)?
        } else {
            Vec::new()
        };

        let sheet_names = worksheet_parts(archive.file_names());
        if sheet_names.is_empty() {
            return Err(ProcessError::SpreadsheetProcessing(
                "Workbook has no worksheets".to_string(),
            ));
        }

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in &sheet_names {
            let xml = read_part(&mut archive, name)?;
            sheets.push(parse_sheet(&xml, &shared_strings)?);
        }

        Ok(vec![Document::new(sheets.join("\n"), path, self.name())])
    }
}

/// Worksheet part names ordered by their sheet number.
fn worksheet_parts<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut sheets: Vec<(u32, String)> = names
        .filter_map(|name| {
            let number = name
                .strip_prefix("xl/worksheets/sheet")?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    sheets.sort();
    sheets.into_iter().map(|(_, name)| name).collect()
}

fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> Result<String, ProcessError> {
    let mut part = archive.by_name(name).map_err(|e| {
        ProcessError::SpreadsheetProcessing(format!("Failed to find {}: {}", name, e))
    })?;

    let mut xml_content = String::new();
    part.read_to_string(&mut xml_content).map_err(|e| {
        ProcessError::SpreadsheetProcessing(format!("Failed to read {}: {}", name, e))
    })?;

    Ok(xml_content)
}

fn xml_error(e: quick_xml::Error) -> ProcessError {
    ProcessError::SpreadsheetProcessing(format!("XML parsing error: {}", e))
}

/// One entry per `<si>`, concatenating all of its `<t>` runs.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, ProcessError> {
    let mut reader = Reader::from_str(xml);

    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_item = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_item = true;
                    current.clear();
                }
                b"t" if in_item => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_item = false;
                }
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                current.push_str(&e.decode().unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) if in_text => {
                current.extend(xml_reference_text(&e));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    Ok(strings)
}

#[derive(Clone, Copy, PartialEq)]
enum CellKind {
    SharedString,
    InlineString,
    Value,
}

fn cell_kind(element: &BytesStart) -> CellKind {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == b"t" {
            return match attr.value.as_ref() {
                b"s" => CellKind::SharedString,
                b"inlineStr" => CellKind::InlineString,
                _ => CellKind::Value,
            };
        }
    }
    CellKind::Value
}

fn parse_sheet(xml: &str, shared_strings: &[String]) -> Result<String, ProcessError> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::new();
    let mut row: Vec<String> = Vec::new();
    let mut cell = String::new();
    let mut kind = CellKind::Value;
    let mut in_value = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => row.clear(),
                b"c" => {
                    kind = cell_kind(e);
                    cell.clear();
                }
                b"v" => in_value = true,
                b"t" if kind == CellKind::InlineString => in_value = true,
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    let value = match kind {
                        CellKind::SharedString => cell
                            .trim()
                            .parse::<usize>()
                            .ok()
                            .and_then(|i| shared_strings.get(i))
                            .cloned()
                            .unwrap_or_default(),
                        _ => std::mem::take(&mut cell),
                    };
                    row.push(value);
                }
                b"row" => {
                    text.push_str(&row.join("\t"));
                    text.push('\n');
                }
                _ => {}
            },
            Ok(Event::Text(e)) if in_value => {
                cell.push_str(&e.decode().unwrap_or_default());
            }
            Ok(Event::GeneralRef(e)) if in_value => {
                cell.extend(xml_reference_text(&e));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(e)),
            _ => {}
        }
    }

    Ok(text)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zip::write::SimpleFileOptions;

    pub(crate) fn build_xlsx(parts: &[(&str, &str)]) -> NamedTempFile {
        let temp_file = NamedTempFile::with_suffix(".xlsx").unwrap();
        let mut writer = zip::ZipWriter::new(std::fs::File::create(temp_file.path()).unwrap());
        for (name, content) in parts {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
        temp_file
    }

    const SHARED: &str = r#"<sst xmlns="x"><si><t>Name</t></si><si><t>Total</t></si><si><r><t>Net </t></r><r><t>income</t></r></si></sst>"#;

    const SHEET1: &str = r#"<worksheet xmlns="x"><sheetData>
        <row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c></row>
        <row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2"><v>42.5</v></c></row>
    </sheetData></worksheet>"#;

    const SHEET2: &str = r#"<worksheet xmlns="x"><sheetData>
        <row r="1"><c r="A1" t="inlineStr"><is><t>Notes &amp; remarks</t></is></c></row>
    </sheetData></worksheet>"#;

    #[test]
    fn test_parse_shared_strings_joins_rich_runs() {
        let strings = parse_shared_strings(SHARED).unwrap();
        assert_eq!(strings, vec!["Name", "Total", "Net income"]);
    }

    #[test]
    fn test_parse_sheet_resolves_cells() {
        let strings = parse_shared_strings(SHARED).unwrap();
        let text = parse_sheet(SHEET1, &strings).unwrap();
        assert_eq!(text, "Name\tTotal\nNet income\t42.5\n");
    }

    #[test]
    fn test_parse_sheet_inline_strings() {
        let text = parse_sheet(SHEET2, &[]).unwrap();
        assert_eq!(text, "Notes & remarks\n");
    }

    #[test]
    fn test_out_of_range_shared_index_is_blank() {
        let sheet = r#"<worksheet><sheetData><row><c t="s"><v>9</v></c><c><v>1</v></c></row></sheetData></worksheet>"#;
        assert_eq!(parse_sheet(sheet, &[]).unwrap(), "\t1\n");
    }

    #[test]
    fn test_worksheet_parts_numeric_order() {
        let names = [
            "xl/worksheets/sheet10.xml",
            "xl/workbook.xml",
            "xl/worksheets/sheet2.xml",
            "xl/worksheets/sheet1.xml",
            "xl/worksheets/_rels/sheet1.xml.rels",
        ];
        assert_eq!(
            worksheet_parts(names.into_iter()),
            vec![
                "xl/worksheets/sheet1.xml",
                "xl/worksheets/sheet2.xml",
                "xl/worksheets/sheet10.xml",
            ]
        );
    }

    #[test]
    fn test_layout_strategy_reads_workbook() {
        let file = build_xlsx(&[
            ("xl/sharedStrings.xml", SHARED),
            ("xl/worksheets/sheet2.xml", SHEET2),
            ("xl/worksheets/sheet1.xml", SHEET1),
        ]);

        let docs = LayoutExcelStrategy::new().attempt(file.path()).unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].content,
            "Name\tTotal\nNet income\t42.5\n\nNotes & remarks\n"
        );
        assert_eq!(docs[0].metadata.method, "layout");
    }

    #[test]
    fn test_workbook_without_shared_strings() {
        let file = build_xlsx(&[("xl/worksheets/sheet1.xml", SHEET2)]);
        let docs = LayoutExcelStrategy::new().attempt(file.path()).unwrap();
        assert_eq!(docs[0].content, "Notes & remarks\n");
    }

    #[test]
    fn test_workbook_without_sheets_error() {
        let file = build_xlsx(&[("xl/workbook.xml", "<workbook/>")]);
        assert!(matches!(
            LayoutExcelStrategy::new().attempt(file.path()),
            Err(ProcessError::SpreadsheetProcessing(_))
        ));
    }

    #[test]
    fn test_legacy_xls_error() {
        let mut temp_file = NamedTempFile::with_suffix(".xls").unwrap();
        temp_file.write_all(b"\xD0\xCF\x11\xE0 legacy binary").unwrap();

        assert!(matches!(
            LayoutExcelStrategy::new().attempt(temp_file.path()),
            Err(ProcessError::SpreadsheetProcessing(_))
        ));
    }
}
