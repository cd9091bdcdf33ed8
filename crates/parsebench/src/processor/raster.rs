use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ProcessError;

/// Renders PDF pages to encoded images for OCR.
pub trait PageRasterizer: Send + Sync {
    fn page_count(&self, pdf_path: &Path) -> Result<usize, ProcessError>;

    /// Renders the 1-based `page_num` and returns PNG bytes.
    fn render_page(&self, pdf_path: &Path, page_num: usize) -> Result<Vec<u8>, ProcessError>;
}

/// Rasterizer shelling out to poppler-utils (`pdfinfo`, `pdftoppm`).
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    dpi: u32,
}

impl PopplerRasterizer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn page_count(&self, pdf_path: &Path) -> Result<usize, ProcessError> {
        // lopdf is cheaper than a subprocess when the structure is readable
        if let Ok(doc) = lopdf::Document::load(pdf_path) {
            return Ok(doc.get_pages().len());
        }

        let output = Command::new("pdfinfo").arg(pdf_path).output().map_err(|e| {
            ProcessError::Rasterize(format!(
                "Failed to run pdfinfo: {}. Make sure poppler-utils is installed.",
                e
            ))
        })?;

        if !output.status.success() {
            return Err(ProcessError::Rasterize(format!(
                "pdfinfo failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        parse_pdfinfo_pages(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            ProcessError::Rasterize("pdfinfo output has no page count".to_string())
        })
    }

    fn render_page(&self, pdf_path: &Path, page_num: usize) -> Result<Vec<u8>, ProcessError> {
        let _span = tracing::info_span!("extract.ocr.rasterize", page_num).entered();

        let output_prefix =
            std::env::temp_dir().join(format!("parsebench_page_{}", uuid::Uuid::new_v4()));
        let page = page_num.to_string();

        let output = Command::new("pdftoppm")
            .args(["-png", "-singlefile", "-r", &self.dpi.to_string()])
            .args(["-f", &page, "-l", &page])
            .arg(pdf_path)
            .arg(&output_prefix)
            .output()
            .map_err(|e| {
                ProcessError::Rasterize(format!(
                    "Failed to run pdftoppm: {}. Make sure poppler-utils is installed.",
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(ProcessError::Rasterize(format!(
                "pdftoppm failed on page {}: {}",
                page_num,
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let image_path = rendered_image_path(&output_prefix);
        let image_data = std::fs::read(&image_path).map_err(|e| {
            ProcessError::Rasterize(format!("Failed to read rendered page {}: {}", page_num, e))
        })?;

        remove_rendered_image(&image_path);

        Ok(image_data)
    }
}

fn remove_rendered_image(image_path: &Path) {
    if let Err(e) = std::fs::remove_file(image_path) {
        tracing::debug!(
            "Could not remove rendered page {}: {}",
            crate::sanitize::redact_path(image_path),
            e
        );
    }
}

/// `-singlefile` makes pdftoppm write exactly `<prefix>.png`.
fn rendered_image_path(prefix: &Path) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(".png");
    PathBuf::from(name)
}

fn parse_pdfinfo_pages(stdout: &str) -> Option<usize> {
    stdout
        .lines()
        .filter_map(|line| line.strip_prefix("Pages:"))
        .find_map(|count| count.trim().parse::<usize>().ok())
}
