use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            ocr: OcrConfig::default(),
            extraction: ExtractionConfig::default(),
            scoring: ScoringConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_true() -> bool {
    true
}

fn default_languages() -> Vec<String> {
    vec!["eng".to_string()]
}

fn default_dpi() -> u32 {
    300
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            languages: default_languages(),
            dpi: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Upper bound for a single strategy attempt. `None` runs attempts inline
    /// with no limit.
    #[serde(default)]
    pub attempt_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Directory holding the labeled corpus (ground truth, PDFs, images).
    #[serde(default = "default_input_directory")]
    pub input_directory: String,
    /// Directory receiving normalized artifacts and the score file.
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default = "default_scores_filename")]
    pub scores_filename: String,
    /// Ignore very frequent characters when seeding similarity matches.
    #[serde(default = "default_true")]
    pub autojunk: bool,
}

fn default_input_directory() -> String {
    "DocBank_test_files".to_string()
}

fn default_output_directory() -> String {
    ".".to_string()
}

fn default_scores_filename() -> String {
    "parse_scores.json".to_string()
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            input_directory: default_input_directory(),
            output_directory: default_output_directory(),
            scores_filename: default_scores_filename(),
            autojunk: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Pdf,
    Word,
    Excel,
    Image,
}

impl DocumentFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Word),
            "xlsx" | "xls" => Some(Self::Excel),
            "jpg" | "jpeg" | "png" | "bmp" | "tiff" | "gif" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Excel => "excel",
            Self::Image => "image",
        }
    }
}
