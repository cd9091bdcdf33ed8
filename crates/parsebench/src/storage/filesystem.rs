use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::StorageError;
use crate::processor::Document;

/// Separator written after every document in a saved parse.
pub const PAGE_BREAK: &str = "\n\n--- PAGE BREAK ---\n\n";

/// Writes run artifacts under a single output directory.
pub struct ArtifactWriter {
    output_directory: PathBuf,
}

impl ArtifactWriter {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.output_directory.join(filename)
    }

    pub fn ensure_output_directory(&self) -> Result<(), StorageError> {
        ensure_directory(&self.output_directory)
    }

    /// Writes `content` to `filename`, replacing any previous run's file.
    pub fn write_text(&self, filename: &str, content: &str) -> Result<PathBuf, StorageError> {
        self.ensure_output_directory()?;
        let path = self.path_for(filename);
        write_file(&path, content.as_bytes())?;
        Ok(path)
    }

    /// Writes `value` as pretty-printed JSON.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        filename: &str,
        value: &T,
    ) -> Result<PathBuf, StorageError> {
        let path = self.path_for(filename);
        let json = serde_json::to_string_pretty(value).map_err(|e| StorageError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        self.write_text(filename, &json)
    }
}

pub fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if !path.exists() {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

fn write_file(path: &Path, content: &[u8]) -> Result<(), StorageError> {
    std::fs::write(path, content).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Saves a parse as `text_path` (each document followed by a page break) and
/// `meta_path` (one JSON record per line).
pub fn save_parsed_documents(
    documents: &[Document],
    text_path: &Path,
    meta_path: &Path,
) -> Result<(), StorageError> {
    for path in [text_path, meta_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_directory(parent)?;
        }
    }

    let mut text = String::new();
    for doc in documents {
        text.push_str(&doc.content);
        text.push_str(PAGE_BREAK);
    }
    write_file(text_path, text.as_bytes())?;

    let mut meta = Vec::new();
    for doc in documents {
        serde_json::to_writer(&mut meta, doc).map_err(|e| StorageError::Serialize {
            path: meta_path.to_path_buf(),
            source: e,
        })?;
        meta.write_all(b"\n").map_err(|e| StorageError::WriteFile {
            path: meta_path.to_path_buf(),
            source: e,
        })?;
    }
    write_file(meta_path, &meta)
}
