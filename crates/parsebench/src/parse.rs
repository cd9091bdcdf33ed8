use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::processor::DocumentLoader;
use crate::storage::save_parsed_documents;

/// Files written by [`parse_file`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    pub text_path: PathBuf,
    pub meta_path: PathBuf,
    pub documents: usize,
}

/// Extracts `file` and saves `<save_name>.txt` and `<save_name>_meta.jsonl`.
///
/// Extraction never fails; a file nothing could read is saved as empty
/// outputs. Only write failures are returned.
pub fn parse_file(loader: &DocumentLoader, file: &Path, save_name: &str) -> Result<ParseOutput> {
    let _span = tracing::info_span!("parse_file", save_name).entered();

    let documents = loader.load_documents(&[file]);

    let text_path = PathBuf::from(format!("{}.txt", save_name));
    let meta_path = PathBuf::from(format!("{}_meta.jsonl", save_name));
    save_parsed_documents(&documents, &text_path, &meta_path)?;

    Ok(ParseOutput {
        text_path,
        meta_path,
        documents: documents.len(),
    })
}
