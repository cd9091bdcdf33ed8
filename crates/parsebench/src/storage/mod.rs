pub mod filesystem;

pub use filesystem::{ensure_directory, save_parsed_documents, ArtifactWriter, PAGE_BREAK};
