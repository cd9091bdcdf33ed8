pub mod config;
pub mod error;
pub mod parse;
pub mod processor;
pub mod sanitize;
pub mod scoring;
pub mod storage;

pub use config::{load_config, load_config_or_default, Config, DocumentFormat};
pub use error::{ConfigError, ParsebenchError, ProcessError, Result, ScoringError, StorageError};
pub use parse::{parse_file, ParseOutput};
pub use processor::{Document, DocumentLoader, FallbackChain};
pub use scoring::{f1_bag_of_words, normalize, similarity, ScoreRecord, Scorer};
pub use storage::{save_parsed_documents, ArtifactWriter};
