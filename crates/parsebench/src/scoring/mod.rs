pub mod ground_truth;
pub mod groups;
pub mod metrics;
pub mod normalize;
pub mod progress;
pub mod record;
pub mod runner;
pub mod similarity;

pub use ground_truth::{extract_ground_truth, parse_ground_truth};
pub use groups::{group_files, prefix_of, FileGroup};
pub use metrics::f1_bag_of_words;
pub use normalize::{normalize, normalize_tokens, NormalizedText};
pub use progress::{NoopProgress, ProgressReporter, ScoringEvent};
pub use record::{Member, MemberScores, ScoreRecord};
pub use runner::Scorer;
pub use similarity::{similarity, similarity_with, SequenceMatcher};
