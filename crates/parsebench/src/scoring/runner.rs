use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use crate::config::Config;
use crate::error::ScoringError;
use crate::processor::DocumentLoader;
use crate::sanitize;
use crate::storage::ArtifactWriter;

use super::ground_truth::extract_ground_truth;
use super::groups::{group_files, FileGroup};
use super::metrics::f1_bag_of_words;
use super::normalize::normalize;
use super::progress::{ProgressReporter, ScoringEvent};
use super::record::{ground_truth_artifact_name, Member, MemberScores, ScoreRecord};
use super::similarity::similarity_with;

/// Scores extraction quality for every file group in an input directory.
pub struct Scorer {
    loader: DocumentLoader,
    writer: ArtifactWriter,
    input_directory: PathBuf,
    scores_filename: String,
    autojunk: bool,
}

impl Scorer {
    /// Production constructor: builds the document loader from config.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DocumentLoader::from_config(config),
            &config.scoring.input_directory,
            &config.scoring.output_directory,
        )
        .with_scores_filename(&config.scoring.scores_filename)
        .with_autojunk(config.scoring.autojunk)
    }

    pub fn new<I: AsRef<Path>, O: AsRef<Path>>(
        loader: DocumentLoader,
        input_directory: I,
        output_directory: O,
    ) -> Self {
        Self {
            loader,
            writer: ArtifactWriter::new(output_directory),
            input_directory: input_directory.as_ref().to_path_buf(),
            scores_filename: "parse_scores.json".to_string(),
            autojunk: true,
        }
    }

    pub fn with_scores_filename(mut self, filename: &str) -> Self {
        self.scores_filename = filename.to_string();
        self
    }

    pub fn with_autojunk(mut self, autojunk: bool) -> Self {
        self.autojunk = autojunk;
        self
    }

    pub fn scores_path(&self) -> PathBuf {
        self.writer.path_for(&self.scores_filename)
    }

    /// Runs the whole batch and writes the scores file.
    ///
    /// Only a failed directory scan or a failed scores-file write is an
    /// error; per-group problems are logged and leave metrics empty.
    pub fn run(&self, progress: &dyn ProgressReporter) -> Result<Vec<ScoreRecord>, ScoringError> {
        let _run_span = info_span!(
            "score_run",
            input = %sanitize::redact_path(&self.input_directory),
            input_hash = %sanitize::hash_path(&self.input_directory),
        )
        .entered();

        let groups = {
            let _step = info_span!("group_files").entered();
            group_files(&self.input_directory)?
        };
        info!("Found {} file group(s)", groups.len());

        let mut records = Vec::new();
        for group in &groups {
            if !group.is_scorable() {
                warn!("Skipping {}: no ground truth .txt file", group.prefix);
                progress.report(ScoringEvent::GroupSkipped {
                    prefix: group.prefix.clone(),
                });
                continue;
            }
            records.push(self.score_group(group, progress));
        }

        let scores_path = {
            let _step = info_span!("write_scores").entered();
            self.writer.write_json(&self.scores_filename, &records)?
        };
        info!(
            "Results for {} group(s) saved to {}",
            records.len(),
            scores_path.display()
        );
        progress.report(ScoringEvent::Finished {
            scores_path,
            groups: records.len(),
        });

        Ok(records)
    }

    fn score_group(&self, group: &FileGroup, progress: &dyn ProgressReporter) -> ScoreRecord {
        let _group_span = info_span!("score_group", prefix = %group.prefix).entered();
        let mut record = ScoreRecord::empty(&group.prefix);

        let Some(ground_truth) = self.step_load_ground_truth(group) else {
            return record;
        };

        let members = [(Member::Pdf, &group.pdf), (Member::Jpg, &group.jpg)];
        for (member, path) in members {
            let Some(path) = path else {
                continue;
            };

            let _step = info_span!("score_member", member = member.name()).entered();
            match self.step_score_member(&group.prefix, member, path, &ground_truth) {
                Ok(scores) => {
                    record.set(member, scores);
                    progress.report(ScoringEvent::MemberScored {
                        prefix: group.prefix.clone(),
                        member,
                        scores,
                    });
                }
                Err(e) => {
                    warn!("Error parsing {} for {}: {}", member.label(), group.prefix, e);
                    progress.report(ScoringEvent::MemberFailed {
                        prefix: group.prefix.clone(),
                        member,
                        error: e.to_string(),
                    });
                }
            }
        }

        record
    }

    /// Raw reference text, with its normalized form saved for inspection.
    fn step_load_ground_truth(&self, group: &FileGroup) -> Option<String> {
        let _step = info_span!("load_ground_truth").entered();
        let path = group.ground_truth.as_deref()?;

        let ground_truth = match extract_ground_truth(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping metrics for {}: {}", group.prefix, e);
                return None;
            }
        };

        let artifact = ground_truth_artifact_name(&group.prefix);
        if let Err(e) = self
            .writer
            .write_text(&artifact, normalize(&ground_truth).as_str())
        {
            warn!("Could not save {}: {}", artifact, e);
        }

        Some(ground_truth)
    }

    /// Metrics compare raw texts; only the saved artifact is normalized.
    fn step_score_member(
        &self,
        prefix: &str,
        member: Member,
        path: &Path,
        ground_truth: &str,
    ) -> Result<MemberScores, ScoringError> {
        let text = self.loader.file_to_text(path);
        debug!(
            "Extracted {} chars from {}",
            text.chars().count(),
            sanitize::redact_path(path)
        );

        self.writer
            .write_text(&member.artifact_name(prefix), normalize(&text).as_str())?;

        Ok(MemberScores {
            f1: f1_bag_of_words(&text, ground_truth),
            similarity: similarity_with(&text, ground_truth, self.autojunk),
        })
    }
}
