use std::path::PathBuf;

use crate::scoring::record::{Member, MemberScores};

/// Events emitted by the scorer while it works through a batch.
#[derive(Debug, Clone)]
pub enum ScoringEvent {
    GroupSkipped {
        prefix: String,
    },
    MemberScored {
        prefix: String,
        member: Member,
        scores: MemberScores,
    },
    MemberFailed {
        prefix: String,
        member: Member,
        error: String,
    },
    Finished {
        scores_path: PathBuf,
        groups: usize,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ScoringEvent);
}

/// No-op reporter for library callers and tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ScoringEvent) {}
}
