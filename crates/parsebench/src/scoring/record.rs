use serde::{Deserialize, Serialize};

/// Scores of one file group. A metric is `None` when its source file is
/// missing or could not be scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub prefix: String,
    #[serde(rename = "pdf_f1_bag_of_words")]
    pub pdf_f1: Option<f64>,
    pub pdf_similarity: Option<f64>,
    #[serde(rename = "jpg_f1_bag_of_words")]
    pub jpg_f1: Option<f64>,
    pub jpg_similarity: Option<f64>,
}

impl ScoreRecord {
    pub fn empty(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            pdf_f1: None,
            pdf_similarity: None,
            jpg_f1: None,
            jpg_similarity: None,
        }
    }

    pub fn set(&mut self, member: Member, scores: MemberScores) {
        match member {
            Member::Pdf => {
                self.pdf_f1 = Some(scores.f1);
                self.pdf_similarity = Some(scores.similarity);
            }
            Member::Jpg => {
                self.jpg_f1 = Some(scores.f1);
                self.jpg_similarity = Some(scores.similarity);
            }
        }
    }
}

/// A scored member of a file group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Member {
    Pdf,
    Jpg,
}

impl Member {
    pub fn name(&self) -> &'static str {
        match self {
            Member::Pdf => "pdf",
            Member::Jpg => "jpg",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Member::Pdf => "PDF",
            Member::Jpg => "JPG",
        }
    }

    pub fn artifact_name(&self, prefix: &str) -> String {
        format!("{}_{}_parsed.txt", prefix, self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberScores {
    pub f1: f64,
    pub similarity: f64,
}

pub fn ground_truth_artifact_name(prefix: &str) -> String {
    format!("{}_ground_truth.txt", prefix)
}
