use std::path::Path;

use crate::error::ScoringError;

/// Token column marker for figure regions, which carry no text.
const FIGURE_MARKER: &str = "##LTFigure##";

/// Annotation lines with fewer columns are not token rows.
const MIN_COLUMNS: usize = 10;

/// Reference text from a DocBank annotation string: the token column of every
/// well-formed row, joined by single spaces.
pub fn parse_ground_truth(annotations: &str) -> String {
    annotations
        .lines()
        .filter_map(|line| {
            let columns: Vec<&str> = line.trim().split('\t').collect();
            if columns.len() < MIN_COLUMNS {
                return None;
            }
            let token = columns[0];
            (!token.is_empty() && token != FIGURE_MARKER).then_some(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn extract_ground_truth(path: &Path) -> Result<String, ScoringError> {
    let annotations =
        std::fs::read_to_string(path).map_err(|e| ScoringError::ReadGroundTruth {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(parse_ground_truth(&annotations))
}
