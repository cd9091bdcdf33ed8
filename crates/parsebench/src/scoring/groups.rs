use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::ScoringError;

/// Identity of a DocBank sample: the file name up to its second dot.
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^.]+\.[^.]+)").unwrap());

/// Files of one sample that share a prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileGroup {
    pub prefix: String,
    pub ground_truth: Option<PathBuf>,
    pub pdf: Option<PathBuf>,
    pub jpg: Option<PathBuf>,
}

impl FileGroup {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// Only groups with ground truth can be scored.
    pub fn is_scorable(&self) -> bool {
        self.ground_truth.is_some()
    }

    fn slot_for(&mut self, extension: &str) -> Option<&mut Option<PathBuf>> {
        match extension {
            "txt" => Some(&mut self.ground_truth),
            "pdf" => Some(&mut self.pdf),
            "jpg" => Some(&mut self.jpg),
            _ => None,
        }
    }
}

pub fn prefix_of(filename: &str) -> Option<&str> {
    PREFIX_RE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Groups the files directly inside `dir` by prefix, in prefix order.
///
/// Within a group the first file in name order wins a member slot; files
/// with other extensions are ignored.
pub fn group_files(dir: &Path) -> Result<Vec<FileGroup>, ScoringError> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| ScoringError::ScanFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        if entry.file_type().is_file() {
            entries.push(entry.into_path());
        }
    }

    let mut groups: BTreeMap<String, FileGroup> = BTreeMap::new();
    for path in entries {
        let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(prefix) = prefix_of(filename) else {
            log::debug!("Ignoring {}: no sample prefix", filename);
            continue;
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let group = groups
            .entry(prefix.to_string())
            .or_insert_with(|| FileGroup::new(prefix));
        match group.slot_for(&extension) {
            Some(slot) if slot.is_none() => *slot = Some(path.clone()),
            Some(_) => log::debug!("Ignoring duplicate .{} member {}", extension, filename),
            None => {}
        }
    }

    Ok(groups.into_values().collect())
}
