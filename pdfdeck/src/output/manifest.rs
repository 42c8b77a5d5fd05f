//! JSON manifest describing the produced artifacts.

use serde::{Deserialize, Serialize};

use crate::pipeline::Outcome;

/// One produced file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Output file name.
    pub file_name: String,
    /// 1-based page number, for split pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    /// Pages in a merged document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    /// Size in bytes.
    pub size: u64,
    /// JPEG data URI, omitted when no thumbnail was rendered.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub thumbnail: String,
}

/// Description of one run's outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// `split` or `merge`.
    pub operation: String,
    /// Input names in the order they were processed.
    pub sources: Vec<String>,
    /// Archive the entries were bundled into, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    /// Produced files.
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Manifest for a set of outcomes, in order.
    pub fn from_outcomes(outcomes: &[Outcome], sources: Vec<String>) -> Self {
        let mut entries = Vec::new();
        let mut operation = "split";
        for outcome in outcomes {
            match outcome {
                Outcome::Split(split) => {
                    entries.extend(split.pages.iter().map(|page| ManifestEntry {
                        file_name: page.file_name.clone(),
                        page_number: Some(page.page_number),
                        page_count: None,
                        size: page.bytes.len() as u64,
                        thumbnail: page.thumbnail.clone(),
                    }));
                }
                Outcome::Merge(merge) => {
                    operation = "merge";
                    entries.push(ManifestEntry {
                        file_name: merge.artifact.file_name.clone(),
                        page_number: None,
                        page_count: Some(merge.artifact.page_count),
                        size: merge.artifact.bytes.len() as u64,
                        thumbnail: merge.artifact.thumbnail.clone(),
                    });
                }
            }
        }
        Self {
            operation: operation.to_string(),
            sources,
            archive: None,
            entries,
        }
    }

    /// Record the archive the entries went into.
    pub fn with_archive(mut self, name: impl Into<String>) -> Self {
        self.archive = Some(name.into());
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
