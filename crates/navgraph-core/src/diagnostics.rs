//! Build diagnostics: everything recoverable that went wrong during a build

use crate::error::RecordError;
use crate::node::NodeId;
use crate::text::IgnoredMatch;
use serde::{Deserialize, Serialize};

/// Two records with the same id; the first one was kept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateIdWarning {
    pub id: NodeId,
    pub kept_type: String,
    pub kept_origin: String,
    pub dropped_type: String,
    pub dropped_origin: String,
}

/// A reference whose target was found neither by id nor by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReferenceWarning {
    pub from: NodeId,
    pub relation: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
    /// Dropped entirely rather than kept as a dangling edge
    #[serde(default)]
    pub skipped: bool,
}

/// Accumulated recoverable problems from one build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub dropped_records: Vec<RecordError>,
    pub duplicates: Vec<DuplicateIdWarning>,
    pub unresolved: Vec<UnresolvedReferenceWarning>,
    pub ignored_matches: Vec<IgnoredMatch>,
}

/// Counts of each diagnostic category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsSummary {
    pub dropped_records: usize,
    pub duplicates: usize,
    pub dangling_edges: usize,
    pub skipped_references: usize,
    pub ignored_matches: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> DiagnosticsSummary {
        let skipped = self.unresolved.iter().filter(|u| u.skipped).count();
        DiagnosticsSummary {
            dropped_records: self.dropped_records.len(),
            duplicates: self.duplicates.len(),
            dangling_edges: self.unresolved.len() - skipped,
            skipped_references: skipped,
            ignored_matches: self.ignored_matches.len(),
        }
    }

    /// Dangling references only, excluding skipped optional ones
    pub fn dangling(&self) -> impl Iterator<Item = &UnresolvedReferenceWarning> {
        self.unresolved.iter().filter(|u| !u.skipped)
    }

    /// True when nothing was dropped, duplicated or left dangling
    pub fn is_clean(&self) -> bool {
        self.dropped_records.is_empty() && self.duplicates.is_empty() && self.dangling().next().is_none()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.dropped_records.extend(other.dropped_records);
        self.duplicates.extend(other.duplicates);
        self.unresolved.extend(other.unresolved);
        self.ignored_matches.extend(other.ignored_matches);
    }
}

impl std::fmt::Display for DiagnosticsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} dropped records, {} duplicate ids, {} dangling edges, {} skipped references, {} ignored matches",
            self.dropped_records,
            self.duplicates,
            self.dangling_edges,
            self.skipped_references,
            self.ignored_matches
        )
    }
}
