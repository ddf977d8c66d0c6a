//! Per-feed outcomes collected by a run.

use std::path::{Path, PathBuf};

/// What happened to one feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Filtered content was written to `path`.
    Written {
        url: String,
        path: PathBuf,
        bytes: usize,
    },
    /// Feed was left out after a fetch or naming error.
    Skipped { url: String, reason: String },
}

impl FeedOutcome {
    pub fn url(&self) -> &str {
        match self {
            FeedOutcome::Written { url, .. } | FeedOutcome::Skipped { url, .. } => url,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            FeedOutcome::Written { path, .. } => Some(path),
            FeedOutcome::Skipped { .. } => None,
        }
    }
}

/// Outcomes of every feed in a completed run, in completion order.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<FeedOutcome>,
}

impl RunSummary {
    pub fn push(&mut self, outcome: FeedOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn written(&self) -> impl Iterator<Item = &FeedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FeedOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> impl Iterator<Item = &FeedOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FeedOutcome::Skipped { .. }))
    }

    pub fn written_count(&self) -> usize {
        self.written().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}
