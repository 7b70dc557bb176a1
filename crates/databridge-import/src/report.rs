use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::applier::ApplyOutcome;
use crate::error::ImportError;

/// Which unit of work a failure abandoned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureScope {
    Object,
    Directory,
}

/// One object or directory that could not be processed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportFailure {
    pub scope: FailureScope,
    pub path: PathBuf,
    pub message: String,
}

/// Summary of an import run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Objects that failed to load or apply.
    pub failed: usize,
    /// Entries that are not objects: stray files, nested directories,
    /// unrecognized extensions.
    pub skipped: usize,
    /// Kind directories fully enumerated.
    pub directories: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn record(&mut self, outcome: &ApplyOutcome) {
        match outcome {
            ApplyOutcome::Created(_) => self.created += 1,
            ApplyOutcome::Updated(_) => self.updated += 1,
            ApplyOutcome::Unchanged(_) => self.unchanged += 1,
        }
    }

    pub fn record_failure(&mut self, scope: FailureScope, path: &Path, err: &ImportError) {
        if scope == FailureScope::Object {
            self.failed += 1;
        }
        self.failures.push(ImportFailure {
            scope,
            path: path.to_path_buf(),
            message: err.to_string(),
        });
    }

    /// Objects that were created or updated.
    pub fn writes(&self) -> usize {
        self.created + self.updated
    }

    /// Objects the run attempted, successfully or not.
    pub fn objects(&self) -> usize {
        self.created + self.updated + self.unchanged + self.failed
    }

    /// Whether the run finished without any failure.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
