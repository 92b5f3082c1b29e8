use chrono::{DateTime, Utc};
use docbatch_common::{JobStatus, Operation};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One selected input file and its conversion status.
///
/// Only the worker a job is handed to mutates it during a run; everyone else
/// sees [`StatusUpdate`] snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionJob {
    sequence_id: usize,
    source_path: PathBuf,
    status: JobStatus,
    error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

impl ConversionJob {
    pub fn new(sequence_id: usize, source_path: PathBuf) -> Self {
        Self {
            sequence_id,
            source_path,
            status: JobStatus::Pending,
            error: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// 1-based position in the original selection. Display only.
    pub fn sequence_id(&self) -> usize {
        self.sequence_id
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Error raised by the conversion, kept even when the status hides it.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub(crate) fn start(&mut self) {
        self.status = JobStatus::Processing;
        self.started_at = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, error: &str) {
        self.status = JobStatus::Failed;
        self.error = Some(error.to_string());
    }

    pub(crate) fn finish(&mut self, status: JobStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    /// Snapshot of this job for observers.
    pub fn snapshot(&self, batch_id: Uuid) -> StatusUpdate {
        StatusUpdate {
            batch_id,
            sequence_id: self.sequence_id,
            source_path: self.source_path.clone(),
            status: self.status,
            error: self.error.clone(),
            at: Utc::now(),
        }
    }
}

/// Files converted together with one operation into one output directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionBatch {
    id: Uuid,
    operation: Operation,
    output_dir: PathBuf,
    jobs: Vec<ConversionJob>,
}

impl ConversionBatch {
    /// Create a batch with one pending job per file, numbered from 1 in
    /// selection order.
    pub fn new(operation: Operation, output_dir: PathBuf, files: Vec<PathBuf>) -> Self {
        let mut batch = Self {
            id: Uuid::new_v4(),
            operation,
            output_dir,
            jobs: Vec::new(),
        };
        batch.replace_jobs(files);
        batch
    }

    /// Discard every job and list `files` instead.
    ///
    /// This is the only way jobs enter or leave a batch.
    pub fn replace_jobs(&mut self, files: Vec<PathBuf>) {
        self.jobs = files
            .into_iter()
            .enumerate()
            .map(|(i, path)| ConversionJob::new(i + 1, path))
            .collect();
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn jobs(&self) -> &[ConversionJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub(crate) fn jobs_mut(&mut self) -> &mut [ConversionJob] {
        &mut self.jobs
    }
}

/// Published state of one job after a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub batch_id: Uuid,
    pub sequence_id: usize,
    pub source_path: PathBuf,
    pub status: JobStatus,
    pub error: Option<String>,
    pub at: DateTime<Utc>,
}
