//! Batch conversion runner.
//!
//! Runs every job of a [`ConversionBatch`] through a [`Converter`] on a
//! dedicated pool of `max_concurrency` worker threads and reports each
//! job's transitions to a [`StatusObserver`]:
//!
//! ```text
//! Pending --dispatch--> Processing --convert returns--> Succeeded | Failed
//! ```
//!
//! A conversion error never aborts the batch. Under
//! [`FailureReporting::Legacy`] the job passes through `Failed` and is then
//! overwritten with `Succeeded`; only the job's `error` records what
//! happened. [`FailureReporting::Strict`] keeps `Failed`.

mod observer;
mod types;

pub use observer::{ChannelObserver, StatusObserver};
pub use types::*;

use anyhow::{Context, Result};
use docbatch_common::FailureReporting;
use docbatch_convert::Converter;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use uuid::Uuid;

/// Executes batches with bounded parallelism.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    max_concurrency: usize,
    failure_reporting: FailureReporting,
}

impl BatchRunner {
    /// Create a runner that converts at most `max_concurrency` files at once.
    pub fn new(max_concurrency: usize) -> Result<Self> {
        if max_concurrency == 0 {
            anyhow::bail!("max concurrency must be at least 1");
        }
        Ok(Self {
            max_concurrency,
            failure_reporting: FailureReporting::default(),
        })
    }

    pub fn with_failure_reporting(mut self, failure_reporting: FailureReporting) -> Self {
        self.failure_reporting = failure_reporting;
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub fn failure_reporting(&self) -> FailureReporting {
        self.failure_reporting
    }

    /// Run every job of `batch` to completion.
    ///
    /// Blocks until the last job finishes. Each job is notified exactly twice:
    /// once entering `Processing` and once with its terminal status. Errors
    /// are only returned for failures to set up the worker pool.
    pub fn run(
        &self,
        batch: &mut ConversionBatch,
        converter: &dyn Converter,
        observer: &dyn StatusObserver,
    ) -> Result<()> {
        if batch.is_empty() {
            tracing::debug!("Batch {} has no jobs", batch.id());
            return Ok(());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_concurrency)
            .thread_name(|i| format!("docbatch-worker-{}", i))
            .build()
            .context("Failed to create conversion worker pool")?;

        let batch_id = batch.id();
        let reporting = self.failure_reporting;

        tracing::info!(
            "Starting batch {}: {} {} file(s) into {:?} with {} worker(s)",
            batch_id,
            batch.len(),
            batch.operation().display_name(),
            batch.output_dir(),
            self.max_concurrency
        );

        pool.install(|| {
            batch.jobs_mut().par_iter_mut().for_each(|job| {
                run_job(batch_id, job, converter, observer, reporting);
            });
        });

        tracing::info!("Batch {} finished", batch_id);
        Ok(())
    }
}

fn run_job(
    batch_id: Uuid,
    job: &mut ConversionJob,
    converter: &dyn Converter,
    observer: &dyn StatusObserver,
    reporting: FailureReporting,
) {
    job.start();
    tracing::debug!("[{}] processing {:?}", job.sequence_id(), job.source_path());
    observer.notify(job.snapshot(batch_id));

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(job.source_path())))
        .unwrap_or_else(|payload| {
            Err(docbatch_convert::Error::InvalidInput(format!(
                "{} panicked: {}",
                converter.name(),
                panic_message(payload.as_ref())
            )))
        });

    if let Err(e) = &outcome {
        tracing::warn!(
            "[{}] {} failed for {:?}: {}",
            job.sequence_id(),
            converter.name(),
            job.source_path(),
            e
        );
        job.fail(&e.to_string());
    }
    job.finish(reporting.terminal_status(outcome.is_err()));

    tracing::debug!("[{}] {}", job.sequence_id(), job.status());
    observer.notify(job.snapshot(batch_id));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbatch_common::{JobStatus, Operation};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    fn batch(names: &[&str]) -> ConversionBatch {
        ConversionBatch::new(
            Operation::PdfToImage,
            PathBuf::from("/out"),
            names.iter().map(|n| PathBuf::from(format!("/in/{}", n))).collect(),
        )
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(BatchRunner::new(0).is_err());
        assert_eq!(BatchRunner::new(3).unwrap().max_concurrency(), 3);
    }

    #[test]
    fn test_default_policy_is_legacy() {
        let runner = BatchRunner::new(1).unwrap();
        assert_eq!(runner.failure_reporting(), FailureReporting::Legacy);
    }

    #[test]
    fn test_empty_batch_sends_nothing() {
        let mut empty = batch(&[]);
        let seen = Mutex::new(0usize);
        let observer = |_: StatusUpdate| *seen.lock().unwrap() += 1;
        let converter = |_: &Path| -> docbatch_convert::Result<()> { Ok(()) };

        BatchRunner::new(2)
            .unwrap()
            .run(&mut empty, &converter, &observer)
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_panic_is_contained() {
        let mut b = batch(&["boom.pdf", "fine.pdf"]);
        let converter = |path: &Path| -> docbatch_convert::Result<()> {
            if path.ends_with("boom.pdf") {
                panic!("renderer crashed");
            }
            Ok(())
        };
        let observer = |_: StatusUpdate| {};

        BatchRunner::new(2)
            .unwrap()
            .with_failure_reporting(FailureReporting::Strict)
            .run(&mut b, &converter, &observer)
            .unwrap();

        assert_eq!(b.jobs()[0].status(), JobStatus::Failed);
        assert!(b.jobs()[0].error().unwrap().contains("renderer crashed"));
        assert_eq!(b.jobs()[1].status(), JobStatus::Succeeded);
    }

    #[test]
    fn test_panic_message_variants() {
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(owned.as_ref()), "owned");
        let borrowed: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(borrowed.as_ref()), "static");
        let other: Box<dyn std::any::Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }
}
