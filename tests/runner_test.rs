//! Batch runner integration tests.
//!
//! Drives [`BatchRunner`] with in-process converters so the status protocol,
//! the concurrency bound and the failure reporting policy can be checked
//! without LibreOffice or poppler installed.

use docbatch::grid::StatusGrid;
use docbatch::runner::{BatchRunner, ChannelObserver, ConversionBatch, StatusUpdate};
use docbatch_common::{FailureReporting, JobStatus, Operation};
use docbatch_convert::{page_file_name, Error};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn pdf_batch(output_dir: &Path, names: &[&str]) -> ConversionBatch {
    ConversionBatch::new(
        Operation::PdfToImage,
        output_dir.to_path_buf(),
        names
            .iter()
            .map(|n| PathBuf::from(format!("/in/{}.pdf", n)))
            .collect(),
    )
}

/// Stand-in for the PDF rasterizer: two "pages" per document, each a small
/// file whose content depends only on the source name.
fn fake_rasterizer(
    output_dir: PathBuf,
) -> impl Fn(&Path) -> docbatch_convert::Result<()> + Send + Sync {
    move |source: &Path| {
        let stem = source.file_stem().unwrap().to_string_lossy().into_owned();
        let page_dir = output_dir.join(&stem);
        std::fs::create_dir_all(&page_dir)?;
        for page in 1..=2 {
            let name = page_file_name(&stem, page, 2);
            std::fs::write(page_dir.join(name), format!("{} page {}", stem, page))?;
        }
        std::thread::sleep(Duration::from_millis(10));
        Ok(())
    }
}

fn collect_updates(
    runner: &BatchRunner,
    batch: &mut ConversionBatch,
    converter: &(dyn docbatch_convert::Converter),
) -> Vec<StatusUpdate> {
    let updates = Mutex::new(Vec::new());
    let observer = |u: StatusUpdate| updates.lock().unwrap().push(u);
    runner.run(batch, converter, &observer).unwrap();
    updates.into_inner().unwrap()
}

fn list_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap().to_path_buf();
            (rel, std::fs::read(e.path()).unwrap())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Notification protocol
// ---------------------------------------------------------------------------

#[test]
fn every_job_gets_one_processing_and_one_terminal_notification() {
    let out = tempfile::tempdir().unwrap();
    let mut batch = pdf_batch(out.path(), &["a", "b", "c", "d", "e", "f"]);
    let converter = fake_rasterizer(out.path().to_path_buf());
    let runner = BatchRunner::new(2).unwrap();

    let updates = collect_updates(&runner, &mut batch, &converter);
    assert_eq!(updates.len(), 12);

    for id in 1..=6 {
        let statuses: Vec<JobStatus> = updates
            .iter()
            .filter(|u| u.sequence_id == id)
            .map(|u| u.status)
            .collect();
        assert_eq!(statuses, vec![JobStatus::Processing, JobStatus::Succeeded]);
    }
    assert!(updates.iter().all(|u| u.batch_id == batch.id()));
}

#[test]
fn no_more_than_max_concurrency_jobs_run_at_once() {
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);
    let converter = |_: &Path| -> docbatch_convert::Result<()> {
        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(20));
        in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    };

    for max in [1, 2, 3] {
        peak.store(0, Ordering::SeqCst);
        let mut batch = pdf_batch(Path::new("/out"), &["1", "2", "3", "4", "5", "6", "7"]);
        let updates = collect_updates(&BatchRunner::new(max).unwrap(), &mut batch, &converter);

        assert!(peak.load(Ordering::SeqCst) <= max);

        // The observer's view obeys the same bound.
        let mut processing = 0usize;
        for update in &updates {
            match update.status {
                JobStatus::Processing => processing += 1,
                _ => processing -= 1,
            }
            assert!(processing <= max, "{} processing with max {}", processing, max);
        }
    }
}

#[test]
fn single_worker_runs_jobs_one_at_a_time() {
    let mut batch = pdf_batch(Path::new("/out"), &["a", "b", "c"]);
    let converter = |_: &Path| -> docbatch_convert::Result<()> { Ok(()) };
    let updates = collect_updates(&BatchRunner::new(1).unwrap(), &mut batch, &converter);

    for pair in updates.chunks(2) {
        assert_eq!(pair[0].status, JobStatus::Processing);
        assert_eq!(pair[1].status, JobStatus::Succeeded);
        assert_eq!(pair[0].sequence_id, pair[1].sequence_id);
    }
}

// ---------------------------------------------------------------------------
// Failure reporting
// ---------------------------------------------------------------------------

fn fails_on_b(source: &Path) -> docbatch_convert::Result<()> {
    if source.ends_with("b.pdf") {
        return Err(Error::tool_exited(
            "pdftoppm",
            Some(1),
            "Syntax Error: Couldn't read xref table",
        ));
    }
    Ok(())
}

#[test]
fn legacy_reporting_marks_failed_conversion_as_succeeded() {
    // Regression guard: users of the desktop tool relied on this.
    let mut batch = pdf_batch(Path::new("/out"), &["a", "b", "c"]);
    let runner = BatchRunner::new(3).unwrap();
    assert_eq!(runner.failure_reporting(), FailureReporting::Legacy);

    let updates = collect_updates(&runner, &mut batch, &fails_on_b);

    let terminal: Vec<_> = updates.iter().filter(|u| u.status.is_terminal()).collect();
    assert_eq!(terminal.len(), 3);
    assert!(terminal.iter().all(|u| u.status == JobStatus::Succeeded));
    assert!(batch.jobs().iter().all(|j| j.status() == JobStatus::Succeeded));

    // The swallowed error is still recorded on the job.
    let failed = &batch.jobs()[1];
    assert!(failed.error().unwrap().contains("xref"));
    assert!(batch.jobs()[0].error().is_none());
    assert!(batch.jobs()[2].error().is_none());
}

#[test]
fn strict_reporting_marks_failed_conversion_as_failed() {
    let mut batch = pdf_batch(Path::new("/out"), &["a", "b", "c"]);
    let runner = BatchRunner::new(2)
        .unwrap()
        .with_failure_reporting(FailureReporting::Strict);

    let updates = collect_updates(&runner, &mut batch, &fails_on_b);
    assert_eq!(updates.len(), 6);

    let statuses: Vec<_> = batch.jobs().iter().map(|j| j.status()).collect();
    assert_eq!(
        statuses,
        vec![JobStatus::Succeeded, JobStatus::Failed, JobStatus::Succeeded]
    );
    assert!(batch.jobs().iter().all(|j| j.finished_at().is_some()));
}

// ---------------------------------------------------------------------------
// End to end through the channel and the grid
// ---------------------------------------------------------------------------

#[test]
fn three_pdfs_two_workers_fill_three_page_directories() {
    let out = tempfile::tempdir().unwrap();
    let mut batch = pdf_batch(out.path(), &["alpha", "beta", "gamma"]);
    let mut grid = StatusGrid::from_batch(&batch);
    let (observer, mut rx) = ChannelObserver::channel();
    let output_dir = out.path().to_path_buf();

    let worker = std::thread::spawn(move || {
        let converter = fake_rasterizer(output_dir);
        BatchRunner::new(2)
            .unwrap()
            .run(&mut batch, &converter, &observer)
            .unwrap();
    });

    while let Some(update) = rx.blocking_recv() {
        assert!(grid.apply(&update));
        assert!(grid.counts().processing <= 2);
    }
    worker.join().unwrap();

    assert!(grid.is_complete());
    assert_eq!(grid.counts().succeeded, 3);

    let mut dirs: Vec<String> = std::fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    dirs.sort();
    assert_eq!(dirs, vec!["alpha", "beta", "gamma"]);
    assert!(out.path().join("beta/beta_1.jpg").exists());
}

#[test]
fn rerunning_a_batch_produces_the_same_files() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    let names = ["one", "two", "three", "four"];

    for out in [&first, &second] {
        let mut batch = pdf_batch(out.path(), &names);
        let converter = fake_rasterizer(out.path().to_path_buf());
        let observer = |_: StatusUpdate| {};
        BatchRunner::new(3)
            .unwrap()
            .run(&mut batch, &converter, &observer)
            .unwrap();
    }

    let a = list_tree(first.path());
    assert_eq!(a.len(), 8);
    assert_eq!(a, list_tree(second.path()));
}
