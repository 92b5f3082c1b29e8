//! Text status grid for a running batch.
//!
//! The grid belongs to the display thread. Workers never touch it; it only
//! changes through [`StatusGrid::apply`] with updates drained from the
//! runner's channel.

use crate::runner::{ConversionBatch, StatusUpdate};
use docbatch_common::JobStatus;
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub sequence_id: usize,
    pub source_path: PathBuf,
    pub status: JobStatus,
    pub error: Option<String>,
}

/// Number of rows in each status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub pending: usize,
    pub processing: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct StatusGrid {
    rows: Vec<GridRow>,
}

impl StatusGrid {
    /// One row per job, in selection order.
    pub fn from_batch(batch: &ConversionBatch) -> Self {
        let rows = batch
            .jobs()
            .iter()
            .map(|job| GridRow {
                sequence_id: job.sequence_id(),
                source_path: job.source_path().to_path_buf(),
                status: job.status(),
                error: job.error().map(str::to_string),
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Apply an update. Returns `false` if no row has its sequence id.
    pub fn apply(&mut self, update: &StatusUpdate) -> bool {
        let Some(row) = self
            .rows
            .iter_mut()
            .find(|r| r.sequence_id == update.sequence_id)
        else {
            tracing::debug!("Status update for unknown row {}", update.sequence_id);
            return false;
        };
        row.status = update.status;
        row.error = update.error.clone();
        true
    }

    pub fn counts(&self) -> StatusCounts {
        self.rows
            .iter()
            .fold(StatusCounts::default(), |mut counts, row| {
                match row.status {
                    JobStatus::Pending => counts.pending += 1,
                    JobStatus::Processing => counts.processing += 1,
                    JobStatus::Succeeded => counts.succeeded += 1,
                    JobStatus::Failed => counts.failed += 1,
                }
                counts
            })
    }

    /// Every row has reached a terminal status.
    pub fn is_complete(&self) -> bool {
        self.rows.iter().all(|r| r.status.is_terminal())
    }

    /// Render the whole grid as an aligned table.
    pub fn render(&self) -> String {
        let id_width = self
            .rows
            .iter()
            .map(|r| r.sequence_id.to_string().len())
            .max()
            .unwrap_or(1)
            .max(1);

        let mut out = String::new();
        let _ = writeln!(out, "{:>id_width$}  {:<10}  File", "#", "Status");
        for row in &self.rows {
            let _ = writeln!(out, "{}", render_row(row, id_width));
        }
        out
    }
}

fn render_row(row: &GridRow, id_width: usize) -> String {
    let mut line = format!(
        "{:>id_width$}  {:<10}  {}",
        row.sequence_id,
        row.status.label(),
        row.source_path.display()
    );
    if let Some(ref error) = row.error {
        let _ = write!(line, "  ({})", error);
    }
    line
}

/// Single progress line for a just-applied update.
pub fn render_update(update: &StatusUpdate) -> String {
    let row = GridRow {
        sequence_id: update.sequence_id,
        source_path: update.source_path.clone(),
        status: update.status,
        error: update.error.clone(),
    };
    render_row(&row, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docbatch_common::Operation;

    fn batch() -> ConversionBatch {
        ConversionBatch::new(
            Operation::WordToPdf,
            PathBuf::from("/out"),
            vec![PathBuf::from("/in/a.docx"), PathBuf::from("/in/b.docx")],
        )
    }

    fn update(batch: &ConversionBatch, sequence_id: usize, status: JobStatus) -> StatusUpdate {
        StatusUpdate {
            batch_id: batch.id(),
            sequence_id,
            source_path: PathBuf::from("/in/a.docx"),
            status,
            error: None,
            at: Utc::now(),
        }
    }

    #[test]
    fn test_grid_starts_pending() {
        let grid = StatusGrid::from_batch(&batch());
        assert_eq!(grid.rows().len(), 2);
        assert_eq!(
            grid.counts(),
            StatusCounts {
                pending: 2,
                ..Default::default()
            }
        );
        assert!(!grid.is_complete());
    }

    #[test]
    fn test_apply_updates_counts() {
        let b = batch();
        let mut grid = StatusGrid::from_batch(&b);

        assert!(grid.apply(&update(&b, 1, JobStatus::Processing)));
        assert_eq!(grid.counts().processing, 1);

        assert!(grid.apply(&update(&b, 1, JobStatus::Succeeded)));
        assert!(grid.apply(&update(&b, 2, JobStatus::Failed)));
        assert_eq!(grid.counts().succeeded, 1);
        assert_eq!(grid.counts().failed, 1);
        assert!(grid.is_complete());
    }

    #[test]
    fn test_apply_unknown_row() {
        let b = batch();
        let mut grid = StatusGrid::from_batch(&b);
        assert!(!grid.apply(&update(&b, 99, JobStatus::Processing)));
    }

    #[test]
    fn test_render_shows_error() {
        let b = batch();
        let mut grid = StatusGrid::from_batch(&b);
        let mut u = update(&b, 2, JobStatus::Succeeded);
        u.error = Some("soffice exited with 1".into());
        grid.apply(&u);

        let table = grid.render();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Status"));
        assert!(lines[1].contains("Pending"));
        assert!(lines[2].contains("Succeeded"));
        assert!(lines[2].ends_with("(soffice exited with 1)"));
    }

    #[test]
    fn test_render_update_line() {
        let b = batch();
        let line = render_update(&update(&b, 1, JobStatus::Processing));
        assert_eq!(line, "1  Processing  /in/a.docx");
    }
}
