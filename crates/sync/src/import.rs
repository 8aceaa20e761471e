#![forbid(unsafe_code)]

//! Bulk paste of tab-separated rows into the registries.
//!
//! Rows are merged starting at `start` (the selected row, or the end of the
//! registry when nothing is selected). A row that parses overwrites the record
//! at the current position or, past the end, appends a new record; either way
//! the position moves forward by one. Rows that do not parse are skipped
//! silently and do not move the position. Each row is persisted on its own, so
//! a store failure part way through leaves the earlier rows applied.

use crate::error::SyncError;
use crate::modes::ModeRegistry;
use crate::notify::NotificationPort;
use crate::rejection::{Rejection, Repair};
use crate::steps::StepRegistry;
use de_core::tsv::{self, ModeRow, StepRow};
use de_core::{ModePatch, RecordId, StepPatch};
use de_storage::RecordStore;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of existing records that were overwritten, in paste order.
    pub overwritten: Vec<RecordId>,
    /// Ids of records created past the end of the registry, in paste order.
    pub appended: Vec<RecordId>,
    pub repairs: Vec<Repair>,
    pub skipped: usize,
}

impl ImportReport {
    pub fn applied(&self) -> usize {
        self.overwritten.len() + self.appended.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    Completed(ImportReport),
    Blocked(Rejection),
}

pub fn import_mode_rows<S: RecordStore>(
    modes: &mut ModeRegistry,
    store: &S,
    text: &str,
    start: Option<usize>,
) -> Result<ImportReport, SyncError> {
    let mut report = ImportReport::default();
    let mut position = start_position(start, modes.len());

    for line in tsv::split_rows(text) {
        let Some(row) = tsv::parse_mode_row(line) else {
            tracing::debug!(row = line, "skipped unparsable mode row");
            report.skipped += 1;
            continue;
        };

        let patch = mode_patch(row);
        if position < modes.len() {
            report.overwritten.push(modes.overwrite_at(store, position, &patch)?);
        } else {
            report.appended.push(modes.add_with(store, &patch)?);
        }
        position += 1;
    }

    tracing::info!(
        overwritten = report.overwritten.len(),
        appended = report.appended.len(),
        skipped = report.skipped,
        "imported mode rows"
    );
    Ok(report)
}

pub fn import_step_rows<S: RecordStore>(
    steps: &mut StepRegistry,
    modes: &ModeRegistry,
    store: &S,
    notifier: &dyn NotificationPort,
    text: &str,
    start: Option<usize>,
) -> Result<ImportOutcome, SyncError> {
    let Some(fallback) = modes.first().map(|mode| mode.id) else {
        let rejection = Rejection::NoModesForImport;
        tracing::warn!("step import blocked: no modes");
        notifier.notify(&rejection.notice());
        return Ok(ImportOutcome::Blocked(rejection));
    };

    let mut report = ImportReport::default();
    let mut position = start_position(start, steps.len());

    for line in tsv::split_rows(text) {
        let Some(row) = tsv::parse_step_row(line) else {
            tracing::debug!(row = line, "skipped unparsable step row");
            report.skipped += 1;
            continue;
        };

        let mode_id = if modes.contains(row.mode_id) {
            row.mode_id
        } else {
            let repair = Repair {
                requested: row.mode_id,
                substituted: fallback,
            };
            tracing::warn!(requested = row.mode_id, substituted = fallback, "repaired step mode reference");
            notifier.notify(&repair.notice());
            report.repairs.push(repair);
            fallback
        };

        let patch = step_patch(row);
        if position < steps.len() {
            let patch = StepPatch {
                mode_id: Some(mode_id),
                ..patch
            };
            report.overwritten.push(steps.overwrite_at(store, position, &patch)?);
        } else {
            report.appended.push(steps.add_with(store, mode_id, &patch)?);
        }
        position += 1;
    }

    tracing::info!(
        overwritten = report.overwritten.len(),
        appended = report.appended.len(),
        repaired = report.repairs.len(),
        skipped = report.skipped,
        "imported step rows"
    );
    Ok(ImportOutcome::Completed(report))
}

fn start_position(start: Option<usize>, len: usize) -> usize {
    start.map_or(len, |index| index.min(len))
}

fn mode_patch(row: ModeRow) -> ModePatch {
    ModePatch {
        name: Some(row.name),
        max_bottle_number: Some(row.max_bottle_number),
        max_used_tips: Some(row.max_used_tips),
    }
}

// Leaves mode_id out: it is resolved against the mode registry first.
fn step_patch(row: StepRow) -> StepPatch {
    StepPatch {
        mode_id: None,
        timer: Some(row.timer),
        destination: Some(row.destination),
        speed: Some(row.speed),
        step_type: Some(row.step_type),
        volume: Some(row.volume),
    }
}
