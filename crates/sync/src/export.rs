#![forbid(unsafe_code)]

use crate::modes::ModeRegistry;
use crate::steps::StepRegistry;
use de_core::RecordId;
use de_core::tsv;

/// Serializes the selected modes, in selection order, one row per line.
/// Returns `None` when the selection names no existing mode.
pub fn export_modes(modes: &ModeRegistry, selection: &[RecordId]) -> Option<String> {
    collect(selection.iter().filter_map(|id| modes.find(*id)).map(tsv::format_mode))
}

/// Serializes the selected steps, in selection order, one row per line.
/// Returns `None` when the selection names no existing step.
pub fn export_steps(steps: &StepRegistry, selection: &[RecordId]) -> Option<String> {
    collect(selection.iter().filter_map(|id| steps.find(*id)).map(tsv::format_step))
}

fn collect(rows: impl Iterator<Item = String>) -> Option<String> {
    let mut out = String::new();
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    if out.is_empty() {
        return None;
    }
    Some(tsv::strip_quotes(&out))
}
