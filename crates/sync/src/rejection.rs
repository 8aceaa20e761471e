#![forbid(unsafe_code)]

use crate::notify::Notice;
use de_core::RecordId;

/// A referential-integrity violation that was caught and handled locally.
/// The registry state is unchanged whenever one of these is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// A step edit pointed `mode_id` at a mode that does not exist.
    UnknownMode { requested: RecordId, kept: RecordId },
    /// A mode is still referenced by at least one step.
    ModeInUse { mode_id: RecordId, step_id: RecordId },
    /// A new step was requested while there are no modes to reference.
    NoModesForStep,
    /// Step rows were pasted while there are no modes to reference.
    NoModesForImport,
}

impl Rejection {
    pub fn notice(&self) -> Notice {
        Notice::warning(self.to_string())
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownMode { requested, .. } => write!(
                f,
                "There are no records in the table Modes with the Id {requested}. \nPlease create this record first."
            ),
            Self::ModeInUse { step_id, .. } => write!(
                f,
                "Can't delete this record, because at least the record with ID {step_id} in Steps table has connection to it. Please edit it first."
            ),
            Self::NoModesForStep => f.write_str(
                "There are no records in the table Modes to fill ModeId field. \nPlease create this record first.",
            ),
            Self::NoModesForImport => f.write_str(
                "It's impossible to add any records into Steps table because there are no records in Modes table for ModeId link. Please create any record in Modes table first.",
            ),
        }
    }
}

/// A pasted step row whose mode reference was substituted instead of rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repair {
    pub requested: RecordId,
    pub substituted: RecordId,
}

impl Repair {
    pub fn notice(&self) -> Notice {
        Notice::warning(format!(
            "There are no records with the Id {} in the Mode table. ModeId value will be replaced by the ID of the first record from the Mode table.",
            self.requested
        ))
    }
}
