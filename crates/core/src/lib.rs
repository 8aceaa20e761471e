#![forbid(unsafe_code)]

pub mod auth;
pub mod ids;
pub mod model;
pub mod tsv;

pub use ids::{IdentitySequencer, RecordId};
pub use model::{Mode, ModePatch, RecordKind, Step, StepPatch};
