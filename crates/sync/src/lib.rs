#![forbid(unsafe_code)]

//! Keeps the live mode and step collections and the SQLite tables in step.
//!
//! Every mutation goes through a registry method that validates, writes the
//! store and only then updates memory, on the caller's thread. Operator-facing
//! rejections travel through [`NotificationPort`] and are reported as outcomes,
//! never as errors; [`SyncError`] is reserved for store failures and unknown ids.

mod clipboard;
mod error;
mod export;
mod import;
mod modes;
mod notify;
mod registry;
mod rejection;
mod session;
mod steps;

pub use clipboard::{ClipboardPort, MemoryClipboard};
pub use error::SyncError;
pub use export::{export_modes, export_steps};
pub use import::{ImportOutcome, ImportReport, import_mode_rows, import_step_rows};
pub use modes::ModeRegistry;
pub use notify::{Acknowledgement, CollectingNotifier, Notice, NotificationGate, NotificationPort};
pub use registry::{AddOutcome, PatchOutcome, RegistryEvent, RemoveOutcome};
pub use rejection::{Rejection, Repair};
pub use session::EditorSession;
pub use steps::StepRegistry;
