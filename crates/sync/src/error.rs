#![forbid(unsafe_code)]

use de_core::{RecordId, RecordKind};
use de_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error("unknown {kind} id {id}")]
    UnknownRecord { kind: RecordKind, id: RecordId },
}
