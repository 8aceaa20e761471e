#![forbid(unsafe_code)]

mod store;

pub use store::{RecordStore, SqliteStore, StoreError, StoredRecord};
