#![forbid(unsafe_code)]

/// Identifier shared by in-memory records and their persisted rows.
pub type RecordId = i64;

/// Hands out local identifiers for records built in memory before they reach the store.
///
/// `next` has post-increment semantics: it returns the value it consumes. Every
/// construction consumes a value, including records that are later discarded, so
/// gaps between identifiers are normal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentitySequencer {
    next: RecordId,
}

impl IdentitySequencer {
    pub fn new(start: RecordId) -> Self {
        Self { next: start }
    }

    pub fn next(&mut self) -> RecordId {
        let value = self.next;
        self.next = self.next.saturating_add(1);
        value
    }

    pub fn peek(&self) -> RecordId {
        self.next
    }

    pub fn reseed(&mut self, value: RecordId) {
        self.next = value;
    }

    /// Reseeds from the largest identifier currently held by the store.
    pub fn reseed_after(&mut self, max_existing: Option<RecordId>) {
        self.reseed(max_existing.unwrap_or(0).saturating_add(1));
    }
}

impl Default for IdentitySequencer {
    fn default() -> Self {
        Self::new(1)
    }
}
