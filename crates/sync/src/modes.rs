#![forbid(unsafe_code)]

use crate::error::SyncError;
use crate::notify::NotificationPort;
use crate::registry::{Listeners, PatchOutcome, RegistryEvent, RemoveOutcome};
use crate::rejection::Rejection;
use crate::steps::StepRegistry;
use de_core::{IdentitySequencer, Mode, ModePatch, RecordId, RecordKind};
use de_storage::RecordStore;

/// Live, ordered collection of modes mirrored to the `Modes` table.
#[derive(Debug, Default)]
pub struct ModeRegistry {
    records: Vec<Mode>,
    sequencer: IdentitySequencer,
    listeners: Listeners,
}

impl ModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every stored mode and reseeds the sequencer past the largest id.
    pub fn load<S: RecordStore>(store: &S) -> Result<Self, SyncError> {
        let records = store.load_all::<Mode>()?;
        let mut sequencer = IdentitySequencer::default();
        sequencer.reseed_after(store.max_identifier::<Mode>()?);
        tracing::info!(count = records.len(), next_id = sequencer.peek(), "loaded modes");
        Ok(Self {
            records,
            sequencer,
            listeners: Listeners::default(),
        })
    }

    pub fn records(&self) -> &[Mode] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Mode> {
        self.records.get(index)
    }

    pub fn first(&self) -> Option<&Mode> {
        self.records.first()
    }

    pub fn find(&self, id: RecordId) -> Option<&Mode> {
        self.records.iter().find(|mode| mode.id == id)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|mode| mode.id == id)
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn sequencer(&self) -> &IdentitySequencer {
        &self.sequencer
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RegistryEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Appends a blank mode (the "new row" action).
    pub fn add<S: RecordStore>(&mut self, store: &S) -> Result<RecordId, SyncError> {
        let id = self.sequencer.next();
        self.push(store, Mode::blank(id))
    }

    /// Appends a mode built from the given field values under a fresh id.
    pub(crate) fn add_with<S: RecordStore>(
        &mut self,
        store: &S,
        patch: &ModePatch,
    ) -> Result<RecordId, SyncError> {
        let mut mode = Mode::blank(self.sequencer.next());
        patch.apply_to(&mut mode);
        self.push(store, mode)
    }

    pub fn apply_patch<S: RecordStore>(
        &mut self,
        store: &S,
        id: RecordId,
        patch: &ModePatch,
    ) -> Result<PatchOutcome, SyncError> {
        let index = self.index_of(id)?;
        if !patch.changes(&self.records[index]) {
            return Ok(PatchOutcome::Unchanged);
        }
        self.write_at(store, index, patch)?;
        Ok(PatchOutcome::Applied)
    }

    /// Applies every field of `patch` to the record at `index` and always persists
    /// an update, even when nothing changed.
    pub(crate) fn overwrite_at<S: RecordStore>(
        &mut self,
        store: &S,
        index: usize,
        patch: &ModePatch,
    ) -> Result<RecordId, SyncError> {
        self.write_at(store, index, patch)
    }

    /// Removes a mode unless a step still references it. A blocked removal
    /// notifies the operator, names the first referencing step and leaves both
    /// the registry and the store untouched.
    pub fn remove<S: RecordStore>(
        &mut self,
        store: &S,
        notifier: &dyn NotificationPort,
        steps: &StepRegistry,
        id: RecordId,
    ) -> Result<RemoveOutcome, SyncError> {
        let index = self.index_of(id)?;

        if let Some(step) = steps.first_referencing(id) {
            let rejection = Rejection::ModeInUse {
                mode_id: id,
                step_id: step.id,
            };
            tracing::warn!(mode_id = id, step_id = step.id, "mode removal blocked by step");
            notifier.notify(&rejection.notice());
            return Ok(RemoveOutcome::Rejected(rejection));
        }

        store.delete::<Mode>(id)?;
        self.records.remove(index);
        self.listeners.emit(RegistryEvent::Removed { index, id });
        Ok(RemoveOutcome::Removed)
    }

    fn push<S: RecordStore>(&mut self, store: &S, mode: Mode) -> Result<RecordId, SyncError> {
        store.insert(&mode)?;
        let id = mode.id;
        let index = self.records.len();
        self.records.push(mode);
        self.listeners.emit(RegistryEvent::Inserted { index, id });
        Ok(id)
    }

    fn write_at<S: RecordStore>(
        &mut self,
        store: &S,
        index: usize,
        patch: &ModePatch,
    ) -> Result<RecordId, SyncError> {
        let mut candidate = self.records[index].clone();
        patch.apply_to(&mut candidate);
        store.update(&candidate)?;

        let id = candidate.id;
        self.records[index] = candidate;
        self.listeners.emit(RegistryEvent::Updated { index, id });
        Ok(id)
    }

    fn index_of(&self, id: RecordId) -> Result<usize, SyncError> {
        self.position(id).ok_or(SyncError::UnknownRecord {
            kind: RecordKind::Mode,
            id,
        })
    }
}
