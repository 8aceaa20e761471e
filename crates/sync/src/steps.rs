#![forbid(unsafe_code)]

use crate::error::SyncError;
use crate::modes::ModeRegistry;
use crate::notify::NotificationPort;
use crate::registry::{AddOutcome, Listeners, PatchOutcome, RegistryEvent};
use crate::rejection::Rejection;
use de_core::{IdentitySequencer, RecordId, RecordKind, Step, StepPatch};
use de_storage::RecordStore;

/// Live, ordered collection of steps mirrored to the `Steps` table.
///
/// Every step references an existing mode. Edits that would break that are
/// rejected before anything is applied: the operator is notified and the step
/// keeps the value it held before the edit.
#[derive(Debug, Default)]
pub struct StepRegistry {
    records: Vec<Step>,
    sequencer: IdentitySequencer,
    listeners: Listeners,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<S: RecordStore>(store: &S) -> Result<Self, SyncError> {
        let records = store.load_all::<Step>()?;
        let mut sequencer = IdentitySequencer::default();
        sequencer.reseed_after(store.max_identifier::<Step>()?);
        tracing::info!(count = records.len(), next_id = sequencer.peek(), "loaded steps");
        Ok(Self {
            records,
            sequencer,
            listeners: Listeners::default(),
        })
    }

    pub fn records(&self) -> &[Step] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Step> {
        self.records.get(index)
    }

    pub fn find(&self, id: RecordId) -> Option<&Step> {
        self.records.iter().find(|step| step.id == id)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|step| step.id == id)
    }

    pub fn sequencer(&self) -> &IdentitySequencer {
        &self.sequencer
    }

    /// First step, in registry order, whose `mode_id` is `mode_id`.
    pub fn first_referencing(&self, mode_id: RecordId) -> Option<&Step> {
        self.records.iter().find(|step| step.mode_id == mode_id)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&RegistryEvent) + Send + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Appends a blank step pointing at the first mode. Without any mode the
    /// operator is notified and nothing is created.
    pub fn add<S: RecordStore>(
        &mut self,
        store: &S,
        notifier: &dyn NotificationPort,
        modes: &ModeRegistry,
    ) -> Result<AddOutcome, SyncError> {
        let Some(first) = modes.first() else {
            let rejection = Rejection::NoModesForStep;
            tracing::warn!("step creation rejected: no modes");
            notifier.notify(&rejection.notice());
            return Ok(AddOutcome::Rejected(rejection));
        };

        let step = Step::blank(self.sequencer.next(), first.id);
        Ok(AddOutcome::Added(self.push(store, step)?))
    }

    /// Appends a step built from `patch` under a fresh id. The caller has already
    /// resolved `patch.mode_id` against the mode registry.
    pub(crate) fn add_with<S: RecordStore>(
        &mut self,
        store: &S,
        mode_id: RecordId,
        patch: &StepPatch,
    ) -> Result<RecordId, SyncError> {
        let mut step = Step::blank(self.sequencer.next(), mode_id);
        patch.apply_to(&mut step);
        self.push(store, step)
    }

    pub fn apply_patch<S: RecordStore>(
        &mut self,
        store: &S,
        notifier: &dyn NotificationPort,
        modes: &ModeRegistry,
        id: RecordId,
        patch: &StepPatch,
    ) -> Result<PatchOutcome, SyncError> {
        let index = self.index_of(id)?;
        let current = &self.records[index];

        if let Some(requested) = patch.mode_id {
            if requested != current.mode_id && !modes.contains(requested) {
                let rejection = Rejection::UnknownMode {
                    requested,
                    kept: current.mode_id,
                };
                tracing::warn!(step_id = id, requested, kept = current.mode_id, "mode reference rejected");
                notifier.notify(&rejection.notice());
                return Ok(PatchOutcome::Rejected(rejection));
            }
        }

        if !patch.changes(current) {
            return Ok(PatchOutcome::Unchanged);
        }
        self.write_at(store, index, patch)?;
        Ok(PatchOutcome::Applied)
    }

    pub(crate) fn overwrite_at<S: RecordStore>(
        &mut self,
        store: &S,
        index: usize,
        patch: &StepPatch,
    ) -> Result<RecordId, SyncError> {
        self.write_at(store, index, patch)
    }

    pub fn remove<S: RecordStore>(&mut self, store: &S, id: RecordId) -> Result<(), SyncError> {
        let index = self.index_of(id)?;
        store.delete::<Step>(id)?;
        self.records.remove(index);
        self.listeners.emit(RegistryEvent::Removed { index, id });
        Ok(())
    }

    fn push<S: RecordStore>(&mut self, store: &S, step: Step) -> Result<RecordId, SyncError> {
        store.insert(&step)?;
        let id = step.id;
        let index = self.records.len();
        self.records.push(step);
        self.listeners.emit(RegistryEvent::Inserted { index, id });
        Ok(id)
    }

    fn write_at<S: RecordStore>(
        &mut self,
        store: &S,
        index: usize,
        patch: &StepPatch,
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
            kind: RecordKind::Step,
            id,
        })
    }
}
