#![forbid(unsafe_code)]

use crate::clipboard::ClipboardPort;
use crate::error::SyncError;
use crate::export;
use crate::import::{self, ImportOutcome, ImportReport};
use crate::modes::ModeRegistry;
use crate::notify::{NotificationGate, NotificationPort};
use crate::registry::{AddOutcome, PatchOutcome, RemoveOutcome};
use crate::steps::StepRegistry;
use de_core::{ModePatch, RecordId, StepPatch};
use de_storage::RecordStore;

/// One operator session: the store, both registries, and the notification and
/// clipboard ports they use, all owned for the lifetime of the session.
#[derive(Debug)]
pub struct EditorSession<S, N, C> {
    store: S,
    notifier: NotificationGate<N>,
    clipboard: C,
    modes: ModeRegistry,
    steps: StepRegistry,
}

impl<S, N, C> EditorSession<S, N, C>
where
    S: RecordStore,
    N: NotificationPort,
    C: ClipboardPort,
{
    pub fn open(store: S, notifier: N, clipboard: C) -> Result<Self, SyncError> {
        let modes = ModeRegistry::load(&store)?;
        let steps = StepRegistry::load(&store)?;
        Ok(Self {
            store,
            notifier: NotificationGate::new(notifier),
            clipboard,
            modes,
            steps,
        })
    }

    /// Drops the in-memory state and reloads it from the store. Subscribers are
    /// not carried over.
    pub fn reload(&mut self) -> Result<(), SyncError> {
        self.modes = ModeRegistry::load(&self.store)?;
        self.steps = StepRegistry::load(&self.store)?;
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        self.notifier.port()
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn modes(&self) -> &ModeRegistry {
        &self.modes
    }

    pub fn steps(&self) -> &StepRegistry {
        &self.steps
    }

    pub fn modes_mut(&mut self) -> &mut ModeRegistry {
        &mut self.modes
    }

    pub fn steps_mut(&mut self) -> &mut StepRegistry {
        &mut self.steps
    }

    pub fn add_mode(&mut self) -> Result<RecordId, SyncError> {
        self.modes.add(&self.store)
    }

    pub fn add_step(&mut self) -> Result<AddOutcome, SyncError> {
        self.steps.add(&self.store, &self.notifier, &self.modes)
    }

    pub fn patch_mode(&mut self, id: RecordId, patch: &ModePatch) -> Result<PatchOutcome, SyncError> {
        self.modes.apply_patch(&self.store, id, patch)
    }

    pub fn patch_step(&mut self, id: RecordId, patch: &StepPatch) -> Result<PatchOutcome, SyncError> {
        self.steps
            .apply_patch(&self.store, &self.notifier, &self.modes, id, patch)
    }

    pub fn delete_mode(&mut self, id: RecordId) -> Result<RemoveOutcome, SyncError> {
        self.modes
            .remove(&self.store, &self.notifier, &self.steps, id)
    }

    pub fn delete_step(&mut self, id: RecordId) -> Result<(), SyncError> {
        self.steps.remove(&self.store, id)
    }

    pub fn import_modes(&mut self, text: &str, start: Option<usize>) -> Result<ImportReport, SyncError> {
        import::import_mode_rows(&mut self.modes, &self.store, text, start)
    }

    pub fn import_steps(&mut self, text: &str, start: Option<usize>) -> Result<ImportOutcome, SyncError> {
        import::import_step_rows(
            &mut self.steps,
            &self.modes,
            &self.store,
            &self.notifier,
            text,
            start,
        )
    }

    pub fn export_modes(&self, selection: &[RecordId]) -> Option<String> {
        export::export_modes(&self.modes, selection)
    }

    pub fn export_steps(&self, selection: &[RecordId]) -> Option<String> {
        export::export_steps(&self.steps, selection)
    }

    /// Puts the selected modes on the clipboard. Returns `false`, leaving the
    /// clipboard alone, when nothing is selected.
    pub fn copy_modes(&self, selection: &[RecordId]) -> bool {
        match self.export_modes(selection) {
            Some(text) => {
                self.clipboard.set_text(text);
                true
            }
            None => false,
        }
    }

    pub fn copy_steps(&self, selection: &[RecordId]) -> bool {
        match self.export_steps(selection) {
            Some(text) => {
                self.clipboard.set_text(text);
                true
            }
            None => false,
        }
    }

    /// Pastes clipboard rows into the modes at `start`. `None` when the
    /// clipboard is empty.
    pub fn paste_modes(&mut self, start: Option<usize>) -> Result<Option<ImportReport>, SyncError> {
        match self.clipboard_text() {
            Some(text) => self.import_modes(&text, start).map(Some),
            None => Ok(None),
        }
    }

    /// Pastes clipboard rows into the steps at `start`. Without modes the paste
    /// is blocked, and the operator notified, whatever the clipboard holds.
    pub fn paste_steps(&mut self, start: Option<usize>) -> Result<Option<ImportOutcome>, SyncError> {
        if self.modes.is_empty() {
            return self.import_steps("", start).map(Some);
        }
        match self.clipboard_text() {
            Some(text) => self.import_steps(&text, start).map(Some),
            None => Ok(None),
        }
    }

    fn clipboard_text(&self) -> Option<String> {
        self.clipboard.get_text().filter(|text| !text.is_empty())
    }
}
