#![forbid(unsafe_code)]

use crate::rejection::Rejection;
use de_core::RecordId;

/// Structural and field changes published to registry subscribers, after the
/// store write for the change has committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Inserted { index: usize, id: RecordId },
    Updated { index: usize, id: RecordId },
    Removed { index: usize, id: RecordId },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    Added(RecordId),
    Rejected(Rejection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatchOutcome {
    Applied,
    Unchanged,
    Rejected(Rejection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Rejected(Rejection),
}

macro_rules! rejection_accessors {
    ($($outcome:ident),+) => {
        $(
            impl $outcome {
                pub fn rejection(&self) -> Option<Rejection> {
                    match self {
                        Self::Rejected(rejection) => Some(*rejection),
                        _ => None,
                    }
                }

                pub fn is_rejected(&self) -> bool {
                    self.rejection().is_some()
                }
            }
        )+
    };
}

rejection_accessors!(AddOutcome, PatchOutcome, RemoveOutcome);

type Listener = Box<dyn FnMut(&RegistryEvent) + Send>;

#[derive(Default)]
pub(crate) struct Listeners {
    inner: Vec<Listener>,
}

impl Listeners {
    pub(crate) fn push(&mut self, listener: Listener) {
        self.inner.push(listener);
    }

    pub(crate) fn emit(&mut self, event: RegistryEvent) {
        for listener in &mut self.inner {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.inner.len())
            .finish()
    }
}
