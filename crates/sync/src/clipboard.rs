#![forbid(unsafe_code)]

use std::sync::Mutex;

/// Text clipboard used by the copy and paste paths.
pub trait ClipboardPort {
    fn get_text(&self) -> Option<String>;
    fn set_text(&self, text: String);
}

impl<T: ClipboardPort + ?Sized> ClipboardPort for &T {
    fn get_text(&self) -> Option<String> {
        (**self).get_text()
    }

    fn set_text(&self, text: String) {
        (**self).set_text(text)
    }
}

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
        }
    }
}

impl ClipboardPort for MemoryClipboard {
    fn get_text(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set_text(&self, text: String) {
        *self
            .text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text);
    }
}
