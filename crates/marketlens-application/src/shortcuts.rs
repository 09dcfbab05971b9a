//! Keyboard shortcuts: Ctrl+Enter submits, Ctrl+S saves the result as JSON.

use marketlens_core::Result;
use marketlens_core::form::FormInput;

use crate::controller::{AnalysisController, SubmitOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub ctrl: bool,
    pub key: String,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            ctrl: false,
            key: key.into(),
        }
    }

    pub fn ctrl(key: impl Into<String>) -> Self {
        Self {
            ctrl: true,
            key: key.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Submit,
    SaveJson,
}

impl Shortcut {
    pub fn from_key(key: &KeyPress) -> Option<Self> {
        if !key.ctrl {
            return None;
        }
        match key.key.as_str() {
            "Enter" => Some(Shortcut::Submit),
            "s" | "S" => Some(Shortcut::SaveJson),
            _ => None,
        }
    }
}

/// What a handled key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum ShortcutOutcome {
    Ignored,
    Submitted(SubmitOutcome),
    Saved,
}

impl AnalysisController {
    /// Dispatches a key press. Ctrl+S without a loaded analysis does nothing.
    pub async fn handle_key(&mut self, key: &KeyPress, form: &FormInput) -> Result<ShortcutOutcome> {
        match Shortcut::from_key(key) {
            Some(Shortcut::Submit) => Ok(ShortcutOutcome::Submitted(self.submit(form).await?)),
            Some(Shortcut::SaveJson) if self.analysis().is_some() => {
                self.save_json().await?;
                Ok(ShortcutOutcome::Saved)
            }
            _ => Ok(ShortcutOutcome::Ignored),
        }
    }
}
