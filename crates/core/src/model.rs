#![forbid(unsafe_code)]

use crate::ids::RecordId;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Mode,
    Step,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Mode => "mode",
            RecordKind::Step => "step",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            RecordKind::Mode => "Modes",
            RecordKind::Step => "Steps",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Mode {
    pub id: RecordId,
    pub name: String,
    pub max_bottle_number: i32,
    pub max_used_tips: i32,
}

impl Mode {
    pub fn new(
        id: RecordId,
        name: impl Into<String>,
        max_bottle_number: i32,
        max_used_tips: i32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            max_bottle_number,
            max_used_tips,
        }
    }

    pub fn blank(id: RecordId) -> Self {
        Self::new(id, "", 0, 0)
    }
}

/// A dosing step. `mode_id` must always name an existing [`Mode`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: RecordId,
    pub mode_id: RecordId,
    pub timer: i32,
    pub destination: String,
    pub speed: i32,
    #[serde(rename = "type")]
    pub step_type: String,
    pub volume: i32,
    // One generation back; moves forward on every accepted mode_id change.
    #[serde(skip)]
    previous_mode_id: RecordId,
}

impl Step {
    pub fn new(
        id: RecordId,
        mode_id: RecordId,
        timer: i32,
        destination: impl Into<String>,
        speed: i32,
        step_type: impl Into<String>,
        volume: i32,
    ) -> Self {
        Self {
            id,
            mode_id,
            timer,
            destination: destination.into(),
            speed,
            step_type: step_type.into(),
            volume,
            previous_mode_id: mode_id,
        }
    }

    pub fn blank(id: RecordId, mode_id: RecordId) -> Self {
        Self::new(id, mode_id, 0, "", 0, "", 0)
    }

    pub fn previous_mode_id(&self) -> RecordId {
        self.previous_mode_id
    }

    /// Returns `true` when the value actually changed.
    pub fn set_mode_id(&mut self, mode_id: RecordId) -> bool {
        if self.mode_id == mode_id {
            return false;
        }
        self.previous_mode_id = self.mode_id;
        self.mode_id = mode_id;
        true
    }
}

/// Field-level change set for a [`Mode`]. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModePatch {
    pub name: Option<String>,
    pub max_bottle_number: Option<i32>,
    pub max_used_tips: Option<i32>,
}

impl ModePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.max_bottle_number.is_none() && self.max_used_tips.is_none()
    }

    /// Every field of `mode` except the identifier.
    pub fn from_mode(mode: &Mode) -> Self {
        Self {
            name: Some(mode.name.clone()),
            max_bottle_number: Some(mode.max_bottle_number),
            max_used_tips: Some(mode.max_used_tips),
        }
    }

    pub fn changes(&self, mode: &Mode) -> bool {
        self.name.as_ref().is_some_and(|v| *v != mode.name)
            || self.max_bottle_number.is_some_and(|v| v != mode.max_bottle_number)
            || self.max_used_tips.is_some_and(|v| v != mode.max_used_tips)
    }

    /// Applies the patch and reports whether any field changed.
    pub fn apply_to(&self, mode: &mut Mode) -> bool {
        let changed = self.changes(mode);
        if let Some(name) = &self.name {
            mode.name.clone_from(name);
        }
        if let Some(value) = self.max_bottle_number {
            mode.max_bottle_number = value;
        }
        if let Some(value) = self.max_used_tips {
            mode.max_used_tips = value;
        }
        changed
    }
}

/// Field-level change set for a [`Step`]. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepPatch {
    pub mode_id: Option<RecordId>,
    pub timer: Option<i32>,
    pub destination: Option<String>,
    pub speed: Option<i32>,
    pub step_type: Option<String>,
    pub volume: Option<i32>,
}

impl StepPatch {
    pub fn is_empty(&self) -> bool {
        self.mode_id.is_none()
            && self.timer.is_none()
            && self.destination.is_none()
            && self.speed.is_none()
            && self.step_type.is_none()
            && self.volume.is_none()
    }

    pub fn mode_id(mode_id: RecordId) -> Self {
        Self {
            mode_id: Some(mode_id),
            ..Self::default()
        }
    }

    /// Every field of `step` except the identifier.
    pub fn from_step(step: &Step) -> Self {
        Self {
            mode_id: Some(step.mode_id),
            timer: Some(step.timer),
            destination: Some(step.destination.clone()),
            speed: Some(step.speed),
            step_type: Some(step.step_type.clone()),
            volume: Some(step.volume),
        }
    }

    pub fn changes(&self, step: &Step) -> bool {
        self.mode_id.is_some_and(|v| v != step.mode_id)
            || self.timer.is_some_and(|v| v != step.timer)
            || self.destination.as_ref().is_some_and(|v| *v != step.destination)
            || self.speed.is_some_and(|v| v != step.speed)
            || self.step_type.as_ref().is_some_and(|v| *v != step.step_type)
            || self.volume.is_some_and(|v| v != step.volume)
    }

    /// Applies the patch and reports whether any field changed. The caller is
    /// responsible for checking that a new `mode_id` references an existing mode.
    pub fn apply_to(&self, step: &mut Step) -> bool {
        let changed = self.changes(step);
        if let Some(mode_id) = self.mode_id {
            step.set_mode_id(mode_id);
        }
        if let Some(value) = self.timer {
            step.timer = value;
        }
        if let Some(value) = &self.destination {
            step.destination.clone_from(value);
        }
        if let Some(value) = self.speed {
            step.speed = value;
        }
        if let Some(value) = &self.step_type {
            step.step_type.clone_from(value);
        }
        if let Some(value) = self.volume {
            step.volume = value;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_mode_id_moves_the_rollback_point() {
        let mut step = Step::blank(7, 1);
        assert_eq!(step.previous_mode_id(), 1);

        assert!(step.set_mode_id(2));
        assert_eq!(step.previous_mode_id(), 1);
        assert!(step.set_mode_id(3));
        assert_eq!(step.previous_mode_id(), 2);

        assert!(!step.set_mode_id(3));
        assert_eq!(step.previous_mode_id(), 2);
    }

    #[test]
    fn patch_reports_no_change_for_identical_values() {
        let mut mode = Mode::new(1, "A", 10, 2);
        let patch = ModePatch::from_mode(&mode);
        assert!(!patch.apply_to(&mut mode));

        let patch = ModePatch {
            max_used_tips: Some(3),
            ..ModePatch::default()
        };
        assert!(patch.apply_to(&mut mode));
        assert_eq!(mode, Mode::new(1, "A", 10, 3));
    }

    #[test]
    fn step_patch_applies_only_present_fields() {
        let mut step = Step::new(4, 1, 10, "rack", 5, "fill", 100);
        let patch = StepPatch {
            destination: Some("waste".to_string()),
            volume: Some(50),
            ..StepPatch::default()
        };
        assert!(patch.apply_to(&mut step));
        assert_eq!(step.destination, "waste");
        assert_eq!(step.volume, 50);
        assert_eq!(step.timer, 10);
        assert_eq!(step.mode_id, 1);
    }
}
